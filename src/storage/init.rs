//! Storage initialization
//!
//! First-run setup: directories plus the default tax table.

use crate::config::paths::LibroPaths;
use crate::error::LibroError;
use crate::models::default_tax_configs;

use super::file_io::write_json_atomic;
use super::taxes::TaxData;

/// Initialize storage for a fresh installation
///
/// Existing files are never overwritten.
pub fn initialize_storage(paths: &LibroPaths) -> Result<(), LibroError> {
    paths.ensure_directories()?;

    if !paths.taxes_file().exists() {
        let data = TaxData {
            configs: default_tax_configs(),
            obligations: Vec::new(),
        };
        write_json_atomic(paths.taxes_file(), &data)?;
        tracing::info!("seeded default tax configurations");
    }

    Ok(())
}

/// Whether the tax table still has to be seeded
pub fn needs_initialization(paths: &LibroPaths) -> bool {
    !paths.taxes_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxConfig;
    use crate::storage::read_json;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_taxes() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let data: TaxData = read_json(paths.taxes_file()).unwrap();
        let codes: Vec<_> = data.configs.iter().map(|c| c.code.as_str()).collect();
        assert!(codes.contains(&"IVA"));
        assert!(codes.contains(&"IIBB"));
        assert!(data.obligations.is_empty());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = TaxData {
            configs: vec![TaxConfig::new("ONLY", "Only tax", 100, "Local", 5)],
            obligations: Vec::new(),
        };
        write_json_atomic(paths.taxes_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let data: TaxData = read_json(paths.taxes_file()).unwrap();
        assert_eq!(data.configs.len(), 1);
        assert_eq!(data.configs[0].code, "ONLY");
    }
}

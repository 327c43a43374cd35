//! Backup CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::LibroPaths;
use crate::config::settings::Settings;
use crate::error::{LibroError, LibroResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup and apply the retention policy
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup filename or path
        backup: String,
    },

    /// Delete old backups according to retention policy
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(paths: &LibroPaths, settings: &Settings, cmd: BackupCommands) -> LibroResult<()> {
    let retention = settings.backup_retention.clone();
    let manager = BackupManager::new(paths.clone(), retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", display_name(&backup_path));
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: libro backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");

            for (i, backup) in backups.iter().enumerate() {
                let age = format_duration(chrono::Utc::now().signed_duration_since(backup.created_at));
                let monthly_marker = if backup.is_monthly { " [monthly]" } else { "" };

                if verbose {
                    println!(
                        "{}. {}{}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        monthly_marker,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {}){}",
                        i + 1,
                        backup.filename,
                        age,
                        format_size(backup.size_bytes),
                        monthly_marker,
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;

            let restore_manager = RestoreManager::new(paths.clone());
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("File: {}", backup_path.display());
            println!("Created: {}", validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Status: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  libro backup restore {} --force", backup);
                return Ok(());
            }

            let pre_restore = manager.create_backup()?;
            println!("Current data saved to {}", display_name(&pre_restore));

            let result = restore_manager.restore_from_file(&backup_path)?;
            println!("Restore complete. {}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let validation = RestoreManager::new(paths.clone()).validate_backup(&backup_path)?;
            let metadata = std::fs::metadata(&backup_path)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Size: {}", format_size(metadata.len()));
            println!("Created: {}", validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Schema version: {}", validation.schema_version);
            println!("Contents: {}", validation.present.join(", "));
            if !validation.missing.is_empty() {
                println!("Missing:  {}", validation.missing.join(", "));
            }
            println!("Status: {}", if validation.is_complete() { "Complete" } else { "Partial" });
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let (monthly, daily): (Vec<_>, Vec<_>) = backups.iter().partition(|b| b.is_monthly);

            let daily_to_delete = daily.len().saturating_sub(retention.daily_count as usize);
            let monthly_to_delete = monthly.len().saturating_sub(retention.monthly_count as usize);
            let total_to_delete = daily_to_delete + monthly_to_delete;

            println!(
                "Retention policy: {} daily, {} monthly",
                retention.daily_count, retention.monthly_count
            );
            println!("Current backups: {} daily, {} monthly", daily.len(), monthly.len());

            if total_to_delete == 0 {
                println!("No backups to prune.");
                return Ok(());
            }

            if !force {
                println!("{} backup(s) would be deleted.", total_to_delete);
                println!("To delete them, run again with --force flag:");
                println!("  libro backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, paths: &LibroPaths, backup: &str) -> LibroResult<PathBuf> {
    let not_found = || LibroError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    };

    if backup.eq_ignore_ascii_case("latest") {
        return manager.get_backup("latest")?.map(|b| b.path).ok_or_else(not_found);
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_dir = paths.backup_dir().join(backup);
    if in_dir.exists() {
        return Ok(in_dir);
    }

    let with_ext = paths.backup_dir().join(format!("{}.json", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(not_found())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::hours(5)), "5h");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}

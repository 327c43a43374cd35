//! Custom error types for Libro
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Money;

/// The main error type for Libro operations
#[derive(Error, Debug)]
pub enum LibroError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A journal entry whose sides do not match
    #[error("Entry is not balanced: debits {debits}, credits {credits}")]
    Unbalanced { debits: Money, credits: Money },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// AI assistant errors (user-facing message)
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport errors talking to a hosted service
    #[error("HTTP error: {0}")]
    Http(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl LibroError {
    /// Create a "not found" error for chart-of-accounts entries
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for journal entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Journal entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for cash-flow items
    pub fn cash_flow_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Cash-flow item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for partners
    pub fn partner_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Partner",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for partner movements
    pub fn movement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Movement",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for products
    pub fn product_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Product",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for tax configurations and obligations
    pub fn tax_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Tax",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Unbalanced { .. })
    }
}

impl From<std::io::Error> for LibroError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LibroError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for LibroError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for Libro operations
pub type LibroResult<T> = Result<T, LibroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibroError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LibroError::partner_not_found("Acme");
        assert_eq!(err.to_string(), "Partner not found: Acme");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unbalanced_error() {
        let err = LibroError::Unbalanced {
            debits: Money::from_cents(150000),
            credits: Money::from_cents(100000),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced: debits $1500.00, credits $1000.00"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let libro_err: LibroError = io_err.into();
        assert!(matches!(libro_err, LibroError::Io(_)));
    }
}

//! Catalog error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Invalid action at index {index}: {message}")]
    InvalidEntry { index: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_entry_display() {
        let err = CatalogError::InvalidEntry {
            index: 2,
            message: "missing 'type'".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid action at index 2: missing 'type'");
    }

    #[test]
    fn test_not_found_display() {
        let err = CatalogError::NotFound("llms.txt".to_string());
        assert!(err.to_string().contains("llms.txt"));
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CatalogError = io.into();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}

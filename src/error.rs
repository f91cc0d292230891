use std::path::PathBuf;

use thiserror::Error;

/// Failures loading a template. Fatal to the load; the suite does not start.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template `{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read template file `{}`: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template file `{}`: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid `{field}` in {location}: {reason}")]
    InvalidField {
        location: String,
        field: &'static str,
        reason: String,
    },

    #[error("Template `{0}` has no test cases")]
    NoTestCases(String),
}

/// User-supplied input rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Header(String),

    #[error("{0}")]
    Variable(String),
}

/// File-system failures for the data directory (settings, history, reports).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for manifest parsing and persistence.

use std::path::PathBuf;

/// Manifest source could not be understood.
///
/// Offsets are byte positions in the source.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ManifestParseError {
    /// No `export const <collection> = ...(` declaration.
    #[error("registration call for collection {0:?} not found")]
    MissingRegistration(String),

    /// Unexpected text inside the registration call.
    #[error("expected {expected} at byte {offset}")]
    Syntax {
        /// What the parser was looking for.
        expected: &'static str,
        /// Where it was looking.
        offset: usize,
    },

    /// `info` object is not valid JSON or lacks `path`/`fullPath`.
    #[error("invalid entry info at byte {offset}")]
    InvalidInfo {
        /// Start of the object.
        offset: usize,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// `data` refers to something other than a generated import.
    #[error("entry data {0:?} is not a generated import binding")]
    ForeignBinding(String),

    /// `data` refers to a binding with no import statement.
    #[error("entry binding {0} has no matching import")]
    UnboundEntry(u64),

    /// Binding index does not fit in 64 bits.
    #[error("entry binding {0:?} is out of range")]
    BindingOutOfRange(String),
}

/// Error reading or writing the manifest file.
#[derive(Debug, thiserror::Error)]
pub enum ManifestFileError {
    /// I/O error on the manifest or its backup.
    #[error("I/O error on {}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ManifestFileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for iac-load

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading input documents
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File was read but is not a valid document
    #[error("unable to decode {kind} {path:?}: {source}")]
    Decode {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Recursive discovery was requested on something that is not a directory
    #[error("not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_mentions_path_and_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::Decode {
            kind: "snapshot",
            path: PathBuf::from("/tmp/snap.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("snapshot"));
        assert!(msg.contains("snap.json"));
    }
}

//! Error types for hourtrack operations.

use thiserror::Error;

/// Errors that can occur while generating slots or persisting progress.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A time or date string did not match the expected format.
    #[error("Malformed value '{input}', expected {expected}")]
    Format {
        input: String,
        expected: &'static str,
    },

    /// The value stored under a key isn't a valid progress collection.
    #[error("Stored progress under '{key}' is corrupt: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage failure for '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    pub fn time_format(input: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
            expected: "HH:mm",
        }
    }

    pub fn date_format(input: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
            expected: "yyyy-MM-dd",
        }
    }

    pub fn storage(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.into(),
            source,
        }
    }
}

/// Result type alias for hourtrack operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

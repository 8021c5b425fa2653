/// Convenience result type used across the validator.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Top-level error taxonomy for anything that stops a validation run.
///
/// Rule violations are never errors at this level; they are findings in a
/// [`crate::ValidationReport`].
#[derive(thiserror::Error, Debug)]
pub enum ValidatorError {
    /// The scene file could not be turned into a graph.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The rule configuration is unusable.
    #[error("config error: {0}")]
    Config(String),

    /// Reading an input or writing an output failed.
    #[error("io error at '{path}': {source}")]
    Io {
        /// Path involved in the failed operation.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ValidatorError {
    /// Build a [`ValidatorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ValidatorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ValidatorError::Io`] value for `path`.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Fatal structural problem found while parsing a scene file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A statement referenced a node that was never created.
    #[error("line {line}: unknown node '{name}'")]
    UnknownNode {
        /// Name as written in the statement.
        name: String,
        /// 1-based line where the statement starts.
        line: usize,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

//! Error types for the meta-model.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while looking up or loading meta-model entities.
#[derive(Debug)]
pub enum ModelError {
    /// No object with this alias is known to the model.
    ObjectNotFound {
        /// Fully qualified object alias (`NAMESPACE.ALIAS`).
        alias: String,
    },

    /// The object has no attribute with this alias.
    AttributeNotFound {
        /// Object the lookup started from.
        object: String,
        /// Attribute alias or relation path that failed.
        alias: String,
    },

    /// A relation alias inside an attribute path does not exist.
    RelationNotFound {
        /// Object owning the missing relation.
        object: String,
        /// The relation alias.
        alias: String,
    },

    /// An expression string could not be parsed.
    InvalidExpression {
        /// The offending expression.
        expression: String,
        /// Description of the problem.
        message: String,
    },

    /// Model definition could not be read.
    IoError {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Model definition is not valid JSON or has the wrong shape.
    InvalidDefinition {
        /// Description of the error.
        message: String,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ObjectNotFound { alias } => {
                write!(f, "Meta object not found: {}", alias)
            }
            ModelError::AttributeNotFound { object, alias } => {
                write!(f, "Attribute '{}' not found in object {}", alias, object)
            }
            ModelError::RelationNotFound { object, alias } => {
                write!(f, "Relation '{}' not found in object {}", alias, object)
            }
            ModelError::InvalidExpression {
                expression,
                message,
            } => {
                write!(f, "Invalid expression '{}': {}", expression, message)
            }
            ModelError::IoError { path, source } => {
                write!(f, "IO error loading model '{}': {}", path.display(), source)
            }
            ModelError::InvalidDefinition { message } => {
                write!(f, "Invalid model definition: {}", message)
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::InvalidDefinition {
            message: err.to_string(),
        }
    }
}

/// Result type alias for meta-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

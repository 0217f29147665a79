use std::path::PathBuf;
use thiserror::Error;

use crate::data::{EntityKind, Identity};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration file not found in '{0}'")]
    NotFound(PathBuf),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("unable to parse sample data: {0}")]
    Seed(#[source] serde_json::Error),

    // External errors
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
    #[error(transparent)]
    Cors(#[from] rocket_cors::Error),
}

/// Which gateway call produced a remote failure. Picks the fallback message
/// when the record store doesn't provide one.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Operation {
    Load,
    Save,
    Delete,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Save => "save",
            Operation::Delete => "delete",
        }
    }

    pub fn fallback_message(self, kind: EntityKind) -> String {
        match self {
            Operation::Load => format!("Failed to load {}", kind.plural()),
            Operation::Save => format!("Failed to save {}", kind.noun()),
            Operation::Delete => format!("Failed to delete {}", kind.noun()),
        }
    }
}

/// Failure of a single gateway call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("{kind} not found")]
    NotFound { kind: EntityKind, id: Identity },
    #[error("'{0}' is not a valid identity")]
    InvalidIdentity(String),
    #[error("{field} is required")]
    Validation {
        kind: EntityKind,
        field: &'static str,
    },
    #[error("{field} must be a record identity, got '{value}'")]
    InvalidReference {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },
    #[error("no identities left for {kind} records")]
    Exhausted { kind: EntityKind },
    #[error("{message}")]
    Remote { message: String },
    #[error("unable to read {kind} record from the record store: {reason}")]
    Decode { kind: EntityKind, reason: String },
}

impl GatewayError {
    pub fn remote(message: Option<String>, op: Operation, kind: EntityKind) -> GatewayError {
        let message = message
            .filter(|it| !it.trim().is_empty())
            .unwrap_or_else(|| op.fallback_message(kind));
        GatewayError::Remote { message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }
}

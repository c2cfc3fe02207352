//! Error types for store requests and initializer steps.

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

const UNAUTHORIZED: i32 = 13;
const AUTHENTICATION_FAILED: i32 = 18;
const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;
const INDEX_ALREADY_EXISTS: i32 = 68;
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
const DUPLICATE_KEY: i32 = 11000;

/// A failed store request, classified by what the caller can do about it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("conflicting index definition: {0}")]
    IndexConflict(String),

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("store request failed")]
    Other(#[source] mongodb::error::Error),
}

impl StoreError {
    /// The only failure the initializer treats as a successful no-op.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        classify(&err).unwrap_or_else(|| StoreError::Other(err))
    }
}

fn classify(err: &mongodb::error::Error) -> Option<StoreError> {
    let classified = match err.kind.as_ref() {
        ErrorKind::Command(command) => match command.code {
            NAMESPACE_EXISTS | INDEX_ALREADY_EXISTS => {
                StoreError::AlreadyExists(command.message.clone())
            }
            UNAUTHORIZED | AUTHENTICATION_FAILED => {
                StoreError::Unauthorized(command.message.clone())
            }
            NAMESPACE_NOT_FOUND => StoreError::NotFound(command.message.clone()),
            DUPLICATE_KEY => StoreError::DuplicateKey(command.message.clone()),
            INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT => {
                StoreError::IndexConflict(command.message.clone())
            }
            _ => return None,
        },
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            StoreError::DuplicateKey(write.message.clone())
        }
        ErrorKind::Authentication { message, .. } => StoreError::Unauthorized(message.clone()),
        ErrorKind::ServerSelection { message, .. } => StoreError::Unreachable(message.clone()),
        ErrorKind::Io(io) => StoreError::Unreachable(io.to_string()),
        _ => return None,
    };
    Some(classified)
}

/// The initializer step that failed, with the store error behind it.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("database '{database}' is unreachable")]
    Unreachable {
        database: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to create collection '{collection}'")]
    CreateCollection {
        collection: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to create index '{index}' on collection '{collection}'")]
    CreateIndex {
        collection: String,
        index: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to inspect {target}")]
    Inspect {
        target: String,
        #[source]
        source: StoreError,
    },
}

impl InitError {
    /// Store error underneath the failed step.
    pub fn store_error(&self) -> &StoreError {
        match self {
            InitError::Unreachable { source, .. }
            | InitError::CreateCollection { source, .. }
            | InitError::CreateIndex { source, .. }
            | InitError::Inspect { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_already_exists_is_ignorable() {
        assert!(StoreError::AlreadyExists("surveys".into()).is_already_exists());
        assert!(!StoreError::Unauthorized("createIndexes".into()).is_already_exists());
        assert!(!StoreError::DuplicateKey("id_1".into()).is_already_exists());
        assert!(!StoreError::IndexConflict("id_1".into()).is_already_exists());
        assert!(!StoreError::Unreachable("timeout".into()).is_already_exists());
    }

    #[test]
    fn io_failures_are_unreachable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::from(mongodb::error::Error::from(io));
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[test]
    fn init_error_exposes_store_error() {
        let err = InitError::CreateIndex {
            collection: "candidates".into(),
            index: "id_1".into(),
            source: StoreError::Unauthorized("not allowed".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to create index 'id_1' on collection 'candidates'"
        );
        assert!(matches!(err.store_error(), StoreError::Unauthorized(_)));
    }
}

use std::error::Error;
use std::fmt;

use crate::infrastructure::node::NodeClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error raised while turning raw container bytes into domain records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a field was complete
    UnexpectedEof { needed: usize, remaining: usize },
    /// Bytes left over after the top-level value
    TrailingBytes(usize),
    /// Codec version not registered for this chain
    UnsupportedVersion(u16),
    /// Type id not registered for this chain and codec version
    UnknownTypeId { version: u16, type_id: u32 },
    /// A known type showed up where it cannot be used
    UnexpectedType(String),
    /// Output variant the mapper does not handle
    UnknownOutputType(String),
    /// Staking rewards owner is not a plain output owner set
    InvalidRewardsOwner,
    /// Length prefix above the allowed maximum
    LengthTooLarge { len: usize, max: usize },
    /// Anything else that makes the payload malformed
    Malformed(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEof { needed, remaining } => write!(
                f,
                "unexpected end of input: needed {} bytes, {} remaining",
                needed, remaining
            ),
            DecodeError::TrailingBytes(n) => write!(f, "{} trailing bytes after value", n),
            DecodeError::UnsupportedVersion(v) => write!(f, "unsupported codec version {}", v),
            DecodeError::UnknownTypeId { version, type_id } => {
                write!(f, "unknown type id {} for codec version {}", type_id, version)
            }
            DecodeError::UnexpectedType(name) => write!(f, "unexpected type {}", name),
            DecodeError::UnknownOutputType(id) => write!(f, "unknown output type: {}", id),
            DecodeError::InvalidRewardsOwner => write!(f, "invalid rewards owner type"),
            DecodeError::LengthTooLarge { len, max } => {
                write!(f, "length {} exceeds maximum {}", len, max)
            }
            DecodeError::Malformed(msg) => write!(f, "malformed payload: {}", msg),
        }
    }
}

impl Error for DecodeError {}

/// Error type for the sync workers
#[derive(Debug)]
pub enum SyncError {
    NodeError(NodeClientError),
    DbError(DbError),
    DecodeError(DecodeError),
    ProcessingError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NodeError(e) => write!(f, "Node error: {}", e),
            SyncError::DbError(e) => write!(f, "Database error: {}", e),
            SyncError::DecodeError(e) => write!(f, "Decode error: {}", e),
            SyncError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SyncError::NodeError(e) => Some(e),
            SyncError::DbError(e) => Some(e),
            SyncError::DecodeError(e) => Some(e),
            SyncError::ProcessingError(_) => None,
        }
    }
}

impl From<NodeClientError> for SyncError {
    fn from(error: NodeClientError) -> Self {
        SyncError::NodeError(error)
    }
}

impl From<DbError> for SyncError {
    fn from(error: DbError) -> Self {
        SyncError::DbError(error)
    }
}

impl From<DecodeError> for SyncError {
    fn from(error: DecodeError) -> Self {
        SyncError::DecodeError(error)
    }
}

/// Error type for the metrics pipeline
#[derive(Debug)]
pub enum PipelineError {
    NodeError(NodeClientError),
    DbError(DbError),
    /// A node value could not be parsed
    ParseError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NodeError(e) => write!(f, "Node error: {}", e),
            PipelineError::DbError(e) => write!(f, "Database error: {}", e),
            PipelineError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for PipelineError {}

impl From<NodeClientError> for PipelineError {
    fn from(error: NodeClientError) -> Self {
        PipelineError::NodeError(error)
    }
}

impl From<DbError> for PipelineError {
    fn from(error: DbError) -> Self {
        PipelineError::DbError(error)
    }
}

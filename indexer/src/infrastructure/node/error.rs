use std::error::Error;
use std::fmt;

/// Error type for node RPC calls
#[derive(Debug)]
pub enum NodeClientError {
    /// Error from the reqwest HTTP client
    HttpError(reqwest::Error),
    /// Error parsing JSON
    JsonError(serde_json::Error),
    /// The node answered with a JSON-RPC error object
    RpcError { code: i64, message: String },
    /// The node answered with an unexpected payload
    ResponseError(String),
    /// The requested item does not exist on the node
    NotFound(String),
}

impl NodeClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NodeClientError::NotFound(_))
    }
}

impl fmt::Display for NodeClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
            NodeClientError::JsonError(e) => write!(f, "JSON error: {}", e),
            NodeClientError::RpcError { code, message } => {
                write!(f, "RPC error {}: {}", code, message)
            }
            NodeClientError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            NodeClientError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl Error for NodeClientError {}

impl From<reqwest::Error> for NodeClientError {
    fn from(error: reqwest::Error) -> Self {
        NodeClientError::HttpError(error)
    }
}

impl From<serde_json::Error> for NodeClientError {
    fn from(error: serde_json::Error) -> Self {
        NodeClientError::JsonError(error)
    }
}

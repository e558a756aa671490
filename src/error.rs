//! Error types for the Chinook MCP Server.
//!
//! Every variant renders to the exact text a client sees, so gateway and
//! introspector failures can be returned as plain strings and detected by
//! prefix (`Error:`, `SQL Error:`, `An unexpected error occurred:`).

pub use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Domain-specific errors for the Chinook MCP Server.
///
/// Named `ServerError` to avoid collision with `rmcp::ErrorData`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The dataset could not be provisioned or opened at startup
    #[error("Setup error: {message}")]
    Setup {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query rejected by the read-only gate or another input check
    #[error("Error: {0}")]
    Validation(String),

    /// Argument of the wrong shape at the protocol boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Table absent from the catalog
    #[error("Table '{0}' not found.")]
    TableNotFound(String),

    /// The storage engine rejected the statement
    #[error("SQL Error: {0}")]
    Execution(#[from] rusqlite::Error),

    /// The query text holds more than one statement
    #[error("SQL Error: You can only execute one statement at a time.")]
    MultipleStatements,

    /// Anything else that went wrong while executing
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),

    /// Resource URI that does not map to any resource
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a setup error.
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a setup error with a source.
    pub fn setup_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Setup {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound(name.into())
    }

    /// Create an unexpected error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Create a resource not found error.
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound(uri.into())
    }

    /// Whether the failure came from the storage engine itself.
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_) | Self::MultipleStatements)
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Check your CHINOOK_* environment variables"),
            Self::Setup { .. } => {
                Some("Check network access to the dataset URL or place Chinook.db manually")
            }
            Self::Validation(_) => Some("Rewrite the statement as a single SELECT query"),
            Self::TableNotFound(_) => {
                Some("Read schema://chinook/tables to see the available tables")
            }
            Self::Execution(_) => Some("Check table and column names against the schema"),
            Self::MultipleStatements => Some("Send each statement in its own call"),
            _ => None,
        }
    }
}

/// Convert ServerError to rmcp's ErrorData for protocol responses.
///
/// Gateway and introspector failures never take this path: they are
/// rendered as text. This is for malformed requests (unknown resource URI,
/// unknown prompt, bad prompt arguments).
impl From<ServerError> for McpError {
    fn from(e: ServerError) -> Self {
        match e {
            ServerError::ResourceNotFound(msg) => McpError::resource_not_found(msg, None),
            ServerError::InvalidArgument(_)
            | ServerError::Validation(_)
            | ServerError::TableNotFound(_) => McpError::invalid_params(e.to_string(), None),
            ServerError::Config(_)
            | ServerError::Setup { .. }
            | ServerError::Execution(_)
            | ServerError::MultipleStatements
            | ServerError::Unexpected(_) => McpError::internal_error(e.to_string(), None),
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            ServerError::unexpected("query task was cancelled")
        } else {
            ServerError::unexpected(format!("query task panicked: {}", e))
        }
    }
}

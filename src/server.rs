//! MCP server struct definition and initialization.

use crate::config::Config;
use crate::database::{Dataset, QueryExecutor, SchemaIntrospector};
use crate::error::ServerError;
use crate::security::QueryValidator;
use crate::tools::create_tool_router;
use rmcp::handler::server::router::tool::ToolRouter;
use std::sync::Arc;

/// The Chinook MCP Server instance.
///
/// Cloned per request; everything it holds is immutable and shared via Arc.
/// The server provides:
///
/// - **Resources**: Table schemas
/// - **Tools**: Read-only query execution
/// - **Prompts**: Exploration templates
#[derive(Clone)]
pub struct ChinookMcpServer {
    /// Configuration.
    pub(crate) config: Arc<Config>,

    /// Query gateway.
    pub(crate) executor: Arc<QueryExecutor>,

    /// Schema introspector.
    pub(crate) introspector: Arc<SchemaIntrospector>,

    /// Tool router for dispatching tool calls.
    pub(crate) tool_router: ToolRouter<Self>,
}

impl ChinookMcpServer {
    /// Create a new server instance with the given configuration.
    ///
    /// Nothing is opened here; the dataset is expected to be provisioned
    /// and verified before the server starts serving.
    pub fn new(config: Config) -> Self {
        let dataset = Dataset::new(config.dataset_path());
        let validator = QueryValidator::new(config.security.max_query_length);

        Self {
            executor: Arc::new(QueryExecutor::new(dataset.clone(), validator)),
            introspector: Arc::new(SchemaIntrospector::new(dataset)),
            config: Arc::new(config),
            tool_router: create_tool_router(),
        }
    }

    /// Create a new server instance from environment variables.
    pub fn from_env() -> Result<Self, ServerError> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the query executor.
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Get the schema introspector.
    pub fn introspector(&self) -> &SchemaIntrospector {
        &self.introspector
    }
}

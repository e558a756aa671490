//! MCP Tools for the Chinook database.
//!
//! - `run_sql_query`: Run a read-only SELECT and return the rows as text

mod inputs;

pub use inputs::*;

use crate::constants::LOG_QUERY_TRUNCATE_LENGTH;
use crate::error::McpError;
use crate::server::ChinookMcpServer;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content};
use rmcp::{tool, tool_router};
use tracing::debug;

#[tool_router]
impl ChinookMcpServer {
    /// Run a SELECT query against the dataset.
    ///
    /// Failures are reported in the result text, never as a protocol error,
    /// so the caller can read the message and retry with a corrected query.
    #[tool(
        description = "Execute a read-only SQL SELECT query against the Chinook SQLite database and return the results as text. Only SELECT statements are allowed."
    )]
    pub async fn run_sql_query(
        &self,
        Parameters(input): Parameters<RunSqlQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "Running query: {}",
            truncate_for_log(&input.sql_query, LOG_QUERY_TRUNCATE_LENGTH)
        );

        let text = self.executor().execute(&input.sql_query).await;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

/// Build the tool router for the server.
pub(crate) fn create_tool_router() -> ToolRouter<ChinookMcpServer> {
    ChinookMcpServer::tool_router()
}

/// Truncate a string for logging, respecting char boundaries.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_for_log("SELECT 1", 6), "SELECT...");
        // Multi-byte characters are never split
        assert_eq!(truncate_for_log("ééé", 2), "éé...");
    }

    #[test]
    fn test_router_exposes_single_tool() {
        let router = create_tool_router();
        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "run_sql_query");
    }
}

//! ServerHandler implementation for the Chinook MCP Server.
//!
//! This module implements the rmcp `ServerHandler` trait which defines how
//! the server responds to MCP protocol requests.

use crate::constants::{ALL_TABLES_URI, QUERY_TOOL_NAME, TABLE_URI_TEMPLATE};
use crate::error::McpError;
use crate::prompts::{build_prompt_list, get_prompt};
use crate::resources::{build_resource_list, build_resource_templates, read_resource};
use crate::server::ChinookMcpServer;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
    ListResourceTemplatesResult, ListResourcesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::tool_handler;
use tracing::{debug, info};

/// The `#[tool_handler]` macro wires up tool routing automatically.
/// It generates the `list_tools` and `call_tool` method implementations.
#[tool_handler]
impl ServerHandler for ChinookMcpServer {
    /// Server identification - called during initialization handshake.
    fn get_info(&self) -> ServerInfo {
        info!("MCP client requesting server info");

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("Chinook MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(build_instructions(self)),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(build_resource_list()))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            build_resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        debug!("Reading resource {}", request.uri);
        Ok(read_resource(self, &request.uri).await?)
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(build_prompt_list()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("Rendering prompt {}", request.name);
        Ok(get_prompt(&request.name, request.arguments.as_ref())?)
    }
}

/// Build server instructions.
fn build_instructions(server: &ChinookMcpServer) -> String {
    let mut instructions = String::new();

    instructions.push_str("# Chinook MCP Server\n\n");
    instructions.push_str(
        "This server provides read-only access to the Chinook sample music store database \
         (artists, albums, tracks, customers, invoices).\n\n",
    );
    instructions.push_str(&format!(
        "**Dataset:** `{}`\n\n",
        server.config().dataset_path().display()
    ));

    instructions.push_str("## Available Operations\n\n");
    instructions.push_str("### Resources (Schema access)\n");
    instructions.push_str(&format!(
        "- `{}`: schema of every table\n",
        ALL_TABLES_URI
    ));
    instructions.push_str(&format!(
        "- `{}`: schema of one table\n\n",
        TABLE_URI_TEMPLATE
    ));

    instructions.push_str("### Tools (Query execution)\n");
    instructions.push_str(&format!(
        "- `{}`: run a single SELECT statement; results come back as comma-separated text\n",
        QUERY_TOOL_NAME
    ));
    instructions.push_str("- **Read-only**: only SELECT queries are allowed\n");
    instructions.push_str(&format!(
        "- Queries longer than {} bytes are rejected\n",
        server.config().security.max_query_length
    ));

    instructions.push_str("\n### Best Practices\n");
    instructions.push_str("1. Read the schema resources before writing queries\n");
    instructions.push_str("2. Quote identifiers with double quotes\n");
    instructions.push_str("3. Add a LIMIT clause to exploratory queries\n");

    instructions
}

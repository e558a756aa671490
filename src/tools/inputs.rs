//! Tool input types with JSON Schema generation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the `run_sql_query` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunSqlQueryInput {
    /// The SQL query to run.
    #[schemars(description = "A single SQLite SELECT statement to run against the Chinook database")]
    pub sql_query: String,
}

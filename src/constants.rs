//! Centralized constants for the Chinook MCP Server.
//!
//! Default values, wire-level literals, and the fixed texts the gateway
//! returns live here so they are easy to find and keep consistent.

use std::time::Duration;

// =============================================================================
// Dataset Constants
// =============================================================================

/// Default location of the dataset file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "Chinook.db";

/// Archive the dataset is downloaded from when the file is missing.
pub const DEFAULT_DB_URL: &str =
    "https://www.sqlitetutorial.net/wp-content/uploads/2018/03/chinook.zip";

/// Extension that identifies the dataset entry inside the archive.
pub const DATASET_FILE_EXTENSION: &str = ".db";

/// Default download timeout in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Default download timeout as Duration.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS);

// =============================================================================
// Query Gateway Constants
// =============================================================================

/// Default maximum query length in bytes.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1_000_000;

/// The only statement keyword the gateway lets through.
pub const ALLOWED_STATEMENT_PREFIX: &str = "SELECT";

/// Rejection reason for anything that is not a SELECT.
pub const SELECT_ONLY_MESSAGE: &str = "Only SELECT queries are allowed.";

/// Returned when a SELECT produced zero rows.
pub const EMPTY_RESULT_MESSAGE: &str = "Query executed successfully, but returned no results.";

/// Separator between cells and between column names.
pub const CELL_SEPARATOR: &str = ", ";

// =============================================================================
// Resource Constants
// =============================================================================

/// Resource URI for the schema of every table.
pub const ALL_TABLES_URI: &str = "schema://chinook/tables";

/// Prefix of the per-table schema resource URI.
pub const TABLE_URI_PREFIX: &str = "schema://chinook/table/";

/// URI template advertised for per-table schemas.
pub const TABLE_URI_TEMPLATE: &str = "schema://chinook/table/{table_name}";

/// Separator line between table blocks in the all-tables schema.
pub const SCHEMA_BLOCK_SEPARATOR: &str = "---";

// =============================================================================
// Tool and Prompt Constants
// =============================================================================

/// Name of the query tool as advertised to clients.
pub const QUERY_TOOL_NAME: &str = "run_sql_query";

/// Default number of artists for the top-artists prompt.
pub const DEFAULT_TOP_ARTISTS_LIMIT: i64 = 5;

/// Returned by the top-artists prompt for a bad limit.
pub const INVALID_LIMIT_MESSAGE: &str = "Error: limit must be a positive integer.";

// =============================================================================
// Logging Constants
// =============================================================================

/// Default truncation length for query logging.
pub const LOG_QUERY_TRUNCATE_LENGTH: usize = 100;

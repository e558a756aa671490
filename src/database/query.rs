//! Query execution and result handling.
//!
//! `QueryExecutor` is the read-only gateway behind the `run_sql_query` tool.
//! It never returns a fault to the protocol layer: `execute` always yields
//! text, either the formatted rows or a self-describing error line.

use crate::constants::{CELL_SEPARATOR, EMPTY_RESULT_MESSAGE};
use crate::database::types::TypeMapper;
use crate::database::Dataset;
use crate::error::ServerError;
use crate::security::QueryValidator;
use rusqlite::{Batch, Connection, Statement};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Result of a query execution.
///
/// Rows are stringified cells parallel to `column_names`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in order.
    pub column_names: Vec<String>,

    /// Result rows.
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// Whether the query produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Format the result as plain text.
    ///
    /// A header of comma-separated column names, an underline of dashes as
    /// long as the header, then one comma-separated line per row.
    pub fn to_text(&self) -> String {
        if self.rows.is_empty() {
            return EMPTY_RESULT_MESSAGE.to_string();
        }

        let header = self.column_names.join(CELL_SEPARATOR);
        let mut output = String::new();

        output.push_str(&header);
        output.push('\n');
        output.push_str(&"-".repeat(header.chars().count()));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&row.join(CELL_SEPARATOR));
            output.push('\n');
        }

        output
    }
}

/// Query executor bound to one dataset.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    dataset: Dataset,
    validator: QueryValidator,
}

impl QueryExecutor {
    /// Create a new query executor.
    pub fn new(dataset: Dataset, validator: QueryValidator) -> Self {
        Self { dataset, validator }
    }

    /// Validate and run a query, returning the fetched rows.
    ///
    /// Validation happens before the dataset is opened.
    pub async fn fetch(&self, query: &str) -> Result<QueryResult, ServerError> {
        self.validator.validate(query)?;

        let start = Instant::now();
        let sql = query.to_string();
        let result = self
            .dataset
            .with_connection(move |conn| run_query(conn, &sql))
            .await?;

        debug!(
            "Query returned {} row(s) in {} ms",
            result.row_count(),
            start.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Run a query and render the outcome as text.
    pub async fn execute(&self, query: &str) -> String {
        match self.fetch(query).await {
            Ok(result) => result.to_text(),
            Err(e) => {
                match &e {
                    ServerError::Validation(_) => debug!("Query rejected: {}", e),
                    _ => warn!("Query execution failed: {}", e),
                }
                e.to_string()
            }
        }
    }
}

/// Prepare the statement and fetch every row eagerly.
fn run_query(conn: &Connection, sql: &str) -> Result<QueryResult, ServerError> {
    let mut stmt = prepare_single(conn, sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let column_count = column_names.len();

    let mut rows = stmt.query([])?;
    let mut fetched = Vec::new();
    while let Some(row) = rows.next()? {
        fetched.push(TypeMapper::extract_row(row, column_count)?);
    }

    Ok(QueryResult {
        column_names,
        rows: fetched,
    })
}

/// Prepare `sql`, which must hold exactly one statement.
///
/// Trailing whitespace, semicolons and comments are allowed. Nothing is
/// executed here, so a rejected batch leaves the dataset untouched.
fn prepare_single<'conn>(
    conn: &'conn Connection,
    sql: &str,
) -> Result<Statement<'conn>, ServerError> {
    let mut batch = Batch::new(conn, sql);
    let stmt = batch
        .next()?
        .ok_or_else(|| ServerError::unexpected("query contains no statement"))?;
    if batch.next()?.is_some() {
        return Err(ServerError::MultipleStatements);
    }
    Ok(stmt)
}

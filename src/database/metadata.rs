//! SQLite catalog queries for schema introspection.

use crate::constants::SCHEMA_BLOCK_SEPARATOR;
use crate::database::Dataset;
use crate::error::ServerError;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";

const TABLE_COLUMNS_SQL: &str =
    "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid";

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
    pub is_primary_key: bool,
    pub is_not_null: bool,
    pub default_value: Option<String>,
}

impl ColumnDescriptor {
    /// Render as `  - name (TYPE) PRIMARY KEY NOT NULL DEFAULT x`.
    pub fn render(&self) -> String {
        let mut line = format!("  - {} ({})", self.name, self.declared_type);
        if self.is_primary_key {
            line.push_str(" PRIMARY KEY");
        }
        if self.is_not_null {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_value {
            line.push_str(" DEFAULT ");
            line.push_str(default);
        }
        line
    }
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Render the schema block for this table, without trailing whitespace.
    pub fn render(&self) -> String {
        let mut block = format!("Schema for table {}:\n", self.name);
        for column in &self.columns {
            block.push_str(&column.render());
            block.push('\n');
        }
        block.trim_end().to_string()
    }
}

/// Schema introspector bound to one dataset.
///
/// The `describe_*` methods never fail: catalog errors are folded into the
/// returned text.
#[derive(Debug, Clone)]
pub struct SchemaIntrospector {
    dataset: Dataset,
}

impl SchemaIntrospector {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// User tables in catalog order.
    pub async fn list_tables(&self) -> Result<Vec<String>, ServerError> {
        self.dataset.with_connection(|conn| list_tables(conn)).await
    }

    /// Column metadata for one table.
    pub async fn table_descriptor(&self, name: &str) -> Result<TableDescriptor, ServerError> {
        let name = name.to_string();
        self.dataset
            .with_connection(move |conn| table_descriptor(conn, &name))
            .await
    }

    /// Human-readable schema for one table.
    pub async fn describe_table(&self, name: &str) -> String {
        match self.table_descriptor(name).await {
            Ok(table) => table.render(),
            Err(e) => describe_error(name, e),
        }
    }

    /// Human-readable schema for every user table, read in one connection scope.
    pub async fn describe_all_tables(&self) -> String {
        let result = self
            .dataset
            .with_connection(|conn| {
                let tables = list_tables(conn)?;
                let mut output = String::from("Database Schema:\n\n");
                for name in &tables {
                    let block = match table_descriptor(conn, name) {
                        Ok(table) => table.render(),
                        Err(e) => describe_error(name, e),
                    };
                    output.push_str(&block);
                    output.push('\n');
                    output.push_str(SCHEMA_BLOCK_SEPARATOR);
                    output.push_str("\n\n");
                }
                debug!("Described {} tables", tables.len());
                Ok(output)
            })
            .await;

        match result {
            Ok(text) => text.trim_end().to_string(),
            Err(e) => {
                warn!("Failed to list tables: {}", e);
                format!("Error listing tables: {}", catalog_message(&e))
            }
        }
    }
}

fn list_tables(conn: &Connection) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn.prepare(LIST_TABLES_SQL)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn table_descriptor(conn: &Connection, name: &str) -> Result<TableDescriptor, ServerError> {
    if !list_tables(conn)?.iter().any(|t| t == name) {
        return Err(ServerError::table_not_found(name));
    }

    let mut stmt = conn.prepare(TABLE_COLUMNS_SQL)?;
    let columns = stmt
        .query_map([name], |row| {
            Ok(ColumnDescriptor {
                name: row.get(0)?,
                declared_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                is_not_null: row.get::<_, i64>(2)? != 0,
                default_value: row.get(3)?,
                is_primary_key: row.get::<_, i64>(4)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(ServerError::table_not_found(name));
    }

    Ok(TableDescriptor {
        name: name.to_string(),
        columns,
    })
}

fn describe_error(name: &str, err: ServerError) -> String {
    match err {
        ServerError::TableNotFound(_) => err.to_string(),
        other => {
            warn!("Failed to fetch schema for table '{}': {}", name, other);
            format!(
                "Error fetching schema for table '{}': {}",
                name,
                catalog_message(&other)
            )
        }
    }
}

/// Engine message without the `SQL Error:` prefix.
fn catalog_message(err: &ServerError) -> String {
    match err {
        ServerError::Execution(e) => e.to_string(),
        ServerError::Unexpected(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(ddl: &str) -> (TempDir, SchemaIntrospector) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.db");
        Connection::open(&path).unwrap().execute_batch(ddl).unwrap();
        (dir, SchemaIntrospector::new(Dataset::new(path)))
    }

    #[tokio::test]
    async fn test_primary_key_and_not_null_lines() {
        let (_dir, introspector) =
            fixture("CREATE TABLE T (id INTEGER PRIMARY KEY, name TEXT NOT NULL);");
        let text = introspector.describe_table("T").await;
        assert_eq!(
            text,
            "Schema for table T:\n  - id (INTEGER) PRIMARY KEY\n  - name (TEXT) NOT NULL"
        );
    }

    #[tokio::test]
    async fn test_default_value_suffix() {
        let (_dir, introspector) = fixture(
            "CREATE TABLE Invoice (Total NUMERIC(10,2) NOT NULL DEFAULT 0, Note TEXT DEFAULT 'n/a');",
        );
        let table = introspector.table_descriptor("Invoice").await.unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(
            table.columns[0].render(),
            "  - Total (NUMERIC(10,2)) NOT NULL DEFAULT 0"
        );
        assert_eq!(table.columns[1].render(), "  - Note (TEXT) DEFAULT 'n/a'");
    }

    #[tokio::test]
    async fn test_describe_is_idempotent() {
        let (_dir, introspector) = fixture("CREATE TABLE Genre (GenreId INTEGER PRIMARY KEY, Name TEXT);");
        let first = introspector.describe_table("Genre").await;
        let second = introspector.describe_table("Genre").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_internal_tables_hidden() {
        let (_dir, introspector) = fixture(
            "CREATE TABLE Playlist (PlaylistId INTEGER PRIMARY KEY AUTOINCREMENT, Name TEXT);
             INSERT INTO Playlist (Name) VALUES ('Music');",
        );
        let tables = introspector.list_tables().await.unwrap();
        assert_eq!(tables, vec!["Playlist"]);

        let all = introspector.describe_all_tables().await;
        assert!(!all.contains("sqlite_"));
        assert_eq!(
            introspector.describe_table("sqlite_sequence").await,
            "Table 'sqlite_sequence' not found."
        );
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let (_dir, introspector) = fixture("CREATE TABLE Artist (ArtistId INTEGER);");
        assert_eq!(
            introspector.describe_table("NoSuchTable").await,
            "Table 'NoSuchTable' not found."
        );
        let err = introspector.table_descriptor("NoSuchTable").await.unwrap_err();
        assert!(matches!(err, ServerError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_describe_all_tables_layout() {
        let (_dir, introspector) = fixture(
            "CREATE TABLE Artist (ArtistId INTEGER PRIMARY KEY, Name TEXT);
             CREATE TABLE Genre (GenreId INTEGER PRIMARY KEY);",
        );
        let text = introspector.describe_all_tables().await;
        assert_eq!(
            text,
            "Database Schema:\n\n\
             Schema for table Artist:\n  - ArtistId (INTEGER) PRIMARY KEY\n  - Name (TEXT)\n---\n\n\
             Schema for table Genre:\n  - GenreId (INTEGER) PRIMARY KEY\n---"
        );
    }

    #[tokio::test]
    async fn test_empty_declared_type() {
        let (_dir, introspector) = fixture("CREATE TABLE Loose (anything);");
        assert_eq!(
            introspector.describe_table("Loose").await,
            "Schema for table Loose:\n  - anything ()"
        );
    }

    #[tokio::test]
    async fn test_missing_dataset_folds_into_text() {
        let dir = TempDir::new().unwrap();
        let introspector = SchemaIntrospector::new(Dataset::new(dir.path().join("gone.db")));

        assert!(introspector
            .describe_all_tables()
            .await
            .starts_with("Error listing tables: "));
        assert!(introspector
            .describe_table("Artist")
            .await
            .starts_with("Error fetching schema for table 'Artist': "));
    }
}

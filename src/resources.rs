//! MCP Resources for the Chinook schema.
//!
//! Resources provide passive read-only access to table schemas rendered as
//! plain text. Nothing is cached; every read goes back to the catalog.
//!
//! ## URI Scheme
//!
//! - `schema://chinook/tables` - Schema of every user table
//! - `schema://chinook/table/{table_name}` - Schema of one table

use crate::constants::{ALL_TABLES_URI, TABLE_URI_TEMPLATE};
use crate::error::ServerError;
use crate::server::ChinookMcpServer;
use rmcp::model::{
    AnnotateAble, RawResource, RawResourceTemplate, ReadResourceResult, Resource, ResourceContents,
    ResourceTemplate,
};
use tracing::debug;

const SCHEME: &str = "schema://";
const DATABASE_SEGMENT: &str = "chinook";
const TEXT_MIME_TYPE: &str = "text/plain";

/// Build the list of concrete resources.
pub fn build_resource_list() -> Vec<Resource> {
    vec![create_resource(
        ALL_TABLES_URI,
        "Chinook Tables",
        "Schema of every table in the Chinook database",
        TEXT_MIME_TYPE,
    )]
}

/// Build resource templates for per-table resources.
pub fn build_resource_templates() -> Vec<ResourceTemplate> {
    vec![create_resource_template(
        TABLE_URI_TEMPLATE,
        "Chinook Table",
        "Schema of a single table, e.g. schema://chinook/table/Artist",
        TEXT_MIME_TYPE,
    )]
}

/// Read a resource by URI.
pub async fn read_resource(
    server: &ChinookMcpServer,
    uri: &str,
) -> Result<ReadResourceResult, ServerError> {
    let parsed =
        parse_resource_uri(uri).map_err(|e| ServerError::resource_not_found(e.to_string()))?;
    debug!("Reading resource {:?}", parsed);

    let introspector = server.introspector();
    let content = match parsed {
        ResourceUri::AllTables => introspector.describe_all_tables().await,
        ResourceUri::Table { name } => introspector.describe_table(&name).await,
    };

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(content, uri.to_string())],
    })
}

// =========================================================================
// Resource URI Parsing
// =========================================================================

/// Parsed resource URI variants.
#[derive(Debug, PartialEq, Eq)]
enum ResourceUri {
    AllTables,
    Table { name: String },
}

/// Error type for resource URI parsing with detailed context.
#[derive(Debug)]
struct ResourceParseError {
    uri: String,
    reason: ParseErrorReason,
}

/// Specific reasons why a resource URI parse failed.
#[derive(Debug)]
enum ParseErrorReason {
    /// URI does not start with schema://chinook/
    InvalidScheme,
    /// Nothing after the database segment
    EmptyPath,
    /// First path segment not recognized
    UnknownResourceType { segment: String },
    /// `table` without a name
    MissingTableName,
    TooManySegments { expected: usize, got: usize },
}

impl std::fmt::Display for ResourceParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid resource URI '{}': ", self.uri)?;
        match &self.reason {
            ParseErrorReason::InvalidScheme => {
                write!(f, "URI must start with 'schema://chinook/'")
            }
            ParseErrorReason::EmptyPath => write!(f, "URI path is empty"),
            ParseErrorReason::UnknownResourceType { segment } => write!(
                f,
                "unknown resource type '{}'. Valid types: tables, table",
                segment
            ),
            ParseErrorReason::MissingTableName => write!(
                f,
                "missing table name (use schema://chinook/table/{{table_name}})"
            ),
            ParseErrorReason::TooManySegments { expected, got } => write!(
                f,
                "too many path segments (expected {}, got {})",
                expected, got
            ),
        }
    }
}

impl std::error::Error for ResourceParseError {}

fn parse_resource_uri(uri: &str) -> Result<ResourceUri, ResourceParseError> {
    let fail = |reason| ResourceParseError {
        uri: uri.to_string(),
        reason,
    };

    let path = uri
        .strip_prefix(SCHEME)
        .and_then(|rest| rest.strip_prefix(DATABASE_SEGMENT))
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(|| fail(ParseErrorReason::InvalidScheme))?;

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Err(fail(ParseErrorReason::EmptyPath)),
        ["tables"] => Ok(ResourceUri::AllTables),
        ["tables", ..] => Err(fail(ParseErrorReason::TooManySegments {
            expected: 1,
            got: segments.len(),
        })),
        ["table"] => Err(fail(ParseErrorReason::MissingTableName)),
        ["table", name] => Ok(ResourceUri::Table {
            name: (*name).to_string(),
        }),
        ["table", ..] => Err(fail(ParseErrorReason::TooManySegments {
            expected: 2,
            got: segments.len(),
        })),
        [other, ..] => Err(fail(ParseErrorReason::UnknownResourceType {
            segment: (*other).to_string(),
        })),
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn create_resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    let mut resource = RawResource::new(uri, name);
    resource.description = Some(description.to_string());
    resource.mime_type = Some(mime_type.to_string());
    resource.no_annotation()
}

fn create_resource_template(
    uri_template: &str,
    name: &str,
    description: &str,
    mime_type: &str,
) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        mime_type: Some(mime_type.to_string()),
    }
    .no_annotation()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_uris() {
        assert_eq!(
            parse_resource_uri("schema://chinook/tables").unwrap(),
            ResourceUri::AllTables
        );
        assert_eq!(
            parse_resource_uri("schema://chinook/table/Artist").unwrap(),
            ResourceUri::Table {
                name: "Artist".to_string()
            }
        );
        // Trailing slash is tolerated
        assert_eq!(
            parse_resource_uri("schema://chinook/tables/").unwrap(),
            ResourceUri::AllTables
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        for uri in [
            "sqlite://tables",
            "schema://northwind/tables",
            "schema://chinookx/tables",
            "chinook/tables",
        ] {
            let err = parse_resource_uri(uri).unwrap_err();
            assert!(matches!(err.reason, ParseErrorReason::InvalidScheme), "{}", uri);
        }
    }

    #[test]
    fn test_parse_error_reasons() {
        let err = parse_resource_uri("schema://chinook/").unwrap_err();
        assert!(matches!(err.reason, ParseErrorReason::EmptyPath));

        let err = parse_resource_uri("schema://chinook/views").unwrap_err();
        assert!(matches!(err.reason, ParseErrorReason::UnknownResourceType { .. }));
        assert!(err.to_string().contains("unknown resource type 'views'"));

        let err = parse_resource_uri("schema://chinook/table").unwrap_err();
        assert!(matches!(err.reason, ParseErrorReason::MissingTableName));

        let err = parse_resource_uri("schema://chinook/table/Artist/extra").unwrap_err();
        assert!(matches!(
            err.reason,
            ParseErrorReason::TooManySegments {
                expected: 2,
                got: 3
            }
        ));

        let err = parse_resource_uri("schema://chinook/tables/Artist").unwrap_err();
        assert!(matches!(err.reason, ParseErrorReason::TooManySegments { .. }));
    }

    #[test]
    fn test_resource_listing() {
        let resources = build_resource_list();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, ALL_TABLES_URI);

        let templates = build_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, TABLE_URI_TEMPLATE);
    }
}

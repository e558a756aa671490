//! SQLite identifier escaping utilities.
//!
//! Uses standard SQL double-quote notation `"identifier"` to escape identifiers
//! spliced into generated SQL text. Identifier position only, never value position.

use crate::error::ServerError;
use serde_json::Value;

/// Escape a SQLite identifier using double-quote notation.
///
/// Embedded double quotes are doubled. Total over all strings, including
/// the empty string.
///
/// # Examples
///
/// ```
/// use chinook_mcp_server::security::escape_identifier;
///
/// assert_eq!(escape_identifier("Artist"), "\"Artist\"");
/// assert_eq!(escape_identifier("My Table"), "\"My Table\"");
/// assert_eq!(escape_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn escape_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Escape an identifier received as a JSON value.
///
/// Only strings are identifiers; anything else is an `InvalidArgument`.
pub fn escape_identifier_value(value: &Value) -> Result<String, ServerError> {
    match value {
        Value::String(s) => Ok(escape_identifier(s)),
        other => Err(ServerError::invalid_argument(format!(
            "Identifier must be a string, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

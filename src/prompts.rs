//! MCP Prompts for exploring the Chinook database.
//!
//! Prompts are canned conversation openers that steer an LLM towards the
//! schema resources and the `run_sql_query` tool. Rendering is pure text
//! templating; no prompt touches the dataset.

use crate::constants::{
    ALL_TABLES_URI, DEFAULT_TOP_ARTISTS_LIMIT, INVALID_LIMIT_MESSAGE, QUERY_TOOL_NAME,
    TABLE_URI_PREFIX,
};
use crate::error::ServerError;
use crate::security::escape_identifier_value;
use rmcp::model::{GetPromptResult, Prompt, PromptArgument, PromptMessage, PromptMessageRole};
use serde_json::{Map, Value};

/// Prompt arguments as received on the wire.
pub type PromptArguments = Map<String, Value>;

fn prompt_arg(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

fn prompt(name: &str, description: &str, arguments: Vec<PromptArgument>) -> Prompt {
    Prompt::new(name, Some(description), Some(arguments))
}

/// Build the list of available prompts.
pub fn build_prompt_list() -> Vec<Prompt> {
    vec![
        prompt(
            "list_all_tables",
            "Ask how to see every table and its schema",
            vec![],
        ),
        prompt(
            "show_table_schema",
            "Ask for the schema of a specific table",
            vec![prompt_arg(
                "table_name",
                "Name of the table to show the schema for",
                true,
            )],
        ),
        prompt(
            "count_table_rows",
            "Ask how many rows a table has",
            vec![prompt_arg(
                "table_name",
                "Name of the table to count rows in",
                true,
            )],
        ),
        prompt(
            "query_top_artists",
            "Ask for the artists with the most tracks",
            vec![prompt_arg(
                "limit",
                "Number of artists to return (default 5)",
                false,
            )],
        ),
    ]
}

/// Get a specific prompt with arguments filled in.
pub fn get_prompt(
    name: &str,
    arguments: Option<&PromptArguments>,
) -> Result<GetPromptResult, ServerError> {
    let empty = PromptArguments::new();
    let args = arguments.unwrap_or(&empty);

    match name {
        "list_all_tables" => Ok(list_all_tables_prompt()),
        "show_table_schema" => show_table_schema_prompt(args),
        "count_table_rows" => count_table_rows_prompt(args),
        "query_top_artists" => Ok(query_top_artists_prompt(args)),
        _ => Err(ServerError::invalid_argument(format!(
            "Unknown prompt: {}",
            name
        ))),
    }
}

// =========================================================================
// Prompt Implementations
// =========================================================================

fn list_all_tables_prompt() -> GetPromptResult {
    GetPromptResult {
        description: Some("List all tables in the Chinook database".to_string()),
        messages: vec![
            PromptMessage::new_text(
                PromptMessageRole::User,
                "How can I see all the tables and their schemas in the Chinook database?",
            ),
            PromptMessage::new_text(
                PromptMessageRole::Assistant,
                format!(
                    "You can inspect the `{}` resource. \
                     It contains the schema for all tables. \
                     Alternatively, you can ask me to query specific information using SQL.",
                    ALL_TABLES_URI
                ),
            ),
        ],
    }
}

fn show_table_schema_prompt(args: &PromptArguments) -> Result<GetPromptResult, ServerError> {
    let table = required_string(args, "table_name")?;

    let text = format!(
        "Please show me the schema for the '{table}' table. \
         You can use the `{TABLE_URI_PREFIX}{table}` resource."
    );

    Ok(user_prompt(format!("Schema of table {}", table), text))
}

fn count_table_rows_prompt(args: &PromptArguments) -> Result<GetPromptResult, ServerError> {
    let value = required_arg(args, "table_name")?;
    let quoted = escape_identifier_value(value)?;
    let table = value.as_str().unwrap_or_default();

    let text = format!(
        "How many rows are in the '{}' table? \
         You can use the `{}` tool with a query like: \
         'SELECT COUNT(*) FROM {};'",
        table, QUERY_TOOL_NAME, quoted
    );

    Ok(user_prompt(format!("Row count of table {}", table), text))
}

fn query_top_artists_prompt(args: &PromptArguments) -> GetPromptResult {
    let description = "Top artists by track count".to_string();

    let Some(limit) = parse_limit(args.get("limit")) else {
        return user_prompt(description, INVALID_LIMIT_MESSAGE.to_string());
    };

    let text = format!(
        "Can you show me the top {limit} artists with the most tracks? \
         You'll likely need to join the 'Artist' and 'Album' tables, then 'Track' table, \
         group by artist, count tracks, and order by the count descending, limiting to \
         {limit} results using the `{QUERY_TOOL_NAME}` tool."
    );

    user_prompt(description, text)
}

// =========================================================================
// Helpers
// =========================================================================

fn user_prompt(description: String, text: String) -> GetPromptResult {
    GetPromptResult {
        description: Some(description),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    }
}

fn required_arg<'a>(args: &'a PromptArguments, name: &str) -> Result<&'a Value, ServerError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ServerError::invalid_argument(format!(
            "Missing required argument: {}",
            name
        ))),
        Some(value) => Ok(value),
    }
}

fn required_string<'a>(args: &'a PromptArguments, name: &str) -> Result<&'a str, ServerError> {
    required_arg(args, name)?.as_str().ok_or_else(|| {
        ServerError::invalid_argument(format!("Argument '{}' must be a string", name))
    })
}

/// Positive integer limit, given as a JSON integer or an integer string.
///
/// Absent or null means the default. `None` means the value is unusable.
fn parse_limit(value: Option<&Value>) -> Option<i64> {
    let limit = match value {
        None | Some(Value::Null) => DEFAULT_TOP_ARTISTS_LIMIT,
        Some(Value::Number(n)) => n.as_i64()?,
        Some(Value::String(s)) => s.trim().parse::<i64>().ok()?,
        Some(_) => return None,
    };

    (limit >= 1).then_some(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;
    use serde_json::json;

    fn args(value: Value) -> PromptArguments {
        value.as_object().cloned().unwrap()
    }

    fn texts(result: &GetPromptResult) -> Vec<String> {
        result
            .messages
            .iter()
            .map(|m| match &m.content {
                PromptMessageContent::Text { text } => text.clone(),
                other => panic!("unexpected content {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_prompt_list() {
        let names: Vec<String> = build_prompt_list().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "list_all_tables",
                "show_table_schema",
                "count_table_rows",
                "query_top_artists"
            ]
        );
    }

    #[test]
    fn test_list_all_tables_has_two_turns() {
        let result = get_prompt("list_all_tables", None).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].role, PromptMessageRole::User);
        assert_eq!(result.messages[1].role, PromptMessageRole::Assistant);
        assert!(texts(&result)[1].contains("schema://chinook/tables"));
    }

    #[test]
    fn test_show_table_schema_points_at_resource() {
        let result = get_prompt(
            "show_table_schema",
            Some(&args(json!({"table_name": "Track"}))),
        )
        .unwrap();
        assert!(texts(&result)[0].contains("`schema://chinook/table/Track`"));
    }

    #[test]
    fn test_count_rows_escapes_identifier() {
        let result = get_prompt(
            "count_table_rows",
            Some(&args(json!({"table_name": "My \"Table\""}))),
        )
        .unwrap();
        let text = &texts(&result)[0];
        assert!(text.contains("SELECT COUNT(*) FROM \"My \"\"Table\"\"\";"));
        assert!(text.contains("run_sql_query"));
    }

    #[test]
    fn test_table_name_required_and_string() {
        let err = get_prompt("count_table_rows", None).unwrap_err();
        assert!(matches!(err, ServerError::InvalidArgument(_)));

        let err = get_prompt("show_table_schema", Some(&args(json!({"table_name": 7}))))
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidArgument(_)));
    }

    #[test]
    fn test_top_artists_limits() {
        let text = |value: Value| texts(&get_prompt("query_top_artists", Some(&args(value))).unwrap())[0].clone();

        assert!(text(json!({})).contains("top 5 artists"));
        assert!(text(json!({"limit": null})).contains("top 5 artists"));
        assert!(text(json!({"limit": 5})).contains("top 5 artists"));
        assert!(text(json!({"limit": "12"})).contains("top 12 artists"));

        for bad in [json!(0), json!(-3), json!("ten"), json!(2.5), json!(true)] {
            assert_eq!(
                text(json!({ "limit": bad })),
                "Error: limit must be a positive integer."
            );
        }
    }

    #[test]
    fn test_unknown_prompt() {
        let err = get_prompt("drop_everything", None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Unknown prompt: drop_everything");
    }
}

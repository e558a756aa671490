//! Read-only query gate.
//!
//! The gate is a textual allow-list: after trimming and upper-casing, the
//! statement must start with `SELECT`. It is not a SQL parser. It does not
//! catch read-only statements phrased differently (`WITH ...`, `VALUES ...`)
//! and it does not inspect what follows the prefix. Clients match on the
//! exact rejection text, so it must not change.

use crate::constants::{ALLOWED_STATEMENT_PREFIX, SELECT_ONLY_MESSAGE};
use crate::error::ServerError;

/// Check whether a statement passes the SELECT prefix test.
pub fn is_select_statement(query: &str) -> bool {
    query
        .trim()
        .to_uppercase()
        .starts_with(ALLOWED_STATEMENT_PREFIX)
}

/// Validates client SQL before it reaches the dataset.
#[derive(Debug, Clone)]
pub struct QueryValidator {
    /// Maximum query length in bytes
    max_query_length: usize,
}

impl QueryValidator {
    /// Create a new validator.
    pub fn new(max_query_length: usize) -> Self {
        Self { max_query_length }
    }

    /// Validate a query.
    ///
    /// The SELECT check runs first so that any non-SELECT input gets the
    /// fixed rejection text regardless of its length.
    pub fn validate(&self, query: &str) -> Result<(), ServerError> {
        if !is_select_statement(query) {
            return Err(ServerError::validation(SELECT_ONLY_MESSAGE));
        }

        if query.len() > self.max_query_length {
            return Err(ServerError::validation(format!(
                "Query exceeds maximum length of {} bytes.",
                self.max_query_length
            )));
        }

        Ok(())
    }

    /// Get the configured maximum query length.
    pub fn max_query_length(&self) -> usize {
        self.max_query_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> QueryValidator {
        QueryValidator::new(1_000)
    }

    #[test]
    fn test_select_variants_pass() {
        let v = validator();
        assert!(v.validate("SELECT 1").is_ok());
        assert!(v.validate("select * from Artist").is_ok());
        assert!(v.validate("   \n\tSeLeCt Name FROM Track").is_ok());
    }

    #[test]
    fn test_non_select_rejected_with_fixed_text() {
        let v = validator();
        for query in [
            "DROP TABLE Artist",
            "INSERT INTO Artist (Name) VALUES ('x')",
            "UPDATE Track SET Name = 'x'",
            "DELETE FROM Invoice",
            "PRAGMA table_info(Artist)",
            "WITH t AS (SELECT 1) SELECT * FROM t",
            "",
            "   ",
            "-- comment\nSELECT 1",
        ] {
            let err = v.validate(query).unwrap_err();
            assert_eq!(err.to_string(), "Error: Only SELECT queries are allowed.");
        }
    }

    #[test]
    fn test_prefix_check_is_textual() {
        // Only the prefix is inspected; these are known gaps of a textual gate.
        assert!(is_select_statement("SELECTED"));
        assert!(is_select_statement("SELECT * FROM t; DROP TABLE t;"));
    }

    #[test]
    fn test_length_limit() {
        let v = QueryValidator::new(20);
        let long = format!("SELECT {}", "1,".repeat(20));
        let err = v.validate(&long).unwrap_err();
        assert_eq!(err.to_string(), "Error: Query exceeds maximum length of 20 bytes.");
        assert_eq!(v.max_query_length(), 20);
    }

    #[test]
    fn test_non_select_beats_length_limit() {
        let v = QueryValidator::new(5);
        let err = v.validate("DELETE FROM Track WHERE 1 = 1").unwrap_err();
        assert_eq!(err.to_string(), "Error: Only SELECT queries are allowed.");
    }
}

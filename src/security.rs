//! Security module for identifier escaping and the read-only query gate.

mod identifiers;
mod validation;

pub use identifiers::{escape_identifier, escape_identifier_value};
pub use validation::{is_select_statement, QueryValidator};

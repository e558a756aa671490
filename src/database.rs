//! Dataset access, schema introspection and query execution.

mod connection;
pub mod metadata;
mod query;
pub mod types;

pub use connection::Dataset;
pub use metadata::{ColumnDescriptor, SchemaIntrospector, TableDescriptor};
pub use query::{QueryExecutor, QueryResult};
pub use types::TypeMapper;

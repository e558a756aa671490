//! # Chinook MCP Server
//!
//! A Model Context Protocol (MCP) server exposing the Chinook sample music
//! store database (a SQLite file) to LLM clients, read-only.
//!
//! This crate provides:
//! - **Resources**: Table schemas as text (`schema://chinook/...`)
//! - **Tools**: `run_sql_query`, a SELECT-only query gateway
//! - **Prompts**: Templates for exploring the dataset
//! - **Bootstrap**: Download of the dataset archive on first start
//!
//! ## Architecture
//!
//! Every request opens its own read-only SQLite connection on a blocking
//! worker and drops it before returning. The only shared state is the
//! configuration fixed at startup.

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod handlers;
pub mod prompts;
pub mod resources;
pub mod security;
pub mod server;
pub mod shutdown;
pub mod tools;

pub use config::Config;
pub use error::{McpError, ServerError};
pub use server::ChinookMcpServer;

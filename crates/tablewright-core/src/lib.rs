//! Tablewright Core - shared abstractions for the MySQL table designer
//!
//! This crate provides the fundamental traits and types that the driver and
//! designer crates depend on. It defines:
//!
//! - `Connection` - Trait for executing SQL against a live server
//! - `SchemaIntrospection` - Trait for read-only catalogue queries
//! - Common types like `Value`, `Row`, `QueryResult`, and the `*Info` records
//!   returned by introspection

mod connection;
mod error;
mod schema;
mod types;

pub use connection::*;
pub use error::*;
pub use schema::*;
pub use types::*;

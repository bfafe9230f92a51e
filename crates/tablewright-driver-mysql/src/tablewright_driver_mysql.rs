//! MySQL/MariaDB driver implementation

mod connection;
mod schema;

pub use connection::{MySqlConnectOptions, MySqlConnection};

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::{Database, DbConnection, DbPool};

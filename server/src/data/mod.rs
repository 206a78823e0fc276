//! Data storage layer
//!
//! - `filters` - Criteria and filter specs compiled into parameterized SQL
//! - `sql` - SQL dialects (SQLite, PostgreSQL)
//! - `sqlite` - Embedded clinic database and search execution
//! - `types` - Row types for clinic resources
//! - `error` - Unified error type

pub mod error;
pub mod filters;
pub mod sql;
pub mod sqlite;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;

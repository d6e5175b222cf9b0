//! Repository implementations for the catalog domain.
//!
//! - [`InMemoryDatabase`]: every repository backed by shared in-process
//!   tables, used by tests and when no database is configured.
//! - [`PostgresDatabase`]: every repository backed by PostgreSQL through a
//!   `sqlx` pool, with embedded migrations.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StorageError;
pub use memory::InMemoryDatabase;
pub use postgres::PostgresDatabase;

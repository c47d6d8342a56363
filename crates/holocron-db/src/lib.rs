//! Database layer for the Holocron backend.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the pool type shared by the server and the
//! domain crates. Every table is created through versioned migrations
//! managed here.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the whole system is a thin CRUD layer over a
//!   single local database file; WAL allows concurrent readers with a
//!   single writer, which matches the read-heavy access pattern.
//! - **`r2d2` connection pool**: bounded connection reuse, handed to each
//!   request explicitly rather than through an ambient global session.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the code that depends on it.

mod migrations;
mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool, PoolSettings};

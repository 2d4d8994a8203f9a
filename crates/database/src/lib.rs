//! # EventHub Database Crate
//!
//! This crate is the storage side of the application: the [`Storage`] trait
//! the HTTP handlers program against, and the implementations behind it.
//!
//! ## Architectural Principles
//!
//! - **Port and adapters:** Handlers only see [`Storage`] and the records from
//!   `core-types`. All SQL lives in [`DbRepository`].
//! - **One statement per call:** Each write is a single `INSERT ... RETURNING id`
//!   and each read a single unfiltered `SELECT`. No transactions span calls.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect`: Establishes the database connection pool from settings.
//! - `run_migrations`: Applies the embedded migrations, a no-op when up to date.
//! - `Storage`: The storage interface.
//! - `DbRepository`: The PostgreSQL implementation.
//! - `InMemoryRepository`: A lock-protected in-memory implementation for tests.
//! - `DbError`: The error type returned from every operation.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod storage;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_options, run_migrations};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::DbRepository;
pub use storage::Storage;

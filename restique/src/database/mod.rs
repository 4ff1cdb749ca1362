//! Database abstraction layer
//!
//! This module provides the read-only interface used by the REST handlers
//! and its SQLite implementation.

pub mod sqlite;
pub mod traits;

// Re-export the main trait
pub use traits::{DatabaseError, DatabaseProvider};

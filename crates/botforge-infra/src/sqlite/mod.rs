//! SQLite storage layer.
//!
//! The durable key store backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod durable;
pub mod pool;

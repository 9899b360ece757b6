//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that business logic depends on.
//! The core crate never depends on any specific storage technology; the
//! durable medium is injected through [`crate::storage::durable::DurableStore`].

pub mod aggregate;
pub mod schema;

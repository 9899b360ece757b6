//! Storage abstractions for Botforge.
//!
//! Defines the durable whole-value key store the repositories sit on.
//! Implementations live in botforge-infra.

pub mod durable;

//! Shared domain types for Botforge.
//!
//! This crate contains the core domain types used across the workspace:
//! the persisted Aggregate, Account, Bot, Session, knowledge ingestion
//! payloads, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, secrecy, thiserror.

pub mod account;
pub mod bot;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod session;

//! Business logic and port trait definitions for Botforge.
//!
//! This crate defines the "ports" (durable store, aggregate repository,
//! credential hasher, knowledge ingestor) that the infrastructure layer
//! implements. It depends only on `botforge-types` -- never on
//! `botforge-infra` or any database/IO crate.

pub mod knowledge;
pub mod repository;
pub mod service;
pub mod storage;

#[cfg(test)]
mod testing;

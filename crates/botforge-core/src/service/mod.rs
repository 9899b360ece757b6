//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, credential checks, and the
//! knowledge collaborator. They depend on traits (ports) -- never on concrete
//! infrastructure implementations.

pub mod access;
pub mod account;
pub mod bot;
pub mod credential;
pub mod embed;
pub mod session;

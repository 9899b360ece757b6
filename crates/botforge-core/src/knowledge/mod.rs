//! Knowledge ingestion: the collaborator port and the two-step sync saga.

pub mod ingestor;
pub mod saga;

//! Knowledge collaborator adapters.

pub mod http;

//! Global configuration types for Botforge.
//!
//! `BotforgeConfig` represents the top-level `config.toml` in the data
//! directory. Every section and field has a default, so an empty file (or no
//! file) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotforgeConfig {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub credentials: CredentialConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub embed: EmbedConfig,
}

/// Where the knowledge ingestion/query collaborator lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_base_url")]
    pub base_url: String,
    /// Transport-level timeout for a single collaborator call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_knowledge_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_knowledge_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Work factor for credential hashing (Argon2id parameters).
///
/// Defaults follow the OWASP recommendation: 19 MiB, 2 iterations, 1 lane.
/// Changing these only affects new digests; existing digests carry their own
/// parameters and keep verifying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Bot unlock policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Failed unlock attempts allowed per bot view. `0` disables throttling.
    #[serde(default = "default_max_unlock_attempts")]
    pub max_unlock_attempts: u32,
}

fn default_max_unlock_attempts() -> u32 {
    5
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_unlock_attempts: default_max_unlock_attempts(),
        }
    }
}

/// Host that serves the embeddable chat widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(default = "default_knowledge_base_url")]
    pub widget_base_url: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            widget_base_url: default_knowledge_base_url(),
        }
    }
}

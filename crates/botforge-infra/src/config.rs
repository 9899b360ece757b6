//! Configuration loader for Botforge.
//!
//! Reads `config.toml` from the data directory (`~/.botforge/` in production)
//! and deserializes it into [`BotforgeConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::Path;

use botforge_types::config::BotforgeConfig;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`BotforgeConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> BotforgeConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BotforgeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BotforgeConfig::default();
        }
    };

    match toml::from_str::<BotforgeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BotforgeConfig::default()
        }
    }
}

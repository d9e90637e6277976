//! Configuration file loader for the `.teamforge/` directory.
//!
//! Settings are read from `.teamforge/config.toml` and then overridden by
//! environment variables:
//! - `TEAMFORGE_OUTPUT_DIR`: replaces `output_dir`

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::ForgeConfig;
use std::path::Path;
use std::path::PathBuf;

/// Environment variable overriding [`ForgeConfig::output_dir`].
pub const OUTPUT_DIR_ENV: &str = "TEAMFORGE_OUTPUT_DIR";

/// Loads the orchestrator configuration rooted at `root`.
///
/// # Arguments
///
/// * `root` - Directory containing the `.teamforge/` folder
///
/// # Returns
///
/// A validated `ForgeConfig`. If `.teamforge/config.toml` is missing the
/// defaults are used rather than returning an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has fields of the wrong type
/// - A value is out of range (zero log limit or zero subscriber buffer)
///
/// # Example
///
/// ```rust,no_run
/// use tf_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Writing projects under {}", config.output_dir.display());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<ForgeConfig> {
    let config_path = root.join(".teamforge").join("config.toml");

    let config = if tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|source| ConfigError::FileRead {
                path: config_path.clone(),
                source,
            })?;
        parse_config(&config_path, &content)?
    } else {
        ForgeConfig::default()
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate(&config_path, &config)?;
    Ok(config)
}

/// Parses the TOML body of a config file.
pub fn parse_config(path: &Path, content: &str) -> ConfigResult<ForgeConfig> {
    toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(mut config: ForgeConfig, lookup: F) -> ForgeConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|value| !value.trim().is_empty()) {
        config.output_dir = PathBuf::from(dir);
    }
    config
}

fn validate(path: &Path, config: &ForgeConfig) -> ConfigResult<()> {
    let invalid = |reason: &str| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if config.snapshot_log_limit == 0 {
        return Err(invalid("snapshot_log_limit must be greater than zero"));
    }
    if config.subscriber_buffer == 0 {
        return Err(invalid("subscriber_buffer must be greater than zero"));
    }
    if config.max_description_len == 0 {
        return Err(invalid("max_description_len must be greater than zero"));
    }
    Ok(())
}

//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod serve;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use invx_core::InvxConfig;

/// Load the effective configuration.
///
/// An explicit `--config` file must exist. Otherwise the default config file
/// is used when present, then environment overrides are applied on top.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvxConfig> {
    let mut config = match config_path {
        Some(path) => InvxConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                InvxConfig::from_file(&default_path)
                    .with_context(|| format!("Failed to load config from {}", default_path.display()))?
            } else {
                InvxConfig::default()
            }
        }
    };

    config.apply_env_overrides();

    Ok(config)
}

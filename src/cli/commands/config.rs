//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the config command.
pub fn run_config(
    action: &ConfigAction,
    config_path: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }

        ConfigAction::Init { force } => {
            if write_config(&path, &settings, *force)? {
                Output::success(&format!("Wrote config to {}", path.display()));
            } else {
                Output::warning(&format!("Config already exists at {}", path.display()));
                Output::info("Pass --force to overwrite it.");
            }
        }
    }

    Ok(())
}

/// Save `settings` to `path`. Returns false, leaving the file alone, when it
/// already exists and `force` is not set.
fn write_config(path: &Path, settings: &Settings, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    settings.save_to(&path.to_path_buf())?;
    Ok(true)
}

use crate::GlobalOptions;
use crate::bootstrap::{apply_overrides, config_path};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use rayhai_core::config::EngineConfig;
use rayhai_infrastructure::storage::ConfigStorage;
use std::path::PathBuf;

/// Writes a config.toml holding the defaults plus `--persona`/`--seed`.
pub fn run(options: &GlobalOptions, force: bool) -> Result<()> {
    let path = write_config(options, force)?;
    println!(
        "{}",
        format!("Configuration written to {}", path.display()).bright_green()
    );
    Ok(())
}

fn write_config(options: &GlobalOptions, force: bool) -> Result<PathBuf> {
    let path = config_path(options)?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = EngineConfig::default();
    apply_overrides(&mut config, options);

    ConfigStorage::new(path.clone())
        .save(&config)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

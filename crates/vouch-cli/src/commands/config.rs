use std::path::PathBuf;

use anyhow::{Context, Result};

use vouch_core::config::{Config, ConfigPaths};

pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let config_path = path.unwrap_or(paths.config_path);
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = Config::default_config();
    config.save(&config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let config_path = config_path.unwrap_or(paths.config_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}

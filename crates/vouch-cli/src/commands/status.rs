use std::path::PathBuf;

use anyhow::Result;

use super::open_registry;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, paths, registry) = open_registry(config_path)?;
    println!("Data source: {} ({})", config.storage.source, registry.connection());
    println!("Store: {}", paths.store_dir.display());
    println!("Businesses: {}", registry.list_businesses().len());
    println!("Opinions: {}", registry.list_opinions(None).len());
    Ok(())
}

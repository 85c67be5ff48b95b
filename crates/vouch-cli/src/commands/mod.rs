use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use registry::Registry;
use vouch_core::backend::FileBackend;
use vouch_core::config::{Config, ConfigPaths};
use vouch_core::ids::BusinessId;
use vouch_core::source::{ConnectionState, DataSource};
use vouch_core::types::Business;

pub mod business;
pub mod config;
pub mod opinion;
pub mod status;

/// Loads the effective config and opens a session over the on-device store.
///
/// No hosted client ships with the CLI, so a `remote` source always degrades
/// to the local store.
pub fn open_registry(config_path: Option<PathBuf>) -> Result<(Config, ConfigPaths, Registry)> {
    let paths = ConfigPaths::resolve()?;
    let config_path = config_path.unwrap_or_else(|| paths.config_path.clone());
    let config = Config::load_or_default(&config_path)?;
    let paths = paths.with_config(&config);
    let source = DataSource::for_kind(
        config.storage.source,
        None,
        FileBackend::new(&paths.store_dir),
    );
    let registry = Registry::from_config(&config, source);
    report_degraded(&registry, &paths.store_dir.display().to_string());
    Ok((config, paths, registry))
}

/// Warns when the configured source fell back to local storage. Returns
/// whether it did.
fn report_degraded(registry: &Registry, store: &str) -> bool {
    match registry.connection() {
        ConnectionState::Degraded { reason } => {
            warn!(%reason, store, "working from the local store");
            true
        }
        ConnectionState::Unattempted | ConnectionState::Connected => false,
    }
}

/// Accepts either a business id or a name.
pub fn find_business<'a>(registry: &'a Registry, needle: &str) -> Result<&'a Business> {
    registry
        .business(&BusinessId::from(needle))
        .or_else(|| registry.find_business_by_name(needle))
        .ok_or_else(|| anyhow::anyhow!("no business matches {needle:?}"))
}

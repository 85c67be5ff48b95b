use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::VouchError;
use crate::source::DataSourceKind;

pub const BUSINESSES_KEY: &str = "localBusinesses";
pub const OPINIONS_KEY: &str = "localOpinions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub trust: TrustConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub source: DataSourceKind,
    pub seed_on_first_run: bool,
    pub businesses_key: String,
    pub opinions_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    pub neutral_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub complaint_penalty: f64,
    pub praise_bonus: f64,
    pub missing_rating: f64,
    pub level_policy: LevelPolicy,
    pub under_review_below: f64,
    pub flagged_below: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelPolicy {
    /// Verified businesses are always `verified`, everyone else `pending`.
    VerificationOnly,
    /// Low scores are banded into `flagged` / `under-review` first.
    Banded,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub store_dir: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig {
                source: DataSourceKind::Local,
                seed_on_first_run: true,
                businesses_key: BUSINESSES_KEY.to_string(),
                opinions_key: OPINIONS_KEY.to_string(),
                data_dir: None,
            },
            trust: TrustConfig::default(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Missing config files are not an error; the defaults apply.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), VouchError> {
        if self.storage.businesses_key.trim().is_empty() || self.storage.opinions_key.trim().is_empty() {
            return Err(VouchError::Config("storage keys must not be empty".to_string()));
        }
        if self.storage.businesses_key == self.storage.opinions_key {
            return Err(VouchError::Config(
                "businesses and opinions must use different storage keys".to_string(),
            ));
        }
        let trust = &self.trust;
        let weights = [
            ("neutral_score", trust.neutral_score),
            ("min_score", trust.min_score),
            ("max_score", trust.max_score),
            ("complaint_penalty", trust.complaint_penalty),
            ("praise_bonus", trust.praise_bonus),
            ("missing_rating", trust.missing_rating),
            ("under_review_below", trust.under_review_below),
            ("flagged_below", trust.flagged_below),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, value)| !value.is_finite()) {
            return Err(VouchError::Config(format!(
                "trust.{name} must be a finite number, got {value}"
            )));
        }
        if trust.min_score > trust.max_score {
            return Err(VouchError::Config(format!(
                "trust.min_score {} exceeds trust.max_score {}",
                trust.min_score, trust.max_score
            )));
        }
        if trust.flagged_below > trust.under_review_below {
            return Err(VouchError::Config(
                "trust.flagged_below must not exceed trust.under_review_below".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            neutral_score: 50.0,
            min_score: 10.0,
            max_score: 100.0,
            complaint_penalty: 5.0,
            praise_bonus: 5.0,
            missing_rating: 3.0,
            level_policy: LevelPolicy::VerificationOnly,
            under_review_below: 40.0,
            flagged_below: 20.0,
        }
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "vouch", "vouch")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        let config_dir = project_dirs.config_dir();
        let data_dir = project_dirs.data_dir();
        Ok(Self {
            config_path: config_dir.join("config.toml"),
            data_dir: data_dir.to_path_buf(),
            store_dir: data_dir.join("store"),
        })
    }

    /// `storage.data_dir` in the config takes precedence over the platform default.
    pub fn with_config(mut self, config: &Config) -> Self {
        if let Some(dir) = &config.storage.data_dir {
            self.data_dir = dir.clone();
            self.store_dir = dir.join("store");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default_config();
        let rendered = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
        assert!(rendered.contains("localOpinions"));
    }

    #[test]
    fn rejects_shared_storage_key() {
        let mut config = Config::default_config();
        config.storage.opinions_key = config.storage.businesses_key.clone();
        assert!(matches!(config.validate(), Err(VouchError::Config(_))));
    }

    #[test]
    fn rejects_non_finite_trust_weights() {
        let rendered = Config::default_config().to_toml_string().unwrap();
        for (field, replacement) in [
            ("max_score = 100.0", "max_score = nan"),
            ("min_score = 10.0", "min_score = nan"),
            ("praise_bonus = 5.0", "praise_bonus = inf"),
        ] {
            assert!(rendered.contains(field), "rendered config lacks {field}");
            let contents = rendered.replace(field, replacement);
            let err = Config::from_toml_str(&contents).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<VouchError>(), Some(VouchError::Config(_))),
                "{replacement} was accepted: {err:?}"
            );
        }
    }

    #[test]
    fn parses_banded_policy() {
        let contents = r#"
[storage]
source = "remote"
seed_on_first_run = false
businesses_key = "b"
opinions_key = "o"

[trust]
neutral_score = 50.0
min_score = 10.0
max_score = 100.0
complaint_penalty = 5.0
praise_bonus = 5.0
missing_rating = 3.0
level_policy = "banded"
under_review_below = 40.0
flagged_below = 20.0
"#;
        let config = Config::from_toml_str(contents).unwrap();
        assert_eq!(config.storage.source, DataSourceKind::Remote);
        assert_eq!(config.trust.level_policy, LevelPolicy::Banded);
        assert!(!config.storage.seed_on_first_run);
    }

    #[test]
    fn data_dir_override_moves_store() {
        let mut config = Config::default_config();
        config.storage.data_dir = Some(PathBuf::from("/srv/vouch"));
        let paths = ConfigPaths {
            config_path: PathBuf::from("/tmp/config.toml"),
            data_dir: PathBuf::from("/tmp/data"),
            store_dir: PathBuf::from("/tmp/data/store"),
        }
        .with_config(&config);
        assert_eq!(paths.store_dir, PathBuf::from("/srv/vouch/store"));
    }
}

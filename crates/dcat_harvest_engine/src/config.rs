use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dcat_harvest_core::{DcatApProfile, MolgenisCollectionProfile, Profile, Record};
use harvest_logging::harvest_info;
use serde::Deserialize;

use crate::fetch::FetchSettings;
use crate::gather::ExtractionPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read harvest config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse harvest config: {0}")]
    Decode(String),
    #[error("harvest config has no profiles")]
    NoProfiles,
}

/// One harvest source, as written in a RON file:
///
/// ```ron
/// (
///     catalog_uri: "https://fdp.example.org/catalog",
///     entity: "collections",
///     profiles: [DcatAp, MolgenisCollection(defaults: {"type": "other"})],
///     fetch: (max_file_size_mb: Some(20)),
///     extraction_policy: SkipRecord,
/// )
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    pub catalog_uri: String,
    pub entity: String,
    pub profiles: Vec<ProfileConfig>,
    #[serde(default)]
    pub fetch: FetchOverrides,
    #[serde(default)]
    pub extraction_policy: ExtractionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub enum ProfileConfig {
    DcatAp,
    MolgenisCollection {
        #[serde(default)]
        defaults: Record,
    },
}

impl ProfileConfig {
    fn build(&self) -> Box<dyn Profile> {
        match self {
            ProfileConfig::DcatAp => Box::new(DcatApProfile),
            ProfileConfig::MolgenisCollection { defaults } => {
                Box::new(MolgenisCollectionProfile::new(defaults.clone()))
            }
        }
    }
}

/// Optional changes to [`FetchSettings::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchOverrides {
    #[serde(default)]
    pub max_file_size_mb: Option<u64>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub redirect_limit: Option<usize>,
}

impl HarvestConfig {
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: HarvestConfig =
            ron::from_str(content).map_err(|err| ConfigError::Decode(err.to_string()))?;
        if config.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content)?;
        harvest_info!("Loaded harvest config from {:?}", path);
        Ok(config)
    }

    /// Profiles in the order they are listed.
    pub fn build_profiles(&self) -> Vec<Box<dyn Profile>> {
        self.profiles.iter().map(ProfileConfig::build).collect()
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        let overrides = &self.fetch;
        if let Some(mb) = overrides.max_file_size_mb {
            settings.max_bytes = mb.saturating_mul(1024 * 1024);
        }
        if let Some(secs) = overrides.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = overrides.redirect_limit {
            settings.redirect_limit = limit;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = HarvestConfig::from_ron(
            r#"(catalog_uri: "https://fdp.example.org/catalog", entity: "dataset", profiles: [DcatAp])"#,
        )
        .unwrap();
        assert_eq!(config.extraction_policy, ExtractionPolicy::AbortRun);
        let settings = config.fetch_settings();
        assert_eq!(settings.max_bytes, 50 * 1024 * 1024);
        assert_eq!(settings.redirect_limit, 5);
        assert_eq!(config.build_profiles().len(), 1);
    }

    #[test]
    fn huge_size_limit_saturates() {
        let config = HarvestConfig::from_ron(
            r#"(
                catalog_uri: "x.ttl",
                entity: "dataset",
                profiles: [DcatAp],
                fetch: (max_file_size_mb: Some(18446744073709551615)),
            )"#,
        )
        .unwrap();
        assert_eq!(config.fetch_settings().max_bytes, u64::MAX);
    }

    #[test]
    fn empty_profile_list_is_rejected() {
        let err = HarvestConfig::from_ron(r#"(catalog_uri: "x.ttl", entity: "dataset", profiles: [])"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoProfiles));
    }
}

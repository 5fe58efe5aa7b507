//! Environment registry and its loading

use anyhow::{anyhow, Context, Result};
use apigw_authorizer::AuthorizerConfig;
use apigw_converter::profile::resolve;
use apigw_converter::{
    ConvertError, MicroserviceProfile, QueueProfile, RawMicroserviceProfile, RawQueueProfile,
    TargetKind,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{OutputConfig, SourceConfig};

/// Registry file names searched in the working directory, in order
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".apigw-gen.yaml",
    ".apigw-gen.yml",
    "apigw-gen.yaml",
    "apigw-gen.yml",
];

const BUILTIN_REGISTRY: &str = include_str!("builtin.yaml");

/// Environment registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Queue (SQS) profiles by name
    #[serde(default)]
    pub queue: IndexMap<String, RawQueueProfile>,

    /// Microservice (VPC link) profiles by name
    #[serde(default)]
    pub microservice: IndexMap<String, RawMicroserviceProfile>,

    /// Token verification settings for the `authorize` command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<AuthorizerConfig>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    /// Parse and validate a YAML registry
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The registry compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_REGISTRY).context("Invalid built-in registry")
    }

    /// First registry file that exists, if any
    ///
    /// An explicit path always wins; otherwise `search_dir` is searched
    /// before the user configuration directory.
    pub fn discover(
        explicit: Option<&Path>,
        search_dir: &Path,
        config_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let user_config = config_dir.map(|dir| dir.join("config.yaml"));
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| search_dir.join(name))
            .chain(user_config)
            .find(|path| path.exists())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file {}", path.display()))?;
        Ok(())
    }

    /// Validate the registry structure
    ///
    /// Profiles are not checked here so that one broken profile does not
    /// block conversions for the others; see [`Config::validate_profiles`].
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if self.queue.is_empty() && self.microservice.is_empty() {
            return Err(anyhow!("At least one profile must be configured"));
        }

        self.output.validate()?;

        if let Some(authorizer) = &self.authorizer {
            if authorizer.region.is_empty() || authorizer.user_pool_id.is_empty() {
                return Err(anyhow!(
                    "Authorizer configuration requires region and user_pool_id"
                ));
            }
        }

        Ok(())
    }

    /// Validate every profile, collecting all failures
    pub fn validate_profiles(&self) -> Vec<ConvertError> {
        let queue = self
            .queue
            .iter()
            .filter_map(|(name, raw)| raw.validate(name).err());
        let microservice = self
            .microservice
            .iter()
            .filter_map(|(name, raw)| raw.validate(name).err());

        let errors: Vec<_> = queue.chain(microservice).collect();
        debug!("Validated {} profiles, {} invalid", self.profile_count(), errors.len());
        errors
    }

    pub fn queue_profile(&self, name: &str) -> Result<QueueProfile, ConvertError> {
        resolve(&self.queue, TargetKind::Queue.as_str(), name)?.validate(name)
    }

    pub fn microservice_profile(&self, name: &str) -> Result<MicroserviceProfile, ConvertError> {
        resolve(&self.microservice, TargetKind::Microservice.as_str(), name)?.validate(name)
    }

    /// Profile names of one kind, in declaration order
    pub fn profile_names(&self, kind: TargetKind) -> Vec<&str> {
        match kind {
            TargetKind::Queue => self.queue.keys().map(String::as_str).collect(),
            TargetKind::Microservice => self.microservice.keys().map(String::as_str).collect(),
        }
    }

    pub fn profile_count(&self) -> usize {
        self.queue.len() + self.microservice.len()
    }
}

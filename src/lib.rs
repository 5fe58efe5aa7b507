//! API Gateway Generator Library
//!
//! Converts an OpenAPI (Swagger 2.0) document into an API Gateway document
//! for a named environment profile, either routing the case-event endpoint
//! to an SQS queue or proxying every operation to backend microservices over
//! a VPC link. Also hosts the JWT authorizer used in front of those gateways.

pub mod cli;
pub mod config;
pub mod utils;

pub use config::{Config, OutputConfig, SourceConfig};

use anyhow::{anyhow, Context, Result};
use apigw_authorizer::{Authorizer, InMemoryTenantStore, KeyResolver, StaticKeySet};
use apigw_converter::{
    ArtifactWriter, ConversionReport, GatewayTarget, MicroserviceTarget, OutputFormat,
    QueueTarget, SourceDocument, SpecConverter, TargetKind,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Per-run overrides of the registry's source and output settings
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub source: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,

    /// Compare with the existing artifact instead of writing it
    pub check: bool,
}

/// Result of one conversion run
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub artifact: PathBuf,

    /// SHA-256 of the rendered artifact
    pub digest: String,

    pub report: ConversionReport,

    /// False in check mode
    pub written: bool,
}

/// Main application context
pub struct ApiGatewayGen {
    config: Config,
}

impl ApiGatewayGen {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn target(&self, kind: TargetKind, profile: &str) -> Result<Box<dyn GatewayTarget>> {
        let target: Box<dyn GatewayTarget> = match kind {
            TargetKind::Queue => Box::new(QueueTarget::new(self.config.queue_profile(profile)?)),
            TargetKind::Microservice => Box::new(MicroserviceTarget::new(
                self.config.microservice_profile(profile)?,
            )),
        };
        Ok(target)
    }

    /// Convert the source document for one profile and write the artifact
    ///
    /// Every fatal condition is detected before the artifact is touched.
    pub async fn convert(
        &self,
        kind: TargetKind,
        profile: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertOutcome> {
        let start = Instant::now();
        let target = self.target(kind, profile)?;

        let source_path = options
            .source
            .clone()
            .unwrap_or_else(|| self.config.source.path.clone());
        debug!("Reading source document {:?}", source_path);
        let source = SourceDocument::from_file(&source_path).with_context(|| {
            format!("Failed to load source document {}", source_path.display())
        })?;

        let conversion = SpecConverter::new(target.as_ref()).convert(&source)?;

        let directory = options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.output.directory.clone());
        let format = options.format.unwrap_or(self.config.output.format);
        let writer = ArtifactWriter::new(directory, format);

        let artifact = writer.path_for(kind, profile);
        let content = writer.render(&conversion.document)?;
        let digest = utils::calculate_string_hash(&content);

        if options.check {
            check_artifact(&artifact, &digest)?;
        } else {
            writer
                .write(&artifact, &content)
                .with_context(|| format!("Failed to write artifact {}", artifact.display()))?;
        }

        info!(
            "{} {:?} ({} paths, {} methods, sha256 {}) in {}",
            if options.check { "Checked" } else { "Wrote" },
            artifact,
            conversion.report.paths_emitted,
            conversion.report.methods_emitted,
            digest,
            utils::format_duration(start.elapsed())
        );

        Ok(ConvertOutcome {
            artifact,
            digest,
            report: conversion.report,
            written: !options.check,
        })
    }

    /// Build the authorizer from the registry's `authorizer` section
    ///
    /// With `keys_file` set, keys come from that JWKS document; otherwise
    /// they are fetched from the user pool. The tenant store is opened here
    /// and lives as long as the returned authorizer.
    pub async fn build_authorizer(&self, keys_file: Option<&Path>) -> Result<Authorizer> {
        let config = self
            .config
            .authorizer
            .clone()
            .ok_or_else(|| anyhow!("No authorizer section in configuration"))?;

        let keys: Arc<dyn KeyResolver> = match keys_file {
            Some(path) => Arc::new(StaticKeySet::open(path).await?),
            None => remote_keys(&config)?,
        };

        let tenants = match &config.tenants_file {
            Some(path) => InMemoryTenantStore::open(path).await?,
            None => InMemoryTenantStore::seeded(),
        };
        debug!("Tenant store holds {} tenants", tenants.len());

        Ok(Authorizer::new(config, keys).with_tenant_store(Arc::new(tenants)))
    }
}

fn check_artifact(artifact: &Path, digest: &str) -> Result<()> {
    if !artifact.exists() {
        return Err(anyhow!("Artifact {} does not exist", artifact.display()));
    }

    let existing = utils::calculate_file_hash(artifact)
        .with_context(|| format!("Failed to read artifact {}", artifact.display()))?;
    if existing != digest {
        return Err(anyhow!("Artifact {} is out of date", artifact.display()));
    }
    Ok(())
}

#[cfg(feature = "http")]
fn remote_keys(config: &apigw_authorizer::AuthorizerConfig) -> Result<Arc<dyn KeyResolver>> {
    let client = apigw_authorizer::JwksClient::new(
        config.jwks_uri(),
        std::time::Duration::from_secs(config.jwks_cache_ttl_secs),
    )
    .with_fetch_timeout(std::time::Duration::from_secs(config.jwks_timeout_secs));
    Ok(Arc::new(client))
}

#[cfg(not(feature = "http"))]
fn remote_keys(_config: &apigw_authorizer::AuthorizerConfig) -> Result<Arc<dyn KeyResolver>> {
    Err(anyhow!(
        "Fetching signing keys requires the http feature; pass --keys instead"
    ))
}

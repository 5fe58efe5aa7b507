//! Authorizer configuration

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Claim carrying the tenant identifier
pub const DEFAULT_TENANT_CLAIM: &str = "custom:tenant_id";

/// How long a fetched key set is trusted
pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 600;

/// Upper bound on a single key set fetch
pub const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 5;

/// Identity provider and verification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizerConfig {
    /// Region hosting the user pool
    pub region: String,

    /// User pool identifier
    pub user_pool_id: String,

    /// Claim looked up in the tenant store
    #[serde(default = "default_tenant_claim")]
    pub tenant_claim: String,

    /// The single accepted signing algorithm
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// Expected audience; not checked when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    #[serde(default = "default_jwks_cache_ttl_secs")]
    pub jwks_cache_ttl_secs: u64,

    /// A fetch that takes longer fails, and the request is denied
    #[serde(default = "default_jwks_timeout_secs")]
    pub jwks_timeout_secs: u64,

    /// YAML tenant list; the built-in tenants are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenants_file: Option<PathBuf>,
}

fn default_tenant_claim() -> String {
    DEFAULT_TENANT_CLAIM.to_string()
}

fn default_algorithm() -> Algorithm {
    Algorithm::RS256
}

fn default_jwks_cache_ttl_secs() -> u64 {
    DEFAULT_JWKS_CACHE_TTL_SECS
}

fn default_jwks_timeout_secs() -> u64 {
    DEFAULT_JWKS_TIMEOUT_SECS
}

impl AuthorizerConfig {
    pub fn new(region: impl Into<String>, user_pool_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            user_pool_id: user_pool_id.into(),
            tenant_claim: default_tenant_claim(),
            algorithm: default_algorithm(),
            audience: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl_secs(),
            jwks_timeout_secs: default_jwks_timeout_secs(),
            tenants_file: None,
        }
    }

    /// `https://cognito-idp.<region>.amazonaws.com/<pool>`
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Public key set published by the user pool
    pub fn jwks_uri(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }
}

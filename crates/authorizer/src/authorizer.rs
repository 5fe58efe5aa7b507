//! Bearer-token authorization

use jsonwebtoken::{decode, decode_header, Validation};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::claims::VerifiedClaims;
use crate::config::AuthorizerConfig;
use crate::error::{AuthError, AuthResult};
use crate::keys::KeyResolver;
use crate::policy::{generate_policy, AuthorizerResponse, Effect};
use crate::tenant::{Tenant, TenantStore};

/// Principal reported on deny responses
pub const DENY_PRINCIPAL: &str = "user";

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of authorizing one token
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow {
        claims: VerifiedClaims,
        tenant: Option<Tenant>,
    },
    Deny {
        reason: String,
    },
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// Gateway response granting or refusing `execute-api:Invoke` on `method_arn`
    pub fn into_response(self, method_arn: &str) -> AuthorizerResponse {
        match self {
            Decision::Allow { claims, tenant } => {
                let mut response = generate_policy(&claims.sub, Effect::Allow, method_arn);
                let mut context = serde_json::Map::new();
                if let Some(email) = claims.email {
                    context.insert("email".to_string(), email.into());
                }
                if let Some(tenant) = tenant {
                    context.insert("tenant_id".to_string(), tenant.tenant_id.into());
                    context.insert("tenant_name".to_string(), tenant.name.into());
                }
                if !context.is_empty() {
                    response.context = Some(context);
                }
                response
            }
            Decision::Deny { .. } => generate_policy(DENY_PRINCIPAL, Effect::Deny, method_arn),
        }
    }
}

/// Verifies bearer tokens against the identity provider's signing keys
pub struct Authorizer {
    config: AuthorizerConfig,
    keys: Arc<dyn KeyResolver>,
    tenants: Option<Arc<dyn TenantStore>>,
}

impl Authorizer {
    pub fn new(config: AuthorizerConfig, keys: Arc<dyn KeyResolver>) -> Self {
        Self {
            config,
            keys,
            tenants: None,
        }
    }

    pub fn with_tenant_store(mut self, tenants: Arc<dyn TenantStore>) -> Self {
        self.tenants = Some(tenants);
        self
    }

    /// Authorize a token; every failure is a deny
    pub async fn authorize(&self, token: &str) -> Decision {
        match self.verify(token).await {
            Ok((claims, tenant)) => {
                info!("Authorized {}", claims.sub);
                Decision::Allow { claims, tenant }
            }
            Err(e) => {
                warn!("Authorization error: {}", e);
                Decision::Deny {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Verify a token and resolve its tenant
    pub async fn verify(&self, token: &str) -> AuthResult<(VerifiedClaims, Option<Tenant>)> {
        let token = token.trim();
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token);
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;
        debug!("Verifying token signed with key {}", kid);

        let key = self.keys.resolve(&kid).await?;
        let claims = decode::<VerifiedClaims>(token, &key, &self.validation())?.claims;
        let tenant = self.resolve_tenant(&claims).await?;

        Ok((claims, tenant))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    async fn resolve_tenant(&self, claims: &VerifiedClaims) -> AuthResult<Option<Tenant>> {
        let Some(tenant_id) = claims.claim_str(&self.config.tenant_claim) else {
            return Ok(None);
        };

        let Some(store) = &self.tenants else {
            info!("Tenant ID: {}", tenant_id);
            return Ok(None);
        };

        match store.get_tenant(tenant_id).await? {
            Some(tenant) => Ok(Some(tenant)),
            None => Err(AuthError::InvalidTenant),
        }
    }
}

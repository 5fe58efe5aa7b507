//! JWT bearer-token authorizer for API Gateway
//!
//! Tokens are verified against the user pool's published signing keys
//! (resolved through a [`KeyResolver`]) and, when a tenant claim is present,
//! checked against a [`TenantStore`]. The outcome is a [`Decision`] that
//! renders to the gateway's policy response.

pub mod authorizer;
pub mod claims;
pub mod config;
pub mod error;
pub mod keys;
pub mod policy;
pub mod tenant;

pub use authorizer::{Authorizer, Decision};
pub use claims::VerifiedClaims;
pub use config::AuthorizerConfig;
pub use error::{AuthError, AuthResult};
#[cfg(feature = "http")]
pub use keys::JwksClient;
pub use keys::{KeyResolver, StaticKeySet};
pub use policy::{generate_policy, AuthorizerResponse, Effect};
pub use tenant::{InMemoryTenantStore, Tenant, TenantStore};

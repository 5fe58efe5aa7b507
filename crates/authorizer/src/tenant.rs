//! Tenant lookup

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// A tenant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub tenant_id: String,
    pub name: String,
}

impl Tenant {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            name: name.into(),
        }
    }
}

/// Looks tenants up by identifier
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn get_tenant(&self, tenant_id: &str) -> AuthResult<Option<Tenant>>;
}

/// Tenant store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantStore {
    tenants: HashMap<String, Tenant>,
}

impl InMemoryTenantStore {
    pub fn new(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        Self {
            tenants: tenants
                .into_iter()
                .map(|tenant| (tenant.tenant_id.clone(), tenant))
                .collect(),
        }
    }

    /// The two tenants every fresh installation starts with
    pub fn seeded() -> Self {
        Self::new([
            Tenant::new("tenant_123", "Tenant One"),
            Tenant::new("tenant_456", "Tenant Two"),
        ])
    }

    /// Load a YAML list of tenants
    pub async fn open(path: &Path) -> AuthResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AuthError::TenantStore(format!("{}: {e}", path.display())))?;
        let tenants: Vec<Tenant> = serde_yaml::from_str(&content)
            .map_err(|e| AuthError::TenantStore(format!("{}: {e}", path.display())))?;

        debug!("Loaded {} tenants from {:?}", tenants.len(), path);
        Ok(Self::new(tenants))
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn get_tenant(&self, tenant_id: &str) -> AuthResult<Option<Tenant>> {
        Ok(self.tenants.get(tenant_id).cloned())
    }
}

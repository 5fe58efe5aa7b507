//! Verified token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims of a token whose signature, issuer and expiry have been checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedClaims {
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub iss: String,

    pub exp: i64,

    /// Every other claim, including custom attributes
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VerifiedClaims {
    /// A string-valued claim; non-string and empty values count as absent
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.extra
            .get(name)
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

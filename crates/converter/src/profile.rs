//! Environment profiles and their validation
//!
//! Profiles are declared as `Raw*` structs so that a single validation pass
//! can report every missing or malformed field at once, and are turned into
//! the validated `QueueProfile` / `MicroserviceProfile` before conversion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};
use crate::projection::{ExclusionSet, MechanismFlags, TimeoutPolicy};

/// Whether a value is an unresolved `${name}` template placeholder
pub fn is_placeholder(value: &str) -> bool {
    value.len() > 3 && value.starts_with("${") && value.ends_with('}')
}

/// Look up a profile by name
pub fn resolve<'a, P>(
    profiles: &'a IndexMap<String, P>,
    kind: &str,
    name: &str,
) -> ConvertResult<&'a P> {
    profiles
        .get(name)
        .ok_or_else(|| ConvertError::UnknownProfile {
            kind: kind.to_string(),
            name: name.to_string(),
            available: profiles.keys().cloned().collect(),
        })
}

/// Timeout and exclusion settings shared by every profile kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLimits {
    #[serde(rename = "intTimeoutMs", default, skip_serializing_if = "Option::is_none")]
    pub int_timeout_ms: Option<u64>,

    #[serde(rename = "excludedTimeoutMs", default, skip_serializing_if = "Option::is_none")]
    pub excluded_timeout_ms: Option<u64>,

    #[serde(rename = "excludedPaths", default)]
    pub excluded_paths: Vec<String>,
}

impl RawLimits {
    fn timeouts(&self) -> TimeoutPolicy {
        let defaults = TimeoutPolicy::default();
        TimeoutPolicy {
            default_ms: self
                .int_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.default_ms),
            excluded_ms: self
                .excluded_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.excluded_ms),
        }
    }
}

/// Validated settings shared by every profile kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonProfile {
    /// Profile name, used in the artifact file name
    pub name: String,
    pub api_title: String,
    pub description: String,
    pub host: String,
    pub timeouts: TimeoutPolicy,
    pub exclusions: ExclusionSet,
}

/// Message-queue profile as declared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQueueProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqs_queue_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqs_iam_role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(flatten)]
    pub limits: RawLimits,
}

/// Validated message-queue profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueProfile {
    pub common: CommonProfile,
    pub queue_name: String,
    pub account_id: String,
    pub iam_role: String,
    pub region: String,
}

impl RawQueueProfile {
    pub fn validate(&self, name: &str) -> ConvertResult<QueueProfile> {
        let mut missing = Vec::new();
        let queue_name = required(&self.sqs_queue_name, "sqs_queue_name", &mut missing);
        let account_id = required(&self.aws_account_id, "aws_account_id", &mut missing);
        let iam_role = required(&self.sqs_iam_role, "sqs_iam_role", &mut missing);
        let region = required(&self.aws_region, "aws_region", &mut missing);
        let api_title = required(&self.api_title, "api_title", &mut missing);
        let description = required(&self.description, "description", &mut missing);

        if !missing.is_empty() {
            return Err(ConvertError::InvalidProfile {
                profile: name.to_string(),
                fields: missing,
            });
        }

        Ok(QueueProfile {
            common: CommonProfile {
                name: name.to_string(),
                api_title,
                description,
                host: self.host.clone().unwrap_or_default(),
                timeouts: self.limits.timeouts(),
                exclusions: ExclusionSet::new(self.limits.excluded_paths.clone()),
            },
            queue_name,
            account_id,
            iam_role,
            region,
        })
    }
}

/// A switch declared either as a boolean or as text
///
/// Only `true` and `"true"` switch it on, so template placeholders such as
/// `"${enable_api_key}"` leave it off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Flag(bool),
    Text(String),
}

impl Toggle {
    pub fn is_enabled(&self) -> bool {
        match self {
            Toggle::Flag(flag) => *flag,
            Toggle::Text(text) => text == "true",
        }
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Toggle::Flag(false)
    }
}

/// Microservice (VPC link) profile as declared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMicroserviceProfile {
    #[serde(rename = "basePath", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// Either an identifier, or `[identifier, enabled]`
    #[serde(rename = "cognitoId", default, skip_serializing_if = "Option::is_none")]
    pub cognito_id: Option<serde_json::Value>,

    #[serde(rename = "connectionId", default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default)]
    pub enable_api_key: Toggle,

    #[serde(flatten)]
    pub limits: RawLimits,
}

/// Identity provider the gateway delegates authentication to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProvider {
    /// Provider resource identifier (user pool ARN)
    pub arn: String,
    pub enabled: bool,
}

impl IdentityProvider {
    /// The identifier names a concrete resource rather than a placeholder
    pub fn is_resolved(&self) -> bool {
        !self.arn.is_empty() && !is_placeholder(&self.arn)
    }

    /// Enabled and resolved: a `cognito-auth` definition is emitted
    pub fn is_active(&self) -> bool {
        self.enabled && self.is_resolved()
    }
}

/// Validated microservice profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroserviceProfile {
    pub common: CommonProfile,
    pub base_path: String,
    pub connection_id: String,
    pub identity_provider: IdentityProvider,
    pub api_key: bool,
}

impl MicroserviceProfile {
    pub fn mechanism_flags(&self) -> MechanismFlags {
        MechanismFlags {
            identity_provider_enabled: self.identity_provider.enabled,
            identity_provider_resolved: self.identity_provider.is_resolved(),
            api_key: self.api_key,
        }
    }
}

impl RawMicroserviceProfile {
    pub fn validate(&self, name: &str) -> ConvertResult<MicroserviceProfile> {
        let mut missing = Vec::new();
        let base_path = required(&self.base_path, "basePath", &mut missing);
        let identity_provider = parse_identity_provider(self.cognito_id.as_ref())
            .map_err(|problem| missing.push(problem))
            .ok();
        let connection_id = required(&self.connection_id, "connectionId", &mut missing);
        let api_title = required(&self.api_title, "api_title", &mut missing);
        let description = required(&self.description, "description", &mut missing);

        let identity_provider = match identity_provider {
            Some(provider) if missing.is_empty() => provider,
            _ => {
                return Err(ConvertError::InvalidProfile {
                    profile: name.to_string(),
                    fields: missing,
                })
            }
        };

        Ok(MicroserviceProfile {
            common: CommonProfile {
                name: name.to_string(),
                api_title,
                description,
                host: self.host.clone().unwrap_or_default(),
                timeouts: self.limits.timeouts(),
                exclusions: ExclusionSet::new(self.limits.excluded_paths.clone()),
            },
            base_path,
            connection_id,
            identity_provider,
            api_key: self.enable_api_key.is_enabled(),
        })
    }
}

const COGNITO_FIELD: &str = "cognitoId";

/// Parse `cognitoId`, returning the field problem to report on failure
fn parse_identity_provider(value: Option<&serde_json::Value>) -> Result<IdentityProvider, String> {
    use serde_json::Value;

    let malformed = || format!("{COGNITO_FIELD} (must be array with [arn, boolean])");
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(COGNITO_FIELD.to_string()),
        Some(Value::String(arn)) if arn.is_empty() => Err(COGNITO_FIELD.to_string()),
        Some(Value::String(arn)) => Ok(IdentityProvider {
            arn: arn.clone(),
            enabled: true,
        }),
        Some(Value::Array(items)) => match items.as_slice() {
            [Value::String(arn), Value::Bool(enabled)] if !arn.is_empty() => Ok(IdentityProvider {
                arn: arn.clone(),
                enabled: *enabled,
            }),
            _ => Err(malformed()),
        },
        Some(_) => Err(malformed()),
    }
}

fn required(value: &Option<String>, field: &str, missing: &mut Vec<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(field.to_string());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn queue_profile() -> RawQueueProfile {
        RawQueueProfile {
            sqs_queue_name: Some("dev-case-queue".to_string()),
            aws_account_id: Some("123456789012".to_string()),
            sqs_iam_role: Some("arn:aws:iam::123456789012:role/dev-apigw-sqs-role".to_string()),
            aws_region: Some("us-east-1".to_string()),
            api_title: Some("dev-sqs-apigw".to_string()),
            description: Some("dev".to_string()),
            host: None,
            limits: RawLimits::default(),
        }
    }

    fn microservice_profile() -> RawMicroserviceProfile {
        RawMicroserviceProfile {
            base_path: Some("http://backend.internal:8087".to_string()),
            cognito_id: Some(json!(["arn:aws:cognito-idp:us-east-1:123:userpool/pool", true])),
            connection_id: Some("abc123".to_string()),
            api_title: Some("prod-apigw".to_string()),
            description: Some("prod".to_string()),
            host: Some("api.example.com".to_string()),
            enable_api_key: Toggle::Flag(false),
            limits: RawLimits::default(),
        }
    }

    #[test]
    fn test_queue_profile_defaults() {
        let profile = queue_profile().validate("DEV").unwrap();
        assert_eq!(profile.common.name, "DEV");
        assert_eq!(profile.common.host, "");
        assert_eq!(profile.common.timeouts, TimeoutPolicy::default());
    }

    #[test]
    fn test_queue_profile_reports_all_missing_fields() {
        let mut raw = queue_profile();
        raw.aws_region = None;
        raw.api_title = Some(String::new());

        let error = raw.validate("DEV").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid or missing fields for environment DEV: aws_region, api_title"
        );
    }

    #[test]
    fn test_microservice_tuple_shape_checked() {
        let mut raw = microservice_profile();
        raw.cognito_id = Some(json!(["arn:pool", "yes"]));
        raw.connection_id = None;

        match raw.validate("PROD").unwrap_err() {
            ConvertError::InvalidProfile { fields, .. } => assert_eq!(
                fields,
                vec![
                    "cognitoId (must be array with [arn, boolean])".to_string(),
                    "connectionId".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_microservice_tuple_wrong_length() {
        let mut raw = microservice_profile();
        raw.cognito_id = Some(json!(["arn:pool", true, "extra"]));
        assert!(raw.validate("PROD").is_err());

        raw.cognito_id = Some(json!(["", true]));
        assert!(raw.validate("PROD").is_err());
    }

    #[test]
    fn test_microservice_missing_cognito() {
        let mut raw = microservice_profile();
        raw.cognito_id = None;
        match raw.validate("PROD").unwrap_err() {
            ConvertError::InvalidProfile { fields, .. } => {
                assert_eq!(fields, vec!["cognitoId".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_microservice_plain_arn_is_enabled() {
        let mut raw = microservice_profile();
        raw.cognito_id = Some(json!("arn:pool"));
        let profile = raw.validate("PROD").unwrap();
        assert!(profile.identity_provider.enabled);
        assert!(profile.identity_provider.is_active());
    }

    #[test]
    fn test_placeholder_provider_is_not_active() {
        let mut raw = microservice_profile();
        raw.cognito_id = Some(json!(["${cognito_arn}", true]));
        raw.enable_api_key = Toggle::Text("${enable_api_key}".to_string());

        let profile = raw.validate("TF_VAR").unwrap();
        assert!(profile.identity_provider.enabled);
        assert!(!profile.identity_provider.is_active());
        assert!(!profile.api_key);
    }

    #[test]
    fn test_toggle_text_true() {
        assert!(Toggle::Text("true".to_string()).is_enabled());
        assert!(!Toggle::Text("yes".to_string()).is_enabled());
        assert!(Toggle::Flag(true).is_enabled());
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let mut profiles = IndexMap::new();
        profiles.insert("DEV".to_string(), queue_profile());

        assert!(resolve(&profiles, "queue", "DEV").is_ok());
        match resolve(&profiles, "queue", "QA").unwrap_err() {
            ConvertError::UnknownProfile { name, available, .. } => {
                assert_eq!(name, "QA");
                assert_eq!(available, vec!["DEV".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raw_profile_from_yaml() {
        let yaml = r#"
basePath: http://backend:8087
cognitoId: ["arn:pool", false]
connectionId: link1
api_title: t
description: d
enable_api_key: "true"
intTimeoutMs: 45000
excludedPaths: ["/public/info"]
"#;
        let raw: RawMicroserviceProfile = serde_yaml::from_str(yaml).unwrap();
        let profile = raw.validate("UAT").unwrap();

        assert!(!profile.identity_provider.enabled);
        assert!(profile.api_key);
        assert_eq!(profile.common.timeouts.default_ms, 45_000);
        assert_eq!(profile.common.timeouts.excluded_ms, 29_000);
        assert!(profile.common.exclusions.contains("/public/info"));
    }
}

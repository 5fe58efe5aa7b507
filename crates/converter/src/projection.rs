//! Per-path projection rules: timeouts, parameter forwarding and security

use indexmap::IndexMap;

use crate::document::{ForwardingRules, SecurityRequirement};
use crate::source::{ParameterLocation, ParameterSpec};

/// Fallback integration timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Fallback timeout for excluded paths
pub const EXCLUDED_TIMEOUT_MS: u64 = 29_000;

/// The two integration timeouts a profile declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub default_ms: u64,
    pub excluded_ms: u64,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            default_ms: DEFAULT_TIMEOUT_MS,
            excluded_ms: EXCLUDED_TIMEOUT_MS,
        }
    }
}

/// Paths exempt from the default timeout and default security
///
/// Membership is exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(Vec<String>);

impl ExclusionSet {
    pub fn new(paths: Vec<String>) -> Self {
        Self(paths)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|excluded| excluded == path)
    }
}

/// Pick the integration timeout for a path
pub fn select_timeout(path: &str, exclusions: &ExclusionSet, policy: TimeoutPolicy) -> u64 {
    if exclusions.contains(path) {
        policy.excluded_ms
    } else {
        policy.default_ms
    }
}

/// Map path and query parameters onto integration request parameters
///
/// Parameters in any other location, or without a name, are left out.
pub fn project_parameters(parameters: &[ParameterSpec]) -> ForwardingRules {
    let mut rules = IndexMap::new();
    for parameter in parameters.iter().filter(|p| !p.name().is_empty()) {
        let segment = match parameter.location() {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "querystring",
            ParameterLocation::Other => continue,
        };
        rules.insert(
            format!("integration.request.{segment}.{}", parameter.name()),
            format!("method.request.{segment}.{}", parameter.name()),
        );
    }
    rules
}

/// Security mechanism a method can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    /// Identity-provider (Cognito user pool) authorizer
    IdentityProvider,

    /// Static API key
    ApiKey,
}

impl Mechanism {
    /// Name of the matching entry under `securityDefinitions`
    pub fn scheme_name(&self) -> &'static str {
        match self {
            Mechanism::IdentityProvider => "cognito-auth",
            Mechanism::ApiKey => "api_key",
        }
    }
}

/// Mechanisms a profile switches on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MechanismFlags {
    /// Identity-provider auth is switched on for the profile
    pub identity_provider_enabled: bool,

    /// The identity provider names a concrete (non-placeholder) resource
    pub identity_provider_resolved: bool,

    /// Static API key requirement
    pub api_key: bool,
}

impl MechanismFlags {
    /// Mechanisms in the order they are attached
    pub fn active(&self) -> Vec<Mechanism> {
        let mut mechanisms = Vec::new();
        if self.identity_provider_enabled && self.identity_provider_resolved {
            mechanisms.push(Mechanism::IdentityProvider);
        }
        if self.api_key {
            mechanisms.push(Mechanism::ApiKey);
        }
        mechanisms
    }
}

/// Outcome of the security decision for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityDecision {
    /// No `security` field is emitted
    Suppressed,

    /// Emit a `security` list naming these mechanisms
    Attach(Vec<Mechanism>),
}

impl SecurityDecision {
    pub fn into_requirements(self) -> Option<Vec<SecurityRequirement>> {
        match self {
            SecurityDecision::Suppressed => None,
            SecurityDecision::Attach(mechanisms) => Some(
                mechanisms
                    .into_iter()
                    .map(|mechanism| {
                        let mut requirement = IndexMap::new();
                        requirement.insert(mechanism.scheme_name().to_string(), Vec::new());
                        requirement
                    })
                    .collect(),
            ),
        }
    }
}

/// Decide whether a path carries security requirements
///
/// Security hangs off the identity provider: when it is switched off, or the
/// path is excluded, nothing is attached regardless of other mechanisms.
pub fn decide_security(
    path: &str,
    flags: MechanismFlags,
    exclusions: &ExclusionSet,
) -> SecurityDecision {
    if !flags.identity_provider_enabled || exclusions.contains(path) {
        return SecurityDecision::Suppressed;
    }
    SecurityDecision::Attach(flags.active())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn exclusions() -> ExclusionSet {
        ExclusionSet::new(vec![
            "/public/healthcheck".to_string(),
            "/public/status".to_string(),
        ])
    }

    #[rstest]
    #[case("/public/healthcheck", 29_000)]
    #[case("/public/status", 29_000)]
    #[case("/public/status/", 60_000)]
    #[case("/public", 60_000)]
    #[case("/public/healthcheck/deep", 60_000)]
    #[case("/v1/orders", 60_000)]
    fn test_select_timeout_is_exact_match(#[case] path: &str, #[case] expected: u64) {
        assert_eq!(
            select_timeout(path, &exclusions(), TimeoutPolicy::default()),
            expected
        );
    }

    #[test]
    fn test_select_timeout_uses_profile_constants() {
        let policy = TimeoutPolicy {
            default_ms: 45_000,
            excluded_ms: 10_000,
        };
        assert_eq!(select_timeout("/public/status", &exclusions(), policy), 10_000);
        assert_eq!(select_timeout("/v1/orders", &exclusions(), policy), 45_000);
    }

    #[test]
    fn test_project_parameters() {
        let parameters = vec![
            ParameterSpec::new("id", "path"),
            ParameterSpec::new("page", "query"),
            ParameterSpec::new("X-Trace", "header"),
            ParameterSpec::new("payload", "body"),
        ];

        let rules = project_parameters(&parameters);
        let entries: Vec<(&str, &str)> = rules
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(
            entries,
            vec![
                ("integration.request.path.id", "method.request.path.id"),
                (
                    "integration.request.querystring.page",
                    "method.request.querystring.page"
                ),
            ]
        );
    }

    #[test]
    fn test_project_parameters_skips_unnamed() {
        let parameters = vec![ParameterSpec::new("", "path")];
        assert!(project_parameters(&parameters).is_empty());
    }

    #[test]
    fn test_exclusion_suppresses_security() {
        let flags = MechanismFlags {
            identity_provider_enabled: true,
            identity_provider_resolved: true,
            api_key: true,
        };
        assert_eq!(
            decide_security("/public/status", flags, &exclusions()),
            SecurityDecision::Suppressed
        );
    }

    #[test]
    fn test_disabled_identity_provider_suppresses_api_key() {
        let flags = MechanismFlags {
            identity_provider_enabled: false,
            identity_provider_resolved: true,
            api_key: true,
        };
        assert_eq!(
            decide_security("/v1/orders", flags, &exclusions()),
            SecurityDecision::Suppressed
        );
    }

    #[test]
    fn test_mechanisms_in_fixed_order() {
        let flags = MechanismFlags {
            identity_provider_enabled: true,
            identity_provider_resolved: true,
            api_key: true,
        };
        let decision = decide_security("/v1/orders", flags, &exclusions());
        assert_eq!(
            decision,
            SecurityDecision::Attach(vec![Mechanism::IdentityProvider, Mechanism::ApiKey])
        );

        let requirements = decision.into_requirements().unwrap();
        let names: Vec<&str> = requirements
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();
        assert_eq!(names, vec!["cognito-auth", "api_key"]);
    }

    #[test]
    fn test_unresolved_provider_attaches_empty_list() {
        let flags = MechanismFlags {
            identity_provider_enabled: true,
            identity_provider_resolved: false,
            api_key: false,
        };
        let requirements = decide_security("/v1/orders", flags, &exclusions())
            .into_requirements()
            .unwrap();
        assert!(requirements.is_empty());
    }
}

//! VPC-link HTTP proxy target for backend microservices

use indexmap::IndexMap;

use super::{GatewayTarget, TargetKind, PREFLIGHT_METHOD};
use crate::document::{IntegrationDescriptor, IntegrationType, MethodDescriptor, SecurityScheme};
use crate::profile::{CommonProfile, MicroserviceProfile};
use crate::projection::{decide_security, project_parameters, select_timeout, Mechanism};
use crate::source::OperationSpec;

const VPC_LINK: &str = "VPC_LINK";

/// Proxies every documented operation to `<basePath><path>` over a VPC link
pub struct MicroserviceTarget {
    profile: MicroserviceProfile,
}

impl MicroserviceTarget {
    pub fn new(profile: MicroserviceProfile) -> Self {
        Self { profile }
    }

    fn proxy_integration(&self, path: &str, http_method: &str) -> IntegrationDescriptor {
        let mut integration = IntegrationDescriptor::new(IntegrationType::HttpProxy);
        integration.connection_id = Some(self.profile.connection_id.clone());
        integration.connection_type = Some(VPC_LINK.to_string());
        integration.http_method = Some(http_method.to_string());
        integration.uri = Some(format!("{}{}", self.profile.base_path, path));
        integration
    }
}

impl GatewayTarget for MicroserviceTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Microservice
    }

    fn profile(&self) -> &CommonProfile {
        &self.profile.common
    }

    fn admits_path(&self, _path: &str) -> bool {
        true
    }

    fn admits_method(&self, method: &str) -> bool {
        method != PREFLIGHT_METHOD
    }

    fn security_definitions(&self) -> IndexMap<String, SecurityScheme> {
        let mut definitions = IndexMap::new();
        for mechanism in self.profile.mechanism_flags().active() {
            let scheme = match mechanism {
                Mechanism::IdentityProvider => {
                    SecurityScheme::user_pool(&self.profile.identity_provider.arn)
                }
                Mechanism::ApiKey => SecurityScheme::api_key(),
            };
            definitions.insert(mechanism.scheme_name().to_string(), scheme);
        }
        definitions
    }

    fn method_descriptor(
        &self,
        path: &str,
        method: &str,
        operation_id: &str,
        operation: &OperationSpec,
    ) -> MethodDescriptor {
        let common = &self.profile.common;

        let mut integration = self.proxy_integration(path, &method.to_uppercase());
        integration.request_parameters = Some(project_parameters(&operation.parameters));
        integration.timeout_in_millis = Some(select_timeout(
            path,
            &common.exclusions,
            common.timeouts,
        ));

        let mut descriptor =
            MethodDescriptor::operation(operation_id, &operation.parameters, integration);
        descriptor.security = decide_security(
            path,
            self.profile.mechanism_flags(),
            &common.exclusions,
        )
        .into_requirements();
        descriptor
    }

    fn preflight_descriptor(&self, path: &str) -> MethodDescriptor {
        let mut integration = self.proxy_integration(path, "OPTIONS");
        integration.request_parameters = Some(IndexMap::new());
        MethodDescriptor::preflight(integration)
    }
}

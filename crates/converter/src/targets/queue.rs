//! Message-queue (SQS) integration target

use indexmap::IndexMap;

use super::{GatewayTarget, TargetKind};
use crate::document::{
    default_response, IntegrationDescriptor, IntegrationType, MethodDescriptor,
    CORS_ALLOW_HEADERS,
};
use crate::profile::{CommonProfile, QueueProfile};
use crate::projection::select_timeout;
use crate::source::OperationSpec;

/// The only path routed to the queue
pub const QUEUE_EVENT_PATH: &str = "/v1/case/event";

/// The only method routed to the queue
pub const QUEUE_METHOD: &str = "post";

/// Projects the case-event endpoint onto an SQS `SendMessage` integration
pub struct QueueTarget {
    profile: QueueProfile,
}

impl QueueTarget {
    pub fn new(profile: QueueProfile) -> Self {
        Self { profile }
    }

    /// `arn:aws:apigateway:<region>:sqs:path/<account>/<queue>`
    pub fn queue_uri(&self) -> String {
        format!(
            "arn:aws:apigateway:{}:sqs:path/{}/{}",
            self.profile.region, self.profile.account_id, self.profile.queue_name
        )
    }
}

impl GatewayTarget for QueueTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Queue
    }

    fn profile(&self) -> &CommonProfile {
        &self.profile.common
    }

    fn admits_path(&self, path: &str) -> bool {
        path == QUEUE_EVENT_PATH
    }

    fn admits_method(&self, method: &str) -> bool {
        method == QUEUE_METHOD
    }

    fn method_descriptor(
        &self,
        path: &str,
        _method: &str,
        operation_id: &str,
        operation: &OperationSpec,
    ) -> MethodDescriptor {
        let common = &self.profile.common;

        let mut request_parameters = IndexMap::new();
        request_parameters.insert(
            "integration.request.header.Content-Type".to_string(),
            "'application/x-www-form-urlencoded'".to_string(),
        );

        let mut request_templates = IndexMap::new();
        request_templates.insert(
            "application/json".to_string(),
            "Action=SendMessage&MessageBody=$input.body".to_string(),
        );

        let mut integration = IntegrationDescriptor::new(IntegrationType::Aws);
        integration.http_method = Some("POST".to_string());
        integration.uri = Some(self.queue_uri());
        integration.credentials = Some(self.profile.iam_role.clone());
        integration.request_parameters = Some(request_parameters);
        integration.request_templates = Some(request_templates);
        integration.timeout_in_millis = Some(select_timeout(
            path,
            &common.exclusions,
            common.timeouts,
        ));

        MethodDescriptor::operation(operation_id, &operation.parameters, integration)
    }

    fn preflight_descriptor(&self, _path: &str) -> MethodDescriptor {
        let mut request_templates = IndexMap::new();
        request_templates.insert(
            "application/json".to_string(),
            "{\"statusCode\": 200}".to_string(),
        );

        let mut response_parameters = IndexMap::new();
        response_parameters.insert(
            "method.response.header.Access-Control-Allow-Methods".to_string(),
            "'POST,OPTIONS'".to_string(),
        );
        response_parameters.insert(
            "method.response.header.Access-Control-Allow-Origin".to_string(),
            "'*'".to_string(),
        );
        response_parameters.insert(
            "method.response.header.Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        );

        let mut integration = IntegrationDescriptor::new(IntegrationType::Mock);
        integration.request_templates = Some(request_templates);
        integration.responses = default_response(Some(response_parameters));

        MethodDescriptor::preflight(integration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{RawLimits, RawQueueProfile};

    fn target() -> QueueTarget {
        let raw = RawQueueProfile {
            sqs_queue_name: Some("dev-case-queue".to_string()),
            aws_account_id: Some("123456789012".to_string()),
            sqs_iam_role: Some("arn:aws:iam::123456789012:role/dev-apigw-sqs-role".to_string()),
            aws_region: Some("us-east-1".to_string()),
            api_title: Some("dev-sqs-apigw".to_string()),
            description: Some("dev".to_string()),
            host: None,
            limits: RawLimits::default(),
        };
        QueueTarget::new(raw.validate("DEV").unwrap())
    }

    #[test]
    fn test_filters() {
        let target = target();
        assert!(target.admits_path("/v1/case/event"));
        assert!(!target.admits_path("/v1/case/event/"));
        assert!(target.admits_method("post"));
        assert!(!target.admits_method("get"));
    }

    #[test]
    fn test_method_descriptor() {
        let target = target();
        let method = target.method_descriptor(
            QUEUE_EVENT_PATH,
            "post",
            "submitCase",
            &OperationSpec::default(),
        );
        let value = serde_json::to_value(&method).unwrap();
        let integration = &value["x-amazon-apigateway-integration"];

        assert_eq!(value["operationId"], "submitCase");
        assert_eq!(integration["type"], "aws");
        assert_eq!(
            integration["uri"],
            "arn:aws:apigateway:us-east-1:sqs:path/123456789012/dev-case-queue"
        );
        assert_eq!(
            integration["credentials"],
            "arn:aws:iam::123456789012:role/dev-apigw-sqs-role"
        );
        assert_eq!(integration["timeoutInMillis"], 60_000);
        assert!(value.get("security").is_none());
    }

    #[test]
    fn test_preflight_is_mock() {
        let value = serde_json::to_value(target().preflight_descriptor(QUEUE_EVENT_PATH)).unwrap();
        let integration = &value["x-amazon-apigateway-integration"];

        assert_eq!(integration["type"], "mock");
        assert!(integration.get("timeoutInMillis").is_none());
        assert_eq!(
            integration["responses"]["default"]["responseParameters"]
                ["method.response.header.Access-Control-Allow-Methods"],
            "'POST,OPTIONS'"
        );
    }
}

//! Target API Gateway document model

use indexmap::IndexMap;
use serde::Serialize;

use crate::profile::CommonProfile;
use crate::source::ParameterSpec;

/// Headers every CORS response allows
pub const CORS_ALLOW_HEADERS: &str =
    "'Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token'";

/// Methods advertised on gateway-generated error responses
pub const CORS_GATEWAY_METHODS: &str = "'GET,POST,DELETE,PATCH,OPTIONS'";

/// Integration request parameter → method request parameter
pub type ForwardingRules = IndexMap<String, String>;

/// A single security requirement, e.g. `{"cognito-auth": []}`
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Methods emitted for one path, keyed by lower-case HTTP method
pub type PathMethods = IndexMap<String, MethodDescriptor>;

/// Swagger 2.0 document with API Gateway extensions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDocument {
    pub swagger: String,

    pub info: Info,

    pub host: String,

    pub schemes: Vec<String>,

    pub paths: IndexMap<String, PathMethods>,

    #[serde(rename = "securityDefinitions")]
    pub security_definitions: IndexMap<String, SecurityScheme>,

    #[serde(rename = "x-amazon-apigateway-gateway-responses")]
    pub gateway_responses: IndexMap<String, GatewayResponse>,
}

impl TargetDocument {
    /// Create the document skeleton for a profile
    pub fn new(profile: &CommonProfile, security_definitions: IndexMap<String, SecurityScheme>) -> Self {
        let mut gateway_responses = IndexMap::new();
        gateway_responses.insert("DEFAULT_4XX".to_string(), GatewayResponse::cors());
        gateway_responses.insert("DEFAULT_5XX".to_string(), GatewayResponse::cors());

        Self {
            swagger: "2.0".to_string(),
            info: Info {
                description: profile.description.clone(),
                version: "v0".to_string(),
                title: profile.api_title.clone(),
            },
            host: profile.host.clone(),
            schemes: vec!["https".to_string()],
            paths: IndexMap::new(),
            security_definitions,
            gateway_responses,
        }
    }

    pub fn method(&self, path: &str, method: &str) -> Option<&MethodDescriptor> {
        self.paths.get(path).and_then(|methods| methods.get(method))
    }
}

/// Document information block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub description: String,
    pub version: String,
    pub title: String,
}

/// Emitted method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescriptor {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    pub responses: IndexMap<String, MethodResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterSpec>>,

    #[serde(rename = "x-amazon-apigateway-integration")]
    pub integration: IntegrationDescriptor,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl MethodDescriptor {
    /// A routed operation answering `200` with a CORS origin header
    pub fn operation(
        operation_id: &str,
        parameters: &[ParameterSpec],
        integration: IntegrationDescriptor,
    ) -> Self {
        let mut headers = IndexMap::new();
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            HeaderSpec {
                header_type: "string".to_string(),
            },
        );

        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            MethodResponse {
                description: "200 response".to_string(),
                headers,
            },
        );

        Self {
            operation_id: Some(operation_id.to_string()),
            responses,
            parameters: Some(parameters.to_vec()),
            integration,
            security: None,
        }
    }

    /// A preflight method: no responses, no parameters, no security
    pub fn preflight(integration: IntegrationDescriptor) -> Self {
        Self {
            operation_id: None,
            responses: IndexMap::new(),
            parameters: None,
            integration,
            security: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodResponse {
    pub description: String,
    pub headers: IndexMap<String, HeaderSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSpec {
    #[serde(rename = "type")]
    pub header_type: String,
}

/// Integration type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    /// AWS service integration
    Aws,

    /// HTTP proxy integration
    HttpProxy,

    /// Gateway-local mock
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughBehavior {
    WhenNoMatch,
}

/// How a method's traffic reaches the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationDescriptor {
    #[serde(rename = "connectionId", skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    #[serde(rename = "connectionType", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,

    #[serde(rename = "type")]
    pub integration_type: IntegrationType,

    #[serde(rename = "httpMethod", skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    #[serde(rename = "requestParameters", skip_serializing_if = "Option::is_none")]
    pub request_parameters: Option<ForwardingRules>,

    #[serde(rename = "requestTemplates", skip_serializing_if = "Option::is_none")]
    pub request_templates: Option<IndexMap<String, String>>,

    pub responses: IndexMap<String, IntegrationResponse>,

    #[serde(rename = "passthroughBehavior")]
    pub passthrough_behavior: PassthroughBehavior,

    #[serde(rename = "timeoutInMillis", skip_serializing_if = "Option::is_none")]
    pub timeout_in_millis: Option<u64>,
}

impl IntegrationDescriptor {
    /// Descriptor with a `200` default response and nothing else set
    pub fn new(integration_type: IntegrationType) -> Self {
        Self {
            connection_id: None,
            connection_type: None,
            integration_type,
            http_method: None,
            uri: None,
            credentials: None,
            request_parameters: None,
            request_templates: None,
            responses: default_response(None),
            passthrough_behavior: PassthroughBehavior::WhenNoMatch,
            timeout_in_millis: None,
        }
    }
}

/// `{"default": {"statusCode": "200", ...}}`
pub fn default_response(
    response_parameters: Option<IndexMap<String, String>>,
) -> IndexMap<String, IntegrationResponse> {
    let mut responses = IndexMap::new();
    responses.insert(
        "default".to_string(),
        IntegrationResponse {
            status_code: "200".to_string(),
            response_parameters,
        },
    );
    responses
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: String,

    #[serde(rename = "responseParameters", skip_serializing_if = "Option::is_none")]
    pub response_parameters: Option<IndexMap<String, String>>,
}

/// Entry under `securityDefinitions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(rename = "x-amazon-apigateway-authtype", skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    #[serde(rename = "x-amazon-apigateway-authorizer", skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<AuthorizerSpec>,
}

impl SecurityScheme {
    /// Cognito user-pool authorizer on the `Authorization` header
    pub fn user_pool(provider_arn: &str) -> Self {
        Self {
            scheme_type: "apiKey".to_string(),
            name: "Authorization".to_string(),
            location: "header".to_string(),
            auth_type: Some("cognito_user_pools".to_string()),
            authorizer: Some(AuthorizerSpec {
                authorizer_type: "cognito_user_pools".to_string(),
                provider_arns: vec![provider_arn.to_string()],
            }),
        }
    }

    /// Static API key on the `x-api-key` header
    pub fn api_key() -> Self {
        Self {
            scheme_type: "apiKey".to_string(),
            name: "x-api-key".to_string(),
            location: "header".to_string(),
            auth_type: None,
            authorizer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizerSpec {
    #[serde(rename = "type")]
    pub authorizer_type: String,

    #[serde(rename = "providerARNs")]
    pub provider_arns: Vec<String>,
}

/// Gateway-generated response override
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayResponse {
    #[serde(rename = "responseParameters")]
    pub response_parameters: IndexMap<String, String>,

    #[serde(rename = "responseTemplates")]
    pub response_templates: IndexMap<String, String>,
}

impl GatewayResponse {
    /// Error response carrying CORS headers and the gateway's error message
    pub fn cors() -> Self {
        let mut response_parameters = IndexMap::new();
        response_parameters.insert(
            "gatewayresponse.header.Access-Control-Allow-Methods".to_string(),
            CORS_GATEWAY_METHODS.to_string(),
        );
        response_parameters.insert(
            "gatewayresponse.header.Access-Control-Allow-Origin".to_string(),
            "'*'".to_string(),
        );
        response_parameters.insert(
            "gatewayresponse.header.Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        );

        let mut response_templates = IndexMap::new();
        response_templates.insert(
            "application/json".to_string(),
            "{\"message\":$context.error.messageString}".to_string(),
        );

        Self {
            response_parameters,
            response_templates,
        }
    }
}

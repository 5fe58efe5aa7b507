use apigw_converter::{OutputFormat, TargetKind};
use apigw_gen::{ApiGatewayGen, Config, ConvertOptions};
use rstest::rstest;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOURCE: &str = r#"{
  "swagger": "2.0",
  "paths": {
    "/v1/case/event": {
      "post": {
        "operationId": "submitCase",
        "parameters": [
          {"name": "body", "in": "body", "required": true, "schema": {"type": "object"}}
        ]
      },
      "get": {"operationId": "listCaseEvents"}
    },
    "/v1/orders/{orderId}": {
      "parameters": [{"name": "orderId", "in": "path", "required": true, "type": "string"}],
      "get": {
        "operationId": "getOrder",
        "parameters": [
          {"name": "orderId", "in": "path", "required": true, "type": "string"},
          {"name": "expand", "in": "query", "type": "string"},
          {"name": "X-Request-Id", "in": "header", "type": "string"}
        ]
      },
      "delete": {"summary": "no operation id"}
    },
    "/public/healthcheck": {
      "get": {"operationId": "healthcheck"}
    }
  }
}"#;

struct Workspace {
    dir: TempDir,
    app: ApiGatewayGen,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("swagger.json"), SOURCE).unwrap();
        Self {
            dir,
            app: ApiGatewayGen::new(Config::builtin().unwrap()),
        }
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            source: Some(self.dir.path().join("swagger.json")),
            output_dir: Some(self.dir.path().join("out")),
            ..ConvertOptions::default()
        }
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_dev_queue_conversion() {
    let ws = Workspace::new();
    let outcome = ws
        .app
        .convert(TargetKind::Queue, "DEV", &ws.options())
        .await
        .unwrap();

    assert_eq!(
        outcome.artifact,
        ws.out().join("swagger-converted-sqs-DEV.json")
    );
    assert!(outcome.written);

    let document = read_json(&outcome.artifact);
    let paths = document["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);

    let methods: Vec<&String> = paths["/v1/case/event"].as_object().unwrap().keys().collect();
    assert_eq!(methods, vec!["post", "options"]);

    let post = &paths["/v1/case/event"]["post"];
    assert_eq!(post["operationId"], "submitCase");
    assert_eq!(
        post["x-amazon-apigateway-integration"]["uri"],
        "arn:aws:apigateway:us-east-1:sqs:path/123456789012/dev-case-queue"
    );
    assert_eq!(post["x-amazon-apigateway-integration"]["timeoutInMillis"], 60000);
    assert_eq!(post["parameters"][0]["schema"], json!({"type": "object"}));
    assert_eq!(document["securityDefinitions"], json!({}));
    assert_eq!(document["info"]["title"], "dev-sqs-apigw");
}

#[tokio::test]
async fn test_prod_microservice_conversion() {
    let ws = Workspace::new();
    let outcome = ws
        .app
        .convert(TargetKind::Microservice, "PROD", &ws.options())
        .await
        .unwrap();

    let document = read_json(&outcome.artifact);
    let paths = &document["paths"];

    let health = &paths["/public/healthcheck"]["get"];
    assert!(health.get("security").is_none());
    assert_eq!(health["x-amazon-apigateway-integration"]["timeoutInMillis"], 29000);

    let order = &paths["/v1/orders/{orderId}"]["get"];
    assert_eq!(order["security"], json!([{"cognito-auth": []}]));
    assert_eq!(order["x-amazon-apigateway-integration"]["timeoutInMillis"], 60000);
    assert_eq!(
        order["x-amazon-apigateway-integration"]["requestParameters"],
        json!({
            "integration.request.path.orderId": "method.request.path.orderId",
            "integration.request.querystring.expand": "method.request.querystring.expand"
        })
    );

    // The method without an operationId is skipped, its siblings are kept
    let order_methods: Vec<&String> = paths["/v1/orders/{orderId}"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(order_methods, vec!["get", "options"]);
    assert_eq!(outcome.report.methods_skipped, 1);

    let definitions: Vec<&String> = document["securityDefinitions"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(definitions, vec!["cognito-auth"]);
}

#[tokio::test]
async fn test_dev_microservice_attaches_api_key() {
    let ws = Workspace::new();
    let outcome = ws
        .app
        .convert(TargetKind::Microservice, "DEV", &ws.options())
        .await
        .unwrap();

    let document = read_json(&outcome.artifact);
    assert_eq!(
        document["paths"]["/v1/case/event"]["get"]["security"],
        json!([{"cognito-auth": []}, {"api_key": []}])
    );
    assert_eq!(document["securityDefinitions"]["api_key"]["name"], "x-api-key");
}

#[tokio::test]
async fn test_placeholder_profile_keeps_templates() {
    let ws = Workspace::new();
    let outcome = ws
        .app
        .convert(TargetKind::Microservice, "TF_VAR", &ws.options())
        .await
        .unwrap();

    let document = read_json(&outcome.artifact);
    let order = &document["paths"]["/v1/orders/{orderId}"]["get"];

    assert_eq!(document["host"], "${api_custom_domain}");
    assert_eq!(
        order["x-amazon-apigateway-integration"]["uri"],
        "http://${nlb_uri}:8087/v1/orders/{orderId}"
    );
    assert_eq!(order["security"], json!([]));
    assert_eq!(document["securityDefinitions"], json!({}));
}

#[rstest]
#[case("DEV")]
#[case("UAT")]
#[case("TF_VAR")]
#[tokio::test]
async fn test_every_queue_profile_converts(#[case] profile: &str) {
    let ws = Workspace::new();
    let outcome = ws
        .app
        .convert(TargetKind::Queue, profile, &ws.options())
        .await
        .unwrap();

    assert_eq!(
        outcome.artifact.file_name().unwrap().to_string_lossy(),
        format!("swagger-converted-sqs-{profile}.json")
    );
    assert_eq!(outcome.report.paths_emitted, 1);
}

#[tokio::test]
async fn test_unknown_profile_writes_nothing() {
    let ws = Workspace::new();
    let error = ws
        .app
        .convert(TargetKind::Queue, "PROD", &ws.options())
        .await
        .unwrap_err();

    assert!(error.to_string().contains("Environment PROD not found"));
    assert!(!ws.out().exists());
}

#[tokio::test]
async fn test_output_is_deterministic() {
    let ws = Workspace::new();
    let first = ws
        .app
        .convert(TargetKind::Microservice, "UAT", &ws.options())
        .await
        .unwrap();
    let first_bytes = std::fs::read(&first.artifact).unwrap();

    let second = ws
        .app
        .convert(TargetKind::Microservice, "UAT", &ws.options())
        .await
        .unwrap();

    assert_eq!(first.digest, second.digest);
    assert_eq!(first_bytes, std::fs::read(&second.artifact).unwrap());
}

#[tokio::test]
async fn test_check_mode_detects_drift() {
    let ws = Workspace::new();
    let check = ConvertOptions {
        check: true,
        ..ws.options()
    };

    // Nothing to compare against yet
    assert!(ws
        .app
        .convert(TargetKind::Queue, "DEV", &check)
        .await
        .is_err());

    let written = ws
        .app
        .convert(TargetKind::Queue, "DEV", &ws.options())
        .await
        .unwrap();
    let checked = ws.app.convert(TargetKind::Queue, "DEV", &check).await.unwrap();
    assert!(!checked.written);
    assert_eq!(checked.digest, written.digest);

    std::fs::write(&written.artifact, "{}").unwrap();
    let error = ws
        .app
        .convert(TargetKind::Queue, "DEV", &check)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("is out of date"));
}

#[tokio::test]
async fn test_yaml_output() {
    let ws = Workspace::new();
    let options = ConvertOptions {
        format: Some(OutputFormat::Yaml),
        ..ws.options()
    };
    let outcome = ws
        .app
        .convert(TargetKind::Queue, "DEV", &options)
        .await
        .unwrap();

    assert_eq!(
        outcome.artifact,
        ws.out().join("swagger-converted-sqs-DEV.yaml")
    );
    let document: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&outcome.artifact).unwrap()).unwrap();
    assert_eq!(document["swagger"], serde_yaml::Value::from("2.0"));
}

#[tokio::test]
async fn test_missing_source_document() {
    let ws = Workspace::new();
    let options = ConvertOptions {
        source: Some(ws.dir.path().join("missing.json")),
        ..ws.options()
    };

    let error = ws
        .app
        .convert(TargetKind::Queue, "DEV", &options)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("missing.json"));
}

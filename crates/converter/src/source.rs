//! Source OpenAPI document model and parser

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};

/// Path-item keys that name an operation
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Where a parameter is carried on the incoming request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    /// Header, body, formData or anything else
    Other,
}

/// Operation parameter
///
/// The parameter object is kept verbatim, key order included, so it can be
/// passed through to the emitted method unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpec(IndexMap<String, serde_json::Value>);

impl ParameterSpec {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), serde_json::Value::String(name.into()));
        fields.insert("in".to_string(), serde_json::Value::String(location.into()));
        Self(fields)
    }

    fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(|v| v.as_str()).unwrap_or_default()
    }

    /// Parameter name, empty when absent
    pub fn name(&self) -> &str {
        self.text("name")
    }

    /// Classify the declared location
    pub fn location(&self) -> ParameterLocation {
        match self.text("in") {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            _ => ParameterLocation::Other,
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// API operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OperationSpec {
    /// Operation ID
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    /// Operation parameters
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl OperationSpec {
    /// The operation identifier, if present and non-empty
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Operations declared on a single path, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    operations: IndexMap<String, OperationSpec>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationSpec)> {
        self.operations.iter().map(|(method, op)| (method.as_str(), op))
    }

    pub fn operation(&self, method: &str) -> Option<&OperationSpec> {
        self.operations.get(method)
    }
}

/// Parsed source document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    origin: String,
    paths: IndexMap<String, PathItem>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    paths: Option<IndexMap<String, IndexMap<String, serde_json::Value>>>,
}

impl SourceDocument {
    /// Load and parse a source document from disk
    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse source document content, JSON first and YAML second
    pub fn parse(content: &str, origin: &str) -> ConvertResult<Self> {
        let raw = match serde_json::from_str::<RawDocument>(content) {
            Ok(raw) => raw,
            Err(json_error) => serde_yaml::from_str::<RawDocument>(content).map_err(
                |yaml_error| ConvertError::SourceParse {
                    origin: origin.to_string(),
                    message: format!("JSON error: {json_error}, YAML error: {yaml_error}"),
                },
            )?,
        };

        let mut paths = IndexMap::new();
        for (path, item) in raw.paths.unwrap_or_default() {
            let mut operations = IndexMap::new();
            for (key, value) in item {
                if !HTTP_METHODS.contains(&key.as_str()) {
                    debug!("Ignoring non-operation key {} on path {}", key, path);
                    continue;
                }

                let operation: OperationSpec =
                    serde_json::from_value(value).map_err(|e| ConvertError::SourceParse {
                        origin: origin.to_string(),
                        message: format!("{key} {path}: {e}"),
                    })?;
                operations.insert(key, operation);
            }
            paths.insert(path, PathItem { operations });
        }

        Ok(Self {
            origin: origin.to_string(),
            paths,
        })
    }

    /// Where the document was loaded from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.paths.iter().map(|(path, item)| (path.as_str(), item))
    }

    pub fn path(&self, path: &str) -> Option<&PathItem> {
        self.paths.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Fail unless at least one path is defined
    pub fn ensure_paths(&self) -> ConvertResult<()> {
        if self.is_empty() {
            return Err(ConvertError::EmptySource(self.origin.clone()));
        }
        Ok(())
    }
}

//! Rendering and writing converted documents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::document::TargetDocument;
use crate::error::{ConvertError, ConvertResult};
use crate::targets::TargetKind;

/// Artifact format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Json,

    /// YAML
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!("Unsupported output format: {other}")),
        }
    }
}

/// `<prefix>-<profile>.<ext>`
pub fn artifact_name(kind: TargetKind, profile: &str, format: OutputFormat) -> String {
    format!(
        "{}-{}.{}",
        kind.artifact_prefix(),
        profile,
        format.extension()
    )
}

/// Render a document in the given format
pub fn render(document: &TargetDocument, format: OutputFormat) -> ConvertResult<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(document).map_err(|e| ConvertError::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(document).map_err(|e| ConvertError::Render(e.to_string()))
        }
    }
}

/// Writes rendered artifacts into an output directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    directory: PathBuf,
    format: OutputFormat,
}

impl ArtifactWriter {
    pub fn new(directory: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// Destination path for a profile's artifact
    pub fn path_for(&self, kind: TargetKind, profile: &str) -> PathBuf {
        self.directory.join(artifact_name(kind, profile, self.format))
    }

    pub fn render(&self, document: &TargetDocument) -> ConvertResult<String> {
        render(document, self.format)
    }

    /// Write the artifact, replacing any existing file of the same name
    pub fn write(&self, path: &Path, content: &str) -> ConvertResult<()> {
        std::fs::create_dir_all(&self.directory)?;

        // Readers only ever see the old file or the complete new one.
        let mut staged = tempfile::NamedTempFile::new_in(&self.directory)?;
        staged.write_all(content.as_bytes())?;
        staged.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))?;
        }

        staged.persist(path).map_err(|e| ConvertError::Io(e.error))?;
        debug!("Wrote {} bytes to {:?}", content.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CommonProfile;
    use crate::projection::{ExclusionSet, TimeoutPolicy};

    fn document() -> TargetDocument {
        let profile = CommonProfile {
            name: "DEV".to_string(),
            api_title: "dev-apigw".to_string(),
            description: "dev".to_string(),
            host: String::new(),
            timeouts: TimeoutPolicy::default(),
            exclusions: ExclusionSet::default(),
        };
        TargetDocument::new(&profile, Default::default())
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(
            artifact_name(TargetKind::Queue, "DEV", OutputFormat::Json),
            "swagger-converted-sqs-DEV.json"
        );
        assert_eq!(
            artifact_name(TargetKind::Microservice, "PROD", OutputFormat::Yaml),
            "swagger-converted-PROD.yaml"
        );
    }

    #[test]
    fn test_render_json_field_order() {
        let json = render(&document(), OutputFormat::Json).unwrap();
        let keys: Vec<&str> = json
            .lines()
            .filter(|line| line.starts_with("  \""))
            .map(|line| line.trim().split('"').nth(1).unwrap())
            .collect();

        assert_eq!(
            keys,
            vec![
                "swagger",
                "info",
                "host",
                "schemes",
                "paths",
                "securityDefinitions",
                "x-amazon-apigateway-gateway-responses"
            ]
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path(), OutputFormat::Json);
        let path = writer.path_for(TargetKind::Queue, "DEV");

        std::fs::write(&path, "stale").unwrap();
        let content = writer.render(&document()).unwrap();
        writer.write(&path, &content).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_write_onto_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path(), OutputFormat::Json);
        let path = writer.path_for(TargetKind::Queue, "DEV");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            writer.write(&path, "{}"),
            Err(ConvertError::Io(_))
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn test_write_into_file_as_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, "not a directory").unwrap();
        let writer = ArtifactWriter::new(&blocker, OutputFormat::Json);
        let path = writer.path_for(TargetKind::Queue, "DEV");

        assert!(matches!(
            writer.write(&path, "{}"),
            Err(ConvertError::Io(_))
        ));
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("gateway");
        let writer = ArtifactWriter::new(&nested, OutputFormat::Yaml);
        let path = writer.path_for(TargetKind::Microservice, "UAT");

        writer.write(&path, "swagger: '2.0'\n").unwrap();
        assert!(path.exists());
    }
}

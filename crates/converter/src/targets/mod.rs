//! Gateway integration targets

use indexmap::IndexMap;
use std::fmt;

use crate::document::{MethodDescriptor, SecurityScheme};
use crate::profile::CommonProfile;
use crate::source::OperationSpec;

pub mod microservice;
pub mod queue;

pub use microservice::MicroserviceTarget;
pub use queue::QueueTarget;

/// Method name of the synthetic CORS preflight
pub const PREFLIGHT_METHOD: &str = "options";

/// Integration target kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Message-queue (SQS) integration
    Queue,

    /// VPC-link HTTP proxy to backend microservices
    Microservice,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Queue => "queue",
            TargetKind::Microservice => "microservice",
        }
    }

    /// Human-readable name used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Queue => "SQS",
            TargetKind::Microservice => "microservice",
        }
    }

    /// File name prefix of the emitted artifact
    pub fn artifact_prefix(&self) -> &'static str {
        match self {
            TargetKind::Queue => "swagger-converted-sqs",
            TargetKind::Microservice => "swagger-converted",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gateway integration the converter can project a source document onto
pub trait GatewayTarget {
    fn kind(&self) -> TargetKind;

    /// Profile settings shared by every target
    fn profile(&self) -> &CommonProfile;

    /// Path filter
    fn admits_path(&self, path: &str) -> bool;

    /// Method filter, applied before the operation identifier check
    fn admits_method(&self, method: &str) -> bool;

    /// Entries for the document's `securityDefinitions`
    fn security_definitions(&self) -> IndexMap<String, SecurityScheme> {
        IndexMap::new()
    }

    /// Descriptor for a real method with a known operation identifier
    fn method_descriptor(
        &self,
        path: &str,
        method: &str,
        operation_id: &str,
        operation: &OperationSpec,
    ) -> MethodDescriptor;

    /// Synthetic preflight descriptor appended to every emitted path
    fn preflight_descriptor(&self, path: &str) -> MethodDescriptor;
}

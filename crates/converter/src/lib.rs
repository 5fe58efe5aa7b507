//! Conversion of OpenAPI documents into API Gateway documents

pub mod converter;
pub mod document;
pub mod error;
pub mod output;
pub mod profile;
pub mod projection;
pub mod source;
pub mod targets;

pub use converter::{Conversion, ConversionReport, SpecConverter};
pub use document::TargetDocument;
pub use error::{ConvertError, ConvertResult};
pub use output::{ArtifactWriter, OutputFormat};
pub use profile::{
    MicroserviceProfile, QueueProfile, RawMicroserviceProfile, RawQueueProfile,
};
pub use source::SourceDocument;
pub use targets::{GatewayTarget, MicroserviceTarget, QueueTarget, TargetKind};

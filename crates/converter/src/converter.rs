//! Source → target document conversion

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::document::TargetDocument;
use crate::error::{ConvertError, ConvertResult};
use crate::source::SourceDocument;
use crate::targets::{GatewayTarget, PREFLIGHT_METHOD};

/// Outcome of a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Paths written to the target document
    pub paths_emitted: usize,

    /// Real methods written, preflight stubs excluded
    pub methods_emitted: usize,

    /// Methods skipped for lack of an operation identifier
    pub methods_skipped: usize,

    /// Non-fatal diagnostics, one per skipped method
    pub warnings: Vec<String>,
}

/// Converted document together with its report
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: TargetDocument,
    pub report: ConversionReport,
}

/// Projects a source document onto a gateway target
pub struct SpecConverter<'a> {
    target: &'a dyn GatewayTarget,
}

impl<'a> SpecConverter<'a> {
    pub fn new(target: &'a dyn GatewayTarget) -> Self {
        Self { target }
    }

    /// Convert the source document
    ///
    /// Fails before producing anything when the source has no paths or the
    /// target admits none of them. Past that point individual methods are
    /// skipped with a warning rather than failing the run.
    pub fn convert(&self, source: &SourceDocument) -> ConvertResult<Conversion> {
        source.ensure_paths()?;

        let kind = self.target.kind();
        let admitted: Vec<_> = source
            .paths()
            .filter(|(path, _)| self.target.admits_path(path))
            .collect();

        if admitted.is_empty() {
            return Err(ConvertError::NoMatchingPaths {
                kind: kind.label().to_string(),
                origin: source.origin().to_string(),
            });
        }

        info!(
            "Converting {} of {} paths from {} for {} profile {}",
            admitted.len(),
            source.paths().count(),
            source.origin(),
            kind,
            self.target.profile().name
        );

        let mut document =
            TargetDocument::new(self.target.profile(), self.target.security_definitions());
        let mut report = ConversionReport::default();

        for (path, item) in admitted {
            let mut methods = IndexMap::new();

            for (method, operation) in item.operations() {
                if !self.target.admits_method(method) {
                    debug!("Method {} on path {} not routed by {} target", method, path, kind);
                    continue;
                }

                match operation.operation_id() {
                    Some(operation_id) => {
                        let descriptor =
                            self.target
                                .method_descriptor(path, method, operation_id, operation);
                        methods.insert(method.to_string(), descriptor);
                        report.methods_emitted += 1;
                    }
                    None => {
                        let warning =
                            format!("Skipping {method} for path {path}: missing operationId");
                        warn!("{}", warning);
                        report.warnings.push(warning);
                        report.methods_skipped += 1;
                    }
                }
            }

            methods.insert(
                PREFLIGHT_METHOD.to_string(),
                self.target.preflight_descriptor(path),
            );
            document.paths.insert(path.to_string(), methods);
            report.paths_emitted += 1;
        }

        Ok(Conversion { document, report })
    }
}

//! Pipeline driver: layout extraction → feature encoding → sequence labeling
//! → hierarchy building.
//!
//! Each run is single-threaded and synchronous; every stage fully consumes
//! its predecessor's output. Batch runs fan out over rayon with one
//! independent pipeline per document; the loaded model is the only shared
//! resource and is read-only after construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::features;
use crate::hierarchy;
use crate::labeler::{CrfModel, HeadingLabeler, HeuristicModel, SequenceModel};
use crate::model::{ExtractionStats, OutlineDocument};
use crate::parser::{ExtractOptions, LayoutExtractor, PdfParser};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// The extracted outline, ready for serialization
    pub document: OutlineDocument,
    /// Counters and warnings from the run
    pub stats: ExtractionStats,
}

/// The extraction pipeline.
///
/// Construct once, reuse across documents; cloning shares the loaded model.
#[derive(Clone, Default)]
pub struct Pipeline {
    options: ExtractOptions,
    labeler: HeadingLabeler,
}

impl Pipeline {
    /// Create a pipeline with no model configured.
    ///
    /// Running it fails with `Error::ModelNotLoaded` until a model is set via
    /// [`with_model`](Self::with_model), [`with_model_path`](Self::with_model_path)
    /// or [`heuristic`](Self::heuristic).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already-loaded sequence model.
    pub fn with_model(mut self, model: Arc<dyn SequenceModel>) -> Self {
        self.labeler = HeadingLabeler::with_model(model);
        self
    }

    /// Load a CRF artifact from disk and use it.
    pub fn with_model_path<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let model = CrfModel::load(path)?;
        Ok(self.with_model(Arc::new(model)))
    }

    /// Use the rule-based fallback labeler.
    pub fn heuristic(self) -> Self {
        log::info!("no model artifact configured, using heuristic labeling");
        self.with_model(Arc::new(HeuristicModel::new()))
    }

    /// Set layout extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract the outline of a PDF file.
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<ExtractOutcome> {
        let path = path.as_ref();
        let parser = PdfParser::open(path)?;
        self.run_parsed(&parser)
            .map_err(|e| e.with_path(path))
    }

    /// Extract the outline of a PDF given as bytes.
    pub fn run_bytes(&self, data: &[u8]) -> Result<ExtractOutcome> {
        let parser = PdfParser::from_bytes(data)?;
        self.run_parsed(&parser)
    }

    /// Run the staged pipeline over an opened document.
    fn run_parsed(&self, parser: &PdfParser) -> Result<ExtractOutcome> {
        let mut stats = ExtractionStats::new();

        // Stage 1: layout
        let extractor = LayoutExtractor::new(parser, self.options.clone());
        let layout = extractor.extract()?;

        stats.page_count = layout.page_count;
        stats.empty_page_count = layout.empty_pages.len() as u32;
        stats.line_count = layout.lines.len() as u32;
        for page in &layout.empty_pages {
            stats.warn(format!("page {} has no text layer", page));
        }

        if layout.is_empty() {
            return Err(Error::Extraction(format!(
                "none of {} pages produced any text",
                layout.page_count
            )));
        }

        // Stage 2: features
        let encoded = features::encode(&layout.lines);

        // Stage 3: labels
        let labels = self.labeler.label(&encoded)?;
        for label in &labels {
            stats.count_label(*label);
        }

        // Stage 4: hierarchy
        let labeled: Vec<_> = layout.lines.into_iter().zip(labels).collect();
        let built = hierarchy::build(&labeled);
        for warning in built.warnings {
            stats.warn(warning);
        }

        Ok(ExtractOutcome {
            document: built.tree.into_document(),
            stats,
        })
    }

    /// Extract outlines for many documents in parallel.
    ///
    /// Each document runs its own pipeline; results keep the input order.
    /// Per-document failures are returned in place, not propagated.
    pub fn run_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<ExtractOutcome>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.run(path)))
            .collect()
    }
}

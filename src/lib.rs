//! # pdfoutline
//!
//! Heading-hierarchy extraction from PDF documents.
//!
//! The library turns a PDF's layout primitives into a labeled heading tree:
//! text lines are extracted with their geometry, encoded into layout feature
//! vectors, labeled by a sequence model (a pre-trained linear-chain CRF, or a
//! rule-based fallback), and folded into a nested Title/H1–H4 outline emitted
//! as JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{Pipeline, render, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     // Extract with the trained model
//!     let pipeline = Pipeline::new().with_model_path("models/crf.json")?;
//!     let outcome = pipeline.run("document.pdf")?;
//!
//!     let json = render::to_json(&outcome.document, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout extraction**: ordered text lines with font and position data
//! - **Sequence labeling**: whole-sequence label assignment, not per-line
//! - **Explicit policies**: level skips and duplicate titles are preserved
//!   and surfaced as warnings, never silently repaired
//! - **Batch mode**: independent documents in parallel over a shared model

pub mod detect;
pub mod error;
pub mod features;
pub mod hierarchy;
pub mod labeler;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use features::{encode, FeatureVector, FEATURE_SCHEMA};
pub use labeler::{CrfArtifact, CrfModel, HeadingLabeler, HeuristicModel, SequenceModel};
pub use model::{
    BBox, ExtractionStats, HeadingLevel, HeadingNode, Label, OutlineDocument, OutlineTree,
    TextLine,
};
pub use parser::{ErrorMode, ExtractOptions, LayoutExtractor, PdfParser};
pub use pipeline::{ExtractOutcome, Pipeline};
pub use render::JsonFormat;

use std::path::Path;

/// Extract a document's outline with the rule-based labeler.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_file;
///
/// let doc = extract_file("document.pdf").unwrap();
/// println!("{:?}", doc.title);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    let outcome = Pipeline::new().heuristic().run(path)?;
    Ok(outcome.document)
}

/// Extract a document's outline with a trained CRF artifact.
///
/// The model is loaded for this call only; construct a [`Pipeline`] directly
/// to reuse one model across documents.
pub fn extract_file_with_model<P, M>(path: P, model_path: M) -> Result<OutlineDocument>
where
    P: AsRef<Path>,
    M: AsRef<Path>,
{
    let outcome = Pipeline::new().with_model_path(model_path)?.run(path)?;
    Ok(outcome.document)
}

/// Extract an outline from PDF bytes with the rule-based labeler.
pub fn extract_bytes(data: &[u8]) -> Result<OutlineDocument> {
    let outcome = Pipeline::new().heuristic().run_bytes(data)?;
    Ok(outcome.document)
}

/// Extract a file's outline and serialize it to JSON in one call.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{outline_json, JsonFormat};
///
/// let json = outline_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("outline.json", json).unwrap();
/// ```
pub fn outline_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_json(&doc, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_invalid_input() {
        let result = extract_bytes(b"not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_file_missing() {
        let result = extract_file("no-such-file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_feature_schema_is_stable() {
        // The artifact format depends on this ordering; changing it requires
        // retraining
        assert_eq!(FEATURE_SCHEMA[0], "relative_font_size");
        assert_eq!(FEATURE_SCHEMA.len(), 13);
    }
}

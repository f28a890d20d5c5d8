//! Sequence labeling: assigns one heading label per text line.
//!
//! The labeling algorithm sits behind the [`SequenceModel`] trait so the
//! pipeline stays agnostic to the concrete model. The shipped implementations
//! are a linear-chain CRF decoded from a trained weight artifact and a
//! rule-based fallback for running without one.

mod crf;
mod heuristic;

pub use crf::{CrfArtifact, CrfModel};
pub use heuristic::HeuristicModel;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::model::Label;

/// A sequence-labeling model: one label per position, conditioned on the
/// whole sequence.
///
/// Implementations are immutable after construction and shareable across
/// worker threads.
pub trait SequenceModel: Send + Sync {
    /// Short model name for logging.
    fn name(&self) -> &str;

    /// Predict a label for every feature vector in the sequence.
    fn predict(&self, sequence: &[FeatureVector]) -> Result<Vec<Label>>;
}

/// The labeling stage: wraps an optional loaded model.
///
/// The model is loaded once and reused across documents; labeling without one
/// is a setup error.
#[derive(Clone, Default)]
pub struct HeadingLabeler {
    model: Option<Arc<dyn SequenceModel>>,
}

impl HeadingLabeler {
    /// Create a labeler with no model configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a labeler around a loaded model.
    pub fn with_model(model: Arc<dyn SequenceModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Whether a model is configured.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Label a feature sequence.
    ///
    /// # Errors
    ///
    /// `Error::ModelNotLoaded` if no model is configured, plus whatever the
    /// model itself reports (e.g. a schema mismatch).
    pub fn label(&self, sequence: &[FeatureVector]) -> Result<Vec<Label>> {
        let model = self.model.as_ref().ok_or(Error::ModelNotLoaded)?;
        let labels = model.predict(sequence)?;

        if labels.len() != sequence.len() {
            return Err(Error::ModelLoad(format!(
                "model '{}' returned {} labels for {} positions",
                model.name(),
                labels.len(),
                sequence.len()
            )));
        }

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantModel(Label);

    impl SequenceModel for ConstantModel {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict(&self, sequence: &[FeatureVector]) -> Result<Vec<Label>> {
            Ok(vec![self.0; sequence.len()])
        }
    }

    #[test]
    fn test_unloaded_labeler_errors() {
        let labeler = HeadingLabeler::new();
        let result = labeler.label(&[]);
        assert!(matches!(result, Err(Error::ModelNotLoaded)));
    }

    #[test]
    fn test_loaded_labeler_delegates() {
        let labeler = HeadingLabeler::with_model(Arc::new(ConstantModel(Label::Body)));
        let labels = labeler.label(&[]).unwrap();
        assert!(labels.is_empty());
    }

    struct BrokenModel;

    impl SequenceModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict(&self, _sequence: &[FeatureVector]) -> Result<Vec<Label>> {
            Ok(vec![Label::Body])
        }
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let labeler = HeadingLabeler::with_model(Arc::new(BrokenModel));
        let result = labeler.label(&[]);
        assert!(matches!(result, Err(Error::ModelLoad(_))));
    }
}

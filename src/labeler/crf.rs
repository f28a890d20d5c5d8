//! Linear-chain CRF inference over a trained weight artifact.
//!
//! Training happens offline; this module only loads the exported weights and
//! runs Viterbi decoding. The artifact is a JSON file carrying the feature
//! schema it was trained on, per-label state weights, and the label
//! transition structure (including virtual start/end transitions).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_SCHEMA};
use crate::model::Label;

use super::SequenceModel;

/// Serialized form of a trained CRF model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfArtifact {
    /// Feature names, in the order the weight rows expect
    pub schema: Vec<String>,

    /// Label states, in weight-row order
    pub labels: Vec<Label>,

    /// Per-label feature weights: `state_weights[label][feature]`
    pub state_weights: Vec<Vec<f32>>,

    /// Per-label bias terms
    pub bias: Vec<f32>,

    /// Label transition weights: `transitions[from][to]`
    pub transitions: Vec<Vec<f32>>,

    /// Weights for starting a sequence in each label
    pub start: Vec<f32>,

    /// Weights for ending a sequence in each label
    pub end: Vec<f32>,
}

/// A loaded CRF model ready for inference.
///
/// Immutable after loading; share it across workers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CrfModel {
    artifact: CrfArtifact,
}

impl CrfModel {
    /// Load a model artifact from disk.
    ///
    /// # Errors
    ///
    /// `Error::ModelLoad` if the file is unreadable, fails to deserialize, or
    /// has inconsistent weight dimensions; `Error::SchemaMismatch` if it was
    /// trained on a different feature schema than this build produces.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let artifact: CrfArtifact = serde_json::from_slice(&data)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;

        let model = Self::from_artifact(artifact)?;
        log::info!("loaded CRF model from {}", path.display());
        Ok(model)
    }

    /// Build a model from an in-memory artifact, validating it.
    pub fn from_artifact(artifact: CrfArtifact) -> Result<Self> {
        if artifact.schema != FEATURE_SCHEMA {
            return Err(Error::SchemaMismatch {
                expected: artifact.schema.join(", "),
                found: FEATURE_SCHEMA.join(", "),
            });
        }

        let n = artifact.labels.len();
        if n == 0 {
            return Err(Error::ModelLoad("artifact has no label states".to_string()));
        }

        let dims_ok = artifact.state_weights.len() == n
            && artifact
                .state_weights
                .iter()
                .all(|row| row.len() == artifact.schema.len())
            && artifact.bias.len() == n
            && artifact.transitions.len() == n
            && artifact.transitions.iter().all(|row| row.len() == n)
            && artifact.start.len() == n
            && artifact.end.len() == n;

        if !dims_ok {
            return Err(Error::ModelLoad(
                "artifact weight dimensions are inconsistent".to_string(),
            ));
        }

        Ok(Self { artifact })
    }

    /// Emission score of `state` for a feature vector.
    fn emission(&self, state: usize, features: &FeatureVector) -> f32 {
        let weights = &self.artifact.state_weights[state];
        let values = features.values();
        let dot: f32 = weights.iter().zip(values.iter()).map(|(w, x)| w * x).sum();
        dot + self.artifact.bias[state]
    }

    /// Viterbi decoding: the jointly best label sequence under the state and
    /// transition weights.
    fn decode(&self, sequence: &[FeatureVector]) -> Vec<Label> {
        let n = self.artifact.labels.len();
        let len = sequence.len();
        if len == 0 {
            return Vec::new();
        }

        // delta[t][s]: best score of any path ending in state s at position t
        let mut delta = vec![0.0f32; n];
        let mut backptr = vec![vec![0usize; n]; len];

        for (s, d) in delta.iter_mut().enumerate() {
            *d = self.artifact.start[s] + self.emission(s, &sequence[0]);
        }

        for t in 1..len {
            let mut next = vec![f32::NEG_INFINITY; n];
            for s in 0..n {
                let mut best_prev = 0usize;
                let mut best_score = f32::NEG_INFINITY;
                for p in 0..n {
                    let score = delta[p] + self.artifact.transitions[p][s];
                    if score > best_score {
                        best_score = score;
                        best_prev = p;
                    }
                }
                next[s] = best_score + self.emission(s, &sequence[t]);
                backptr[t][s] = best_prev;
            }
            delta = next;
        }

        for (s, d) in delta.iter_mut().enumerate() {
            *d += self.artifact.end[s];
        }

        let mut state = delta
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(s, _)| s)
            .unwrap_or(0);

        let mut states = vec![state; len];
        for t in (1..len).rev() {
            state = backptr[t][state];
            states[t - 1] = state;
        }

        states
            .into_iter()
            .map(|s| self.artifact.labels[s])
            .collect()
    }
}

impl SequenceModel for CrfModel {
    fn name(&self) -> &str {
        "crf"
    }

    fn predict(&self, sequence: &[FeatureVector]) -> Result<Vec<Label>> {
        Ok(self.decode(sequence))
    }
}

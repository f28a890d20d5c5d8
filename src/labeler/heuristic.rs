//! Rule-based fallback labeler for running without a trained artifact.
//!
//! Thresholds follow common PDF formatting: headings are short, larger than
//! the body size, and often bold or numbered. Accuracy is below the trained
//! model's; it exists so the pipeline stays usable without a model file.

use crate::error::Result;
use crate::features::FeatureVector;
use crate::model::Label;

use super::SequenceModel;

/// Font-size ratio and length thresholds for the rule-based labeler.
#[derive(Debug, Clone)]
pub struct HeuristicModel {
    /// Minimum relative font size for a title candidate
    title_ratio: f32,
    /// Minimum relative font size for H1
    h1_ratio: f32,
    /// Minimum relative font size for H2
    h2_ratio: f32,
    /// Minimum relative font size for H3
    h3_ratio: f32,
    /// Maximum word count for any heading
    max_heading_words: f32,
}

impl Default for HeuristicModel {
    fn default() -> Self {
        Self {
            title_ratio: 1.7,
            h1_ratio: 1.45,
            h2_ratio: 1.2,
            h3_ratio: 1.08,
            max_heading_words: 14.0,
        }
    }
}

impl HeuristicModel {
    /// Create a labeler with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one line given whether a title was already assigned.
    fn classify(&self, fv: &FeatureVector, title_taken: bool) -> Label {
        let short = fv.word_count <= self.max_heading_words;
        let styled = fv.is_bold > 0.5 || fv.uppercase_ratio > 0.7;
        let numbered = fv.starts_with_numbering > 0.5;

        if !short {
            return Label::Body;
        }

        // The title is the first prominent line near a page top
        if !title_taken
            && fv.relative_font_size >= self.title_ratio
            && fv.position_in_page <= 0.35
        {
            return Label::Title;
        }

        if fv.relative_font_size >= self.h1_ratio {
            return Label::H1;
        }
        if fv.relative_font_size >= self.h2_ratio {
            return Label::H2;
        }
        if fv.relative_font_size >= self.h3_ratio && (styled || numbered) {
            return Label::H3;
        }
        // Same-size headings: bold or numbered lines set off by whitespace
        if (styled || numbered) && fv.gap_before >= 1.5 {
            return Label::H3;
        }

        Label::Body
    }
}

impl SequenceModel for HeuristicModel {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn predict(&self, sequence: &[FeatureVector]) -> Result<Vec<Label>> {
        let mut title_taken = false;
        let labels = sequence
            .iter()
            .map(|fv| {
                let label = self.classify(fv, title_taken);
                if label == Label::Title {
                    title_taken = true;
                }
                label
            })
            .collect();
        Ok(labels)
    }
}

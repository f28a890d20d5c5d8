//! Statistics collected during an extraction run.

use serde::{Deserialize, Serialize};

use super::Label;

/// Counters and warnings accumulated across pipeline stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages in the document
    pub page_count: u32,

    /// Pages that yielded no usable text geometry
    pub empty_page_count: u32,

    /// Text lines that entered the labeling stage
    pub line_count: u32,

    /// Lines labeled as title
    pub title_count: u32,

    /// Lines labeled H1–H4
    pub heading_count: u32,

    /// Lines labeled as body text
    pub body_count: u32,

    /// Non-fatal anomalies observed while building the outline
    /// (duplicate titles, level skips, empty pages)
    pub warnings: Vec<String>,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one labeled line.
    pub fn count_label(&mut self, label: Label) {
        match label {
            Label::Title => self.title_count += 1,
            Label::Body => self.body_count += 1,
            _ => self.heading_count += 1,
        }
    }

    /// Record a non-fatal warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label() {
        let mut stats = ExtractionStats::new();
        stats.count_label(Label::Title);
        stats.count_label(Label::H2);
        stats.count_label(Label::Body);
        stats.count_label(Label::Body);

        assert_eq!(stats.title_count, 1);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.body_count, 2);
    }

    #[test]
    fn test_warnings_accumulate() {
        let mut stats = ExtractionStats::new();
        stats.warn("page 3 has no text layer");
        stats.warn("duplicate title on page 5");
        assert_eq!(stats.warnings.len(), 2);
    }
}

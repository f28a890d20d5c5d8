//! Label sets for sequence labeling and the heading hierarchy.

use serde::{Deserialize, Serialize};

/// Per-line label produced by the sequence labeler.
///
/// `Body` means "not a heading"; everything else is a rank in the document's
/// structural hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Document title
    Title,
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
    /// Fourth-level heading
    H4,
    /// Regular body text
    Body,
}

impl Label {
    /// All labels, in the order used for model state indexing.
    pub const ALL: [Label; 6] = [
        Label::Title,
        Label::H1,
        Label::H2,
        Label::H3,
        Label::H4,
        Label::Body,
    ];

    /// Whether this label denotes a heading (anything but `Body`).
    pub fn is_heading(&self) -> bool {
        !matches!(self, Label::Body)
    }

    /// The heading level for this label, or `None` for `Body`.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Label::Title => Some(HeadingLevel::Title),
            Label::H1 => Some(HeadingLevel::H1),
            Label::H2 => Some(HeadingLevel::H2),
            Label::H3 => Some(HeadingLevel::H3),
            Label::H4 => Some(HeadingLevel::H4),
            Label::Body => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Label::Title => "TITLE",
            Label::H1 => "H1",
            Label::H2 => "H2",
            Label::H3 => "H3",
            Label::H4 => "H4",
            Label::Body => "BODY",
        };
        write!(f, "{}", s)
    }
}

/// Heading rank of a node in the outline tree.
///
/// `Title` and `H1` share placement rank 1: a title is unique per document and
/// later title-labeled lines are downgraded to H1 for tree placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title (placement rank 1)
    Title,
    /// Rank 1
    H1,
    /// Rank 2
    H2,
    /// Rank 3
    H3,
    /// Rank 4
    H4,
}

impl HeadingLevel {
    /// Placement rank used by the hierarchy builder; the synthetic document
    /// root sits at rank 0.
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::Title | HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_heading() {
        assert!(Label::Title.is_heading());
        assert!(Label::H4.is_heading());
        assert!(!Label::Body.is_heading());
    }

    #[test]
    fn test_ranks() {
        assert_eq!(HeadingLevel::Title.rank(), 1);
        assert_eq!(HeadingLevel::H1.rank(), 1);
        assert_eq!(HeadingLevel::H4.rank(), 4);
    }

    #[test]
    fn test_label_serde_uppercase() {
        let json = serde_json::to_string(&Label::H2).unwrap();
        assert_eq!(json, "\"H2\"");
        let back: Label = serde_json::from_str("\"TITLE\"").unwrap();
        assert_eq!(back, Label::Title);
    }

    #[test]
    fn test_heading_level_conversion() {
        assert_eq!(Label::H3.heading_level(), Some(HeadingLevel::H3));
        assert_eq!(Label::Body.heading_level(), None);
    }
}

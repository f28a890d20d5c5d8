//! Feature encoding: maps text lines to fixed-schema feature vectors.
//!
//! Encoding is a pure function of the input line sequence. Document-scoped
//! statistics (the modal font size) are computed into a local context per
//! call; there is no process-global state.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::TextLine;

/// Ordered names of the features the encoder produces.
///
/// Model artifacts record the schema they were trained on; it must match this
/// list exactly.
pub const FEATURE_SCHEMA: [&str; 13] = [
    "relative_font_size",
    "indentation_level",
    "is_bold",
    "is_italic",
    "gap_before",
    "position_in_page",
    "text_length",
    "word_count",
    "starts_with_numbering",
    "size_vs_prev",
    "width_ratio",
    "center_deviation",
    "uppercase_ratio",
];

/// Width in points of one indentation bucket.
const INDENT_BUCKET: f32 = 6.0;
/// Indentation buckets are capped here; deeper indents carry no extra signal.
const INDENT_BUCKET_MAX: f32 = 10.0;

/// A fixed-schema feature vector for one text line.
///
/// Field order matches [`FEATURE_SCHEMA`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Line font size / document modal font size
    pub relative_font_size: f32,
    /// Discretized left-indentation bucket
    pub indentation_level: f32,
    /// 1.0 if the line is predominantly bold
    pub is_bold: f32,
    /// 1.0 if the line is predominantly italic
    pub is_italic: f32,
    /// Vertical whitespace above the line, normalized by line height
    pub gap_before: f32,
    /// Normalized vertical position on the page (0 = top)
    pub position_in_page: f32,
    /// Character count
    pub text_length: f32,
    /// Whitespace-separated word count
    pub word_count: f32,
    /// 1.0 if the text begins with a numbering pattern ("1.", "2.1", "IV.")
    pub starts_with_numbering: f32,
    /// Font size ratio to the previous line (1.0 at sequence start)
    pub size_vs_prev: f32,
    /// Line width / page width
    pub width_ratio: f32,
    /// Distance of the line center from the page center, normalized
    pub center_deviation: f32,
    /// Uppercase letters / letters (0.0 when the line has no letters)
    pub uppercase_ratio: f32,
}

impl FeatureVector {
    /// Feature values in [`FEATURE_SCHEMA`] order.
    pub fn values(&self) -> [f32; 13] {
        [
            self.relative_font_size,
            self.indentation_level,
            self.is_bold,
            self.is_italic,
            self.gap_before,
            self.position_in_page,
            self.text_length,
            self.word_count,
            self.starts_with_numbering,
            self.size_vs_prev,
            self.width_ratio,
            self.center_deviation,
            self.uppercase_ratio,
        ]
    }
}

/// Encode a line sequence into one feature vector per line.
///
/// Deterministic and stateless: identical input sequences produce identical
/// output. The output length always equals the input length.
pub fn encode(lines: &[TextLine]) -> Vec<FeatureVector> {
    let ctx = DocumentContext::from_lines(lines);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let prev = if i > 0 { Some(&lines[i - 1]) } else { None };
            encode_line(line, prev, &ctx)
        })
        .collect()
}

/// Encode a single line against its predecessor and the document context.
fn encode_line(line: &TextLine, prev: Option<&TextLine>, ctx: &DocumentContext) -> FeatureVector {
    let page_width = line.page_width.max(1.0);
    let page_height = line.page_height.max(1.0);

    let size_vs_prev = match prev {
        Some(p) if p.font_size > 0.0 => line.font_size / p.font_size,
        _ => 1.0,
    };

    let center_deviation =
        (line.bbox.center_x() - page_width / 2.0).abs() / (page_width / 2.0);

    FeatureVector {
        relative_font_size: line.font_size / ctx.modal_font_size,
        indentation_level: (line.indent / INDENT_BUCKET).floor().min(INDENT_BUCKET_MAX),
        is_bold: line.bold as u8 as f32,
        is_italic: line.italic as u8 as f32,
        gap_before: line.gap_before / line.height(),
        position_in_page: (line.bbox.y0 / page_height).clamp(0.0, 1.0),
        text_length: line.char_count() as f32,
        word_count: line.word_count() as f32,
        starts_with_numbering: starts_with_numbering(&line.text) as u8 as f32,
        size_vs_prev,
        width_ratio: (line.width() / page_width).clamp(0.0, 1.0),
        center_deviation: center_deviation.clamp(0.0, 1.0),
        uppercase_ratio: uppercase_ratio(&line.text),
    }
}

/// Per-document statistics consumed by the encoder.
///
/// Scoped to one `encode` call so concurrent documents never share state.
#[derive(Debug, Clone)]
struct DocumentContext {
    modal_font_size: f32,
}

impl DocumentContext {
    /// Compute document statistics from the full line sequence.
    fn from_lines(lines: &[TextLine]) -> Self {
        Self {
            modal_font_size: modal_font_size(lines),
        }
    }
}

/// The document's most frequent font size, over a 0.1pt-rounded histogram.
///
/// Ties break toward the smaller size so the statistic is stable across runs.
/// Returns 12.0 for an empty sequence.
fn modal_font_size(lines: &[TextLine]) -> f32 {
    let mut histogram: HashMap<i32, usize> = HashMap::new();
    for line in lines {
        let key = (line.font_size * 10.0).round() as i32;
        *histogram.entry(key).or_insert(0) += 1;
    }

    histogram
        .into_iter()
        .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
        .map(|(key, _)| key as f32 / 10.0)
        .filter(|size| *size > 0.0)
        .unwrap_or(12.0)
}

/// Whether text begins with a decimal ("1.", "2.1") or roman ("IV.")
/// numbering pattern.
fn starts_with_numbering(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+(\.\d+)*\.?|[IVXLCDM]+\.)(\s|$)").expect("numbering pattern")
    });
    re.is_match(text)
}

/// Ratio of uppercase letters to all letters; 0.0 when there are no letters.
fn uppercase_ratio(text: &str) -> f32 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f32 / letters as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(text: &str, font_size: f32, y0: f32) -> TextLine {
        TextLine {
            page: 0,
            text: text.to_string(),
            bbox: BBox::new(72.0, y0, 300.0, y0 + font_size),
            font_size,
            bold: false,
            italic: false,
            indent: 0.0,
            gap_before: 14.0,
            first_on_page: false,
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    #[test]
    fn test_encode_length_matches_input() {
        let lines = vec![
            line("Introduction", 18.0, 72.0),
            line("Body text goes here.", 11.0, 100.0),
            line("More body text.", 11.0, 114.0),
        ];
        let features = encode(&lines);
        assert_eq!(features.len(), lines.len());
    }

    #[test]
    fn test_encode_is_pure() {
        let lines = vec![
            line("Chapter 1", 16.0, 72.0),
            line("Some paragraph content.", 11.0, 100.0),
        ];
        assert_eq!(encode(&lines), encode(&lines));
    }

    #[test]
    fn test_relative_font_size_uses_modal_size() {
        let lines = vec![
            line("Heading", 22.0, 72.0),
            line("body", 11.0, 100.0),
            line("body", 11.0, 114.0),
            line("body", 11.0, 128.0),
        ];
        let features = encode(&lines);
        assert!((features[0].relative_font_size - 2.0).abs() < 1e-4);
        assert!((features[1].relative_font_size - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_modal_tie_breaks_to_smaller_size() {
        let lines = vec![line("a a a", 11.0, 72.0), line("b b b", 14.0, 100.0)];
        assert_eq!(modal_font_size(&lines), 11.0);
    }

    #[test]
    fn test_modal_empty_defaults() {
        assert_eq!(modal_font_size(&[]), 12.0);
    }

    #[test]
    fn test_size_vs_prev_sentinel_at_start() {
        let lines = vec![line("First", 18.0, 72.0), line("Second", 9.0, 100.0)];
        let features = encode(&lines);
        assert_eq!(features[0].size_vs_prev, 1.0);
        assert!((features[1].size_vs_prev - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_numbering_patterns() {
        assert!(starts_with_numbering("1. Introduction"));
        assert!(starts_with_numbering("2.1 Background"));
        assert!(starts_with_numbering("10.2.3 Details"));
        assert!(starts_with_numbering("III. Methods"));
        assert!(!starts_with_numbering("Introduction"));
        assert!(!starts_with_numbering("O. Henry")); // not a roman numeral
        assert!(!starts_with_numbering("1and text"));
    }

    #[test]
    fn test_uppercase_ratio() {
        assert_eq!(uppercase_ratio("ABSTRACT"), 1.0);
        assert_eq!(uppercase_ratio("abstract"), 0.0);
        assert_eq!(uppercase_ratio("1234"), 0.0);
        assert!((uppercase_ratio("Abcd") - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_schema_matches_values_arity() {
        let lines = vec![line("x y z", 12.0, 72.0)];
        let features = encode(&lines);
        assert_eq!(features[0].values().len(), FEATURE_SCHEMA.len());
    }
}

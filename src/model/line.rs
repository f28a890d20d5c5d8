//! Text-line types produced by layout extraction.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page points.
///
/// Coordinates are top-down: y0 is the distance from the page top to the top
/// edge of the box, so y grows toward the page bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// One visually distinct line of text on a page, with the geometric and
/// typographic attributes the feature encoder consumes.
///
/// Immutable once extracted; owned by the document's line sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    /// Page index (0-based)
    pub page: u32,

    /// Text content, NFKC-normalized
    pub text: String,

    /// Bounding box in top-down page coordinates
    pub bbox: BBox,

    /// Dominant font size in points
    pub font_size: f32,

    /// Whether the line is predominantly bold
    pub bold: bool,

    /// Whether the line is predominantly italic
    pub italic: bool,

    /// Left indentation: x0 minus the page's left text margin
    pub indent: f32,

    /// Vertical gap to the previous line on the same page; for the first line
    /// of a page this is the distance from the page top
    pub gap_before: f32,

    /// Whether this is the first line on its page
    pub first_on_page: bool,

    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,
}

impl TextLine {
    /// Line width in points.
    pub fn width(&self) -> f32 {
        self.bbox.width()
    }

    /// Line height in points; falls back to the font size when the box is
    /// degenerate.
    pub fn height(&self) -> f32 {
        let h = self.bbox.height();
        if h > 0.0 {
            h
        } else {
            self.font_size
        }
    }

    /// Whitespace-separated word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Character count of the text content.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> TextLine {
        TextLine {
            page: 0,
            text: "1. Introduction".to_string(),
            bbox: BBox::new(72.0, 100.0, 220.0, 118.0),
            font_size: 18.0,
            bold: true,
            italic: false,
            indent: 0.0,
            gap_before: 24.0,
            first_on_page: false,
            page_width: 595.0,
            page_height: 842.0,
        }
    }

    #[test]
    fn test_bbox_dimensions() {
        let b = BBox::new(10.0, 20.0, 110.0, 40.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.center_x(), 60.0);
    }

    #[test]
    fn test_line_counts() {
        let line = sample_line();
        assert_eq!(line.word_count(), 2);
        assert_eq!(line.char_count(), 15);
        assert_eq!(line.width(), 148.0);
    }

    #[test]
    fn test_degenerate_height_falls_back_to_font_size() {
        let mut line = sample_line();
        line.bbox = BBox::new(72.0, 100.0, 220.0, 100.0);
        assert_eq!(line.height(), 18.0);
    }
}

//! Layout extraction: turns PDF pages into ordered text-line sequences.
//!
//! Walks each page's content stream to collect positioned text spans, groups
//! spans into visual lines, and derives the geometry the feature encoder
//! needs (indentation, vertical gaps, page-relative position).

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BBox, TextLine};

use super::options::{ErrorMode, ExtractOptions};
use super::pdf_parser::PdfParser;

/// A text span with position and style information.
///
/// Positions are in raw PDF coordinates (y grows upward from the page
/// bottom); the extractor flips them when assembling [`TextLine`]s.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub bold: bool,
    /// Whether the font appears to be italic
    pub italic: bool,
}

impl TextSpan {
    /// Create a new text span, deriving style flags from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        let bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");

        // Without font metrics the advance width is unknown; half the font
        // size per character is a serviceable estimate for line geometry.
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            bold,
            italic,
        }
    }
}

/// Result of extracting a document's layout.
#[derive(Debug, Clone)]
pub struct ExtractedLayout {
    /// All text lines, in reading order, grouped by page
    pub lines: Vec<TextLine>,
    /// Total number of pages in the document
    pub page_count: u32,
    /// Pages (0-based) that yielded no usable text geometry
    pub empty_pages: Vec<u32>,
}

impl ExtractedLayout {
    /// Whether no page in the document produced any text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Layout extractor over an opened PDF document.
pub struct LayoutExtractor<'a> {
    doc: &'a LopdfDocument,
    options: ExtractOptions,
}

impl<'a> LayoutExtractor<'a> {
    /// Create a new extractor for the given document.
    pub fn new(parser: &'a PdfParser, options: ExtractOptions) -> Self {
        Self {
            doc: parser.document(),
            options,
        }
    }

    /// Extract all text lines in reading order.
    ///
    /// Pages that parse but contain no text contribute zero lines and are
    /// recorded in `empty_pages`. Pages that fail to parse are skipped in
    /// lenient mode and fatal in strict mode.
    pub fn extract(&self) -> Result<ExtractedLayout> {
        let pages = self.doc.get_pages();
        let page_count = pages.len() as u32;

        let mut lines = Vec::new();
        let mut empty_pages = Vec::new();

        for (page_num, page_id) in pages.iter() {
            // lopdf page numbers are 1-based; the model uses 0-based indices
            let page_index = page_num - 1;

            match self.extract_page_lines(page_index, *page_id) {
                Ok(page_lines) => {
                    if page_lines.is_empty() {
                        log::warn!("page {} yielded no text geometry", page_index);
                        empty_pages.push(page_index);
                    }
                    lines.extend(page_lines);
                }
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("skipping unparseable page {}: {}", page_index, e);
                    empty_pages.push(page_index);
                }
            }
        }

        Ok(ExtractedLayout {
            lines,
            page_count,
            empty_pages,
        })
    }

    /// Extract the ordered text lines of a single page.
    fn extract_page_lines(&self, page_index: u32, page_id: ObjectId) -> Result<Vec<TextLine>> {
        let (page_width, page_height) = self.page_dimensions(page_id);

        let spans = self.extract_page_spans(page_id)?;
        let raw_lines = group_spans_into_lines(spans);

        // Flip to top-down coordinates and apply the text filters
        let mut lines: Vec<TextLine> = raw_lines
            .into_iter()
            .filter_map(|raw| self.finish_line(raw, page_index, page_width, page_height))
            .collect();

        // Reading order: top to bottom, ties left to right
        lines.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        derive_line_geometry(&mut lines);

        Ok(lines)
    }

    /// Convert an assembled raw line into a model [`TextLine`].
    ///
    /// Returns `None` for lines filtered out by the options (too short after
    /// stripping non-alphanumerics, or empty after trimming).
    fn finish_line(
        &self,
        raw: RawLine,
        page_index: u32,
        page_width: f32,
        page_height: f32,
    ) -> Option<TextLine> {
        let text = raw.text.trim();
        if text.is_empty() {
            return None;
        }

        let alnum = text.chars().filter(|c| c.is_alphanumeric()).count();
        if alnum < self.options.min_line_chars {
            return None;
        }

        let text = if self.options.normalize_text {
            text.nfkc().collect::<String>()
        } else {
            text.to_string()
        };

        // Approximate ascender/descender from the font size, then flip the
        // baseline into top-down page coordinates.
        let y0 = (page_height - raw.y - raw.font_size * 0.8).max(0.0);
        let y1 = (page_height - raw.y + raw.font_size * 0.2).max(0.0);

        Some(TextLine {
            page: page_index,
            text,
            bbox: BBox::new(raw.x0, y0, raw.x1, y1),
            font_size: raw.font_size,
            bold: raw.bold,
            italic: raw.italic,
            // Filled in by derive_line_geometry once the page is assembled
            indent: 0.0,
            gap_before: 0.0,
            first_on_page: false,
            page_width,
            page_height,
        })
    }

    /// Get page dimensions from the MediaBox, defaulting to Letter size.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(612.0);
                        let height = array[3].as_float().unwrap_or(792.0);
                        return (width, height);
                    }
                }
            }
        }
        (612.0, 792.0)
    }

    /// Extract text spans from a page with position and font information.
    fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::Extraction(format!("page fonts: {}", e)))?;

        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Get the page's (possibly concatenated) content stream bytes.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::Extraction(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .get_plain_content()
                        .map_err(|e| Error::Extraction(e.to_string()));
                }
                Err(Error::Extraction("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.get_plain_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Extraction("invalid content stream".to_string())),
        }
    }

    /// Walk the content stream operations and collect positioned spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    state = TextState::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = fonts
                                .get(font_name.as_slice())
                                .and_then(|f| f.get(b"BaseFont").ok())
                                .and_then(|o| o.as_name().ok())
                                .map(|n| String::from_utf8_lossy(n).to_string())
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(font_name).to_string()
                                });
                        }
                        current_font_size = as_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" => {
                    if op.operands.len() >= 2 {
                        let tx = as_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = as_number(&op.operands[1]).unwrap_or(0.0);
                        state.translate_line(tx, ty);
                    }
                }
                "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = as_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = as_number(&op.operands[1]).unwrap_or(0.0);
                        state.leading = -ty;
                        state.translate_line(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let m: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| as_number(o).unwrap_or(0.0))
                            .collect();
                        state.set_matrix(m[0], m[1], m[2], m[3], m[4], m[5]);
                    }
                }
                "TL" => {
                    if let Some(l) = op.operands.first().and_then(as_number) {
                        state.leading = l;
                    }
                }
                "T*" => {
                    state.next_line();
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }

                    let encoding = fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(self.doc).ok());

                    let text = match op.operator.as_str() {
                        "TJ" => decode_tj_array(op.operands.first(), &encoding),
                        "\"" => decode_string_operand(op.operands.get(2), &encoding),
                        _ => decode_string_operand(op.operands.first(), &encoding),
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = state.position();
                        let effective_size = current_font_size * state.scale();
                        spans.push(TextSpan::new(text, x, y, effective_size, &current_font));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

/// Text positioning state while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    // Current text matrix (a b c d e f)
    tm: [f32; 6],
    // Line matrix: start of the current line
    tlm: [f32; 6],
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        Self {
            tm: IDENTITY,
            tlm: IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn set_matrix(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.tm = [a, b, c, d, e, f];
        self.tlm = self.tm;
    }

    /// Apply a Td displacement relative to the start of the current line.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.tlm;
        let e2 = tx * a + ty * c + e;
        let f2 = tx * b + ty * d + f;
        self.tlm = [a, b, c, d, e2, f2];
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate_line(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.tm[4], self.tm[5])
    }

    /// Vertical scale factor applied to the nominal font size.
    fn scale(&self) -> f32 {
        let s = (self.tm[1].powi(2) + self.tm[3].powi(2)).sqrt();
        if s > 0.0 {
            s
        } else {
            1.0
        }
    }
}

/// Numeric operand helper.
fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(n) => Some(*n),
        _ => None,
    }
}

/// Decode a Tj / ' / " string operand.
fn decode_string_operand(
    operand: Option<&Object>,
    encoding: &Option<lopdf::Encoding<'_>>,
) -> String {
    match operand {
        Some(Object::String(bytes, _)) => decode_bytes(bytes, encoding),
        _ => String::new(),
    }
}

/// Decode a TJ array operand, inserting spaces for large kerning gaps.
fn decode_tj_array(
    operand: Option<&Object>,
    encoding: &Option<lopdf::Encoding<'_>>,
) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    // Adjustments are in 1/1000 text-space units; large negative values are
    // word breaks in most fonts.
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_bytes(bytes, encoding));
            }
            Object::Integer(n) => {
                if -(*n as f32) > SPACE_THRESHOLD && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > SPACE_THRESHOLD && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Decode string bytes with the font's encoding, falling back to Latin-1.
fn decode_bytes(
    bytes: &[u8],
    encoding: &Option<lopdf::Encoding<'_>>,
) -> String {
    if let Some(enc) = encoding {
        if let Ok(decoded) = LopdfDocument::decode_text(enc, bytes) {
            return decoded;
        }
    }
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect())
}

/// A visual line assembled from spans, still in raw PDF coordinates.
#[derive(Debug)]
struct RawLine {
    text: String,
    x0: f32,
    x1: f32,
    y: f32,
    font_size: f32,
    bold: bool,
    italic: bool,
}

/// Group spans into visual lines by baseline proximity.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<RawLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Sort by Y descending (PDF Y is bottom-up), then X ascending
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(assemble_line(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

/// Merge a group of same-baseline spans into one raw line.
fn assemble_line(mut spans: Vec<TextSpan>) -> RawLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    // Dominant font size, weighted by text length
    let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
    let weighted_size: f32 = spans
        .iter()
        .map(|s| s.font_size * s.text.chars().count() as f32)
        .sum();
    let font_size = if total_chars > 0 {
        weighted_size / total_chars as f32
    } else {
        spans[0].font_size
    };

    let bold_chars: usize = spans
        .iter()
        .filter(|s| s.bold)
        .map(|s| s.text.chars().count())
        .sum();
    let italic_chars: usize = spans
        .iter()
        .filter(|s| s.italic)
        .map(|s| s.text.chars().count())
        .sum();

    let x0 = spans[0].x;
    let x1 = spans
        .iter()
        .map(|s| s.x + s.width)
        .fold(f32::MIN, f32::max);
    let y = spans[0].y;

    // Join span texts, inserting a space when the X gap is wider than a
    // fraction of the average character width
    let mut text = String::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - (prev.x + prev.width);
            let char_count = span.text.chars().count().max(1);
            let avg_char_width = if span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * 0.5
            };
            if gap > avg_char_width * 0.2 && !text.ends_with(' ') && !span.text.starts_with(' ')
            {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
    }

    RawLine {
        text,
        x0,
        x1,
        y,
        font_size,
        bold: total_chars > 0 && bold_chars * 2 > total_chars,
        italic: total_chars > 0 && italic_chars * 2 > total_chars,
    }
}

/// Fill in indent, gap_before and first_on_page for a page's sorted lines.
///
/// The first line of a page has no predecessor; its gap is the distance from
/// the page top, never a failure.
fn derive_line_geometry(lines: &mut [TextLine]) {
    if lines.is_empty() {
        return;
    }

    let margin = lines
        .iter()
        .map(|l| l.bbox.x0)
        .fold(f32::INFINITY, f32::min);

    let mut prev_bottom: Option<f32> = None;
    for line in lines.iter_mut() {
        line.indent = (line.bbox.x0 - margin).max(0.0);
        match prev_bottom {
            None => {
                line.first_on_page = true;
                line.gap_before = line.bbox.y0;
            }
            Some(bottom) => {
                line.first_on_page = false;
                line.gap_before = (line.bbox.y0 - bottom).max(0.0);
            }
        }
        prev_bottom = Some(line.bbox.y1);
    }
}

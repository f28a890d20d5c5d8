//! PDF parsing and layout extraction.

mod layout;
mod options;
mod pdf_parser;

pub use layout::{ExtractedLayout, LayoutExtractor, TextSpan};
pub use options::{ErrorMode, ExtractOptions};
pub use pdf_parser::PdfParser;

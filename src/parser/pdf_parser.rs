//! PDF document handle built on lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};

/// An opened PDF document, ready for layout extraction.
pub struct PdfParser {
    doc: LopdfDocument,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify the magic bytes before handing the file to lopdf
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| Error::from(e).with_path(path))?;

        if doc.is_encrypted() {
            return Err(Error::MalformedDocument {
                path: path.to_path_buf(),
                cause: "document is encrypted".to_string(),
            });
        }

        Ok(Self { doc })
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;

        if doc.is_encrypted() {
            return Err(Error::MalformedDocument {
                path: Default::default(),
                cause: "document is encrypted".to_string(),
            });
        }

        Ok(Self { doc })
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Access the underlying lopdf document.
    pub(crate) fn document(&self) -> &LopdfDocument {
        &self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = PdfParser::from_bytes(b"not a pdf at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let result = PdfParser::open("does-not-exist.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

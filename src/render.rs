//! JSON rendering for extracted outlines.

use crate::error::{Error, Result};
use crate::model::OutlineDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize an outline document to JSON.
pub fn to_json(document: &OutlineDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(document),
        JsonFormat::Compact => serde_json::to_string(document),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, HeadingNode};

    fn sample_document() -> OutlineDocument {
        let mut h1 = HeadingNode::new(HeadingLevel::H1, "Introduction", 0);
        h1.children
            .push(HeadingNode::new(HeadingLevel::H2, "Background", 1));
        OutlineDocument {
            title: Some("Sample".to_string()),
            outline: vec![h1],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample_document(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Sample\""));
        assert!(json.contains("\"level\": \"H1\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample_document(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"Background\""));
    }

    #[test]
    fn test_null_title_serializes() {
        let doc = OutlineDocument {
            title: None,
            outline: vec![],
        };
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":null,"outline":[]}"#);
    }
}

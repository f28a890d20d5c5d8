//! Outline tree types: the final artifact of the pipeline.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// A node in the heading tree.
///
/// Invariants maintained by the hierarchy builder: every child's level is
/// strictly deeper than its parent's, and siblings preserve document reading
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Heading level of this node
    pub level: HeadingLevel,

    /// Heading text
    pub text: String,

    /// Page index the heading appears on (0-based)
    pub page: u32,

    /// Child headings, in reading order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Create a new leaf node.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including self.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HeadingNode::subtree_size)
            .sum::<usize>()
    }
}

/// The synthetic document root: holds the top-level heading nodes.
///
/// Sits at placement rank 0, one rank above `Title`/`H1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineTree {
    /// Top-level nodes (title and rank-1 headings), in reading order
    pub children: Vec<HeadingNode>,
}

impl OutlineTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of heading nodes in the tree.
    pub fn total_nodes(&self) -> usize {
        self.children.iter().map(HeadingNode::subtree_size).sum()
    }

    /// Check whether the tree has any nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Convert the tree into the emitted document shape.
    ///
    /// The first `Title` child becomes the document's `title` field and is
    /// removed from the outline; any children it collected are promoted in its
    /// place so sibling order is preserved. Remaining top-level nodes carry
    /// H1–H4 levels only (the hierarchy builder downgrades duplicate titles
    /// before they reach the tree).
    pub fn into_document(self) -> OutlineDocument {
        let mut title = None;
        let mut outline = Vec::new();

        for node in self.children {
            if title.is_none() && node.level == HeadingLevel::Title {
                title = Some(node.text);
                outline.extend(node.children);
            } else {
                outline.push(node);
            }
        }

        // No title label in the document: fall back to the first H1's text.
        if title.is_none() {
            title = outline
                .iter()
                .find(|n| n.level == HeadingLevel::H1)
                .map(|n| n.text.clone());
        }

        OutlineDocument { title, outline }
    }
}

/// The JSON-serializable result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title, if one was detected
    pub title: Option<String>,

    /// Nested heading outline
    pub outline: Vec<HeadingNode>,
}

impl OutlineDocument {
    /// Total number of heading nodes in the outline.
    pub fn total_nodes(&self) -> usize {
        self.outline.iter().map(HeadingNode::subtree_size).sum()
    }
}

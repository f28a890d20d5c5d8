//! Hierarchy building: folds a flat (line, label) sequence into the outline
//! tree.
//!
//! Policies, deliberately explicit so downstream consumers see the model's
//! actual output:
//! - skipped levels are never fabricated: a node attaches under its nearest
//!   shallower open ancestor, keeping its own level
//! - only the first title-labeled line is the document title; later ones are
//!   downgraded to H1 before placement

use crate::model::{HeadingLevel, HeadingNode, Label, OutlineTree, TextLine};

/// Result of building the outline tree.
#[derive(Debug, Clone)]
pub struct OutlineBuild {
    /// The synthetic document root
    pub tree: OutlineTree,
    /// Non-fatal anomalies observed while building (duplicate titles, level
    /// skips)
    pub warnings: Vec<String>,
}

/// Build the outline tree from labeled lines.
///
/// Body-labeled lines carry no structure and are skipped. The returned tree
/// satisfies the nesting invariants: every child is strictly deeper than its
/// parent and siblings keep document reading order.
pub fn build(labeled: &[(TextLine, Label)]) -> OutlineBuild {
    let mut tree = OutlineTree::new();
    let mut warnings = Vec::new();

    // Open nodes, shallowest first; the tree root is the implicit rank 0.
    let mut stack: Vec<(u8, HeadingNode)> = Vec::new();
    let mut title_seen = false;

    for (line, label) in labeled {
        let Some(mut level) = label.heading_level() else {
            continue;
        };

        if level == HeadingLevel::Title {
            if title_seen {
                warnings.push(format!(
                    "duplicate title on page {}: {:?} downgraded to H1",
                    line.page, line.text
                ));
                log::warn!("duplicate title on page {}, downgrading to H1", line.page);
                level = HeadingLevel::H1;
            } else {
                title_seen = true;
            }
        }

        let rank = level.rank();
        let node = HeadingNode::new(level, line.text.clone(), line.page);

        // Close every open node at the same rank or deeper
        while let Some((top_rank, closed)) = stack.pop() {
            if top_rank < rank {
                stack.push((top_rank, closed));
                break;
            }
            attach(&mut tree, &mut stack, closed);
        }

        if let Some((parent_rank, _)) = stack.last() {
            if rank > parent_rank + 1 {
                warnings.push(format!(
                    "level skip on page {}: {} under {} parent",
                    line.page,
                    level,
                    rank_name(*parent_rank)
                ));
            }
        }

        stack.push((rank, node));
    }

    // Close whatever is still open
    while let Some((_, closed)) = stack.pop() {
        attach(&mut tree, &mut stack, closed);
    }

    OutlineBuild { tree, warnings }
}

/// Attach a closed node to the current stack top, or to the root.
fn attach(tree: &mut OutlineTree, stack: &mut [(u8, HeadingNode)], node: HeadingNode) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(node),
        None => tree.children.push(node),
    }
}

/// Display name for a placement rank, used in warning messages.
fn rank_name(rank: u8) -> &'static str {
    match rank {
        1 => "H1",
        2 => "H2",
        3 => "H3",
        _ => "H4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(text: &str, page: u32) -> TextLine {
        TextLine {
            page,
            text: text.to_string(),
            bbox: BBox::new(72.0, 100.0, 300.0, 114.0),
            font_size: 12.0,
            bold: false,
            italic: false,
            indent: 0.0,
            gap_before: 10.0,
            first_on_page: false,
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    fn labeled(entries: &[(&str, Label)]) -> Vec<(TextLine, Label)> {
        entries.iter()
            .enumerate()
            .map(|(i, (text, label))| (line(text, i as u32 / 4), *label))
            .collect()
    }

    /// Every child must be strictly deeper than its parent.
    fn check_nesting(node: &HeadingNode) {
        for child in &node.children {
            assert!(
                child.level.rank() > node.level.rank(),
                "child {} not deeper than parent {}",
                child.level,
                node.level
            );
            check_nesting(child);
        }
    }

    #[test]
    fn test_round_trip_tree_shape() {
        let input = labeled(&[
            ("Doc Title", Label::Title),
            ("Chapter A", Label::H1),
            ("Section A.1", Label::H2),
            ("Chapter B", Label::H1),
            ("Section B.1", Label::H2),
            ("Subsection B.1.1", Label::H3),
        ]);
        let built = build(&input);
        let tree = built.tree;

        // One title child, two H1 children, all under the root
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.children[0].level, HeadingLevel::Title);
        assert_eq!(tree.children[1].text, "Chapter A");
        assert_eq!(tree.children[1].children[0].text, "Section A.1");
        assert_eq!(tree.children[2].text, "Chapter B");
        assert_eq!(tree.children[2].children[0].text, "Section B.1");
        assert_eq!(
            tree.children[2].children[0].children[0].text,
            "Subsection B.1.1"
        );

        for child in &tree.children {
            check_nesting(child);
        }
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_level_skip_attaches_without_fabrication() {
        let input = labeled(&[("Chapter", Label::H1), ("Deep section", Label::H3)]);
        let built = build(&input);

        // H3 sits directly under the H1, still labeled H3
        assert_eq!(built.tree.children.len(), 1);
        let h1 = &built.tree.children[0];
        assert_eq!(h1.children.len(), 1);
        assert_eq!(h1.children[0].level, HeadingLevel::H3);
        assert_eq!(built.warnings.len(), 1);
        assert!(built.warnings[0].contains("level skip"));
    }

    #[test]
    fn test_duplicate_title_downgraded() {
        let input = labeled(&[
            ("Real Title", Label::Title),
            ("some body", Label::Body),
            ("Impostor Title", Label::Title),
            ("Chapter", Label::H1),
        ]);
        let built = build(&input);
        let doc = built.tree.into_document();

        assert_eq!(doc.title.as_deref(), Some("Real Title"));
        // The second title is an H1-equivalent sibling of the real H1
        let texts: Vec<&str> = doc.outline.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["Impostor Title", "Chapter"]);
        assert_eq!(doc.outline[0].level, HeadingLevel::H1);
        assert_eq!(built.warnings.len(), 1);
        assert!(built.warnings[0].contains("duplicate title"));
    }

    #[test]
    fn test_body_lines_carry_no_structure() {
        let input = labeled(&[
            ("para", Label::Body),
            ("Heading", Label::H1),
            ("more para", Label::Body),
        ]);
        let built = build(&input);
        assert_eq!(built.tree.total_nodes(), 1);
    }

    #[test]
    fn test_sibling_order_preserved() {
        let input = labeled(&[
            ("First", Label::H1),
            ("Second", Label::H1),
            ("Third", Label::H1),
        ]);
        let built = build(&input);
        let texts: Vec<&str> = built
            .tree
            .children
            .iter()
            .map(|n| n.text.as_str())
            .collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_h2_after_pop_attaches_to_prior_h1() {
        let input = labeled(&[
            ("Chapter 1", Label::H1),
            ("Section 1.1", Label::H2),
            ("Detail", Label::H3),
            ("Section 1.2", Label::H2),
        ]);
        let built = build(&input);
        let h1 = &built.tree.children[0];
        assert_eq!(h1.children.len(), 2);
        assert_eq!(h1.children[0].text, "Section 1.1");
        assert_eq!(h1.children[0].children[0].text, "Detail");
        assert_eq!(h1.children[1].text, "Section 1.2");
    }

    #[test]
    fn test_empty_input_builds_empty_tree() {
        let built = build(&[]);
        assert!(built.tree.is_empty());
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_heading_after_title_pops_title() {
        // Title and H1 share rank 1, so an H1 closes the open title node
        let input = labeled(&[("The Title", Label::Title), ("Chapter", Label::H1)]);
        let built = build(&input);
        assert_eq!(built.tree.children.len(), 2);
        assert_eq!(built.tree.children[0].level, HeadingLevel::Title);
        assert_eq!(built.tree.children[1].level, HeadingLevel::H1);
    }
}

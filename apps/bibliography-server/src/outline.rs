//! Bookmark tree
//!
//! The PDF outline arrives as a flat list of `(level, title, page)` entries
//! in document order. A node's children are the contiguous run of following
//! entries with a strictly greater level, ended by the next entry at the
//! node's level or shallower.

use serde::{Deserialize, Serialize};

use crate::document::OutlineEntry;

/// One entry of the hierarchical table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub title: String,
    pub page: i32,
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn new(title: impl Into<String>, page: i32) -> Self {
        Self {
            title: title.into(),
            page,
            children: Vec::new(),
        }
    }
}

/// Rebuild the nested tree from a flat outline
///
/// Keeps a stack of open nodes with their levels. Before an entry is pushed,
/// every open node at the same level or deeper is closed and attached to the
/// node below it on the stack (or to the root list).
pub fn build_tree(flat: &[OutlineEntry]) -> Vec<BookmarkNode> {
    let mut roots = Vec::new();
    let mut open: Vec<(u32, BookmarkNode)> = Vec::new();

    for entry in flat {
        while open.last().is_some_and(|(level, _)| *level >= entry.level) {
            close_top(&mut open, &mut roots);
        }
        open.push((entry.level, BookmarkNode::new(entry.title.clone(), entry.page)));
    }

    while !open.is_empty() {
        close_top(&mut open, &mut roots);
    }

    roots
}

fn close_top(open: &mut Vec<(u32, BookmarkNode)>, roots: &mut Vec<BookmarkNode>) {
    if let Some((_, node)) = open.pop() {
        match open.last_mut() {
            Some((_, parent)) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Page of the first node titled exactly `title`, in pre-order
///
/// Matching is case-sensitive; duplicate titles resolve to the first one in
/// document order.
pub fn find_anchor(tree: &[BookmarkNode], title: &str) -> Option<i32> {
    let mut stack: Vec<&BookmarkNode> = tree.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.title == title {
            return Some(node.page);
        }
        stack.extend(node.children.iter().rev());
    }

    None
}

/// Flatten a tree back into pre-order entries, deriving levels from depth
pub fn flatten(tree: &[BookmarkNode]) -> Vec<OutlineEntry> {
    let mut flat = Vec::new();
    let mut stack: Vec<(u32, &BookmarkNode)> = tree.iter().rev().map(|node| (1, node)).collect();

    while let Some((level, node)) = stack.pop() {
        flat.push(OutlineEntry::new(level, node.title.clone(), node.page));
        stack.extend(node.children.iter().rev().map(|child| (level + 1, child)));
    }

    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(u32, &str, i32)]) -> Vec<OutlineEntry> {
        items
            .iter()
            .map(|(level, title, page)| OutlineEntry::new(*level, *title, *page))
            .collect()
    }

    #[test]
    fn test_find_anchor() {
        let tree = build_tree(&entries(&[(1, "A", 1), (2, "B", 2), (1, "C", 3)]));

        assert_eq!(find_anchor(&tree, "B"), Some(2));
        assert_eq!(find_anchor(&tree, "C"), Some(3));
        assert_eq!(find_anchor(&tree, "Z"), None);
    }

    #[test]
    fn test_build_tree_nesting() {
        let tree = build_tree(&entries(&[
            (1, "Part I", 1),
            (2, "Chapter 1", 2),
            (3, "Section 1.1", 3),
            (2, "Chapter 2", 5),
            (1, "Part II", 9),
        ]));

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].title, "Part I");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].title, "Section 1.1");
        assert_eq!(tree[0].children[1].title, "Chapter 2");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_skipped_levels_attach_to_nearest_shallower() {
        let tree = build_tree(&entries(&[(1, "A", 1), (3, "B", 2), (2, "C", 3)]));

        assert_eq!(tree.len(), 1);
        let titles: Vec<&str> = tree[0].children.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let flat = entries(&[
            (1, "Introduction", 1),
            (1, "Bibliography", 3),
            (2, "Books", 3),
            (3, "Poetry", 4),
            (3, "Prose", 10),
            (2, "Articles", 20),
            (1, "Index", 40),
        ]);

        let tree = build_tree(&flat);
        assert_eq!(flatten(&tree), flat);
    }

    #[test]
    fn test_first_duplicate_title_wins() {
        let tree = build_tree(&entries(&[
            (1, "Part I", 1),
            (2, "Notes", 4),
            (1, "Part II", 7),
            (2, "Notes", 12),
        ]));

        assert_eq!(find_anchor(&tree, "Notes"), Some(4));
    }

    #[test]
    fn test_anchor_is_case_sensitive() {
        let tree = build_tree(&entries(&[(1, "Songs", 2)]));
        assert_eq!(find_anchor(&tree, "songs"), None);
    }

    #[test]
    fn test_empty_outline() {
        assert!(build_tree(&[]).is_empty());
        assert_eq!(find_anchor(&[], "A"), None);
    }
}

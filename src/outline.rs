//! Document outline (bookmarks).
//!
//! Outline items carry a link target like link annotations do; under PDF/UA-2
//! both must lead to structure destinations.

use crate::annotations::LinkTarget;

/// A single outline item (bookmark) in the document hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    /// The title of this bookmark
    pub title: String,

    /// The destination; `None` for items that only group children
    pub target: Option<LinkTarget>,

    /// Child bookmarks under this item
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a bookmark pointing at `target`.
    pub fn new(title: impl Into<String>, target: Option<LinkTarget>) -> Self {
        Self {
            title: title.into(),
            target,
            children: Vec::new(),
        }
    }

    /// Add a child bookmark.
    pub fn with_child(mut self, child: OutlineItem) -> Self {
        self.children.push(child);
        self
    }
}

/// Every item of an outline forest in pre-order.
pub fn flatten_outline(items: &[OutlineItem]) -> Vec<&OutlineItem> {
    let mut out = Vec::new();
    let mut stack: Vec<&OutlineItem> = items.iter().rev().collect();
    while let Some(item) = stack.pop() {
        out.push(item);
        stack.extend(item.children.iter().rev());
    }
    out
}

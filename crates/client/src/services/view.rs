use std::collections::HashSet;

use kinit_core::EntityId;
use kinit_hierarchy::{FlatNode, TreeNode, collect_expandable_keys, find, flatten};

/// What a tree page renders: the fetched tree, the filtered tree on screen,
/// its expanded rows and the active keyword.
#[derive(Debug, Clone)]
pub struct TreeView<T> {
    source: Vec<T>,
    visible: Vec<T>,
    expanded: HashSet<EntityId>,
    keyword: String,
}

impl<T> Default for TreeView<T> {
    fn default() -> Self {
        Self {
            source: Vec::new(),
            visible: Vec::new(),
            expanded: HashSet::new(),
            keyword: String::new(),
        }
    }
}

impl<T: TreeNode> TreeView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh snapshot; every parent row starts expanded.
    pub(crate) fn replace(&mut self, source: Vec<T>, visible: Vec<T>) {
        self.expanded = collect_expandable_keys(&visible).into_iter().collect();
        self.source = source;
        self.visible = visible;
    }

    /// Swap only the on-screen tree (local filtering).
    pub(crate) fn show(&mut self, visible: Vec<T>) {
        self.expanded = collect_expandable_keys(&visible).into_iter().collect();
        self.visible = visible;
    }

    pub(crate) fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// The tree as fetched, before any local filter.
    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_expanded(&self, id: &EntityId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> &HashSet<EntityId> {
        &self.expanded
    }

    pub fn toggle(&mut self, id: &EntityId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = collect_expandable_keys(&self.visible).into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Table rows: the visible tree in pre-order, with depth.
    pub fn rows(&self) -> Vec<FlatNode<'_, T>> {
        flatten(&self.visible)
    }

    pub fn find(&self, id: &EntityId) -> Option<&T> {
        find(&self.source, id)
    }
}

/// What a paginated list page renders.
#[derive(Debug, Clone)]
pub struct ListView<T, Q> {
    pub(crate) items: Vec<T>,
    pub(crate) total: u64,
    pub(crate) query: Q,
}

impl<T, Q> ListView<T, Q> {
    pub(crate) fn new(query: Q) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            query,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn query(&self) -> &Q {
        &self.query
    }
}

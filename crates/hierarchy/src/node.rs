use thiserror::Error;

use kinit_core::{Entity, EntityId};

/// A node of a parent-referencing hierarchy (department, menu, permission group).
///
/// `children` distinguishes "absent" (`None`: leaf, or never loaded) from
/// "loaded, no children" (`Some(vec![])`); the operations in this crate keep
/// that distinction intact.
pub trait TreeNode: Entity + Clone {
    fn parent_id(&self) -> Option<&EntityId>;

    /// Ordering key among siblings (ascending = earlier).
    fn sort_key(&self) -> i32;

    /// Display label.
    fn label(&self) -> &str;

    /// Text fields a keyword search looks at (name, code, path...).
    fn search_fields(&self) -> Vec<&str>;

    fn children(&self) -> Option<&[Self]>;

    fn children_mut(&mut self) -> &mut Option<Vec<Self>>;

    /// Whether this node may act as a parent (e.g. button menus may not).
    fn accepts_children(&self) -> bool {
        true
    }

    fn has_children(&self) -> bool {
        self.children().is_some_and(|c| !c.is_empty())
    }

    fn matches_keyword(&self, keyword: &str) -> bool {
        self.search_fields().iter().any(|f| f.contains(keyword))
    }
}

/// Structural-integrity failure of a tree snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("duplicate id '{0}'")]
    DuplicateId(EntityId),

    #[error("node '{id}' references missing parent '{parent}'")]
    DanglingParent { id: EntityId, parent: EntityId },

    #[error("node '{id}' is nested under '{actual}' but declares parent {declared:?}")]
    ParentMismatch {
        id: EntityId,
        declared: Option<EntityId>,
        actual: EntityId,
    },

    #[error("{0} node(s) are unreachable from any root (parent cycle)")]
    Cycle(usize),
}

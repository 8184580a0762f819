//! `kinit-hierarchy`: generic operations over parent-referencing trees.
//!
//! Department and menu trees share these functions through the [`TreeNode`]
//! trait. Every operation reads a snapshot and returns a new value; the
//! input tree is never mutated.

pub mod node;
pub mod ops;
pub mod select;

pub use node::{TreeError, TreeNode};
pub use ops::{
    FlatNode, all_ids, build_tree, collect_expandable_keys, count, descendant_ids, filter_by,
    filter_by_keyword, find, flatten, sort_siblings, validate,
};
pub use select::{SelectOption, to_selectable_tree};

//! Pure tree operations.

use std::collections::{HashMap, HashSet};

use kinit_core::EntityId;

use crate::{TreeError, TreeNode};

/// A node reference paired with its depth (roots are depth 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatNode<'a, T> {
    pub node: &'a T,
    pub depth: usize,
}

/// Keep every node that matches `keep`, plus the ancestors of matching nodes.
///
/// - A matching node is kept as-is, with its whole subtree.
/// - A non-matching node is kept only if filtering its children yields
///   something; its children are then replaced by the filtered subset.
/// - Returns a new tree; `nodes` is untouched.
pub fn filter_by<T, F>(nodes: &[T], keep: F) -> Vec<T>
where
    T: TreeNode,
    F: Fn(&T) -> bool,
{
    fn walk<T: TreeNode>(nodes: &[T], keep: &dyn Fn(&T) -> bool) -> Vec<T> {
        nodes
            .iter()
            .filter_map(|node| {
                if keep(node) {
                    return Some(node.clone());
                }
                let filtered = walk(node.children()?, keep);
                if filtered.is_empty() {
                    return None;
                }
                let mut kept = node.clone();
                *kept.children_mut() = Some(filtered);
                Some(kept)
            })
            .collect()
    }

    walk(nodes, &keep)
}

/// Case-sensitive substring search over each node's search fields.
///
/// An empty keyword returns a copy of the whole tree.
pub fn filter_by_keyword<T: TreeNode>(nodes: &[T], keyword: &str) -> Vec<T> {
    if keyword.is_empty() {
        return nodes.to_vec();
    }
    filter_by(nodes, |n| n.matches_keyword(keyword))
}

/// Pre-order (depth-first) listing: each node is followed by its subtree
/// before its next sibling.
pub fn flatten<T: TreeNode>(nodes: &[T]) -> Vec<FlatNode<'_, T>> {
    fn walk<'a, T: TreeNode>(nodes: &'a [T], depth: usize, out: &mut Vec<FlatNode<'a, T>>) {
        for node in nodes {
            out.push(FlatNode { node, depth });
            if let Some(children) = node.children() {
                walk(children, depth + 1, out);
            }
        }
    }

    let mut out = Vec::with_capacity(count(nodes));
    walk(nodes, 0, &mut out);
    out
}

/// Ids of every node with at least one child, in pre-order.
pub fn collect_expandable_keys<T: TreeNode>(nodes: &[T]) -> Vec<EntityId> {
    flatten(nodes)
        .into_iter()
        .filter(|f| f.node.has_children())
        .map(|f| f.node.id().clone())
        .collect()
}

/// Ids of every node, in pre-order.
pub fn all_ids<T: TreeNode>(nodes: &[T]) -> Vec<EntityId> {
    flatten(nodes).into_iter().map(|f| f.node.id().clone()).collect()
}

pub fn count<T: TreeNode>(nodes: &[T]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + n.children().map_or(0, count))
        .sum()
}

/// Depth-first lookup by id.
pub fn find<'a, T: TreeNode>(nodes: &'a [T], id: &EntityId) -> Option<&'a T> {
    nodes.iter().find_map(|n| {
        if n.id() == id {
            Some(n)
        } else {
            n.children().and_then(|c| find(c, id))
        }
    })
}

/// Ids of every node below `node` (not including `node`).
pub fn descendant_ids<T: TreeNode>(node: &T) -> Vec<EntityId> {
    node.children().map(all_ids).unwrap_or_default()
}

/// Sort every sibling list by `sort_key` (stable).
pub fn sort_siblings<T: TreeNode>(nodes: &mut [T]) {
    nodes.sort_by_key(T::sort_key);
    for node in nodes.iter_mut() {
        if let Some(children) = node.children_mut() {
            sort_siblings(children);
        }
    }
}

/// Check that ids are unique and that every nested node names its actual parent.
pub fn validate<T: TreeNode>(nodes: &[T]) -> Result<(), TreeError> {
    fn walk<T: TreeNode>(
        nodes: &[T],
        parent: Option<&EntityId>,
        seen: &mut HashSet<EntityId>,
    ) -> Result<(), TreeError> {
        for node in nodes {
            if !seen.insert(node.id().clone()) {
                return Err(TreeError::DuplicateId(node.id().clone()));
            }
            if let Some(actual) = parent {
                if node.parent_id() != Some(actual) {
                    return Err(TreeError::ParentMismatch {
                        id: node.id().clone(),
                        declared: node.parent_id().cloned(),
                        actual: actual.clone(),
                    });
                }
            }
            if let Some(children) = node.children() {
                walk(children, Some(node.id()), seen)?;
            }
        }
        Ok(())
    }

    walk(nodes, None, &mut HashSet::new())
}

/// Assemble a flat, parent-referencing list into a tree.
///
/// Siblings are ordered by `sort_key`. Leaves keep `children == None`.
/// Duplicate ids, dangling parent references and parent cycles are rejected.
pub fn build_tree<T: TreeNode>(flat: Vec<T>) -> Result<Vec<T>, TreeError> {
    let total = flat.len();
    let mut ids = HashSet::with_capacity(total);
    for node in &flat {
        if !ids.insert(node.id().clone()) {
            return Err(TreeError::DuplicateId(node.id().clone()));
        }
    }

    let mut by_parent: HashMap<Option<EntityId>, Vec<T>> = HashMap::new();
    for node in flat {
        if let Some(parent) = node.parent_id() {
            if !ids.contains(parent) {
                return Err(TreeError::DanglingParent {
                    id: node.id().clone(),
                    parent: parent.clone(),
                });
            }
        }
        by_parent
            .entry(node.parent_id().cloned())
            .or_default()
            .push(node);
    }

    fn attach<T: TreeNode>(
        parent: Option<EntityId>,
        by_parent: &mut HashMap<Option<EntityId>, Vec<T>>,
        placed: &mut usize,
    ) -> Vec<T> {
        let mut nodes = by_parent.remove(&parent).unwrap_or_default();
        nodes.sort_by_key(T::sort_key);
        for node in nodes.iter_mut() {
            *placed += 1;
            let children = attach(Some(node.id().clone()), by_parent, placed);
            if !children.is_empty() {
                *node.children_mut() = Some(children);
            }
        }
        nodes
    }

    let mut placed = 0;
    let roots = attach(None, &mut by_parent, &mut placed);
    if placed != total {
        return Err(TreeError::Cycle(total - placed));
    }

    tracing::trace!(nodes = total, roots = roots.len(), "tree assembled");
    Ok(roots)
}

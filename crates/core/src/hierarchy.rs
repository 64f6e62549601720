//! Notebook tree construction and ancestry checks.
//!
//! Notebooks are stored flat, each pointing at an optional parent. Reads that
//! need the hierarchy rebuild it here on demand:
//!
//! - [`build_forest`] turns the flat list into an ordered forest, optionally
//!   attaching each notebook's notes.
//! - [`would_create_cycle`] guards moves so a notebook never becomes its own
//!   ancestor.
//!
//! Construction indexes children by parent id once and walks the index with
//! an explicit stack, so depth never grows the call stack.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// An item that sits in the notebook hierarchy.
pub trait Hierarchical {
    fn node_id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn created_at(&self) -> Timestamp;
}

/// An item that hangs off a hierarchy node without being one (a note).
pub trait Attached {
    /// The node this item is filed under, if any.
    fn owner_id(&self) -> Option<DbId>;
}

/// One node of the built forest.
///
/// Serializes as the item's own fields plus `children` and, when leaves were
/// requested, `notes`.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T, L> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T, L>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<L>>,
}

#[cfg(test)]
impl<T, L> TreeNode<T, L> {
    /// Number of nodes in this subtree, including this one.
    fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Build the ordered forest for one user's notebooks.
///
/// Roots are items without a parent. Siblings are ordered by ascending
/// creation time, ties broken by id. An item whose parent is missing from
/// `items` (or which sits on a parent cycle) is unreachable from any root and
/// is left out; this is not an error.
///
/// When `leaves` is given, every node gets a `notes` list holding the leaves
/// whose owner is that node, in the order they appear in `leaves`.
pub fn build_forest<T, L>(items: &[T], leaves: Option<&[L]>) -> Vec<TreeNode<T, L>>
where
    T: Hierarchical + Clone,
    L: Attached + Clone,
{
    let mut by_parent: HashMap<Option<DbId>, Vec<usize>> = HashMap::new();
    for (idx, item) in items.iter().enumerate() {
        by_parent.entry(item.parent_id()).or_default().push(idx);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|&a, &b| {
            items[a]
                .created_at()
                .cmp(&items[b].created_at())
                .then_with(|| items[a].node_id().cmp(&items[b].node_id()))
        });
    }

    let mut leaves_by_owner: Option<HashMap<DbId, Vec<L>>> = leaves.map(|leaves| {
        let mut grouped: HashMap<DbId, Vec<L>> = HashMap::new();
        for leaf in leaves {
            if let Some(owner) = leaf.owner_id() {
                grouped.entry(owner).or_default().push(leaf.clone());
            }
        }
        grouped
    });

    let roots = by_parent.get(&None).cloned().unwrap_or_default();

    // Pre-order walk from the roots. Every reachable index is recorded once.
    let mut order: Vec<usize> = Vec::with_capacity(items.len());
    let mut seen: HashSet<DbId> = HashSet::with_capacity(items.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        let id = items[idx].node_id();
        if !seen.insert(id) {
            continue;
        }
        order.push(idx);
        if let Some(children) = by_parent.get(&Some(id)) {
            stack.extend(children.iter().rev().copied());
        }
    }

    // Assemble bottom-up: reverse pre-order visits every child before its parent.
    let mut built: HashMap<usize, TreeNode<T, L>> = HashMap::with_capacity(order.len());
    for &idx in order.iter().rev() {
        let id = items[idx].node_id();
        let children: Vec<TreeNode<T, L>> = by_parent
            .get(&Some(id))
            .map(|kids| kids.iter().filter_map(|k| built.remove(k)).collect())
            .unwrap_or_default();
        let notes = leaves_by_owner
            .as_mut()
            .map(|grouped| grouped.remove(&id).unwrap_or_default());
        built.insert(
            idx,
            TreeNode {
                item: items[idx].clone(),
                children,
                notes,
            },
        );
    }

    roots.iter().filter_map(|idx| built.remove(idx)).collect()
}

/// Parent chain of `id`, nearest first. Stops at a root, at a dangling parent
/// reference, or when a cycle is detected.
pub fn ancestors_of<T: Hierarchical>(items: &[T], id: DbId) -> Vec<DbId> {
    let parents: HashMap<DbId, Option<DbId>> = items
        .iter()
        .map(|item| (item.node_id(), item.parent_id()))
        .collect();

    let mut chain = Vec::new();
    let mut seen = HashSet::from([id]);
    let mut current = parents.get(&id).copied().flatten();
    while let Some(parent) = current {
        if !seen.insert(parent) {
            break;
        }
        chain.push(parent);
        current = parents.get(&parent).copied().flatten();
    }
    chain
}

/// Whether re-parenting `node` under `new_parent` would make `node` its own
/// ancestor.
pub fn would_create_cycle<T: Hierarchical>(
    items: &[T],
    node: DbId,
    new_parent: Option<DbId>,
) -> bool {
    match new_parent {
        None => false,
        Some(parent) if parent == node => true,
        Some(parent) => ancestors_of(items, parent).contains(&node),
    }
}

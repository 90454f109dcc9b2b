// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{NodeId, NodePath, NodeTree, TreeTypes};

/// One element of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub id: NodeId,
    pub label: String,
}

/// Result of deriving a breadcrumb trail for a view path.
///
/// A stale path (e.g. the viewed node was removed by an earlier operation)
/// is not an error: the caller is expected to reset its view path to the
/// root and re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breadcrumbs {
    /// Every prefix of the path resolved, root to tip.
    Trail(Vec<Breadcrumb>),

    /// Some prefix no longer resolves; reset the view path to root.
    Stale,
}

impl Breadcrumbs {
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

impl<T: TreeTypes> NodeTree<T> {
    /// Derive the display trail for `path`, root to tip.
    ///
    /// Pure and stateless; recomputed per render. Trees are small, so no
    /// caching is needed.
    #[must_use]
    pub fn breadcrumbs_for(&self, path: &NodePath) -> Breadcrumbs {
        let mut trail = Vec::with_capacity(path.len());
        let mut children: &[NodeId] = self.top_level_children();
        for id in path.node_ids() {
            if !children.contains(&id) {
                return Breadcrumbs::Stale;
            }
            let Some(node) = self.lookup_node(id) else {
                return Breadcrumbs::Stale;
            };
            trail.push(Breadcrumb {
                id,
                label: node.label.clone(),
            });
            children = node.children();
        }
        Breadcrumbs::Trail(trail)
    }
}

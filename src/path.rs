// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Ordered sequence of stable node ids locating a node from the tree root.
///
/// The empty path denotes the implicit root container. Paths never contain
/// positional indices; a position within a sibling list is derived only
/// when needed and never stored as an addressing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(Vec<NodeId>);

impl NodePath {
    /// The empty path addressing the implicit root container.
    pub const ROOT: Self = Self(Vec::new());

    #[must_use]
    pub const fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the ids from the root down to the target.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    /// The id of the addressed node, i.e. the last path element.
    ///
    /// `None` for the root path.
    #[must_use]
    pub fn leaf_id(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    /// The path of the parent container.
    ///
    /// The root path is its own parent.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut ids = self.0.clone();
        ids.pop();
        Self(ids)
    }

    /// Extend the path by one child id.
    #[must_use]
    pub fn child(&self, id: NodeId) -> Self {
        let mut ids = self.0.clone();
        ids.push(id);
        Self(ids)
    }

    /// Whether `self` equals `prefix` or descends from it.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for id in &self.0 {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

impl From<Vec<NodeId>> for NodePath {
    fn from(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<NodeId> for NodePath {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The "current view path" of a UI session.
///
/// Pure path-stack state living outside the tree: entering a folder pushes
/// its id, going up pops, a breadcrumb click replaces the whole path. None
/// of the transitions touch any tree snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPath {
    path: NodePath,
}

impl ViewPath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Enter the child with the given id.
    pub fn push(&mut self, id: NodeId) {
        self.path.0.push(id);
    }

    /// Go up one level. Returns the id that was left, if any.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.path.0.pop()
    }

    /// Back to the root, e.g. after the viewed node disappeared.
    pub fn reset(&mut self) {
        self.path.0.clear();
    }

    /// Jump to an arbitrary path, e.g. from a breadcrumb click.
    pub fn set_to(&mut self, path: NodePath) {
        self.path = path;
    }
}

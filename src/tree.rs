// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use std::{collections::HashSet, fmt, sync::Arc};

use thiserror::Error;

use crate::{HashMap, Node, NodeBody, NodeFieldsMut, NodeId, NodePath};

/// Type system for [`NodeTree`].
///
/// Adapters pin down the payload shapes for their use site by implementing
/// this trait on a marker type.
pub trait TreeTypes: Clone + Default + fmt::Debug {
    type ContainerPayload: Clone + fmt::Debug;
    type LeafPayload: Clone + fmt::Debug;
}

/// Error surface of all tree operations.
///
/// No panics or exceptions cross the crate boundary; every operation
/// returns an explicit result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A path, or a prefix of it, does not resolve in the given tree.
    #[error("path does not resolve to a node")]
    PathNotFound,

    /// An insert or move targets a parent that is a leaf.
    #[error("parent is a leaf and cannot hold children")]
    ParentIsLeaf,

    /// A move would nest a node under its own descendant.
    #[error("node cannot become its own descendant")]
    Cycle,

    /// A caller-supplied id collides with an existing one.
    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),

    /// Deserialization encountered malformed or structurally
    /// inconsistent input.
    #[error("invalid serialized form: {reason}")]
    InvalidSerializedForm { reason: String },
}

/// Sibling position for insert operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPosition {
    /// Append after the last sibling.
    #[default]
    End,

    /// Insert before the sibling currently at this index.
    ///
    /// Indices beyond the sibling count clamp to append.
    At(usize),
}

impl InsertPosition {
    fn clamp_to(self, len: usize) -> usize {
        match self {
            Self::End => len,
            Self::At(index) => index.min(len),
        }
    }
}

/// A subtree detached by [`NodeTree::remove_node`].
///
/// Keeps the extracted nodes alive so callers can offer undo via
/// [`NodeTree::insert_subtree`].
#[derive(Debug, Clone)]
pub struct RemovedSubtree<T>
where
    T: TreeTypes,
{
    pub(crate) root: Arc<Node<T>>,
    pub(crate) nodes: HashMap<NodeId, Arc<Node<T>>>,
}

impl<T: TreeTypes> RemovedSubtree<T> {
    /// The root node of the detached subtree.
    #[must_use]
    pub fn root(&self) -> &Arc<Node<T>> {
        &self.root
    }

    /// Total number of nodes in the detached subtree, root included.
    #[must_use]
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of all detached nodes, in no particular order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }
}

/// Cheaply clonable ordered tree of immutable nodes.
///
/// Nodes live in an arena keyed by id and reference their children by id,
/// so snapshots produced by editing operations share all untouched nodes
/// with their predecessors. The root is an implicit container: it has no
/// id, carries no payload, and is addressed by the empty [`NodePath`].
///
/// Could be shared safely between multiple threads.
#[derive(Debug, Clone)]
pub struct NodeTree<T>
where
    T: TreeTypes,
{
    pub(crate) nodes: HashMap<NodeId, Arc<Node<T>>>,
    pub(crate) root_children: Vec<NodeId>,
}

impl<T: TreeTypes> Default for NodeTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeTypes> NodeTree<T> {
    /// Create a new, empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_children: Vec::new(),
        }
    }

    /// Resolve an existing node by its id.
    ///
    /// Only used internally for node ids that must exist. If the node does
    /// not exist the tree is in an inconsistent state!
    ///
    /// # Panics
    ///
    /// Panics if the node does not exist.
    #[must_use]
    pub(crate) fn arena_node(&self, id: NodeId) -> &Arc<Node<T>> {
        self.nodes.get(&id).expect("node exists")
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn lookup_node(&self, id: NodeId) -> Option<&Arc<Node<T>>> {
        self.nodes.get(&id)
    }

    /// All nodes in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<Node<T>>> {
        self.nodes.values()
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn nodes_count(&self) -> usize {
        let count = self.nodes.len();
        // Verify invariants
        debug_assert_eq!(count, self.count_recursively(&self.root_children));
        count
    }

    fn count_recursively(&self, children: &[NodeId]) -> usize {
        children
            .iter()
            .map(|id| 1 + self.count_recursively(self.arena_node(*id).children()))
            .sum()
    }

    /// Number of nodes in the subtree below the given node.
    ///
    /// Returns `None` if the node is not found.
    #[must_use]
    pub fn descendant_count(&self, id: NodeId) -> Option<usize> {
        self.lookup_node(id)
            .map(|node| self.count_recursively(node.children()))
    }

    /// Ordered ids of the top-level nodes.
    #[must_use]
    pub fn top_level_children(&self) -> &[NodeId] {
        &self.root_children
    }

    /// Resolve the node addressed by `path`.
    ///
    /// The empty path addresses the implicit root container, which is not
    /// itself a node, and therefore reports [`TreeError::PathNotFound`].
    /// A leaf in an interior position reports [`TreeError::ParentIsLeaf`].
    pub fn resolve(&self, path: &NodePath) -> Result<&Arc<Node<T>>, TreeError> {
        let mut children: &[NodeId] = &self.root_children;
        let mut resolved: Option<&Arc<Node<T>>> = None;
        for id in path.node_ids() {
            if let Some(node) = resolved {
                match &node.body {
                    NodeBody::Container(container) => children = &container.children,
                    NodeBody::Leaf(_) => return Err(TreeError::ParentIsLeaf),
                }
            }
            if !children.contains(&id) {
                return Err(TreeError::PathNotFound);
            }
            resolved = Some(self.arena_node(id));
        }
        resolved.ok_or(TreeError::PathNotFound)
    }

    /// Resolve the parent container of the node addressed by `path`,
    /// together with the node's index among its siblings.
    pub fn resolve_parent(&self, path: &NodePath) -> Result<(NodePath, usize), TreeError> {
        let leaf_id = path.leaf_id().ok_or(TreeError::PathNotFound)?;
        self.resolve(path)?;
        let parent_path = path.parent();
        let siblings = self.children_of(&parent_path)?;
        let index = siblings
            .iter()
            .position(|id| *id == leaf_id)
            .ok_or(TreeError::PathNotFound)?;
        Ok((parent_path, index))
    }

    /// Ordered child ids of the container addressed by `path`.
    ///
    /// Accepts the root path, unlike [`Self::resolve`].
    pub fn children_of(&self, path: &NodePath) -> Result<&[NodeId], TreeError> {
        if path.is_root() {
            return Ok(&self.root_children);
        }
        let node = self.resolve(path)?;
        match &node.body {
            NodeBody::Container(container) => Ok(&container.children),
            NodeBody::Leaf(_) => Err(TreeError::ParentIsLeaf),
        }
    }

    /// Rewrite the child list of the container addressed by `parent_path`.
    ///
    /// Replaces only the parent node in the arena; all other nodes are
    /// shared with the previous snapshot.
    fn rewrite_children(
        &mut self,
        parent_path: &NodePath,
        edit: impl FnOnce(&mut Vec<NodeId>),
    ) -> Result<(), TreeError> {
        if parent_path.is_root() {
            edit(&mut self.root_children);
            return Ok(());
        }
        let mut parent = (**self.resolve(parent_path)?).clone();
        match &mut parent.body {
            NodeBody::Container(container) => edit(&mut container.children),
            NodeBody::Leaf(_) => return Err(TreeError::ParentIsLeaf),
        }
        let parent_id = parent.id;
        self.nodes.insert(parent_id, Arc::new(parent));
        Ok(())
    }

    /// Insert a single node as a child of the container at `parent_path`.
    ///
    /// The node must have been freshly created and therefore has no
    /// children yet. Returns the new snapshot; the receiver is unchanged.
    pub fn insert_child(
        &self,
        parent_path: &NodePath,
        node: Node<T>,
        position: InsertPosition,
    ) -> Result<Self, TreeError> {
        self.insert_batch(parent_path, vec![node], position)
    }

    /// Atomically append a batch of nodes as siblings, in the given order.
    ///
    /// Either all nodes are inserted or, on any error, none are.
    pub fn insert_children(
        &self,
        parent_path: &NodePath,
        nodes: Vec<Node<T>>,
    ) -> Result<Self, TreeError> {
        self.insert_batch(parent_path, nodes, InsertPosition::End)
    }

    fn insert_batch(
        &self,
        parent_path: &NodePath,
        nodes: Vec<Node<T>>,
        position: InsertPosition,
    ) -> Result<Self, TreeError> {
        // Validate everything before touching anything.
        self.children_of(parent_path)?;
        let mut batch_ids = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if self.nodes.contains_key(&node.id) || !batch_ids.insert(node.id) {
                return Err(TreeError::DuplicateId(node.id));
            }
            debug_assert!(node.children().is_empty());
        }
        let inserted_ids: Vec<NodeId> = nodes.iter().map(|node| node.id).collect();
        let mut next = self.clone();
        for node in nodes {
            next.nodes.insert(node.id, Arc::new(node));
        }
        next.rewrite_children(parent_path, |children| {
            let index = position.clamp_to(children.len());
            for (offset, id) in inserted_ids.iter().copied().enumerate() {
                children.insert(index + offset, id);
            }
        })?;
        log::debug!(
            "Inserted {count} node(s) under {parent_path}",
            count = inserted_ids.len()
        );
        debug_assert_eq!(next.nodes_count(), self.nodes_count() + inserted_ids.len());
        Ok(next)
    }

    /// Apply `update` to the label/payload of the node at `path`.
    ///
    /// The updater receives a [`NodeFieldsMut`] view that cannot reach the
    /// child list, so the pre-update children are preserved structurally.
    pub fn update_node(
        &self,
        path: &NodePath,
        update: impl FnOnce(NodeFieldsMut<'_, T>),
    ) -> Result<Self, TreeError> {
        let mut node = (**self.resolve(path)?).clone();
        let Node { id: _, label, body } = &mut node;
        let fields = match body {
            NodeBody::Container(container) => NodeFieldsMut::Container {
                label,
                payload: &mut container.payload,
            },
            NodeBody::Leaf(leaf) => NodeFieldsMut::Leaf {
                label,
                payload: &mut leaf.payload,
            },
        };
        update(fields);
        let mut next = self.clone();
        log::debug!("Updated node {id} at {path}", id = node.id);
        next.nodes.insert(node.id, Arc::new(node));
        debug_assert_eq!(next.nodes_count(), self.nodes_count());
        Ok(next)
    }

    /// Remove the node at `path` together with its entire subtree.
    ///
    /// Returns the new snapshot and the detached subtree so callers may
    /// offer undo. The receiver snapshot remains fully valid.
    pub fn remove_node(&self, path: &NodePath) -> Result<(Self, RemovedSubtree<T>), TreeError> {
        let node = Arc::clone(self.resolve(path)?);
        let mut next = self.clone();
        next.rewrite_children(&path.parent(), |children| {
            children.retain(|child| *child != node.id);
        })?;
        let mut removed = HashMap::new();
        next.extract_subtree(node.id, &mut removed);
        log::debug!(
            "Removed {count} node(s) at {path}",
            count = removed.len()
        );
        debug_assert_eq!(next.nodes_count() + removed.len(), self.nodes_count());
        Ok((
            next,
            RemovedSubtree {
                root: node,
                nodes: removed,
            },
        ))
    }

    fn extract_subtree(&mut self, id: NodeId, removed: &mut HashMap<NodeId, Arc<Node<T>>>) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        let child_ids: Vec<NodeId> = node.children().to_vec();
        removed.insert(id, node);
        for child_id in child_ids {
            self.extract_subtree(child_id, removed);
        }
    }

    /// Detach the subtree at `source_path` and re-insert it as a child of
    /// the container at `dest_parent_path`, before the sibling currently
    /// at `dest_index` (interpreted against the post-detach sibling list,
    /// clamped to append).
    ///
    /// Fails with [`TreeError::Cycle`] if the destination parent path
    /// equals or descends from the source path.
    pub fn move_node(
        &self,
        source_path: &NodePath,
        dest_parent_path: &NodePath,
        dest_index: usize,
    ) -> Result<Self, TreeError> {
        let source_id = self.resolve(source_path)?.id;
        if dest_parent_path.starts_with(source_path) {
            return Err(TreeError::Cycle);
        }
        self.children_of(dest_parent_path)?;
        let mut next = self.clone();
        next.rewrite_children(&source_path.parent(), |children| {
            children.retain(|child| *child != source_id);
        })?;
        next.rewrite_children(dest_parent_path, |children| {
            let index = dest_index.min(children.len());
            children.insert(index, source_id);
        })?;
        log::debug!("Moved node {source_id} from {source_path} under {dest_parent_path}");
        debug_assert_eq!(next.nodes_count(), self.nodes_count());
        Ok(next)
    }

    /// Re-attach a previously removed subtree under the container at
    /// `parent_path`.
    ///
    /// Completes the undo story for [`Self::remove_node`]. Atomic: all ids
    /// are validated against the arena before anything is attached.
    pub fn insert_subtree(
        &self,
        parent_path: &NodePath,
        subtree: RemovedSubtree<T>,
        position: InsertPosition,
    ) -> Result<Self, TreeError> {
        self.children_of(parent_path)?;
        for id in subtree.node_ids() {
            if self.nodes.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }
        }
        let root_id = subtree.root.id;
        let subtree_len = subtree.nodes_count();
        let mut next = self.clone();
        for (id, node) in subtree.nodes {
            next.nodes.insert(id, node);
        }
        next.rewrite_children(parent_path, |children| {
            let index = position.clamp_to(children.len());
            children.insert(index, root_id);
        })?;
        log::debug!("Re-attached subtree {root_id} under {parent_path}");
        debug_assert_eq!(next.nodes_count(), self.nodes_count() + subtree_len);
        Ok(next)
    }
}

// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

use crate::{NodeId, TreeTypes};

/// Discriminates the two node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Leaf,
}

/// A node in the tree.
///
/// The label is the display string (folder name or menu-item label).
/// Everything else that distinguishes containers from leaves lives in
/// [`NodeBody`].
#[derive(Debug, Clone)]
pub struct Node<T: TreeTypes> {
    /// Stable identifier, assigned on creation.
    pub id: NodeId,

    /// Display string.
    pub label: String,

    /// Kind-specific content.
    pub body: NodeBody<T>,
}

#[derive(Debug, Clone)]
pub enum NodeBody<T>
where
    T: TreeTypes,
{
    Container(ContainerNode<T>),
    Leaf(LeafNode<<T as TreeTypes>::LeafPayload>),
}

impl<T: TreeTypes> Node<T> {
    /// Create a new container node with no children.
    ///
    /// A fresh id is generated at this moment.
    #[must_use]
    pub fn new_container(label: impl Into<String>, payload: T::ContainerPayload) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
            body: NodeBody::Container(ContainerNode::new(payload)),
        }
    }

    /// Create a new leaf node.
    ///
    /// A fresh id is generated at this moment.
    #[must_use]
    pub fn new_leaf(label: impl Into<String>, payload: T::LeafPayload) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
            body: NodeBody::Leaf(LeafNode::new(payload)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Container(_) => NodeKind::Container,
            NodeBody::Leaf(_) => NodeKind::Leaf,
        }
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.body, NodeBody::Container(_))
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.body, NodeBody::Leaf(_))
    }

    /// Ordered ids of the direct children.
    ///
    /// Empty for leaves, which cannot hold children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Container(container) => &container.children,
            NodeBody::Leaf(_) => &[],
        }
    }

    #[must_use]
    pub const fn container_payload(&self) -> Option<&T::ContainerPayload> {
        match &self.body {
            NodeBody::Container(ContainerNode { payload, .. }) => Some(payload),
            NodeBody::Leaf(LeafNode { .. }) => None,
        }
    }

    #[must_use]
    pub const fn leaf_payload(&self) -> Option<&T::LeafPayload> {
        match &self.body {
            NodeBody::Leaf(LeafNode { payload }) => Some(payload),
            NodeBody::Container(ContainerNode { .. }) => None,
        }
    }
}

/// Intrinsic data of a container node.
#[derive(Debug, Clone)]
pub struct ContainerNode<T>
where
    T: TreeTypes,
{
    pub payload: <T as TreeTypes>::ContainerPayload,

    /// Ordered child ids. Sibling order is semantically significant.
    pub(crate) children: Vec<NodeId>,
}

impl<T> ContainerNode<T>
where
    T: TreeTypes,
{
    /// Construct an empty container node with no children.
    pub const fn new(payload: <T as TreeTypes>::ContainerPayload) -> Self {
        Self {
            payload,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Intrinsic data of a leaf node.
#[derive(Debug, Clone)]
pub struct LeafNode<V> {
    pub payload: V,
}

impl<V> LeafNode<V> {
    /// Construct a leaf node.
    pub const fn new(payload: V) -> Self {
        Self { payload }
    }
}

/// Mutable view handed to [`crate::NodeTree::update_node`] updaters.
///
/// Exposes only the label and the payload. The child list is structurally
/// unreachable from here, so an unrelated field edit can never truncate a
/// subtree.
#[derive(Debug)]
pub enum NodeFieldsMut<'a, T>
where
    T: TreeTypes,
{
    Container {
        label: &'a mut String,
        payload: &'a mut T::ContainerPayload,
    },
    Leaf {
        label: &'a mut String,
        payload: &'a mut T::LeafPayload,
    },
}

impl<T: TreeTypes> NodeFieldsMut<'_, T> {
    /// The label, regardless of node kind.
    pub fn label_mut(&mut self) -> &mut String {
        match self {
            Self::Container { label, .. } | Self::Leaf { label, .. } => &mut **label,
        }
    }
}

// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

//! Navigation menu adapter.
//!
//! Every menu item is clickable and may have sub-items at the same time,
//! so this adapter creates all nodes as containers and never distinguishes
//! node kinds. That is a deliberate relaxation at the adapter level; the
//! generic tree invariants are untouched.

use serde::{Deserialize, Serialize};

use crate::{
    Breadcrumbs, InsertPosition, Node, NodeFieldsMut, NodeId, NodePath, NodeTree, RemovedSubtree,
    TreeError, TreeTypes,
};

/// What a menu item links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuTargetKind {
    Page,
    Post,
    Category,
    Product,
    Custom,
}

/// Where a menu item opens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenTarget {
    #[serde(rename = "self")]
    SameWindow,
    #[serde(rename = "blank")]
    NewWindow,
}

/// Navigation payload carried by every menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuTarget {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MenuTargetKind,
    pub open_target: OpenTarget,
}

impl MenuTarget {
    /// A custom URL opening in the same window.
    #[must_use]
    pub fn custom(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MenuTargetKind::Custom,
            open_target: OpenTarget::SameWindow,
        }
    }
}

/// Type system of the menu tree.
///
/// Both payload positions carry a [`MenuTarget`]; the adapter only ever
/// creates containers, so the leaf position exists solely to satisfy the
/// generic model (and to tolerate hand-edited stored JSON).
#[derive(Debug, Clone, Default)]
pub struct MenuTypes;

impl TreeTypes for MenuTypes {
    type ContainerPayload = MenuTarget;
    type LeafPayload = MenuTarget;
}

/// Multi-level navigation menu.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    tree: NodeTree<MenuTypes>,
}

impl MenuTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn tree(&self) -> &NodeTree<MenuTypes> {
        &self.tree
    }

    /// Append a menu item under the item at `parent`.
    ///
    /// Items are always created as containers, so nesting below them is
    /// permitted at any depth.
    pub fn add_item(
        &self,
        parent: &NodePath,
        label: impl Into<String>,
        target: MenuTarget,
    ) -> Result<(Self, NodeId), TreeError> {
        let item = Node::new_container(label, target);
        let item_id = item.id;
        let tree = self.tree.insert_child(parent, item, InsertPosition::End)?;
        Ok((Self { tree }, item_id))
    }

    /// Edit the label and/or target of the item at `path`.
    ///
    /// Sub-items are preserved no matter what the updater does.
    pub fn update_item(
        &self,
        path: &NodePath,
        update: impl FnOnce(&mut String, &mut MenuTarget),
    ) -> Result<Self, TreeError> {
        let tree = self.tree.update_node(path, |fields| match fields {
            NodeFieldsMut::Container { label, payload }
            | NodeFieldsMut::Leaf { label, payload } => update(label, payload),
        })?;
        Ok(Self { tree })
    }

    /// Remove the item at `path` together with all of its sub-items.
    pub fn remove(&self, path: &NodePath) -> Result<(Self, RemovedSubtree<MenuTypes>), TreeError> {
        let (tree, removed) = self.tree.remove_node(path)?;
        Ok((Self { tree }, removed))
    }

    /// Re-nest or reorder an item, e.g. after a completed drag.
    pub fn move_item(
        &self,
        source: &NodePath,
        dest_parent: &NodePath,
        dest_index: usize,
    ) -> Result<Self, TreeError> {
        let tree = self.tree.move_node(source, dest_parent, dest_index)?;
        Ok(Self { tree })
    }

    /// Display trail for the given path.
    #[must_use]
    pub fn breadcrumbs(&self, path: &NodePath) -> Breadcrumbs {
        self.tree.breadcrumbs_for(path)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        self.tree.to_json_string()
    }

    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let tree = NodeTree::from_json_str(json)?;
        Ok(Self { tree })
    }
}

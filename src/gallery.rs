// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

//! Media gallery adapter.
//!
//! Folders are containers, images are leaves. Enforces the payload shape
//! for both: a leaf always carries a [`MediaRef`], a folder carries no
//! payload beyond its label.

use serde::{Deserialize, Serialize};

use crate::{
    Breadcrumbs, InsertPosition, Node, NodeId, NodePath, NodeTree, RemovedSubtree, TreeError,
    TreeTypes, ViewPath,
};

/// Reference to an uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
}

/// Folders carry no payload beyond their label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMeta {}

/// Type system of the gallery tree.
#[derive(Debug, Clone, Default)]
pub struct GalleryTypes;

impl TreeTypes for GalleryTypes {
    type ContainerPayload = FolderMeta;
    type LeafPayload = MediaRef;
}

/// Nested media-gallery folders attached to a post or page.
///
/// A thin wrapper over [`NodeTree`] that constrains payloads and call-site
/// semantics. Like the tree itself, every edit returns a new snapshot and
/// leaves the receiver untouched.
#[derive(Debug, Clone, Default)]
pub struct GalleryTree {
    tree: NodeTree<GalleryTypes>,
}

impl GalleryTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn tree(&self) -> &NodeTree<GalleryTypes> {
        &self.tree
    }

    /// Append an empty folder under the container at `parent`.
    pub fn add_folder(
        &self,
        parent: &NodePath,
        label: impl Into<String>,
    ) -> Result<(Self, NodeId), TreeError> {
        let folder = Node::new_container(label, FolderMeta::default());
        let folder_id = folder.id;
        let tree = self
            .tree
            .insert_child(parent, folder, InsertPosition::End)?;
        Ok((Self { tree }, folder_id))
    }

    /// Atomically append one image leaf per uploaded URL, in upload order.
    ///
    /// Labels default to the final path segment of each URL. Either all
    /// images are inserted or none.
    pub fn add_images(
        &self,
        parent: &NodePath,
        urls: impl IntoIterator<Item = String>,
    ) -> Result<(Self, Vec<NodeId>), TreeError> {
        let leaves: Vec<Node<GalleryTypes>> = urls
            .into_iter()
            .map(|url| {
                let label = image_label(&url);
                Node::new_leaf(label, MediaRef { url })
            })
            .collect();
        let image_ids = leaves.iter().map(|leaf| leaf.id).collect();
        let tree = self.tree.insert_children(parent, leaves)?;
        Ok((Self { tree }, image_ids))
    }

    /// Rename the folder or image at `path`.
    pub fn rename(&self, path: &NodePath, label: impl Into<String>) -> Result<Self, TreeError> {
        let label = label.into();
        let tree = self.tree.update_node(path, |mut fields| {
            *fields.label_mut() = label;
        })?;
        Ok(Self { tree })
    }

    /// Remove the folder or image at `path`, subtree included.
    pub fn remove(
        &self,
        path: &NodePath,
    ) -> Result<(Self, RemovedSubtree<GalleryTypes>), TreeError> {
        let (tree, removed) = self.tree.remove_node(path)?;
        Ok((Self { tree }, removed))
    }

    /// Re-file an item under another folder, e.g. after a completed drag.
    pub fn move_item(
        &self,
        source: &NodePath,
        dest_parent: &NodePath,
        dest_index: usize,
    ) -> Result<Self, TreeError> {
        let tree = self.tree.move_node(source, dest_parent, dest_index)?;
        Ok(Self { tree })
    }

    /// Descend the view into a child folder of the currently viewed one.
    ///
    /// Validates that `folder_id` is a direct child and actually a folder
    /// before pushing it onto the view path.
    pub fn enter_folder(&self, view: &mut ViewPath, folder_id: NodeId) -> Result<(), TreeError> {
        let children = self.tree.children_of(view.path())?;
        if !children.contains(&folder_id) {
            return Err(TreeError::PathNotFound);
        }
        let node = self
            .tree
            .lookup_node(folder_id)
            .ok_or(TreeError::PathNotFound)?;
        if node.is_leaf() {
            return Err(TreeError::ParentIsLeaf);
        }
        view.push(folder_id);
        Ok(())
    }

    /// Ascend the view one folder. Returns the folder that was left.
    pub fn go_up(view: &mut ViewPath) -> Option<NodeId> {
        view.pop()
    }

    /// Display trail for the given view path.
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

fn image_label(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(url)
        .to_owned()
}

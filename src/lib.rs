// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

//! Immutable, ordered tree with stable-id path addressing.
//!
//! One consolidated hierarchical node store for the two admin-UI use sites
//! that previously each hand-rolled their own: nested media-gallery
//! folders ([`GalleryTree`]) and multi-level navigation menus
//! ([`MenuTree`]). Every editing operation is pure: it returns a new
//! snapshot sharing all untouched nodes with its predecessor, so keeping
//! the old tree around for "cancel edit" is cheap and correct.

mod breadcrumb;
pub use self::breadcrumb::{Breadcrumb, Breadcrumbs};

mod gallery;
pub use self::gallery::{FolderMeta, GalleryTree, GalleryTypes, MediaRef};

mod json;

mod menu;
pub use self::menu::{MenuTarget, MenuTargetKind, MenuTree, MenuTypes, OpenTarget};

mod node;
pub use self::node::{ContainerNode, LeafNode, Node, NodeBody, NodeFieldsMut, NodeKind};

mod node_id;
pub use self::node_id::NodeId;

mod path;
pub use self::path::{NodePath, ViewPath};

mod tree;
pub use self::tree::{InsertPosition, NodeTree, RemovedSubtree, TreeError, TreeTypes};

#[cfg(feature = "im")]
type HashMap<K, V> = im::HashMap<K, V>;

#[cfg(not(feature = "im"))]
type HashMap<K, V> = std::collections::HashMap<K, V>;

#[cfg(test)]
mod tests;

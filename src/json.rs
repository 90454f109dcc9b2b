// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

//! Serialized form of a tree.
//!
//! Trees persist as nested JSON, internally tagged by `kind` with payload
//! fields flattened inline:
//!
//! ```json
//! { "children": [
//!   { "kind": "container", "id": 3, "label": "Banners", "children": [
//!     { "kind": "leaf", "id": 4, "label": "a.png", "url": "https://cdn/a.png" } ] } ] }
//! ```
//!
//! Deserialization validates the structure (unique ids, childless leaves)
//! and reports failures as [`TreeError::InvalidSerializedForm`].

use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ContainerNode, HashMap, LeafNode, Node, NodeBody, NodeId, NodeTree, TreeError, TreeTypes,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "lowercase",
    bound(
        serialize = "C: Serialize, L: Serialize",
        deserialize = "C: Deserialize<'de>, L: Deserialize<'de>"
    )
)]
enum NodeRepr<C, L> {
    Container {
        id: NodeId,
        label: String,
        #[serde(flatten)]
        payload: C,
        #[serde(default)]
        children: Vec<NodeRepr<C, L>>,
    },
    Leaf {
        id: NodeId,
        label: String,
        #[serde(flatten)]
        payload: L,
        // Accepted on input only so that a leaf carrying children can be
        // reported instead of silently dropped.
        #[serde(default, skip_serializing)]
        children: Vec<NodeRepr<C, L>>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize, L: Serialize",
    deserialize = "C: Deserialize<'de>, L: Deserialize<'de>"
))]
struct TreeRepr<C, L> {
    #[serde(default)]
    children: Vec<NodeRepr<C, L>>,
}

fn tree_repr<T: TreeTypes>(tree: &NodeTree<T>) -> TreeRepr<T::ContainerPayload, T::LeafPayload> {
    TreeRepr {
        children: tree
            .top_level_children()
            .iter()
            .map(|id| node_repr(tree, *id))
            .collect(),
    }
}

fn node_repr<T: TreeTypes>(
    tree: &NodeTree<T>,
    id: NodeId,
) -> NodeRepr<T::ContainerPayload, T::LeafPayload> {
    let node = tree.arena_node(id);
    match &node.body {
        NodeBody::Container(container) => NodeRepr::Container {
            id: node.id,
            label: node.label.clone(),
            payload: container.payload.clone(),
            children: container
                .children()
                .iter()
                .map(|child_id| node_repr(tree, *child_id))
                .collect(),
        },
        NodeBody::Leaf(leaf) => NodeRepr::Leaf {
            id: node.id,
            label: node.label.clone(),
            payload: leaf.payload.clone(),
            children: Vec::new(),
        },
    }
}

fn build_tree<T: TreeTypes>(
    repr: TreeRepr<T::ContainerPayload, T::LeafPayload>,
) -> Result<NodeTree<T>, TreeError> {
    let mut nodes = HashMap::new();
    let mut root_children = Vec::with_capacity(repr.children.len());
    for child in repr.children {
        root_children.push(build_node(child, &mut nodes)?);
    }
    Ok(NodeTree {
        nodes,
        root_children,
    })
}

fn build_node<T: TreeTypes>(
    repr: NodeRepr<T::ContainerPayload, T::LeafPayload>,
    nodes: &mut HashMap<NodeId, Arc<Node<T>>>,
) -> Result<NodeId, TreeError> {
    let node = match repr {
        NodeRepr::Container {
            id,
            label,
            payload,
            children,
        } => {
            let mut child_ids = Vec::with_capacity(children.len());
            for child in children {
                child_ids.push(build_node(child, nodes)?);
            }
            Node {
                id,
                label,
                body: NodeBody::Container(ContainerNode {
                    payload,
                    children: child_ids,
                }),
            }
        }
        NodeRepr::Leaf {
            id,
            label,
            payload,
            children,
        } => {
            if !children.is_empty() {
                return Err(invalid(format!("leaf node {id} must not have children")));
            }
            Node {
                id,
                label,
                body: NodeBody::Leaf(LeafNode::new(payload)),
            }
        }
    };
    let id = node.id;
    if nodes.insert(id, Arc::new(node)).is_some() {
        return Err(invalid(format!("duplicate node id {id}")));
    }
    Ok(id)
}

fn invalid(reason: String) -> TreeError {
    TreeError::InvalidSerializedForm { reason }
}

impl<T> Serialize for NodeTree<T>
where
    T: TreeTypes,
    T::ContainerPayload: Serialize,
    T::LeafPayload: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        tree_repr(self).serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for NodeTree<T>
where
    T: TreeTypes,
    T::ContainerPayload: Deserialize<'de>,
    T::LeafPayload: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = TreeRepr::deserialize(deserializer)?;
        build_tree(repr).map_err(serde::de::Error::custom)
    }
}

impl<T> NodeTree<T>
where
    T: TreeTypes,
    T::ContainerPayload: Serialize,
    T::LeafPayload: Serialize,
{
    /// Serialize the tree to its nested JSON form.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&tree_repr(self))
    }
}

impl<T> NodeTree<T>
where
    T: TreeTypes,
    T::ContainerPayload: DeserializeOwned,
    T::LeafPayload: DeserializeOwned,
{
    /// Rebuild a tree from its nested JSON form.
    ///
    /// Round-trip guarantee: ids, sibling order, and payloads are restored
    /// exactly as serialized.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let repr: TreeRepr<T::ContainerPayload, T::LeafPayload> = serde_json::from_str(json)
            .map_err(|err| TreeError::InvalidSerializedForm {
                reason: err.to_string(),
            })?;
        build_tree(repr)
    }
}

// SPDX-FileCopyrightText: The im-ordtree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{
    Breadcrumb, Breadcrumbs, GalleryTree, GalleryTypes, InsertPosition, MediaRef, MenuTarget,
    MenuTree, Node, NodeId, NodePath, NodeTree, TreeError, ViewPath,
};

// <https://github.com/rust-lang/api-guidelines/issues/223#issuecomment-683346783>
const _: () = {
    const fn assert_send<T: Send>() {}
    let _ = assert_send::<NodeTree<GalleryTypes>>;
};

// <https://github.com/rust-lang/api-guidelines/issues/223#issuecomment-683346783>
const _: () = {
    const fn assert_sync<T: Sync>() {}
    let _ = assert_sync::<NodeTree<GalleryTypes>>;
};

fn leaf(url: &str) -> Node<GalleryTypes> {
    Node::new_leaf(
        url.rsplit('/').next().unwrap_or(url),
        MediaRef {
            url: url.to_owned(),
        },
    )
}

fn folder(label: &str) -> Node<GalleryTypes> {
    Node::new_container(label, crate::FolderMeta::default())
}

#[test]
fn insert_then_resolve() {
    let tree = NodeTree::<GalleryTypes>::new();
    let banners = folder("Banners");
    let banners_id = banners.id;
    let tree = tree
        .insert_child(&NodePath::ROOT, banners, InsertPosition::End)
        .unwrap();

    let image = leaf("https://cdn.example.com/a.png");
    let image_id = image.id;
    let folder_path = NodePath::from(vec![banners_id]);
    let tree = tree
        .insert_child(&folder_path, image, InsertPosition::End)
        .unwrap();

    let resolved = tree.resolve(&folder_path.child(image_id)).unwrap();
    assert_eq!(image_id, resolved.id);
    assert_eq!("a.png", resolved.label);
    assert_eq!(2, tree.nodes_count());
}

#[test]
fn resolve_empty_path_is_not_found() {
    let tree = NodeTree::<GalleryTypes>::new();
    assert_eq!(Err(TreeError::PathNotFound), tree.resolve(&NodePath::ROOT).map(|_| ()));
}

#[test]
fn resolve_through_leaf_reports_parent_is_leaf() {
    let image = leaf("https://cdn.example.com/a.png");
    let image_id = image.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, image, InsertPosition::End)
        .unwrap();

    let path = NodePath::from(vec![image_id, NodeId::new()]);
    assert_eq!(Err(TreeError::ParentIsLeaf), tree.resolve(&path).map(|_| ()));
    assert_eq!(
        Err(TreeError::ParentIsLeaf),
        tree.children_of(&NodePath::from(vec![image_id])).map(|_| ())
    );
}

#[test]
fn remove_then_resolve_keeps_old_snapshot_valid() {
    let banners = folder("Banners");
    let banners_id = banners.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, banners, InsertPosition::End)
        .unwrap();
    let path = NodePath::from(vec![banners_id]);

    let (tree2, removed) = tree.remove_node(&path).unwrap();
    assert_eq!(banners_id, removed.root().id);
    assert_eq!(1, removed.nodes_count());
    assert_eq!(Err(TreeError::PathNotFound), tree2.resolve(&path).map(|_| ()));
    // The prior snapshot is untouched.
    assert!(tree.resolve(&path).is_ok());
    assert_eq!(1, tree.nodes_count());
    assert_eq!(0, tree2.nodes_count());
}

#[test]
fn update_preserves_children() {
    let banners = folder("Banners");
    let banners_id = banners.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, banners, InsertPosition::End)
        .unwrap();
    let folder_path = NodePath::from(vec![banners_id]);
    let tree = tree
        .insert_children(
            &folder_path,
            vec![
                leaf("https://cdn.example.com/a.png"),
                leaf("https://cdn.example.com/b.png"),
            ],
        )
        .unwrap();

    let children_before = tree.resolve(&folder_path).unwrap().children().to_vec();
    let tree2 = tree
        .update_node(&folder_path, |mut fields| {
            *fields.label_mut() = "Hero banners".to_owned();
        })
        .unwrap();

    let updated = tree2.resolve(&folder_path).unwrap();
    assert_eq!("Hero banners", updated.label);
    assert_eq!(children_before, updated.children().to_vec());
    // The prior snapshot still carries the old label.
    assert_eq!("Banners", tree.resolve(&folder_path).unwrap().label);
}

#[test]
fn update_missing_path_fails() {
    let tree = NodeTree::<GalleryTypes>::new();
    let result = tree.update_node(&NodePath::from(vec![NodeId::new()]), |_| {});
    assert_eq!(Err(TreeError::PathNotFound), result.map(|_| ()));
}

#[test]
fn move_rejects_cycles() {
    let parent = folder("Parent");
    let parent_id = parent.id;
    let child = folder("Child");
    let child_id = child.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, parent, InsertPosition::End)
        .unwrap()
        .insert_child(
            &NodePath::from(vec![parent_id]),
            child,
            InsertPosition::End,
        )
        .unwrap();

    let source = NodePath::from(vec![parent_id]);
    // Into its own child.
    assert_eq!(
        Err(TreeError::Cycle),
        tree.move_node(&source, &NodePath::from(vec![parent_id, child_id]), 0)
            .map(|_| ())
    );
    // Into itself.
    assert_eq!(
        Err(TreeError::Cycle),
        tree.move_node(&source, &source, 0).map(|_| ())
    );
    // Nothing changed.
    assert_eq!(2, tree.nodes_count());
    assert_eq!(&[parent_id], tree.top_level_children());
}

#[test]
fn gallery_folder_scenario() {
    let gallery = GalleryTree::new();
    let (gallery, banners_id) = gallery.add_folder(&NodePath::ROOT, "Banners").unwrap();
    assert_eq!(&[banners_id], gallery.tree().top_level_children());
    assert!(gallery
        .tree()
        .resolve(&NodePath::from(vec![banners_id]))
        .unwrap()
        .is_container());

    let folder_path = NodePath::from(vec![banners_id]);
    let (gallery, image_ids) = gallery
        .add_images(
            &folder_path,
            [
                "https://cdn.example.com/a.png".to_owned(),
                "https://cdn.example.com/b.png".to_owned(),
            ],
        )
        .unwrap();
    assert_eq!(2, image_ids.len());
    assert_eq!(
        image_ids,
        gallery.tree().children_of(&folder_path).unwrap().to_vec()
    );

    let a_path = folder_path.child(image_ids[0]);
    let gallery = gallery.move_item(&a_path, &NodePath::ROOT, 0).unwrap();
    assert_eq!(
        &[image_ids[0], banners_id],
        gallery.tree().top_level_children()
    );
    assert_eq!(
        &[image_ids[1]],
        gallery.tree().children_of(&folder_path).unwrap()
    );
    assert_eq!(
        "a.png",
        gallery
            .tree()
            .resolve(&NodePath::from(vec![image_ids[0]]))
            .unwrap()
            .label
    );
}

#[test]
fn menu_nesting_scenario() {
    let menu = MenuTree::new();
    let (menu, products_id) = menu
        .add_item(&NodePath::ROOT, "Products", MenuTarget::custom("/products"))
        .unwrap();
    let (menu, arrivals_id) = menu
        .add_item(
            &NodePath::from(vec![products_id]),
            "New Arrivals",
            MenuTarget::custom("/products/new"),
        )
        .unwrap();

    let deep_path = NodePath::from(vec![products_id, arrivals_id]);
    assert_eq!(
        Breadcrumbs::Trail(vec![
            Breadcrumb {
                id: products_id,
                label: "Products".to_owned(),
            },
            Breadcrumb {
                id: arrivals_id,
                label: "New Arrivals".to_owned(),
            },
        ]),
        menu.breadcrumbs(&deep_path)
    );

    let (menu2, removed) = menu.remove(&NodePath::from(vec![products_id])).unwrap();
    assert_eq!(2, removed.nodes_count());
    assert_eq!(
        Err(TreeError::PathNotFound),
        menu2
            .tree()
            .resolve(&NodePath::from(vec![products_id]))
            .map(|_| ())
    );
    assert_eq!(
        Err(TreeError::PathNotFound),
        menu2.tree().resolve(&deep_path).map(|_| ())
    );
    assert_eq!(0, menu2.tree().nodes_count());
}

#[test]
fn breadcrumbs_stale_after_removal() {
    let gallery = GalleryTree::new();
    let (gallery, banners_id) = gallery.add_folder(&NodePath::ROOT, "Banners").unwrap();
    let path = NodePath::from(vec![banners_id]);
    let (gallery2, _) = gallery.remove(&path).unwrap();

    assert!(gallery2.breadcrumbs(&path).is_stale());
    // The old snapshot still resolves the trail.
    assert!(!gallery.breadcrumbs(&path).is_stale());
    // The root trail is always resolvable.
    assert_eq!(
        Breadcrumbs::Trail(Vec::new()),
        gallery2.breadcrumbs(&NodePath::ROOT)
    );
}

#[test]
fn batch_insert_is_atomic() {
    let existing = leaf("https://cdn.example.com/a.png");
    let existing_id = existing.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, existing, InsertPosition::End)
        .unwrap();

    let fresh = leaf("https://cdn.example.com/b.png");
    let mut duplicate = leaf("https://cdn.example.com/c.png");
    duplicate.id = existing_id;

    let result = tree.insert_children(&NodePath::ROOT, vec![fresh, duplicate]);
    assert_eq!(
        Err(TreeError::DuplicateId(existing_id)),
        result.map(|_| ())
    );
    // No partial batch is observable.
    assert_eq!(1, tree.nodes_count());
    assert_eq!(&[existing_id], tree.top_level_children());
}

#[test]
fn duplicate_id_within_batch_is_rejected() {
    let first = leaf("https://cdn.example.com/a.png");
    let mut second = leaf("https://cdn.example.com/b.png");
    second.id = first.id;
    let first_id = first.id;

    let tree = NodeTree::<GalleryTypes>::new();
    let result = tree.insert_children(&NodePath::ROOT, vec![first, second]);
    assert_eq!(Err(TreeError::DuplicateId(first_id)), result.map(|_| ()));
    assert_eq!(0, tree.nodes_count());
}

#[test]
fn insert_position_defines_order() {
    let first = leaf("https://cdn.example.com/1.png");
    let second = leaf("https://cdn.example.com/2.png");
    let third = leaf("https://cdn.example.com/3.png");
    let (first_id, second_id, third_id) = (first.id, second.id, third.id);

    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, second, InsertPosition::End)
        .unwrap()
        .insert_child(&NodePath::ROOT, first, InsertPosition::At(0))
        .unwrap()
        // Out-of-range positions clamp to append.
        .insert_child(&NodePath::ROOT, third, InsertPosition::At(100))
        .unwrap();

    assert_eq!(&[first_id, second_id, third_id], tree.top_level_children());
}

#[test]
fn move_within_same_parent_reorders() {
    let gallery = GalleryTree::new();
    let (gallery, folder_id) = gallery.add_folder(&NodePath::ROOT, "Shots").unwrap();
    let folder_path = NodePath::from(vec![folder_id]);
    let (gallery, ids) = gallery
        .add_images(
            &folder_path,
            [
                "https://cdn.example.com/1.png".to_owned(),
                "https://cdn.example.com/2.png".to_owned(),
                "https://cdn.example.com/3.png".to_owned(),
            ],
        )
        .unwrap();

    let gallery = gallery
        .move_item(&folder_path.child(ids[2]), &folder_path, 0)
        .unwrap();
    assert_eq!(
        &[ids[2], ids[0], ids[1]],
        gallery.tree().children_of(&folder_path).unwrap()
    );
}

#[test]
fn insert_under_leaf_fails() {
    let image = leaf("https://cdn.example.com/a.png");
    let image_id = image.id;
    let tree = NodeTree::<GalleryTypes>::new()
        .insert_child(&NodePath::ROOT, image, InsertPosition::End)
        .unwrap();

    let result = tree.insert_child(
        &NodePath::from(vec![image_id]),
        leaf("https://cdn.example.com/b.png"),
        InsertPosition::End,
    );
    assert_eq!(Err(TreeError::ParentIsLeaf), result.map(|_| ()));
}

#[test]
fn resolve_parent_returns_sibling_index() {
    let gallery = GalleryTree::new();
    let (gallery, folder_id) = gallery.add_folder(&NodePath::ROOT, "Shots").unwrap();
    let folder_path = NodePath::from(vec![folder_id]);
    let (gallery, ids) = gallery
        .add_images(
            &folder_path,
            [
                "https://cdn.example.com/1.png".to_owned(),
                "https://cdn.example.com/2.png".to_owned(),
            ],
        )
        .unwrap();

    let (parent_path, index) = gallery
        .tree()
        .resolve_parent(&folder_path.child(ids[1]))
        .unwrap();
    assert_eq!(folder_path, parent_path);
    assert_eq!(1, index);
}

#[test]
fn insert_subtree_restores_removed_nodes() {
    let gallery = GalleryTree::new();
    let (gallery, folder_id) = gallery.add_folder(&NodePath::ROOT, "Shots").unwrap();
    let folder_path = NodePath::from(vec![folder_id]);
    let (gallery, _) = gallery
        .add_images(
            &folder_path,
            ["https://cdn.example.com/1.png".to_owned()],
        )
        .unwrap();

    let (pruned, removed) = gallery.tree().remove_node(&folder_path).unwrap();
    assert_eq!(0, pruned.nodes_count());

    let restored = pruned
        .insert_subtree(&NodePath::ROOT, removed, InsertPosition::End)
        .unwrap();
    assert_eq!(2, restored.nodes_count());
    assert_eq!(&[folder_id], restored.top_level_children());
    assert!(restored.resolve(&folder_path).is_ok());
}

#[test]
fn view_path_transitions() {
    let gallery = GalleryTree::new();
    let (gallery, folder_id) = gallery.add_folder(&NodePath::ROOT, "Shots").unwrap();
    let (gallery, image_ids) = gallery
        .add_images(
            &NodePath::ROOT,
            ["https://cdn.example.com/1.png".to_owned()],
        )
        .unwrap();

    let mut view = ViewPath::new();
    gallery.enter_folder(&mut view, folder_id).unwrap();
    assert_eq!(&NodePath::from(vec![folder_id]), view.path());

    // Images cannot be entered.
    let mut at_root = ViewPath::new();
    assert_eq!(
        Err(TreeError::ParentIsLeaf),
        gallery.enter_folder(&mut at_root, image_ids[0])
    );
    // Nodes that are not children of the viewed folder cannot be entered.
    assert_eq!(
        Err(TreeError::PathNotFound),
        gallery.enter_folder(&mut view, image_ids[0])
    );

    assert_eq!(Some(folder_id), GalleryTree::go_up(&mut view));
    assert!(view.path().is_root());

    view.set_to(NodePath::from(vec![folder_id]));
    assert_eq!(1, view.path().len());
    view.reset();
    assert!(view.path().is_root());
}

#[test]
fn json_round_trip_preserves_ids_order_and_payloads() {
    let gallery = GalleryTree::new();
    let (gallery, folder_id) = gallery.add_folder(&NodePath::ROOT, "Banners").unwrap();
    let folder_path = NodePath::from(vec![folder_id]);
    let (gallery, image_ids) = gallery
        .add_images(
            &folder_path,
            [
                "https://cdn.example.com/a.png".to_owned(),
                "https://cdn.example.com/b.png".to_owned(),
            ],
        )
        .unwrap();

    let json = gallery.to_json_string().unwrap();
    let restored = GalleryTree::from_json_str(&json).unwrap();

    assert_eq!(gallery.tree().nodes_count(), restored.tree().nodes_count());
    assert_eq!(
        gallery.tree().top_level_children(),
        restored.tree().top_level_children()
    );
    assert_eq!(
        image_ids,
        restored.tree().children_of(&folder_path).unwrap().to_vec()
    );
    let restored_leaf = restored.tree().resolve(&folder_path.child(image_ids[0])).unwrap();
    assert_eq!(
        Some(&MediaRef {
            url: "https://cdn.example.com/a.png".to_owned(),
        }),
        restored_leaf.leaf_payload()
    );
    // Serializing again yields the identical document.
    assert_eq!(json, restored.to_json_string().unwrap());
}

#[test]
fn json_round_trip_menu_targets() {
    let menu = MenuTree::new();
    let (menu, products_id) = menu
        .add_item(&NodePath::ROOT, "Products", MenuTarget::custom("/products"))
        .unwrap();
    let (menu, _) = menu
        .add_item(
            &NodePath::from(vec![products_id]),
            "New Arrivals",
            MenuTarget {
                url: "/products/new".to_owned(),
                kind: crate::MenuTargetKind::Category,
                open_target: crate::OpenTarget::NewWindow,
            },
        )
        .unwrap();

    let json = menu.to_json_string().unwrap();
    assert!(json.contains("\"openTarget\":\"blank\""));
    assert!(json.contains("\"type\":\"category\""));

    let restored = MenuTree::from_json_str(&json).unwrap();
    assert_eq!(json, restored.to_json_string().unwrap());
    assert_eq!(2, restored.tree().nodes_count());
}

#[test]
fn deserialize_rejects_duplicate_ids() {
    let json = r#"{"children":[
        {"kind":"leaf","id":7,"label":"a.png","url":"https://cdn.example.com/a.png"},
        {"kind":"leaf","id":7,"label":"b.png","url":"https://cdn.example.com/b.png"}]}"#;
    let result = GalleryTree::from_json_str(json);
    assert!(matches!(
        result,
        Err(TreeError::InvalidSerializedForm { .. })
    ));
}

#[test]
fn deserialize_rejects_leaf_with_children() {
    let json = r#"{"children":[
        {"kind":"leaf","id":8,"label":"a.png","url":"https://cdn.example.com/a.png","children":[
            {"kind":"leaf","id":9,"label":"b.png","url":"https://cdn.example.com/b.png"}]}]}"#;
    let result = GalleryTree::from_json_str(json);
    assert!(matches!(
        result,
        Err(TreeError::InvalidSerializedForm { .. })
    ));
}

#[test]
fn deserialize_rejects_zero_id() {
    let json = r#"{"children":[
        {"kind":"leaf","id":0,"label":"a.png","url":"https://cdn.example.com/a.png"}]}"#;
    let result = GalleryTree::from_json_str(json);
    assert!(matches!(
        result,
        Err(TreeError::InvalidSerializedForm { .. })
    ));
}

#[test]
fn deserialize_rejects_malformed_json() {
    let result = GalleryTree::from_json_str("{\"children\":[");
    assert!(matches!(
        result,
        Err(TreeError::InvalidSerializedForm { .. })
    ));
}

#[test]
fn generated_ids_stay_unique_after_deserialize() {
    let json = r#"{"children":[
        {"kind":"leaf","id":1000000,"label":"a.png","url":"https://cdn.example.com/a.png"}]}"#;
    let restored = GalleryTree::from_json_str(json).unwrap();
    assert_eq!(1, restored.tree().nodes_count());
    // Fresh ids are generated past the largest loaded id.
    assert!(NodeId::new().get() > 1_000_000);
}

mod round_trip {
    use proptest::prelude::*;

    use crate::{GalleryTree, NodePath};

    #[derive(Debug, Clone)]
    enum Entry {
        Image { url: String },
        Folder { label: String, entries: Vec<Entry> },
    }

    fn arb_entry() -> impl Strategy<Value = Entry> {
        let image = "[a-z]{1,8}".prop_map(|name| Entry::Image {
            url: format!("https://cdn.example.com/{name}.png"),
        });
        image.prop_recursive(4, 32, 4, |inner| {
            ("[A-Za-z][a-z ]{0,11}", prop::collection::vec(inner, 0..4)).prop_map(
                |(label, entries)| Entry::Folder { label, entries },
            )
        })
    }

    fn populate(gallery: GalleryTree, parent: &NodePath, entries: &[Entry]) -> GalleryTree {
        let mut gallery = gallery;
        for entry in entries {
            match entry {
                Entry::Image { url } => {
                    let (next, _) = gallery.add_images(parent, [url.clone()]).unwrap();
                    gallery = next;
                }
                Entry::Folder { label, entries } => {
                    let (next, folder_id) = gallery.add_folder(parent, label.clone()).unwrap();
                    let child_path = parent.child(folder_id);
                    gallery = populate(next, &child_path, entries);
                }
            }
        }
        gallery
    }

    proptest! {
        #[test]
        fn json_round_trip(entries in prop::collection::vec(arb_entry(), 0..4)) {
            let gallery = populate(GalleryTree::new(), &NodePath::ROOT, &entries);
            let json = gallery.to_json_string().unwrap();
            let restored = GalleryTree::from_json_str(&json).unwrap();
            prop_assert_eq!(restored.tree().nodes_count(), gallery.tree().nodes_count());
            prop_assert_eq!(restored.to_json_string().unwrap(), json);
        }
    }
}

//! Tests for building, balancing and reconciling column trees.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_grid::tree::walker::walk_structural;
use horizon_grid::{
    ColDef, ColGroupDef, ColumnDefinition, ColumnGroupShow, ColumnTree, EventSource, GridOptions,
    StructuralNode, TreeBuilder, definitions_from_json,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn build(defs: &[ColumnDefinition], existing: Option<&ColumnTree>) -> ColumnTree {
    init_tracing();
    TreeBuilder::new(&GridOptions::default())
        .unwrap()
        .build(defs, true, existing, &EventSource::ColumnDefsChanged)
        .unwrap()
        .tree
}

/// Path length (in nodes) from a root to every leaf.
fn leaf_path_lengths(tree: &ColumnTree) -> Vec<usize> {
    fn walk(nodes: &[StructuralNode], length: usize, out: &mut Vec<usize>) {
        for node in nodes {
            match node {
                StructuralNode::Column(_) => out.push(length),
                StructuralNode::Group(group) => walk(&group.children(), length + 1, out),
            }
        }
    }
    let mut out = Vec::new();
    walk(&tree.tree, 1, &mut out);
    out
}

fn structural_ids(tree: &ColumnTree) -> Vec<String> {
    let mut ids = Vec::new();
    walk_structural(&tree.tree, |node, parent| {
        ids.push(format!(
            "{}/{}",
            parent.map(|p| p.group_id().to_string()).unwrap_or_default(),
            node.id()
        ));
    });
    ids
}

const IRREGULAR: &str = r#"[
    { "field": "id" },
    { "groupId": "athlete", "children": [
        { "field": "name" },
        { "headerName": "Details", "children": [
            { "field": "age" },
            { "children": [{ "field": "dob" }] }
        ]},
        { "field": "country" }
    ]},
    { "children": [{ "field": "sport" }] },
    { "field": "total" }
]"#;

#[test]
fn test_every_leaf_sits_at_reported_depth() {
    let defs = definitions_from_json(IRREGULAR).unwrap();
    let tree = build(&defs, None);

    assert_eq!(tree.depth, 4);
    let lengths = leaf_path_lengths(&tree);
    assert_eq!(lengths.len(), 7);
    assert!(lengths.iter().all(|&l| l == tree.depth), "{lengths:?}");
    tree.check_balanced().unwrap();
}

#[test]
fn test_ids_are_identical_across_independent_builds() {
    let first = build(&definitions_from_json(IRREGULAR).unwrap(), None);
    let second = build(&definitions_from_json(IRREGULAR).unwrap(), None);
    assert_eq!(structural_ids(&first), structural_ids(&second));
}

#[test]
fn test_two_level_grouping_scenario() {
    let defs: Vec<ColumnDefinition> = vec![
        ColGroupDef::new("G", vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]).into(),
        ColDef::for_field("c").into(),
    ];
    let tree = build(&defs, None);
    assert_eq!(tree.depth, 2);
    assert_eq!(tree.tree.len(), 2);

    let g = tree.tree[0].as_group().unwrap();
    assert_eq!(g.group_id(), "G");
    assert_eq!(g.level(), 0);
    assert!(!g.is_padding());
    let children: Vec<_> = g.children().iter().map(|c| c.id().to_string()).collect();
    assert_eq!(children, vec!["a", "b"]);

    let pad = tree.tree[1].as_group().unwrap();
    assert!(pad.is_padding());
    assert_eq!(pad.level(), 0);
    let c = pad.children()[0].as_column().unwrap().clone();
    assert_eq!(c.id(), "c");
    assert!(Arc::ptr_eq(&c.original_parent().unwrap(), pad));
}

#[test]
fn test_reconciliation_by_field_keeps_instance_and_subscribers() {
    let first = build(&[ColDef::for_field("x").width(100.0).into()], None);
    let x = first.find_column("x").unwrap();
    assert_eq!(x.actual_width(), 100.0);

    let widths = Arc::new(AtomicUsize::new(0));
    let widths_clone = widths.clone();
    x.width_changed.connect(move |event| {
        assert_eq!(event.source, EventSource::ColumnDefsChanged);
        widths_clone.fetch_add(1, Ordering::SeqCst);
    });

    let second = build(&[ColDef::for_field("x").width(200.0).into()], Some(&first));
    let x2 = second.find_column("x").unwrap();
    assert!(Arc::ptr_eq(&x, &x2));
    assert_eq!(x2.actual_width(), 200.0);
    assert_eq!(widths.load(Ordering::SeqCst), 1);
    assert_eq!(x2.width_changed.connection_count(), 1);
}

#[test]
fn test_duplicate_explicit_id_is_suffixed() {
    let defs: Vec<ColumnDefinition> = vec![ColDef::with_id("dup").into(), ColDef::with_id("dup").into()];
    let tree = build(&defs, None);
    let ids: Vec<_> = tree.leaf_columns().iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids, vec!["dup", "dup_1"]);
    assert_eq!(ids.iter().filter(|id| *id == "dup").count(), 1);

    // Against a previous tree, the first definition claims the old column.
    let rebuilt = build(&defs, Some(&tree));
    let old_dup = tree.find_column("dup").unwrap();
    assert!(Arc::ptr_eq(&rebuilt.leaf_columns()[0], &old_dup));
    let ids: Vec<_> = rebuilt.leaf_columns().iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids.iter().filter(|id| *id == "dup").count(), 1);
}

#[test]
fn test_width_is_always_clamped() {
    let tree = build(
        &[ColDef::for_field("x").min_width(50.0).max_width(150.0).width(1000.0).into()],
        None,
    );
    let x = tree.find_column("x").unwrap();
    assert_eq!(x.actual_width(), 150.0);

    for requested in [-10.0, 0.0, 49.9, 151.0, f32::MAX] {
        x.set_actual_width(requested, &EventSource::Api);
        assert!(x.actual_width() >= 50.0 && x.actual_width() <= 150.0);
    }
    x.set_actual_width(10.0, &EventSource::Api);
    assert_eq!(x.actual_width(), 50.0);
}

#[test]
fn test_expandability_tracks_visibility() {
    let defs: Vec<ColumnDefinition> = vec![
        ColGroupDef::new(
            "always",
            vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()],
        )
        .into(),
        ColGroupDef::new(
            "toggle",
            vec![
                ColDef::for_field("open").column_group_show(ColumnGroupShow::Open).into(),
                ColDef::for_field("closed").column_group_show(ColumnGroupShow::Closed).into(),
            ],
        )
        .into(),
    ];
    let tree = build(&defs, None);
    assert!(!tree.find_group("always").unwrap().is_expandable());

    let toggle = tree.find_group("toggle").unwrap();
    assert!(toggle.is_expandable());

    tree.find_column("closed")
        .unwrap()
        .set_visible(false, &EventSource::Api);
    assert!(!toggle.is_expandable());
}

#[test]
fn test_padding_groups_are_never_expandable() {
    let tree = build(&definitions_from_json(IRREGULAR).unwrap(), None);
    for group in tree.groups() {
        if group.is_padding() {
            assert!(!group.is_expandable());
            assert!(group.user_definition().is_none());
        }
    }
}

#[test]
fn test_detached_tree_releases_leaf_listeners() {
    let defs = definitions_from_json(IRREGULAR).unwrap();
    let first = build(&defs, None);
    let name = first.find_column("name").unwrap();
    let listeners = name.visible_changed.connection_count();
    assert!(listeners > 0);

    let second = build(&defs, Some(&first));
    first.detach();
    drop(first);
    assert_eq!(name.visible_changed.connection_count(), listeners);
    assert!(second.find_column("name").is_some());
}

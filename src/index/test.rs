use proptest::prelude::*;
use similar_asserts::assert_eq;

use super::*;
use crate::forest::test::{find, item_prop, sample_forest, Item};

fn indexed_sample() -> (Forest<Item>, TreeIndex<Item, String, String>) {
    let forest = sample_forest();
    let mut index = TreeIndex::new(item_prop());
    index.initialize(&forest, None);
    (forest, index)
}

fn ids(forest: &Forest<Item>, nodes: &[TreeNodeId]) -> Vec<String> {
    nodes.iter().map(|&n| forest[n].id.clone()).collect()
}

#[test]
fn ancestor_values_of_deep_node() {
    let (forest, index) = indexed_sample();
    let leaf = find(&forest, "1-1-1");

    assert_eq!(index.ancestor_values(&forest, leaf), vec!["1-1", "1"]);
    assert_eq!(index.ancestor_labels(&forest, leaf), vec!["1-1", "1"]);
    assert_eq!(
        index.ancestors(leaf),
        vec![find(&forest, "1-1"), find(&forest, "1")]
    );
}

#[test]
fn roots_point_at_root_sequence() {
    let (forest, index) = indexed_sample();
    for &root in forest.roots() {
        assert_eq!(index.get_parent(root), Some(ParentId::Root));
        assert!(index.get_parent(root).unwrap().is_root());
        assert!(index.ancestors(root).is_empty());
    }
    let one = find(&forest, "1");
    let child = find(&forest, "1-2");
    assert_eq!(index.get_parent(child), Some(ParentId::Node(one)));
    assert!(index.get_parent(child).unwrap().is_node());
    assert_eq!(index.len(), 8);
}

#[test]
fn unindexed_node_has_no_parent_and_no_ancestors() {
    let (mut forest, index) = indexed_sample();
    let stray = forest.insert(Item::new("stray"));
    assert_eq!(index.get_parent(stray), None);
    assert!(index.ancestors(stray).is_empty());
    assert!(index.ancestor_labels(&forest, stray).is_empty());
}

#[test]
fn projection_by_closure() {
    let (forest, index) = indexed_sample();
    let leaf = find(&forest, "1-1-1");
    let depths = index.ancestors_by(&forest, leaf, |n| n.id.len());
    assert_eq!(depths, vec![3, 1]);
}

#[test]
fn initialize_is_idempotent() {
    let (forest, mut index) = indexed_sample();
    let before: Vec<_> = forest
        .iter_nodes()
        .map(|(n, _)| index.get_parent(n))
        .collect();
    index.initialize(&forest, None);
    let after: Vec<_> = forest
        .iter_nodes()
        .map(|(n, _)| index.get_parent(n))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn partial_initialize_indexes_subtree_only() {
    let forest = sample_forest();
    let mut index = TreeIndex::new(item_prop());
    let one_one = find(&forest, "1-1");
    index.initialize(&forest, Some(one_one));

    assert_eq!(index.len(), 1);
    assert_eq!(
        index.get_parent(find(&forest, "1-1-1")),
        Some(ParentId::Node(one_one))
    );
    assert_eq!(index.get_parent(one_one), None);

    index.initialize(&forest, Some(TreeNodeId(999)));
    assert_eq!(index.len(), 1);
}

#[test]
fn full_initialize_evicts_stale_entries() {
    let (mut forest, mut index) = indexed_sample();
    let one_one = find(&forest, "1-1");
    let leaf = find(&forest, "1-1-1");
    index.remove_child(&mut forest, one_one).unwrap();

    // The descendant's entry lingers until the next full rebuild.
    assert!(index.contains(leaf));
    index.initialize(&forest, None);
    assert!(!index.contains(leaf));
    assert_eq!(index.len(), 6);
}

#[test]
fn add_root_and_child() {
    let (mut forest, mut index) = indexed_sample();
    let prop = item_prop();

    let three = forest.insert(Item::new("3"));
    assert_eq!(index.add_child(&mut forest, ParentId::Root, three), Some(2));
    assert_eq!(index.get_parent(three), Some(ParentId::Root));
    assert_eq!(forest.roots().last(), Some(&three));

    // "3" has no children field yet.
    let three_one = forest.insert(Item::new("3-1"));
    assert_eq!(index.add_child(&mut forest, three.into(), three_one), Some(0));
    assert_eq!(forest[three].children, Some(vec![three_one]));
    assert_eq!(index.ancestor_values(&forest, three_one), vec!["3"]);
    assert!(forest.is_reachable(&prop, three_one));
}

#[test]
fn add_child_touches_only_new_entry() {
    let (mut forest, mut index) = indexed_sample();
    let before = index.clone();
    let parent = find(&forest, "2");
    let child = forest.insert(Item::new("2-3"));
    index.add_child(&mut forest, parent.into(), child);

    for (n, p) in before.iter() {
        assert_eq!(index.get_parent(n), Some(p));
    }
    assert_eq!(index.len(), before.len() + 1);
}

#[test]
fn add_child_to_unknown_target_changes_nothing() {
    let (mut forest, mut index) = indexed_sample();
    let child = forest.insert(Item::new("x"));
    assert_eq!(
        index.add_child(&mut forest, TreeNodeId(999).into(), child),
        None
    );
    assert!(!index.contains(child));
}

#[test]
fn add_then_remove_restores_children() {
    let (mut forest, mut index) = indexed_sample();
    let prop = item_prop();
    let parent = find(&forest, "1");
    let before = forest.children(&prop, parent).to_vec();

    let child = forest.insert(Item::new("1-4"));
    index.add_child(&mut forest, parent.into(), child);
    index.remove_child(&mut forest, child).unwrap();

    assert_eq!(forest.children(&prop, parent), before.as_slice());
}

#[test]
fn add_then_remove_root_restores_roots() {
    let (mut forest, mut index) = indexed_sample();
    let before = forest.roots().to_vec();
    let root = forest.insert(Item::new("3"));
    index.add_child(&mut forest, ParentId::Root, root);
    index.remove_child(&mut forest, root).unwrap();
    assert_eq!(forest.roots(), before.as_slice());
}

#[test]
fn hand_spliced_roots_with_set_parent() {
    let (mut forest, mut index) = indexed_sample();
    let moved = find(&forest, "2-2");
    let two = find(&forest, "2");
    forest[two].children.as_mut().unwrap().retain(|&c| c != moved);
    forest.roots_mut().insert(0, moved);
    index.set_parent(moved, ParentId::Root);

    assert!(index.ancestors(moved).is_empty());
    index.remove_child(&mut forest, moved).unwrap();
    assert_eq!(forest.roots(), &[find(&forest, "1"), two]);
}

#[test]
fn remove_disambiguates_identical_siblings() {
    let prop = item_prop();
    let mut forest = Forest::new();
    let mut index = TreeIndex::new(prop);
    let parent = forest.insert(Item::with_children("p"));
    index.add_child(&mut forest, ParentId::Root, parent);
    let a = forest.insert(Item::new("same"));
    let b = forest.insert(Item::new("same"));
    index.add_child(&mut forest, parent.into(), a);
    index.add_child(&mut forest, parent.into(), b);
    assert_eq!(forest[a], forest[b]);

    index.remove_child(&mut forest, b).unwrap();
    assert_eq!(forest.children(&prop, parent), &[a]);
    assert_eq!(index.get_parent(a), Some(ParentId::Node(parent)));

    // Same for two identical roots.
    let r1 = forest.insert(Item::new("root"));
    let r2 = forest.insert(Item::new("root"));
    index.add_child(&mut forest, ParentId::Root, r1);
    index.add_child(&mut forest, ParentId::Root, r2);
    index.remove_child(&mut forest, r1).unwrap();
    assert_eq!(forest.roots(), &[parent, r2]);
}

#[test]
fn remove_preserves_sibling_order() {
    let (mut forest, mut index) = indexed_sample();
    let prop = item_prop();
    let one = find(&forest, "1");
    let one_two = find(&forest, "1-2");
    index.remove_child(&mut forest, one_two).unwrap();
    assert_eq!(
        ids(&forest, forest.children(&prop, one)),
        vec!["1-1", "1-3"]
    );
}

#[test]
fn remove_root_splices_root_sequence() {
    let (mut forest, mut index) = indexed_sample();
    let one = find(&forest, "1");
    let two = find(&forest, "2");
    let children_of_two = forest[two].children.clone();

    index.remove_child(&mut forest, one).unwrap();
    assert_eq!(forest.roots(), &[two]);
    assert_eq!(forest[two].children, children_of_two);
}

#[test]
fn remove_subtree_scenario() {
    let (mut forest, mut index) = indexed_sample();
    let prop = item_prop();
    let one = find(&forest, "1");
    let one_one = find(&forest, "1-1");
    let leaf = find(&forest, "1-1-1");

    index.remove_child(&mut forest, one_one).unwrap();
    assert_eq!(ids(&forest, forest.children(&prop, one)), vec!["1-2", "1-3"]);
    assert!(!forest.is_reachable(&prop, one_one));
    assert!(!forest.is_reachable(&prop, leaf));

    // Queries on the detached descendant must not panic.
    let _ = index.ancestors(leaf);
    let _ = index.ancestor_labels(&forest, leaf);
}

#[test]
fn remove_never_indexed_is_missing_parent() {
    let (mut forest, mut index) = indexed_sample();
    let stray = forest.insert(Item::new("stray"));
    let before = forest.clone();
    assert_eq!(
        index.remove_child(&mut forest, stray),
        Err(TreeIndexError::MissingParent(stray))
    );
    assert_eq!(forest, before);
}

#[test]
fn remove_twice_is_missing_parent() {
    let (mut forest, mut index) = indexed_sample();
    let node = find(&forest, "2-1");
    index.remove_child(&mut forest, node).unwrap();
    assert_eq!(
        index.remove_child(&mut forest, node),
        Err(TreeIndexError::MissingParent(node))
    );
}

#[test]
fn desynchronized_root_is_not_found() {
    let (mut forest, mut index) = indexed_sample();
    let node = find(&forest, "1-2");
    index.set_parent(node, ParentId::Root);
    let before = forest.clone();

    let err = index.remove_child(&mut forest, node).unwrap_err();
    assert_eq!(err, TreeIndexError::NotFound(node));
    assert_eq!(forest, before);
    insta::assert_snapshot!(err.to_string(), @"Node #3 not found in the sequence its parent entry points to");
}

#[test]
fn missing_parent_message() {
    let err = TreeIndexError::MissingParent(TreeNodeId(7));
    assert_eq!(err.to_string(), "No parent recorded for node #7");
}

#[test]
fn cyclic_index_terminates() {
    let (forest, mut index) = indexed_sample();
    let a = find(&forest, "1");
    let b = find(&forest, "1-1");
    index.set_parent(a, ParentId::Node(b));
    let ancestors = index.ancestors(b);
    assert!(ancestors.len() <= index.len());
}

/// Builds a forest where node `i` hangs under an earlier node or at the root,
/// returning it together with each node's depth.
fn forest_from_choices(choices: &[Option<prop::sample::Index>]) -> (Forest<Item>, Vec<usize>) {
    let prop = item_prop();
    let mut forest = Forest::new();
    let mut depths: Vec<usize> = Vec::new();
    for (i, choice) in choices.iter().enumerate() {
        let node = forest.insert(Item::new(&i.to_string()));
        match choice.as_ref().filter(|_| i > 0) {
            Some(pick) => {
                let parent = pick.index(i);
                forest.append(&prop, TreeNodeId(parent).into(), node);
                depths.push(depths[parent] + 1);
            }
            None => {
                forest.append(&prop, ParentId::Root, node);
                depths.push(0);
            }
        }
    }
    (forest, depths)
}

proptest! {
    #[test]
    fn ancestor_chain_matches_depth(
        choices in prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 0..40)
    ) {
        let (forest, depths) = forest_from_choices(&choices);
        let mut index = TreeIndex::new(item_prop());
        index.initialize(&forest, None);
        prop_assert_eq!(index.len(), forest.n_nodes());

        for (node, _) in forest.iter_nodes() {
            let chain = index.ancestors(node);
            prop_assert_eq!(chain.len(), depths[node.0]);
            let top = chain.last().copied().unwrap_or(node);
            prop_assert_eq!(index.get_parent(top), Some(ParentId::Root));
        }
    }

    #[test]
    fn reinitialize_is_stable(
        choices in prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 0..40)
    ) {
        let (forest, _) = forest_from_choices(&choices);
        let mut index = TreeIndex::new(item_prop());
        index.initialize(&forest, None);
        let first: Vec<_> = forest.iter_nodes().map(|(n, _)| index.get_parent(n)).collect();
        index.initialize(&forest, None);
        let second: Vec<_> = forest.iter_nodes().map(|(n, _)| index.get_parent(n)).collect();
        prop_assert_eq!(first, second);
    }
}

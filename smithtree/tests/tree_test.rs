//! Behavioural tests for TreeArena node operations

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use smithtree::util::testing;
use smithtree::{NodeId, TreeArena, TreeError, TreeNodeConvert};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

struct Scenario {
    arena: TreeArena<i32>,
    root: NodeId,
}

impl Scenario {
    fn node(&self, payload: i32) -> NodeId {
        self.arena
            .find_descendant_with(self.root, &payload)
            .expect("unique payload")
    }

    fn payloads(&self, ids: &[NodeId]) -> Vec<i32> {
        testing::payloads(&self.arena, ids)
    }
}

#[fixture]
fn scenario() -> Scenario {
    let (arena, root) = testing::scenario_tree();
    Scenario { arena, root }
}

// ============================================================
// Structural laws
// ============================================================

#[rstest]
fn given_any_node_when_sizing_then_size_is_one_plus_children_sizes(scenario: Scenario) {
    let arena = &scenario.arena;
    for node in arena.to_list(scenario.root) {
        let children_total: usize = arena.children(node).iter().map(|&c| arena.size(c)).sum();
        assert_eq!(arena.size(node), 1 + children_total);
    }
}

#[rstest]
fn given_any_node_when_flattening_then_pre_order_law_holds(scenario: Scenario) {
    let arena = &scenario.arena;
    for node in arena.to_list(scenario.root) {
        let mut expected = vec![arena.data(node).unwrap()];
        for &child in arena.children(node) {
            expected.extend(arena.to_data_list(child));
        }
        assert_eq!(arena.to_data_list(node), expected);
    }
}

#[rstest]
fn given_scenario_tree_when_querying_then_matches_documented_shape(scenario: Scenario) {
    let arena = &scenario.arena;
    assert_eq!(arena.size(scenario.root), 6);
    assert_eq!(arena.to_data_list(scenario.root), vec![&0, &1, &4, &5, &2, &3]);
    assert_eq!(&*arena.to_data_array(scenario.root), &[0, 1, 4, 5, 2, 3]);
    assert_eq!(arena.to_array(scenario.root).len(), 6);
}

#[rstest]
fn given_scenario_tree_when_removing_child_two_then_size_and_children_shrink(
    mut scenario: Scenario,
) {
    let two = scenario.node(2);
    let root = scenario.root;

    let removed = scenario.arena.remove_child(root, two);

    assert_eq!(removed, Some(two));
    assert_eq!(scenario.arena.size(root), 5);
    assert_eq!(
        scenario.payloads(scenario.arena.children(root)),
        vec![1, 3]
    );
    assert!(scenario.arena.is_root(two));
}

#[rstest]
fn given_new_child_when_adding_then_removing_then_children_restored(mut scenario: Scenario) {
    let root = scenario.root;
    let before = scenario.arena.children(root).to_vec();
    let extra = scenario.arena.new_node(9);

    scenario.arena.add_child(root, extra).unwrap();
    assert_eq!(scenario.arena.children(root).last(), Some(&extra));
    assert_eq!(scenario.arena.remove_child(root, extra), Some(extra));

    assert_eq!(scenario.arena.children(root), before.as_slice());
    assert_eq!(scenario.arena.parent(extra), None);
}

#[rstest]
fn given_non_child_when_removing_then_returns_none(mut scenario: Scenario) {
    let four = scenario.node(4);
    let root = scenario.root;
    assert_eq!(scenario.arena.remove_child(root, four), None);
    assert!(scenario.arena.is_parent_of(scenario.node(1), four));
}

// ============================================================
// Leaf / root classification
// ============================================================

#[test]
fn given_unattached_node_when_checking_leaf_then_false_until_attached() {
    let mut arena = TreeArena::new();
    let node = arena.new_node("solo");
    assert!(!arena.is_leaf(node));
    assert!(arena.is_root(node));

    let parent = arena.new_node("parent");
    arena.add_child(parent, node).unwrap();

    assert!(arena.is_leaf(node));
    assert!(!arena.is_root(node));
    assert!(!arena.is_leaf(parent));
}

// ============================================================
// Search
// ============================================================

#[rstest]
#[case::no_match(0, None)]
#[case::one_match(1, Some(0))]
#[case::two_matches(2, None)]
fn given_n_equal_payloads_when_finding_unique_then_exactly_one_or_none(
    #[case] copies: usize,
    #[case] expected_index: Option<usize>,
) {
    let mut arena = TreeArena::new();
    let root = arena.new_node("root");
    let mut holders = Vec::new();
    let mut parent = root;
    for _ in 0..copies {
        let holder = arena.add_child_with(parent, "x").unwrap();
        arena.add_child_with(holder, "filler").unwrap();
        holders.push(holder);
        parent = holder;
    }

    let found = arena.find_descendant_with(root, &"x");

    assert_eq!(found, expected_index.map(|i| holders[i]));
    assert_eq!(arena.contains(root, &"x"), copies > 0);
}

#[test]
fn given_payload_at_two_depths_when_searching_then_unique_is_none_and_all_found_in_pre_order() {
    let mut arena = TreeArena::new();
    let root = arena.new_node("r".to_string());
    let a = arena.add_child_with(root, "a".to_string()).unwrap();
    let deep = arena.add_child_with(a, "X".to_string()).unwrap();
    let shallow = arena.add_child_with(root, "X".to_string()).unwrap();

    let target = "X".to_string();
    assert_eq!(arena.find_descendant_with(root, &target), None);
    assert_eq!(arena.find_descendants_with(root, &target), vec![deep, shallow]);
}

#[test]
fn given_nested_matches_when_finding_top_descendants_then_only_ancestor_reported() {
    let mut arena = TreeArena::new();
    let root = arena.new_node('r');
    let outer = arena.add_child_with(root, 'm').unwrap();
    let mid = arena.add_child_with(outer, 'n').unwrap();
    arena.add_child_with(mid, 'm').unwrap();
    let sibling = arena.add_child_with(root, 'm').unwrap();

    assert_eq!(arena.find_top_descendants_with(root, &'m'), vec![outer, sibling]);
    assert_eq!(arena.find_descendants_with(root, &'m').len(), 3);
}

#[rstest]
fn given_predicate_when_searching_then_all_matches_in_pre_order(scenario: Scenario) {
    let evens = scenario
        .arena
        .find_descendants_matching(scenario.root, |&v| v % 2 == 0);
    assert_eq!(scenario.payloads(&evens), vec![0, 4, 2]);
}

#[rstest]
fn given_subtree_query_when_searching_then_root_itself_is_candidate(scenario: Scenario) {
    let one = scenario.node(1);
    assert!(scenario.arena.contains(one, &1));
    assert!(scenario.arena.contains(one, &5));
    assert!(!scenario.arena.contains(one, &2));
}

#[test]
fn given_stale_or_cleared_nodes_when_searching_then_results_are_empty() {
    let mut arena = TreeArena::new();
    let root = arena.new_node(1);
    arena.clear(root);
    assert!(!arena.contains(root, &1));
    assert!(arena.find_descendants_with(root, &1).is_empty());
    assert!(arena.to_data_list(root).is_empty());
    assert_eq!(arena.size(root), 1);

    arena.remove_subtree(root);
    assert_eq!(arena.size(root), 0);
    assert!(arena.find_top_descendants_with(root, &1).is_empty());
    assert_eq!(arena.find_descendant_with(root, &1), None);
}

// ============================================================
// Removal by payload
// ============================================================

#[rstest]
fn given_unique_match_when_removing_descendant_then_detached(mut scenario: Scenario) {
    let root = scenario.root;
    let one = scenario.node(1);

    let removed = scenario.arena.remove_descendant_with(root, &1);

    assert_eq!(removed, Some(one));
    assert!(scenario.arena.is_root(one));
    assert_eq!(scenario.arena.size(one), 3);
    assert_eq!(scenario.arena.size(root), 3);
}

#[test]
fn given_ambiguous_match_when_removing_descendant_then_nothing_detached() {
    let mut arena = TreeArena::new();
    let root = arena.new_node(0);
    arena.add_child_with(root, 7).unwrap();
    arena.add_child_with(root, 7).unwrap();

    assert_eq!(arena.remove_descendant_with(root, &7), None);
    assert_eq!(arena.size(root), 3);
}

#[test]
fn given_nested_matches_when_removing_descendants_then_top_subtrees_detached() {
    let mut arena = TreeArena::new();
    let root = arena.new_node(0);
    let outer = arena.add_child_with(root, 7).unwrap();
    let inner = arena.add_child_with(outer, 7).unwrap();
    arena.add_child_with(root, 1).unwrap();
    let last = arena.add_child_with(root, 7).unwrap();

    let removed = arena.remove_descendants_with(root, &7);

    assert_eq!(removed, vec![outer, last]);
    assert_eq!(arena.to_data_list(root), vec![&0, &1]);
    // nested match travels with its detached ancestor
    assert!(arena.is_parent_of(outer, inner));
    assert!(arena.is_root(outer) && arena.is_root(last));
}

#[test]
fn given_matching_root_when_removing_descendants_then_root_reported_but_not_detached() {
    let mut arena = TreeArena::new();
    let root = arena.new_node(7);
    arena.add_child_with(root, 7).unwrap();

    assert_eq!(arena.remove_descendants_with(root, &7), vec![root]);
    assert_eq!(arena.size(root), 2);
}

#[rstest]
fn given_matching_query_node_with_parent_when_removing_descendants_then_cut_from_its_parent(
    mut scenario: Scenario,
) {
    let root = scenario.root;
    let one = scenario.node(1);

    let removed = scenario.arena.remove_descendants_with(one, &1);

    assert_eq!(removed, vec![one]);
    assert!(scenario.arena.is_root(one));
    assert_eq!(scenario.arena.size(one), 3);
    assert_eq!(scenario.payloads(scenario.arena.children(root)), vec![2, 3]);
}

#[rstest]
fn given_matching_query_node_with_parent_when_removing_descendant_then_cut_from_its_parent(
    mut scenario: Scenario,
) {
    let root = scenario.root;
    let one = scenario.node(1);

    assert_eq!(scenario.arena.remove_descendant_with(one, &1), Some(one));

    assert!(scenario.arena.is_root(one));
    assert_eq!(scenario.arena.size(root), 3);
}

#[test]
fn given_one_sided_parent_link_when_removing_by_payload_then_returned_node_is_root() {
    let mut arena = TreeArena::new();
    let stray_parent = arena.new_node(0);
    let single = arena.new_node(7);
    let first = arena.new_node(8);
    for node in [single, first] {
        arena.set_parent(node, Some(stray_parent)).unwrap();
    }

    assert_eq!(arena.remove_descendant_with(single, &7), Some(single));
    assert_eq!(arena.parent(single), None);

    let holder = arena.new_node(1);
    arena.add_child(holder, first).unwrap_err();
    assert_eq!(arena.remove_descendants_with(first, &8), vec![first]);
    assert_eq!(arena.parent(first), None);
    assert_eq!(arena.add_child(holder, first), Ok(first));

    assert!(arena.children(stray_parent).is_empty());
}

// ============================================================
// Checked attachment
// ============================================================

#[rstest]
fn given_attached_node_when_adding_elsewhere_then_already_attached_error(mut scenario: Scenario) {
    let four = scenario.node(4);
    let three = scenario.node(3);
    let one = scenario.node(1);

    let result = scenario.arena.add_child(three, four);

    assert_eq!(
        result,
        Err(TreeError::AlreadyAttached {
            child: four,
            parent: one
        })
    );
    let root = scenario.root;
    let detached = scenario.arena.remove_child(one, four).unwrap();
    assert_eq!(scenario.arena.add_child(three, detached), Ok(four));
    assert_eq!(scenario.payloads(&scenario.arena.to_list(root)), vec![0, 1, 5, 2, 3, 4]);
}

#[rstest]
fn given_detached_root_when_attaching_under_own_descendant_then_cycle_error(
    mut scenario: Scenario,
) {
    let root = scenario.root;
    let five = scenario.node(5);
    assert_eq!(
        scenario.arena.add_child(five, root),
        Err(TreeError::CycleDetected {
            parent: five,
            child: root
        })
    );
    assert_eq!(scenario.arena.size(root), 6);
}

// ============================================================
// Large trees
// ============================================================

#[test]
fn given_very_deep_chain_when_walking_then_no_stack_overflow() {
    const DEPTH: usize = 200_000;
    let mut arena = TreeArena::new();
    let root = arena.new_node(0usize);
    let mut tail = root;
    for i in 1..DEPTH {
        tail = arena.add_child_with(tail, i).unwrap();
    }

    assert_eq!(arena.size(root), DEPTH);
    assert_eq!(arena.depth(root), DEPTH);
    assert!(arena.contains(root, &(DEPTH - 1)));
    assert_eq!(arena.find_descendant_with(root, &(DEPTH - 1)), Some(tail));
    assert_eq!(arena.leaves(root), vec![tail]);
    assert_eq!(arena.ancestors(tail).count(), DEPTH - 1);

    let rendered = arena.to_tree_string(root).to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), smithtree::tree_traits::DEFAULT_RENDER_DEPTH + 1);
    assert_eq!(lines.first(), Some(&"0"));
    assert!(lines.last().is_some_and(|line| line.ends_with("...")));
}

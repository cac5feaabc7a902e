use pretty_assertions::assert_eq;

use super::{graph, ids, label, set};

fn diamond() -> nova_dependency_graph::DependencyGraph {
    // a -> b -> c, a -> c
    graph(&[], &[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])])
}

#[test]
fn depth_zero_returns_only_the_queried_targets() {
    assert_eq!(ids(diamond().all_targets_at_depth(0, [&label("a")])), set(&["a"]));
}

#[test]
fn depth_one_adds_direct_dependencies() {
    assert_eq!(
        ids(diamond().all_targets_at_depth(1, [&label("a")])),
        set(&["a", "b", "c"])
    );
}

#[test]
fn negative_depth_is_the_full_closure_including_the_queried_targets() {
    let graph = graph(
        &[],
        &[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &[])],
    );

    assert_eq!(
        ids(graph.all_targets_at_depth(-1, [&label("a")])),
        set(&["a", "b", "c", "d"])
    );
}

fn layered() -> nova_dependency_graph::DependencyGraph {
    //        A
    //      /   \
    //     b     c
    //    / \
    //   D   e
    //  / \
    // f   g
    graph(
        &["//A", "//D"],
        &[
            ("//A", &["//b", "//c"]),
            ("//b", &["//D", "//e"]),
            ("//c", &[]),
            ("//D", &["//f", "//g"]),
            ("//e", &[]),
            ("//f", &[]),
            ("//g", &[]),
        ],
    )
}

#[test]
fn depth_zero_on_several_root_targets() {
    let graph = layered();
    assert_eq!(
        ids(graph.all_targets_at_depth(0, [&label("//A"), &label("//D")])),
        set(&["//A", "//D"])
    );
}

#[test]
fn depth_one_on_several_root_targets() {
    let graph = layered();
    assert_eq!(
        ids(graph.all_targets_at_depth(1, [&label("//A"), &label("//D")])),
        set(&["//A", "//b", "//c", "//D", "//f", "//g"])
    );
}

#[test]
fn depth_two_on_several_root_targets() {
    let graph = layered();
    assert_eq!(
        ids(graph.all_targets_at_depth(2, [&label("//A"), &label("//D")])),
        set(&["//A", "//b", "//c", "//D", "//e", "//f", "//g"])
    );
}

#[test]
fn depth_beyond_the_graph_is_harmless() {
    assert_eq!(
        ids(diamond().all_targets_at_depth(10, [&label("a")])),
        set(&["a", "b", "c"])
    );
}

use pretty_assertions::assert_eq;

use super::{graph, ids, label, set};

#[test]
fn unknown_target_has_no_dependencies() {
    let graph = graph(&[], &[("//a", &["//b"]), ("//b", &[])]);

    assert!(graph
        .transitive_dependencies_without_root_targets(&label("//does/not/exist"))
        .is_empty());
}

#[test]
fn target_without_dependencies() {
    let graph = graph(&["//A", "//B"], &[("//A", &["//B"]), ("//B", &[])]);

    assert!(graph
        .transitive_dependencies_without_root_targets(&label("//B"))
        .is_empty());
}

#[test]
fn only_direct_dependencies() {
    let graph = graph(
        &["//A"],
        &[("//A", &["//b", "//c", "//d"]), ("//b", &[]), ("//c", &[]), ("//d", &[])],
    );

    assert_eq!(
        ids(graph.transitive_dependencies_without_root_targets(&label("//A"))),
        set(&["//b", "//c", "//d"])
    );
}

#[test]
fn direct_and_transitive_dependencies_with_a_shared_leaf() {
    let graph = graph(
        &["//A"],
        &[
            ("//A", &["//b", "//c"]),
            ("//b", &["//d", "//e"]),
            ("//c", &["//e"]),
            ("//d", &[]),
            ("//e", &[]),
        ],
    );

    assert_eq!(
        ids(graph.transitive_dependencies_without_root_targets(&label("//A"))),
        set(&["//b", "//c", "//d", "//e"])
    );
}

#[test]
fn direct_root_dependency_is_excluded_but_its_dependencies_are_not() {
    // a -> b -> c, with a and b root targets.
    let graph = graph(&["a", "b"], &[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
    assert!(graph
        .transitive_dependencies_without_root_targets(&label("a"))
        .is_empty());

    // Only `a` is a root target: both b and c are dependency targets.
    let graph = super::graph(&["a"], &[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
    assert_eq!(
        ids(graph.transitive_dependencies_without_root_targets(&label("a"))),
        set(&["b", "c"])
    );
}

fn deep() -> nova_dependency_graph::DependencyGraph {
    graph(
        &["//A", "//B", "//F", "//L"],
        &[
            ("//A", &["//B", "//c"]),
            ("//B", &["//d", "//e"]),
            ("//c", &["//F", "//g", "//h"]),
            ("//d", &[]),
            ("//e", &[]),
            ("//F", &["//i", "//j"]),
            ("//g", &[]),
            ("//h", &[]),
            ("//i", &[]),
            ("//j", &["//k"]),
            ("//k", &["//L"]),
            ("//L", &[]),
        ],
    )
}

#[test]
fn deep_root_targets_stay_in_the_closure() {
    let graph = deep();

    assert_eq!(
        ids(graph.transitive_dependencies_without_root_targets(&label("//A"))),
        set(&["//c", "//F", "//g", "//h", "//i", "//j", "//k", "//L"])
    );
}

#[test]
fn querying_a_nested_root_target() {
    let graph = deep();

    assert_eq!(
        ids(graph.transitive_dependencies_without_root_targets(&label("//F"))),
        set(&["//i", "//j", "//k", "//L"])
    );
}

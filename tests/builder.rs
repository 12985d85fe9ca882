use schedgraph::graph::{Triggerables, build_graphs};
use schedgraph_test_utils::builders::{
    aggregating, dependent, edge, graph, root, triggerable, triggerables,
};
use schedgraph_test_utils::init_tracing;

#[test]
fn simple_scheduler() {
    init_tracing();
    let built = build_graphs(&[root("foo", &["bar", "baz"])], &Triggerables::new());

    assert_eq!(built.graphs.len(), 1);
    assert_eq!(
        built.graphs["foo"],
        graph(
            true,
            &["s:foo", "bar", "baz"],
            &[("s:foo", "bar"), ("s:foo", "baz")]
        )
    );
}

#[test]
fn triggerable_scheduler() {
    init_tracing();
    let schedulers = [root("base", &["upstream"]), triggerable("foo", &["bar"])];
    let mapping = triggerables(&[("foo", &["upstream"])]);

    let built = build_graphs(&schedulers, &mapping);

    assert_eq!(
        built.graphs["base"],
        graph(true, &["s:base", "upstream"], &[("s:base", "upstream")])
    );
    assert_eq!(
        built.graphs["foo"],
        graph(
            false,
            &["s:foo", "bar", "upstream"],
            &[("s:foo", "bar"), ("upstream", "s:foo")]
        )
    );
    assert!(built.diagnostics.unresolved_triggerables.is_empty());
}

#[test]
fn triggerable_without_mapping_entry_has_no_upstream_edges() {
    init_tracing();
    let schedulers = [root("base", &["upstream"]), triggerable("foo", &["bar"])];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["foo"],
        graph(false, &["s:foo", "bar"], &[("s:foo", "bar")])
    );
    assert_eq!(built.diagnostics.unresolved_triggerables, vec!["foo"]);
}

#[test]
fn dependent_scheduler() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream"]),
        dependent("foo", &["bar"], "base"),
    ];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["base"],
        graph(true, &["s:base", "upstream"], &[("s:base", "upstream")])
    );
    assert_eq!(
        built.graphs["foo"],
        graph(
            false,
            &["s:foo", "bar", "upstream"],
            &[("s:foo", "bar"), ("upstream", "s:foo")]
        )
    );
}

#[test]
fn dependent_scheduler_multiple_upstream_builders() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream1", "upstream2"]),
        dependent("foo", &["bar"], "base"),
    ];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["foo"],
        graph(
            false,
            &["s:foo", "bar", "upstream1", "upstream2"],
            &[
                ("s:foo", "bar"),
                ("upstream1", "s:foo"),
                ("upstream2", "s:foo")
            ]
        )
    );
}

#[test]
fn dependent_scheduler_declared_before_its_upstream() {
    init_tracing();
    let schedulers = [
        dependent("foo", &["bar"], "base"),
        root("base", &["upstream"]),
    ];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert!(built.graphs["foo"].edges.contains(&edge("upstream", "s:foo")));
}

#[test]
fn dependent_scheduler_with_unknown_upstream_degrades() {
    init_tracing();
    let schedulers = [dependent("foo", &["bar"], "missing")];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["foo"],
        graph(false, &["s:foo", "bar"], &[("s:foo", "bar")])
    );
    assert_eq!(built.diagnostics.unresolved_upstreams, vec!["foo"]);
}

#[test]
fn aggregating_scheduler() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream"]),
        aggregating("foo", &["bar"], &["upstream"]),
    ];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["foo"],
        graph(
            false,
            &["s:foo", "bar", "upstream"],
            &[("s:foo", "bar"), ("upstream", "s:foo")]
        )
    );
}

#[test]
fn aggregating_scheduler_multiple_upstream_builders() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream1", "upstream2"]),
        aggregating("foo", &["bar"], &["upstream1", "upstream2"]),
    ];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(
        built.graphs["base"],
        graph(
            true,
            &["s:base", "upstream1", "upstream2"],
            &[("s:base", "upstream1"), ("s:base", "upstream2")]
        )
    );
    assert_eq!(
        built.graphs["foo"],
        graph(
            false,
            &["s:foo", "bar", "upstream1", "upstream2"],
            &[
                ("s:foo", "bar"),
                ("upstream1", "s:foo"),
                ("upstream2", "s:foo")
            ]
        )
    );
}

#[test]
fn scheduler_named_like_its_builder_stays_distinct() {
    init_tracing();
    let built = build_graphs(&[root("docs", &["docs"])], &Triggerables::new());

    let g = &built.graphs["docs"];
    assert_eq!(g.nodes.len(), 2);
    assert_eq!(*g, graph(true, &["s:docs", "docs"], &[("s:docs", "docs")]));
}

#[test]
fn duplicate_names_keep_the_last_definition() {
    init_tracing();
    let schedulers = [root("foo", &["first"]), root("foo", &["second"])];

    let built = build_graphs(&schedulers, &Triggerables::new());

    assert_eq!(built.graphs.len(), 1);
    assert_eq!(
        built.graphs["foo"],
        graph(true, &["s:foo", "second"], &[("s:foo", "second")])
    );
    assert_eq!(built.diagnostics.duplicate_names, vec!["foo"]);
    assert_eq!(built.diagnostics.schedulers, 1);
}

use schedgraph::graph::{Coalescer, MergeOptions, Pipeline, Triggerables};
use schedgraph::types::OrphanPolicy;
use schedgraph_test_utils::builders::{aggregating, dependent, graph, root, triggerable, triggerables};
use schedgraph_test_utils::init_tracing;

#[test]
fn default_pipeline_builds_and_merges() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream"]),
        dependent("foo", &["bar"], "base"),
    ];

    let out = Pipeline::default().run(&schedulers, &Triggerables::new());

    assert_eq!(out.graphs.len(), 1);
    assert_eq!(out.diagnostics.build.schedulers, 2);
    assert_eq!(out.diagnostics.merge.roots, 1);
    assert_eq!(out.diagnostics.merge.folds, 1);
    assert_eq!(out.diagnostics.coalesce.merged_groups, 0);
}

#[test]
fn coalescing_runs_on_every_root_graph() {
    init_tracing();
    let schedulers = [
        root("commit", &["compile"]),
        dependent("commit-tests", &["test 1/2", "test 2/2"], "commit"),
        root("nightly", &["package 1/2", "package 2/2"]),
        aggregating("publish", &["upload"], &["package 1/2", "package 2/2"]),
    ];

    let pipeline = Pipeline::new(MergeOptions::default(), Some(Coalescer::default()));
    let out = pipeline.run(&schedulers, &Triggerables::new());

    assert_eq!(
        out.graphs["commit"],
        graph(
            true,
            &["s:commit", "compile", "s:commit-tests", "test"],
            &[
                ("s:commit", "compile"),
                ("compile", "s:commit-tests"),
                ("s:commit-tests", "test"),
            ]
        )
    );
    assert_eq!(
        out.graphs["nightly"],
        graph(
            true,
            &["s:nightly", "package", "s:publish", "upload"],
            &[
                ("s:nightly", "package"),
                ("package", "s:publish"),
                ("s:publish", "upload"),
            ]
        )
    );
    assert_eq!(out.diagnostics.coalesce.merged_groups, 2);
}

#[test]
fn diagnostics_summarise_degraded_input() {
    init_tracing();
    let schedulers = [
        root("base", &["upstream"]),
        triggerable("manual", &["deploy"]),
        dependent("lost", &["bar"], "nowhere"),
    ];

    let pipeline = Pipeline::new(
        MergeOptions {
            orphans: OrphanPolicy::Drop,
        },
        None,
    );
    let out = pipeline.run(&schedulers, &triggerables(&[]));

    assert_eq!(out.graphs.keys().collect::<Vec<_>>(), vec!["base"]);
    assert_eq!(out.diagnostics.build.unresolved_triggerables, vec!["manual"]);
    assert_eq!(out.diagnostics.build.unresolved_upstreams, vec!["lost"]);
    assert_eq!(out.diagnostics.merge.orphans, vec!["lost", "manual"]);

    let text = out.diagnostics.to_string();
    assert!(text.contains("root graphs: 1"));
    assert!(text.contains("orphans"));
}

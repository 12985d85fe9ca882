use std::io::Write;
use std::path::Path;

use schedgraph::config::{
    ConfigFile, RawTriggerKind, load_and_validate, load_triggerables, parse_str,
};
use schedgraph::errors::SchedgraphError;
use schedgraph::fs::mock::MockFileSystem;
use schedgraph::graph::{DEFAULT_SHARD_PATTERN, TriggerKind};
use schedgraph::types::OrphanPolicy;
use schedgraph_test_utils::builders::{ConfigFileBuilder, RawSchedulerBuilder};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(result: schedgraph::errors::Result<ConfigFile>, needle: &str) {
    match result {
        Err(SchedgraphError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}")
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn loads_every_scheduler_kind_in_declaration_order() {
    let file = write_config(
        r#"
[graph]
coalesce = true
orphans = "promote"

[[scheduler]]
name = "base"
builders = ["compile"]

[[scheduler]]
name = "tests"
builders = ["test 1/2", "test 2/2"]
kind = "dependent"
upstream = "base"

[[scheduler]]
name = "manual"
builders = ["deploy"]
kind = "triggerable"

[[scheduler]]
name = "release"
builders = ["package"]
kind = "aggregating"
upstream_builders = ["test 1/2", "test 2/2"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    let names: Vec<&str> = cfg.schedulers().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["base", "tests", "manual", "release"]);

    assert_eq!(cfg.schedulers()[0].kind, TriggerKind::None);
    assert_eq!(
        cfg.schedulers()[1].kind,
        TriggerKind::Dependent {
            upstream: "base".into()
        }
    );
    assert_eq!(cfg.schedulers()[2].kind, TriggerKind::Triggerable);
    assert_eq!(
        cfg.schedulers()[3].kind,
        TriggerKind::Aggregating {
            upstream_builders: vec!["test 1/2".into(), "test 2/2".into()]
        }
    );
    assert_eq!(cfg.schedulers()[1].builders, vec!["test 1/2", "test 2/2"]);

    let section = cfg.graph_section();
    assert!(section.coalesce);
    assert_eq!(section.orphans, OrphanPolicy::Promote);
    assert_eq!(section.coalesce_pattern, DEFAULT_SHARD_PATTERN);
}

#[test]
fn graph_section_defaults_apply() {
    let raw = parse_str(
        r#"
[[scheduler]]
name = "only"
"#,
    )
    .unwrap();

    let cfg = ConfigFile::try_from(raw).unwrap();

    assert!(!cfg.graph_section().coalesce);
    assert_eq!(cfg.graph_section().orphans, OrphanPolicy::Drop);
    assert!(cfg.schedulers()[0].builders.is_empty());
}

#[test]
fn empty_config_is_rejected() {
    let file = write_config("");
    expect_config_error(load_and_validate(file.path()), "at least one");
}

#[test]
fn duplicate_names_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_scheduler(RawSchedulerBuilder::new("a").builder("x").build())
        .with_scheduler(RawSchedulerBuilder::new("a").builder("y").build())
        .raw();

    expect_config_error(ConfigFile::try_from(raw), "more than once");
}

#[test]
fn dependent_without_upstream_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_scheduler(
            RawSchedulerBuilder::new("d")
                .kind(RawTriggerKind::Dependent)
                .build(),
        )
        .raw();

    expect_config_error(ConfigFile::try_from(raw), "requires `upstream`");
}

#[test]
fn aggregating_without_upstream_builders_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_scheduler(
            RawSchedulerBuilder::new("agg")
                .kind(RawTriggerKind::Aggregating)
                .build(),
        )
        .raw();

    expect_config_error(ConfigFile::try_from(raw), "upstream_builders");
}

#[test]
fn fields_of_another_kind_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_scheduler(RawSchedulerBuilder::new("plain").upstream("x").build())
        .raw();

    expect_config_error(ConfigFile::try_from(raw), "`upstream`");

    let raw = ConfigFileBuilder::new()
        .with_scheduler(
            RawSchedulerBuilder::new("dep")
                .kind(RawTriggerKind::Dependent)
                .upstream("x")
                .upstream_builder("y")
                .build(),
        )
        .raw();

    expect_config_error(ConfigFile::try_from(raw), "`upstream_builders`");
}

#[test]
fn dangling_upstream_is_only_a_warning() {
    let cfg = ConfigFileBuilder::new()
        .with_scheduler(
            RawSchedulerBuilder::new("dep")
                .kind(RawTriggerKind::Dependent)
                .upstream("nowhere")
                .build(),
        )
        .build();

    assert_eq!(cfg.schedulers().len(), 1);
}

#[test]
fn bad_coalesce_pattern_fails_at_load() {
    let raw = ConfigFileBuilder::new()
        .with_scheduler(RawSchedulerBuilder::new("a").build())
        .with_coalesce_pattern("(?P<basename>")
        .raw();

    match ConfigFile::try_from(raw) {
        Err(SchedgraphError::InvalidPattern(_)) => {}
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn unknown_kind_is_a_toml_error() {
    let file = write_config(
        r#"
[[scheduler]]
name = "a"
kind = "periodic"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedgraphError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn missing_triggerables_path_means_empty_mapping() {
    let fs = MockFileSystem::new();
    let mapping = load_triggerables(&fs, None).unwrap();
    assert!(mapping.is_empty());
}

#[test]
fn triggerables_load_from_json() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "triggerables.json",
        r#"{"manual": ["compile", "package"], "other": []}"#,
    );

    let mapping = load_triggerables(&fs, Some(Path::new("triggerables.json"))).unwrap();

    assert_eq!(mapping["manual"], vec!["compile", "package"]);
    assert!(mapping["other"].is_empty());
}

#[test]
fn malformed_triggerables_is_a_json_error() {
    let fs = MockFileSystem::new();
    fs.add_file("triggerables.json", r#"{"manual": "compile"}"#);

    match load_triggerables(&fs, Some(Path::new("triggerables.json"))) {
        Err(SchedgraphError::JsonError(_)) => {}
        other => panic!("expected JsonError, got {other:?}"),
    }
}

#[test]
fn absent_triggerables_file_is_an_error() {
    let fs = MockFileSystem::new();
    match load_triggerables(&fs, Some(Path::new("nope.json"))) {
        Err(SchedgraphError::Other(e)) => assert!(format!("{e}").contains("nope.json")),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn unreadable_config_path_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    match load_and_validate(&missing) {
        Err(SchedgraphError::Other(e)) => assert!(format!("{e:#}").contains("absent.toml")),
        other => panic!("expected a read error, got {other:?}"),
    }
}

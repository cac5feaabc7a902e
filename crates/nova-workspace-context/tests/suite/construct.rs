use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use nova_projectview::{ProjectViewParser, Section};
use nova_workspace_context::{
    BuildFlagsSpec, DirectoriesSpec, EnabledRulesSpec, IdeJavaHomeOverrideSpec, ImportDepthSpec,
    TargetsSpec, WorkspaceContextConstructor,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fake_bazel(root: &Path) -> PathBuf {
    let path = root.join("tools/bazel");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "#!/bin/sh\n").unwrap();
    path
}

fn parse(text: &str, root: &Path) -> nova_projectview::ProjectView {
    ProjectViewParser::new().parse_str(text, root).unwrap()
}

#[test]
fn absent_optional_entities_get_defaults() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let bazel = fake_bazel(root);
    let view = parse("bazel_binary: tools/bazel\n", root);

    let context = WorkspaceContextConstructor::new(root)
        .with_path_env(OsString::new())
        .construct(&view)
        .unwrap();

    assert_eq!(context.targets, TargetsSpec::default());
    assert_eq!(context.targets.values, vec!["//...".to_string()]);
    assert_eq!(
        context.directories,
        DirectoriesSpec {
            values: vec![root.to_path_buf()],
            excluded_values: Vec::new(),
        }
    );
    assert_eq!(context.build_flags, BuildFlagsSpec::default());
    assert_eq!(context.bazel_binary.value, bazel);
    assert!(!context.build_manual_targets.value);
    assert_eq!(context.dot_bazel_bsp_dir_path.value, root.join(".bazelbsp"));
    assert_eq!(context.import_depth, ImportDepthSpec { value: 0 });
    assert!(!context.import_depth.is_full_sync());
    assert_eq!(context.enabled_rules, EnabledRulesSpec::default());
    assert_eq!(context.ide_java_home_override, IdeJavaHomeOverrideSpec::default());
    assert!(!context.experimental_use_lib_over_mod.value);
    assert!(!context.experimental_add_transitive_compile_time_jars.value);
    assert!(!context.is_android_enabled());
    assert!(context.extra_flags().is_empty());
}

#[test]
fn every_entity_failure_is_reported_together() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let view = parse(
        "targets:\n  -//a:a\nimport_depth: deep\nbuild_flags:\n  --ok\n",
        root,
    );

    let err = WorkspaceContextConstructor::new(root)
        .with_path_env(OsString::new())
        .construct(&view)
        .unwrap_err();

    assert_eq!(
        err.entities().collect::<Vec<_>>(),
        vec!["targets", "bazel_binary"]
    );
    let message = err.to_string();
    assert!(
        message.contains("Mapping project view into 'targets' failed!"),
        "{message}"
    );
    assert!(message.contains("Could not find bazel"), "{message}");
    assert!(!message.contains("import_depth"), "{message}");
}

#[test]
fn undecodable_optional_values_use_defaults() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fake_bazel(root);
    let view = parse(
        "\
bazel_binary: tools/bazel
build_manual_targets: yes
derive_targets_from_directories: on
directories:
  java
import_depth: deep
experimental_use_lib_over_mod: 1
",
        root,
    );

    let context = WorkspaceContextConstructor::new(root)
        .construct(&view)
        .unwrap();

    assert!(!context.build_manual_targets.value);
    assert_eq!(context.targets, TargetsSpec::default());
    assert_eq!(context.import_depth, ImportDepthSpec { value: 0 });
    assert!(!context.experimental_use_lib_over_mod.value);
    assert_eq!(context.directories.values, vec![root.join("java")]);
}

#[test]
fn configured_bazel_binary_must_exist() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let view = parse("bazel_binary: /definitely/not/a/bazel\n", root);

    let err = WorkspaceContextConstructor::new(root)
        .construct(&view)
        .unwrap_err();

    assert_eq!(err.entities().collect::<Vec<_>>(), vec!["bazel_binary"]);
    assert!(err.to_string().contains("does not exist"), "{err}");
}

#[test]
fn every_section_maps_into_its_entity() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let bazel = fake_bazel(root);
    let view = parse(
        &format!(
            "\
targets:
  //java/...
  -//java/experimental/...
directories:
  java
  -java/gen
bazel_binary: {}
build_flags:
  --config=ci
build_manual_targets: true
import_depth: -1
enabled_rules:
  rules_java
  rules_android
ide_java_home_override: /opt/jdk17
experimental_use_lib_over_mod: true
experimental_add_transitive_compile_time_jars: TRUE
",
            bazel.display()
        ),
        root,
    );

    let context = WorkspaceContextConstructor::new(root)
        .construct(&view)
        .unwrap();

    assert_eq!(
        context.targets,
        TargetsSpec {
            values: vec!["//java/...".to_string()],
            excluded_values: vec!["//java/experimental/...".to_string()],
        }
    );
    assert_eq!(
        context.directories,
        DirectoriesSpec {
            values: vec![root.join("java")],
            excluded_values: vec![root.join("java/gen")],
        }
    );
    assert_eq!(context.build_flags.values, vec!["--config=ci".to_string()]);
    assert_eq!(context.bazel_binary.value, bazel);
    assert!(context.build_manual_targets.value);
    assert!(context.import_depth.is_full_sync());
    assert_eq!(
        context.ide_java_home_override.value,
        Some(PathBuf::from("/opt/jdk17"))
    );
    assert!(context.experimental_use_lib_over_mod.value);
    assert!(context.experimental_add_transitive_compile_time_jars.value);

    assert!(context.is_android_enabled());
    assert_eq!(
        context.extra_flags(),
        vec![
            "--experimental_google_legacy_api".to_string(),
            "--experimental_enable_android_migration_apis".to_string(),
        ]
    );
    assert_eq!(context.included_target_patterns(), vec!["//java/...".to_string()]);
    assert_eq!(
        context.excluded_target_patterns(),
        vec!["-//java/experimental/...".to_string()]
    );
}

#[test]
fn derived_targets_follow_directories() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fake_bazel(root);
    let view = ProjectViewParser::new()
        .parse_str(
            "\
bazel_binary: tools/bazel
derive_targets_from_directories: true
directories:
  .
  -third_party
",
            root,
        )
        .unwrap();

    let context = WorkspaceContextConstructor::new(root)
        .construct(&view)
        .unwrap();

    assert_eq!(
        context.targets,
        TargetsSpec {
            values: vec!["//...".to_string()],
            excluded_values: vec!["//third_party/...".to_string()],
        }
    );
    assert_eq!(context.directories.values, vec![root.to_path_buf()]);
}

#[test]
fn constructing_twice_yields_equal_contexts() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fake_bazel(root);
    let view = parse(
        "bazel_binary: tools/bazel\ntargets:\n  //a/...\nimport_depth: 3\n",
        root,
    );

    let constructor = WorkspaceContextConstructor::new(root);
    assert_eq!(
        constructor.construct(&view).unwrap(),
        constructor.construct(&view).unwrap()
    );
}

#[test]
fn builder_sections_are_accepted_directly() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fake_bazel(root);
    let view = nova_projectview::ProjectView::builder()
        .section::<nova_projectview::BazelBinarySection>(Section::singleton("tools/bazel"))
        .section::<nova_projectview::ImportDepthSection>(Section::singleton("2"))
        .build();

    let context = WorkspaceContextConstructor::new(root)
        .construct(&view)
        .unwrap();

    assert_eq!(context.import_depth.value, 2);
}

#[cfg(unix)]
#[test]
fn bazel_is_found_on_the_injected_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let bin = tempdir().unwrap();
    let bazelisk = bin.path().join("bazelisk");
    fs::write(&bazelisk, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&bazelisk, fs::Permissions::from_mode(0o755)).unwrap();

    let context = WorkspaceContextConstructor::new(dir.path())
        .with_path_env(bin.path())
        .construct(&nova_projectview::ProjectView::default())
        .unwrap();

    assert_eq!(context.bazel_binary.value, bazelisk);
}

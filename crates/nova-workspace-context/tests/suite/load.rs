use std::ffi::OsString;
use std::fs;

use nova_projectview::ProjectViewError;
use nova_workspace_context::{
    bazel_workspace_root, LoadWorkspaceContextError, WorkspaceContextConstructor,
    DEFAULT_PROJECT_VIEW_FILE,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn loads_the_default_project_view_with_imports() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("WORKSPACE"), "").unwrap();
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::write(root.join("tools/bazel"), "").unwrap();
    fs::create_dir_all(root.join(".ide")).unwrap();
    fs::write(
        root.join(".ide/shared.bazelproject"),
        "targets:\n  //shared/...\nbuild_flags:\n  --shared\n",
    )
    .unwrap();
    fs::write(
        root.join(DEFAULT_PROJECT_VIEW_FILE),
        "import .ide/shared.bazelproject\nbazel_binary: tools/bazel\ntargets:\n  //app/...\n",
    )
    .unwrap();

    let workspace_root = bazel_workspace_root(root.join("tools/bazel")).unwrap();
    let context = WorkspaceContextConstructor::new(&workspace_root)
        .with_path_env(OsString::new())
        .load(None)
        .unwrap();

    assert_eq!(
        context.targets.values,
        vec!["//shared/...".to_string(), "//app/...".to_string()]
    );
    assert_eq!(context.build_flags.values, vec!["--shared".to_string()]);
    assert_eq!(context.bazel_binary.value, workspace_root.join("tools/bazel"));
}

#[test]
fn missing_project_view_is_a_parse_failure() {
    let dir = tempdir().unwrap();

    let err = nova_workspace_context::load_workspace_context(dir.path(), None).unwrap_err();

    assert!(
        matches!(
            err,
            LoadWorkspaceContextError::ProjectView(ProjectViewError::Io { .. })
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn validation_failures_surface_from_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.bazelproject");
    fs::write(&path, "targets:\n  -//a:a\nbazel_binary: missing/bazel\n").unwrap();

    let err = WorkspaceContextConstructor::new(dir.path())
        .load(Some(&path))
        .unwrap_err();

    match err {
        LoadWorkspaceContextError::WorkspaceContext(err) => assert_eq!(
            err.entities().collect::<Vec<_>>(),
            vec!["targets", "bazel_binary"]
        ),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn loading_from_a_nested_directory_uses_the_enclosing_workspace() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("MODULE.bazel"), "").unwrap();
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::write(root.join("tools/bazel"), "").unwrap();
    fs::create_dir_all(root.join("java/com/example")).unwrap();
    fs::write(
        root.join(DEFAULT_PROJECT_VIEW_FILE),
        "bazel_binary: tools/bazel\n",
    )
    .unwrap();

    let context =
        nova_workspace_context::load_workspace_context(&root.join("java/com/example"), None)
            .unwrap();

    assert_eq!(context.dot_bazel_bsp_dir_path.value, root.join(".bazelbsp"));
    assert_eq!(context.directories.values, vec![root.to_path_buf()]);
}

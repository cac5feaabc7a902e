use std::path::{Path, PathBuf};

use crate::{LoadWorkspaceContextError, WorkspaceContext, WorkspaceContextConstructor};

/// Files marking a Bazel workspace root, in the order they're checked. Bzlmod's
/// `MODULE.bazel` comes first.
pub const WORKSPACE_MARKERS: [&str; 3] = ["MODULE.bazel", "WORKSPACE.bazel", "WORKSPACE"];

/// The marker file that makes `dir` a workspace root, if any.
pub fn workspace_marker(dir: &Path) -> Option<&'static str> {
    WORKSPACE_MARKERS
        .into_iter()
        .find(|marker| dir.join(marker).is_file())
}

pub fn is_bazel_workspace(dir: &Path) -> bool {
    workspace_marker(dir).is_some()
}

/// Closest enclosing workspace root of `start`, which may be a file or a directory.
pub fn bazel_workspace_root(start: impl AsRef<Path>) -> Option<PathBuf> {
    start.as_ref().ancestors().find_map(|dir| {
        let marker = workspace_marker(dir)?;
        tracing::debug!(
            target: "nova.workspace_context",
            root = %dir.display(),
            marker,
            "found bazel workspace root"
        );
        Some(dir.to_path_buf())
    })
}

/// Build the workspace context for the workspace containing `start`.
///
/// The root is the closest enclosing workspace root, or `start` itself when there is none.
/// `project_view_path` defaults to `<root>/projectview.bazelproject`. Bazel is looked up on
/// the process `PATH` when the project view doesn't name a binary.
pub fn load_workspace_context(
    start: &Path,
    project_view_path: Option<&Path>,
) -> Result<WorkspaceContext, LoadWorkspaceContextError> {
    let root = bazel_workspace_root(start).unwrap_or_else(|| start.to_path_buf());
    WorkspaceContextConstructor::new(root).load(project_view_path)
}

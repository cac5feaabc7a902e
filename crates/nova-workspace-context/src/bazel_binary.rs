use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Executables tried in every `PATH` entry, in order.
const BAZEL_EXECUTABLES: [&str; 2] = ["bazel", "bazelisk"];

/// Look for `bazel` (then `bazelisk`) in each `PATH` entry.
///
/// `path_env` overrides the process `PATH`.
pub(crate) fn find_bazel_on_path(path_env: Option<&OsString>) -> Option<PathBuf> {
    let process_path;
    let path_var = match path_env {
        Some(path_env) => path_env,
        None => {
            process_path = std::env::var_os("PATH")?;
            &process_path
        }
    };

    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| {
            BAZEL_EXECUTABLES
                .iter()
                .map(|name| dir.join(executable_name(name)))
                .find(|candidate| is_executable(candidate))
        })
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

//! Typed, validated workspace configuration built from a parsed project view.
//!
//! [`WorkspaceContextConstructor::construct`] maps every recognized entity of a
//! [`ProjectView`] into a [`WorkspaceContext`], substituting defaults for absent optional
//! entities. Failures are collected across all entities and reported together in a
//! [`WorkspaceContextError`].

mod bazel_binary;
mod discovery;
mod error;
mod specs;

pub use crate::{
    discovery::{
        bazel_workspace_root, is_bazel_workspace, load_workspace_context, workspace_marker,
        WORKSPACE_MARKERS,
    },
    error::{EntityError, LoadWorkspaceContextError, WorkspaceContextError},
    specs::{
        BazelBinarySpec, BuildFlagsSpec, BuildManualTargetsSpec, DirectoriesSpec,
        DotBazelBspDirPathSpec, EnabledRulesSpec, ExperimentalAddTransitiveCompileTimeJarsSpec,
        ExperimentalUseLibOverModSpec, IdeJavaHomeOverrideSpec, ImportDepthSpec, TargetsSpec,
        ALL_TARGETS_PATTERN, DOT_BAZEL_BSP_DIR_NAME,
    },
};
pub use nova_projectview::{default_project_view_path, DEFAULT_PROJECT_VIEW_FILE};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use nova_projectview::{ProjectView, ProjectViewParser};

use crate::specs::{
    BazelBinarySpecExtractor, BuildFlagsSpecExtractor, BuildManualTargetsSpecExtractor,
    DirectoriesSpecExtractor, DotBazelBspDirPathSpecExtractor, EnabledRulesSpecExtractor,
    ExperimentalAddTransitiveCompileTimeJarsSpecExtractor,
    ExperimentalUseLibOverModSpecExtractor, IdeJavaHomeOverrideSpecExtractor,
    ImportDepthSpecExtractor, TargetsSpecExtractor, WorkspaceContextEntityExtractor,
};

/// Rule set whose presence in `enabled_rules` turns on Android support.
pub const RULES_ANDROID: &str = "rules_android";

/// Extra Bazel flags needed while Android rules are being migrated out of Bazel.
pub const ANDROID_EXTRA_FLAGS: [&str; 2] = [
    "--experimental_google_legacy_api",
    "--experimental_enable_android_migration_apis",
];

/// Workspace configuration used for the lifetime of a server session.
///
/// Rebuilt (never mutated) on re-sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    /// Targets to work on: the `targets` section, or derived from `directories` when
    /// `derive_targets_from_directories` is set. Defaults to `//...`.
    pub targets: TargetsSpec,
    /// The `directories` section resolved against the workspace root. Defaults to the root.
    pub directories: DirectoriesSpec,
    /// Flags added to every Bazel invocation.
    pub build_flags: BuildFlagsSpec,
    /// The `bazel_binary` section, or `bazel`/`bazelisk` found on `PATH`.
    pub bazel_binary: BazelBinarySpec,
    /// Whether targets tagged `manual` are built.
    pub build_manual_targets: BuildManualTargetsSpec,
    /// `<workspace root>/.bazelbsp`.
    pub dot_bazel_bsp_dir_path: DotBazelBspDirPathSpec,
    pub import_depth: ImportDepthSpec,
    /// Rule sets to use. Empty means they're detected from the build.
    pub enabled_rules: EnabledRulesSpec,
    pub ide_java_home_override: IdeJavaHomeOverrideSpec,
    pub experimental_use_lib_over_mod: ExperimentalUseLibOverModSpec,
    pub experimental_add_transitive_compile_time_jars: ExperimentalAddTransitiveCompileTimeJarsSpec,
}

impl WorkspaceContext {
    pub fn is_android_enabled(&self) -> bool {
        self.enabled_rules.contains(RULES_ANDROID)
    }

    pub fn extra_flags(&self) -> Vec<String> {
        if self.is_android_enabled() {
            ANDROID_EXTRA_FLAGS.iter().map(|flag| flag.to_string()).collect()
        } else {
            Vec::new()
        }
    }

    /// Included target patterns, as passed to Bazel.
    pub fn included_target_patterns(&self) -> Vec<String> {
        self.targets.values.clone()
    }

    /// Excluded target patterns in command-line form (`-//pkg/...`).
    pub fn excluded_target_patterns(&self) -> Vec<String> {
        self.targets
            .excluded_values
            .iter()
            .map(|target| format!("-{target}"))
            .collect()
    }
}

/// Builds a [`WorkspaceContext`] for one workspace root.
#[derive(Debug, Clone)]
pub struct WorkspaceContextConstructor {
    workspace_root: PathBuf,
    path_env: Option<OsString>,
}

impl WorkspaceContextConstructor {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            path_env: None,
        }
    }

    /// Use `path_env` instead of the process `PATH` to look for Bazel.
    pub fn with_path_env(mut self, path_env: impl Into<OsString>) -> Self {
        self.path_env = Some(path_env.into());
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn construct(&self, view: &ProjectView) -> Result<WorkspaceContext, WorkspaceContextError> {
        tracing::info!(
            target: "nova.workspace_context",
            workspace_root = %self.workspace_root.display(),
            "constructing workspace context"
        );

        let root = self.workspace_root.as_path();
        let mut errors = Vec::new();

        let targets = extract(&TargetsSpecExtractor, view, &mut errors);
        let directories = extract(
            &DirectoriesSpecExtractor {
                workspace_root: root,
            },
            view,
            &mut errors,
        );
        let build_flags = extract(&BuildFlagsSpecExtractor, view, &mut errors);
        let bazel_binary = extract(
            &BazelBinarySpecExtractor {
                workspace_root: root,
                path_env: self.path_env.as_ref(),
            },
            view,
            &mut errors,
        );
        let build_manual_targets = extract(&BuildManualTargetsSpecExtractor, view, &mut errors);
        let dot_bazel_bsp_dir_path = extract(
            &DotBazelBspDirPathSpecExtractor {
                workspace_root: root,
            },
            view,
            &mut errors,
        );
        let import_depth = extract(&ImportDepthSpecExtractor, view, &mut errors);
        let enabled_rules = extract(&EnabledRulesSpecExtractor, view, &mut errors);
        let ide_java_home_override = extract(&IdeJavaHomeOverrideSpecExtractor, view, &mut errors);
        let experimental_use_lib_over_mod =
            extract(&ExperimentalUseLibOverModSpecExtractor, view, &mut errors);
        let experimental_add_transitive_compile_time_jars = extract(
            &ExperimentalAddTransitiveCompileTimeJarsSpecExtractor,
            view,
            &mut errors,
        );

        let (
            Some(targets),
            Some(directories),
            Some(build_flags),
            Some(bazel_binary),
            Some(build_manual_targets),
            Some(dot_bazel_bsp_dir_path),
            Some(import_depth),
            Some(enabled_rules),
            Some(ide_java_home_override),
            Some(experimental_use_lib_over_mod),
            Some(experimental_add_transitive_compile_time_jars),
        ) = (
            targets,
            directories,
            build_flags,
            bazel_binary,
            build_manual_targets,
            dot_bazel_bsp_dir_path,
            import_depth,
            enabled_rules,
            ide_java_home_override,
            experimental_use_lib_over_mod,
            experimental_add_transitive_compile_time_jars,
        )
        else {
            tracing::debug!(
                target: "nova.workspace_context",
                errors = errors.len(),
                "failed to construct workspace context"
            );
            return Err(WorkspaceContextError::new(errors));
        };

        let context = WorkspaceContext {
            targets,
            directories,
            build_flags,
            bazel_binary,
            build_manual_targets,
            dot_bazel_bsp_dir_path,
            import_depth,
            enabled_rules,
            ide_java_home_override,
            experimental_use_lib_over_mod,
            experimental_add_transitive_compile_time_jars,
        };
        tracing::info!(
            target: "nova.workspace_context",
            targets = ?context.targets.values,
            excluded_targets = ?context.targets.excluded_values,
            bazel_binary = %context.bazel_binary.value.display(),
            import_depth = context.import_depth.value,
            "constructed workspace context"
        );
        Ok(context)
    }

    /// Parse the project view at `project_view_path` (the workspace default when `None`) and
    /// construct the context from it.
    pub fn load(
        &self,
        project_view_path: Option<&Path>,
    ) -> Result<WorkspaceContext, LoadWorkspaceContextError> {
        let default_path;
        let path = match project_view_path {
            Some(path) => path,
            None => {
                default_path = default_project_view_path(&self.workspace_root);
                &default_path
            }
        };

        let view = ProjectViewParser::new().parse(path)?;
        Ok(self.construct(&view)?)
    }
}

fn extract<E: WorkspaceContextEntityExtractor>(
    extractor: &E,
    view: &ProjectView,
    errors: &mut Vec<EntityError>,
) -> Option<E::Entity> {
    match extractor.extract(view) {
        Ok(entity) => Some(entity),
        Err(message) => {
            tracing::debug!(
                target: "nova.workspace_context",
                entity = E::ENTITY,
                error = %message,
                "failed to map project view into entity"
            );
            errors.push(EntityError::new(E::ENTITY, message));
            None
        }
    }
}

//! Workspace context entities and the extractors that build them from a [`ProjectView`].
//!
//! Every entity has exactly one extractor. An extractor either produces the entity (falling
//! back to its default when the section is absent) or reports why it couldn't.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use nova_projectview::{
    AddTransitiveCompileTimeJarsSection, BazelBinarySection, BuildFlagsSection,
    BuildManualTargetsSection, DeriveTargetsFromDirectoriesSection, DirectoriesSection,
    EnabledRulesSection, IdeJavaHomeOverrideSection, ImportDepthSection, ProjectView,
    ProjectViewError, SingletonDecl, TargetsSection, UseLibOverModSection,
};

use crate::bazel_binary::find_bazel_on_path;

/// Target pattern used when the project view doesn't select any targets.
pub const ALL_TARGETS_PATTERN: &str = "//...";

/// Name of the server's private directory at the workspace root.
pub const DOT_BAZEL_BSP_DIR_NAME: &str = ".bazelbsp";

/// Targets (included and excluded) the user wants to work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetsSpec {
    pub values: Vec<String>,
    pub excluded_values: Vec<String>,
}

impl Default for TargetsSpec {
    fn default() -> Self {
        Self {
            values: vec![ALL_TARGETS_PATTERN.to_string()],
            excluded_values: Vec::new(),
        }
    }
}

/// Directories (included and excluded) that are part of the project, as absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoriesSpec {
    pub values: Vec<PathBuf>,
    pub excluded_values: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlagsSpec {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BazelBinarySpec {
    pub value: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildManualTargetsSpec {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotBazelBspDirPathSpec {
    pub value: PathBuf,
}

/// How many dependency hops below the root targets are imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportDepthSpec {
    pub value: i32,
}

impl ImportDepthSpec {
    /// A negative depth imports the whole transitive closure.
    pub fn is_full_sync(&self) -> bool {
        self.value < 0
    }
}

/// Rule sets enabled explicitly. Empty means the build is queried for them instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledRulesSpec {
    pub values: Vec<String>,
}

impl EnabledRulesSpec {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.values.iter().any(|value| value == rule)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeJavaHomeOverrideSpec {
    pub value: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExperimentalUseLibOverModSpec {
    pub value: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExperimentalAddTransitiveCompileTimeJarsSpec {
    pub value: bool,
}

/// Builds one workspace context entity from a project view.
pub(crate) trait WorkspaceContextEntityExtractor {
    type Entity;

    /// Entity name used in error messages.
    const ENTITY: &'static str;

    fn extract(&self, view: &ProjectView) -> Result<Self::Entity, String>;
}

fn decode_error(err: ProjectViewError) -> String {
    err.to_string()
}

fn singleton_value<D: SingletonDecl>(view: &ProjectView) -> Result<Option<D::Element>, String> {
    Ok(view
        .singleton::<D>()
        .map_err(decode_error)?
        .map(|section| section.value))
}

/// Like [`singleton_value`], for entities with a default: a value that doesn't decode is
/// logged and treated as absent.
fn optional_singleton_value<D: SingletonDecl>(view: &ProjectView) -> Option<D::Element> {
    match view.singleton::<D>() {
        Ok(section) => section.map(|section| section.value),
        Err(err) => {
            tracing::warn!(
                target: "nova.workspace_context",
                section = D::NAME,
                error = %err,
                "ignoring invalid project view value, using the default"
            );
            None
        }
    }
}

pub(crate) struct TargetsSpecExtractor;

impl TargetsSpecExtractor {
    fn explicit_targets(view: &ProjectView) -> Result<TargetsSpec, String> {
        let Some(targets) = view
            .excludable_list::<TargetsSection>()
            .map_err(decode_error)?
        else {
            return Ok(TargetsSpec::default());
        };

        let (values, excluded_values) = targets.into_parts();
        match (values.is_empty(), excluded_values.is_empty()) {
            (true, true) => Ok(TargetsSpec::default()),
            (true, false) => Err("'targets' section has no included targets.".to_string()),
            (false, _) => Ok(TargetsSpec {
                values,
                excluded_values,
            }),
        }
    }
}

impl WorkspaceContextEntityExtractor for TargetsSpecExtractor {
    type Entity = TargetsSpec;
    const ENTITY: &'static str = "targets";

    fn extract(&self, view: &ProjectView) -> Result<TargetsSpec, String> {
        let derive = optional_singleton_value::<DeriveTargetsFromDirectoriesSection>(view)
            .unwrap_or(false);
        if !derive {
            return Self::explicit_targets(view);
        }

        let directories = view
            .excludable_list::<DirectoriesSection>()
            .map_err(decode_error)?;
        let Some(directories) = directories else {
            return Self::explicit_targets(view);
        };
        match (directories.included().is_empty(), directories.excluded().is_empty()) {
            (true, true) => return Self::explicit_targets(view),
            (true, false) => {
                return Err("'directories' section has no included directories.".to_string())
            }
            (false, _) => {}
        }

        let (mut values, mut excluded_values) = match view
            .excludable_list::<TargetsSection>()
            .map_err(decode_error)?
        {
            Some(targets) => targets.into_parts(),
            None => (Vec::new(), Vec::new()),
        };
        values.extend(directories.included().iter().map(|dir| directory_target(dir)));
        excluded_values.extend(directories.excluded().iter().map(|dir| directory_target(dir)));

        tracing::debug!(
            target: "nova.workspace_context",
            targets = values.len(),
            excluded_targets = excluded_values.len(),
            "derived targets from directories"
        );
        Ok(TargetsSpec {
            values,
            excluded_values,
        })
    }
}

/// `java/foo` becomes `//java/foo/...`; the workspace root (`.`) becomes `//...`.
fn directory_target(dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    let dir = dir.trim_start_matches("./").trim_matches('/');
    if dir.is_empty() || dir == "." {
        ALL_TARGETS_PATTERN.to_string()
    } else {
        format!("//{dir}/...")
    }
}

pub(crate) struct DirectoriesSpecExtractor<'a> {
    pub(crate) workspace_root: &'a Path,
}

impl DirectoriesSpecExtractor<'_> {
    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir == Path::new(".") {
            self.workspace_root.to_path_buf()
        } else {
            self.workspace_root.join(dir)
        }
    }
}

impl WorkspaceContextEntityExtractor for DirectoriesSpecExtractor<'_> {
    type Entity = DirectoriesSpec;
    const ENTITY: &'static str = "directories";

    fn extract(&self, view: &ProjectView) -> Result<DirectoriesSpec, String> {
        let directories = view
            .excludable_list::<DirectoriesSection>()
            .map_err(decode_error)?;
        let (values, excluded_values) = directories.map(|d| d.into_parts()).unwrap_or_default();

        let mut values: Vec<PathBuf> = values.iter().map(|dir| self.resolve(dir)).collect();
        if values.is_empty() {
            values.push(self.workspace_root.to_path_buf());
        }
        Ok(DirectoriesSpec {
            values,
            excluded_values: excluded_values.iter().map(|dir| self.resolve(dir)).collect(),
        })
    }
}

pub(crate) struct BuildFlagsSpecExtractor;

impl WorkspaceContextEntityExtractor for BuildFlagsSpecExtractor {
    type Entity = BuildFlagsSpec;
    const ENTITY: &'static str = "build_flags";

    fn extract(&self, view: &ProjectView) -> Result<BuildFlagsSpec, String> {
        let values = view
            .list::<BuildFlagsSection>()
            .map_err(decode_error)?
            .map(|section| section.values)
            .unwrap_or_default();
        Ok(BuildFlagsSpec { values })
    }
}

pub(crate) struct BazelBinarySpecExtractor<'a> {
    pub(crate) workspace_root: &'a Path,
    pub(crate) path_env: Option<&'a OsString>,
}

impl WorkspaceContextEntityExtractor for BazelBinarySpecExtractor<'_> {
    type Entity = BazelBinarySpec;
    const ENTITY: &'static str = "bazel_binary";

    fn extract(&self, view: &ProjectView) -> Result<BazelBinarySpec, String> {
        if let Some(configured) = singleton_value::<BazelBinarySection>(view)? {
            let value = self.workspace_root.join(configured);
            if !value.is_file() {
                return Err(format!(
                    "Configured bazel binary {} does not exist",
                    value.display()
                ));
            }
            return Ok(BazelBinarySpec { value });
        }

        let value = find_bazel_on_path(self.path_env)
            .ok_or_else(|| "Could not find bazel or bazelisk on your PATH".to_string())?;
        tracing::debug!(
            target: "nova.workspace_context",
            path = %value.display(),
            "found bazel on PATH"
        );
        Ok(BazelBinarySpec { value })
    }
}

pub(crate) struct BuildManualTargetsSpecExtractor;

impl WorkspaceContextEntityExtractor for BuildManualTargetsSpecExtractor {
    type Entity = BuildManualTargetsSpec;
    const ENTITY: &'static str = "build_manual_targets";

    fn extract(&self, view: &ProjectView) -> Result<BuildManualTargetsSpec, String> {
        Ok(BuildManualTargetsSpec {
            value: optional_singleton_value::<BuildManualTargetsSection>(view).unwrap_or(false),
        })
    }
}

pub(crate) struct DotBazelBspDirPathSpecExtractor<'a> {
    pub(crate) workspace_root: &'a Path,
}

impl WorkspaceContextEntityExtractor for DotBazelBspDirPathSpecExtractor<'_> {
    type Entity = DotBazelBspDirPathSpec;
    const ENTITY: &'static str = "dot_bazel_bsp_dir_path";

    fn extract(&self, _view: &ProjectView) -> Result<DotBazelBspDirPathSpec, String> {
        Ok(DotBazelBspDirPathSpec {
            value: self.workspace_root.join(DOT_BAZEL_BSP_DIR_NAME),
        })
    }
}

pub(crate) struct ImportDepthSpecExtractor;

impl WorkspaceContextEntityExtractor for ImportDepthSpecExtractor {
    type Entity = ImportDepthSpec;
    const ENTITY: &'static str = "import_depth";

    fn extract(&self, view: &ProjectView) -> Result<ImportDepthSpec, String> {
        Ok(ImportDepthSpec {
            value: optional_singleton_value::<ImportDepthSection>(view).unwrap_or(0),
        })
    }
}

pub(crate) struct EnabledRulesSpecExtractor;

impl WorkspaceContextEntityExtractor for EnabledRulesSpecExtractor {
    type Entity = EnabledRulesSpec;
    const ENTITY: &'static str = "enabled_rules";

    fn extract(&self, view: &ProjectView) -> Result<EnabledRulesSpec, String> {
        let values = view
            .list::<EnabledRulesSection>()
            .map_err(decode_error)?
            .map(|section| section.values)
            .unwrap_or_default();
        Ok(EnabledRulesSpec { values })
    }
}

pub(crate) struct IdeJavaHomeOverrideSpecExtractor;

impl WorkspaceContextEntityExtractor for IdeJavaHomeOverrideSpecExtractor {
    type Entity = IdeJavaHomeOverrideSpec;
    const ENTITY: &'static str = "ide_java_home_override";

    fn extract(&self, view: &ProjectView) -> Result<IdeJavaHomeOverrideSpec, String> {
        Ok(IdeJavaHomeOverrideSpec {
            value: optional_singleton_value::<IdeJavaHomeOverrideSection>(view),
        })
    }
}

pub(crate) struct ExperimentalUseLibOverModSpecExtractor;

impl WorkspaceContextEntityExtractor for ExperimentalUseLibOverModSpecExtractor {
    type Entity = ExperimentalUseLibOverModSpec;
    const ENTITY: &'static str = "experimental_use_lib_over_mod";

    fn extract(&self, view: &ProjectView) -> Result<ExperimentalUseLibOverModSpec, String> {
        Ok(ExperimentalUseLibOverModSpec {
            value: optional_singleton_value::<UseLibOverModSection>(view).unwrap_or(false),
        })
    }
}

pub(crate) struct ExperimentalAddTransitiveCompileTimeJarsSpecExtractor;

impl WorkspaceContextEntityExtractor for ExperimentalAddTransitiveCompileTimeJarsSpecExtractor {
    type Entity = ExperimentalAddTransitiveCompileTimeJarsSpec;
    const ENTITY: &'static str = "experimental_add_transitive_compile_time_jars";

    fn extract(
        &self,
        view: &ProjectView,
    ) -> Result<ExperimentalAddTransitiveCompileTimeJarsSpec, String> {
        Ok(ExperimentalAddTransitiveCompileTimeJarsSpec {
            value: optional_singleton_value::<AddTransitiveCompileTimeJarsSection>(view)
                .unwrap_or(false),
        })
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::ProjectView;
use crate::section::Section;
use crate::sections::recognized_section;
use crate::splitter::split_raw_sections;
use crate::ProjectViewError;

/// Name of the pseudo-section that pulls another project view in (`import path/to/file`).
pub const IMPORT_SECTION: &str = "import";

/// File name of the project view Nova looks for at the workspace root.
pub const DEFAULT_PROJECT_VIEW_FILE: &str = "projectview.bazelproject";

pub fn default_project_view_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(DEFAULT_PROJECT_VIEW_FILE)
}

/// Parses project view files, following `import` lines.
///
/// Imports are resolved relative to the importing file's directory and parsed depth-first in
/// declaration order. Imported documents contribute first, the importing document's own
/// sections last, and sections are merged according to their [`crate::SectionKind`].
///
/// The parser is stateless; re-parsing unchanged files yields equal views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectViewParser;

impl ProjectViewParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, path: &Path) -> Result<ProjectView, ProjectViewError> {
        tracing::info!(
            target: "nova.projectview",
            path = %path.display(),
            "parsing project view"
        );

        let view = self.parse_file(path, &mut Vec::new())?;

        tracing::debug!(
            target: "nova.projectview",
            path = %path.display(),
            sections = view.len(),
            "parsed project view"
        );
        Ok(view)
    }

    /// Parse in-memory text. Imports are resolved against `base_dir`.
    pub fn parse_str(&self, text: &str, base_dir: &Path) -> Result<ProjectView, ProjectViewError> {
        self.parse_text(text, base_dir, &mut Vec::new())
    }

    /// Parse `path` on top of the document at `default_path`.
    ///
    /// The default behaves like an implicit first import. When `path` doesn't exist the default
    /// is used on its own; the default itself must be readable.
    pub fn parse_with_default(
        &self,
        path: &Path,
        default_path: &Path,
    ) -> Result<ProjectView, ProjectViewError> {
        tracing::info!(
            target: "nova.projectview",
            path = %path.display(),
            default_path = %default_path.display(),
            "parsing project view with default"
        );

        let default = self.parse_file(default_path, &mut Vec::new())?;
        if !path.exists() {
            tracing::info!(
                target: "nova.projectview",
                path = %path.display(),
                "project view not found; using the default project view"
            );
            return Ok(default);
        }

        Ok(default.merge(self.parse_file(path, &mut Vec::new())?))
    }

    pub fn parse_str_with_default(
        &self,
        text: &str,
        default_text: &str,
        base_dir: &Path,
    ) -> Result<ProjectView, ProjectViewError> {
        let default = self.parse_text(default_text, base_dir, &mut Vec::new())?;
        Ok(default.merge(self.parse_text(text, base_dir, &mut Vec::new())?))
    }

    /// `stack` holds the canonical paths of the files currently being parsed, outermost first.
    fn parse_file(
        &self,
        path: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<ProjectView, ProjectViewError> {
        let io_error = |source| ProjectViewError::Io {
            path: path.to_path_buf(),
            source,
        };

        let canonical = fs::canonicalize(path).map_err(io_error)?;
        if stack.contains(&canonical) {
            let mut chain = stack.clone();
            chain.push(canonical.clone());
            return Err(ProjectViewError::CyclicImport {
                path: canonical,
                chain,
            });
        }

        let text = fs::read_to_string(&canonical).map_err(io_error)?;
        let base_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        stack.push(canonical);
        let result = self.parse_text(&text, &base_dir, stack);
        stack.pop();
        result
    }

    fn parse_text(
        &self,
        text: &str,
        base_dir: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<ProjectView, ProjectViewError> {
        tracing::trace!(target: "nova.projectview", text, "parsing project view text");

        let raw_sections = split_raw_sections(text);
        let mut view = ProjectView::default();

        for import in raw_sections.all_with_name(IMPORT_SECTION) {
            let import = import.body.trim();
            if import.is_empty() {
                tracing::debug!(target: "nova.projectview", "skipping empty import");
                continue;
            }

            let import_path = base_dir.join(import);
            tracing::debug!(
                target: "nova.projectview",
                path = %import_path.display(),
                "parsing imported project view"
            );
            view = view.merge(self.parse_file(&import_path, stack)?);
        }

        let mut local = ProjectView::default();
        for raw in raw_sections.iter() {
            if raw.name == IMPORT_SECTION {
                continue;
            }

            let Some((name, kind)) = recognized_section(&raw.name) else {
                tracing::debug!(
                    target: "nova.projectview",
                    section = %raw.name,
                    "ignoring unknown section"
                );
                continue;
            };

            match Section::decode(kind, &raw.body) {
                Some(section) => local.merge_section(name, section),
                None => tracing::debug!(
                    target: "nova.projectview",
                    section = name,
                    "ignoring section without values"
                ),
            }
        }

        Ok(view.merge(local))
    }
}

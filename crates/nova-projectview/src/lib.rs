//! Project view (`*.bazelproject`) parsing for Nova's Bazel build-server bridge.
//!
//! A project view is a small, human-edited document that selects which Bazel targets and
//! directories the IDE should model:
//!
//! ```text
//! import shared/base.bazelproject
//!
//! targets:
//!     //java/...
//!     -//java/experimental/...
//!
//! bazel_binary: /usr/local/bin/bazel
//! ```
//!
//! Parsing happens in three layers:
//! - [`split_raw_sections`] cuts the text into `(name, body)` pairs and drops comments,
//! - [`Section`] decodes a body into one of three shapes (singleton, list, excludable list),
//! - [`ProjectViewParser`] resolves `import` lines and merges sections per shape into a
//!   single [`ProjectView`].

mod document;
mod parser;
mod section;
mod sections;
mod splitter;

pub use crate::{
    document::{ProjectView, ProjectViewBuilder},
    parser::{default_project_view_path, ProjectViewParser, DEFAULT_PROJECT_VIEW_FILE, IMPORT_SECTION},
    section::{
        ExcludableListSection, ListSection, MergeSection, Section, SectionKind, SingletonSection,
    },
    sections::{
        section_kind, AddTransitiveCompileTimeJarsSection, BazelBinarySection,
        BuildFlagsSection, BuildManualTargetsSection, DeriveTargetsFromDirectoriesSection,
        DirectoriesSection, EnabledRulesSection, ExcludableListDecl, IdeJavaHomeOverrideSection,
        ImportDepthSection, ListDecl, SectionDecl, SingletonDecl, TargetsSection,
        UseLibOverModSection, RECOGNIZED_SECTIONS,
    },
    splitter::{split_raw_sections, RawSection, RawSections},
};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectViewError {
    #[error("failed to read project view {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "cyclic import of project view {} (import chain: {})",
        .path.display(),
        format_import_chain(.chain)
    )]
    CyclicImport { path: PathBuf, chain: Vec<PathBuf> },
    #[error("invalid value in '{section}' section: {message}")]
    InvalidSection {
        section: &'static str,
        message: String,
    },
}

fn format_import_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

use crate::section::{
    ExcludableListSection, ListSection, MergeSection, Section, SectionKind, SingletonSection,
};
use crate::sections::{
    recognized_section, ExcludableListDecl, ListDecl, SectionDecl, SingletonDecl,
    RECOGNIZED_SECTIONS,
};
use crate::ProjectViewError;

const LIST_ENTRY_INDENT: &str = "    ";

/// A fully merged project view: at most one section per recognized section name.
///
/// Equality ignores the order in which sections were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectView {
    sections: IndexMap<&'static str, Section>,
}

impl ProjectView {
    pub fn builder() -> ProjectViewBuilder {
        ProjectViewBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Names of the sections present, in canonical order.
    pub fn section_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        RECOGNIZED_SECTIONS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| self.sections.contains_key(name))
    }

    pub fn singleton<D: SingletonDecl>(
        &self,
    ) -> Result<Option<SingletonSection<D::Element>>, ProjectViewError> {
        match self.sections.get(D::NAME) {
            Some(Section::Singleton(section)) => section
                .clone()
                .try_map(|value| D::decode_element(&value))
                .map(Some)
                .map_err(invalid_section::<D>),
            Some(other) => Err(kind_mismatch::<D>(other)),
            None => Ok(None),
        }
    }

    pub fn list<D: ListDecl>(&self) -> Result<Option<ListSection<D::Element>>, ProjectViewError> {
        match self.sections.get(D::NAME) {
            Some(Section::List(section)) => section
                .clone()
                .try_map(|value| D::decode_element(&value))
                .map(Some)
                .map_err(invalid_section::<D>),
            Some(other) => Err(kind_mismatch::<D>(other)),
            None => Ok(None),
        }
    }

    pub fn excludable_list<D>(
        &self,
    ) -> Result<Option<ExcludableListSection<D::Element>>, ProjectViewError>
    where
        D: ExcludableListDecl,
        D::Element: Hash + Eq,
    {
        match self.sections.get(D::NAME) {
            Some(Section::ExcludableList(section)) => section
                .clone()
                .try_map(|value| D::decode_element(&value))
                .map(Some)
                .map_err(invalid_section::<D>),
            Some(other) => Err(kind_mismatch::<D>(other)),
            None => Ok(None),
        }
    }

    /// Merge `later` on top of `self`, section by section, using each section's merge rule.
    pub fn merge(mut self, later: ProjectView) -> ProjectView {
        for (name, section) in later.sections {
            self.merge_section(name, section);
        }
        self
    }

    pub(crate) fn merge_section(&mut self, name: &'static str, section: Section) {
        let merged = match self.sections.shift_remove(name) {
            Some(earlier) => earlier.merge(section),
            None => section,
        };
        self.sections.insert(name, merged);
    }
}

fn invalid_section<D: SectionDecl>(message: String) -> ProjectViewError {
    ProjectViewError::InvalidSection {
        section: D::NAME,
        message,
    }
}

fn kind_mismatch<D: SectionDecl>(section: &Section) -> ProjectViewError {
    invalid_section::<D>(format!(
        "expected a {} section, found a {} section",
        D::KIND,
        section.kind()
    ))
}

/// Renders the view back into project view syntax.
///
/// The output parses back into an equal [`ProjectView`].
impl fmt::Display for ProjectView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in self.section_names() {
            let Some(section) = self.sections.get(name) else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            first = false;

            match section {
                Section::Singleton(section) => writeln!(f, "{name}: {}", section.value)?,
                Section::List(section) => {
                    writeln!(f, "{name}:")?;
                    for value in &section.values {
                        writeln!(f, "{LIST_ENTRY_INDENT}{value}")?;
                    }
                }
                Section::ExcludableList(section) => {
                    writeln!(f, "{name}:")?;
                    for value in section.included() {
                        writeln!(f, "{LIST_ENTRY_INDENT}{value}")?;
                    }
                    for value in section.excluded() {
                        writeln!(f, "{LIST_ENTRY_INDENT}-{value}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`ProjectView`] section by section. Sections added under the same name merge.
#[derive(Debug, Default, Clone)]
pub struct ProjectViewBuilder {
    view: ProjectView,
}

impl ProjectViewBuilder {
    pub fn section<D: SectionDecl>(mut self, section: Section) -> Self {
        debug_assert_eq!(
            section.kind(),
            D::KIND,
            "section kind doesn't match the `{}` declaration",
            D::NAME
        );
        self.view.merge_section(D::NAME, section);
        self
    }

    /// Add a section by name. Unrecognized names are ignored, like they are when parsing.
    pub fn named_section(mut self, name: &str, section: Section) -> Self {
        match recognized_section(name) {
            Some((name, kind)) if kind == section.kind() => self.view.merge_section(name, section),
            Some((name, kind)) => tracing::debug!(
                target: "nova.projectview",
                section = name,
                expected = ?kind,
                found = ?section.kind(),
                "ignoring section with mismatched kind"
            ),
            None => tracing::debug!(
                target: "nova.projectview",
                section = name,
                "ignoring unknown section"
            ),
        }
        self
    }

    pub fn build(self) -> ProjectView {
        self.view
    }
}

impl SectionKind {
    fn describe(self) -> &'static str {
        match self {
            SectionKind::Singleton => "single value",
            SectionKind::List => "list",
            SectionKind::ExcludableList => "excludable list",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

use indexmap::IndexSet;
use std::hash::Hash;

const EXCLUDED_ENTRY_PREFIX: char = '-';

/// The three shapes a project view section can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// One scalar value, e.g. `bazel_binary: /usr/bin/bazel`.
    Singleton,
    /// Whitespace-separated values, e.g. `build_flags`.
    List,
    /// Whitespace-separated values where `-value` excludes `value`, e.g. `targets`.
    ExcludableList,
}

/// Combines a section with the same section from a later document.
///
/// "Later" means: a local section after the imports, or a later import after an earlier one.
pub trait MergeSection: Sized {
    fn merge(self, later: Self) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingletonSection<T> {
    pub value: T,
}

impl<T> SingletonSection<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<SingletonSection<U>, E> {
        Ok(SingletonSection::new(f(self.value)?))
    }
}

impl<T> MergeSection for SingletonSection<T> {
    fn merge(self, later: Self) -> Self {
        later
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListSection<T> {
    pub values: Vec<T>,
}

impl<T> ListSection<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<ListSection<U>, E> {
        Ok(ListSection::new(
            self.values.into_iter().map(f).collect::<Result<_, _>>()?,
        ))
    }
}

impl<T> MergeSection for ListSection<T> {
    fn merge(mut self, later: Self) -> Self {
        self.values.extend(later.values);
        self
    }
}

/// A list of included values plus a list of excluded values.
///
/// The included values never contain an excluded value: exclusion always wins, no matter
/// which document contributed it. Both lists are deduplicated, keeping first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExcludableListSection<T> {
    included: Vec<T>,
    excluded: Vec<T>,
}

impl<T: Hash + Eq> ExcludableListSection<T> {
    pub fn new(included: Vec<T>, excluded: Vec<T>) -> Self {
        let excluded: IndexSet<T> = excluded.into_iter().collect();
        let included: IndexSet<T> = included
            .into_iter()
            .filter(|value| !excluded.contains(value))
            .collect();
        Self {
            included: included.into_iter().collect(),
            excluded: excluded.into_iter().collect(),
        }
    }

    pub fn try_map<U: Hash + Eq, E>(
        self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<ExcludableListSection<U>, E> {
        let included = self.included.into_iter().map(&mut f).collect::<Result<_, _>>()?;
        let excluded = self.excluded.into_iter().map(&mut f).collect::<Result<_, _>>()?;
        Ok(ExcludableListSection::new(included, excluded))
    }
}

impl<T> ExcludableListSection<T> {
    pub fn included(&self) -> &[T] {
        &self.included
    }

    pub fn excluded(&self) -> &[T] {
        &self.excluded
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.included, self.excluded)
    }
}

impl<T: Hash + Eq> MergeSection for ExcludableListSection<T> {
    fn merge(self, later: Self) -> Self {
        let (mut included, mut excluded) = self.into_parts();
        included.extend(later.included);
        excluded.extend(later.excluded);
        Self::new(included, excluded)
    }
}

/// A decoded section whose elements are still plain tokens.
///
/// Typed access goes through the section declarations in [`crate::SectionDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Singleton(SingletonSection<String>),
    List(ListSection<String>),
    ExcludableList(ExcludableListSection<String>),
}

impl Section {
    pub fn singleton(value: impl Into<String>) -> Self {
        Self::Singleton(SingletonSection::new(value.into()))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(ListSection::new(values.into_iter().map(Into::into).collect()))
    }

    pub fn excludable_list<I, J, S>(included: I, excluded: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExcludableList(ExcludableListSection::new(
            included.into_iter().map(Into::into).collect(),
            excluded.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Singleton(_) => SectionKind::Singleton,
            Section::List(_) => SectionKind::List,
            Section::ExcludableList(_) => SectionKind::ExcludableList,
        }
    }

    /// Decode a raw section body into the given shape.
    ///
    /// Returns `None` when the body holds no value (blank singleton, list without entries).
    pub fn decode(kind: SectionKind, raw_body: &str) -> Option<Self> {
        match kind {
            SectionKind::Singleton => {
                let value = raw_body.trim();
                (!value.is_empty()).then(|| Section::singleton(value))
            }
            SectionKind::List => {
                let values: Vec<&str> = raw_body.split_whitespace().collect();
                (!values.is_empty()).then(|| Section::list(values))
            }
            SectionKind::ExcludableList => {
                let mut included = Vec::new();
                let mut excluded = Vec::new();
                for entry in raw_body.split_whitespace() {
                    match entry.strip_prefix(EXCLUDED_ENTRY_PREFIX) {
                        // A lone `-` excludes nothing.
                        Some("") => {}
                        Some(entry) => excluded.push(entry),
                        None => included.push(entry),
                    }
                }
                if included.is_empty() && excluded.is_empty() {
                    return None;
                }
                Some(Section::excludable_list(included, excluded))
            }
        }
    }
}

impl MergeSection for Section {
    fn merge(self, later: Self) -> Self {
        match (self, later) {
            (Section::Singleton(earlier), Section::Singleton(later)) => {
                Section::Singleton(earlier.merge(later))
            }
            (Section::List(earlier), Section::List(later)) => Section::List(earlier.merge(later)),
            (Section::ExcludableList(earlier), Section::ExcludableList(later)) => {
                Section::ExcludableList(earlier.merge(later))
            }
            // The kind is fixed per section name, so this only happens for hand-built views.
            (_, later) => later,
        }
    }
}

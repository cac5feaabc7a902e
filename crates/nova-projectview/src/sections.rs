//! Declarations of every section Nova recognizes in a project view.
//!
//! Adding a configuration entity means declaring a new section here and listing it in
//! [`RECOGNIZED_SECTIONS`]; there are no dynamically registered section kinds.

use std::path::PathBuf;

use crate::section::SectionKind;

/// A concrete, named project view section with a fixed shape and element decoder.
pub trait SectionDecl {
    const NAME: &'static str;
    const KIND: SectionKind;
    type Element;

    fn decode_element(raw: &str) -> Result<Self::Element, String>;
}

pub trait SingletonDecl: SectionDecl {}

pub trait ListDecl: SectionDecl {}

pub trait ExcludableListDecl: SectionDecl {}

macro_rules! declare_section {
    (@decl $(#[$meta:meta])* $ty:ident, $name:literal, $kind:ident, $elem:ty, $decode:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $ty;

        impl SectionDecl for $ty {
            const NAME: &'static str = $name;
            const KIND: SectionKind = SectionKind::$kind;
            type Element = $elem;

            fn decode_element(raw: &str) -> Result<Self::Element, String> {
                $decode(raw)
            }
        }
    };
    ($(#[$meta:meta])* $ty:ident, $name:literal, Singleton, $elem:ty, $decode:path) => {
        declare_section!(@decl $(#[$meta])* $ty, $name, Singleton, $elem, $decode);
        impl SingletonDecl for $ty {}
    };
    ($(#[$meta:meta])* $ty:ident, $name:literal, List, $elem:ty, $decode:path) => {
        declare_section!(@decl $(#[$meta])* $ty, $name, List, $elem, $decode);
        impl ListDecl for $ty {}
    };
    ($(#[$meta:meta])* $ty:ident, $name:literal, ExcludableList, $elem:ty, $decode:path) => {
        declare_section!(@decl $(#[$meta])* $ty, $name, ExcludableList, $elem, $decode);
        impl ExcludableListDecl for $ty {}
    };
}

declare_section!(
    /// Targets (included and excluded) the user wants to work on.
    TargetsSection,
    "targets",
    ExcludableList,
    String,
    decode_string
);
declare_section!(
    /// Directories (included and excluded) that are part of the project.
    DirectoriesSection,
    "directories",
    ExcludableList,
    PathBuf,
    decode_path
);
declare_section!(
    /// Bazel executable used for every invocation.
    BazelBinarySection,
    "bazel_binary",
    Singleton,
    PathBuf,
    decode_path
);
declare_section!(
    /// Flags appended to every Bazel invocation.
    BuildFlagsSection,
    "build_flags",
    List,
    String,
    decode_string
);
declare_section!(
    /// Whether targets tagged `manual` are built too.
    BuildManualTargetsSection,
    "build_manual_targets",
    Singleton,
    bool,
    decode_bool
);
declare_section!(
    /// Whether targets are derived from the `directories` section.
    DeriveTargetsFromDirectoriesSection,
    "derive_targets_from_directories",
    Singleton,
    bool,
    decode_bool
);
declare_section!(
    /// How many dependency hops below the root targets are imported. Negative means all.
    ImportDepthSection,
    "import_depth",
    Singleton,
    i32,
    decode_i32
);
declare_section!(
    /// Rule sets enabled explicitly instead of being detected.
    EnabledRulesSection,
    "enabled_rules",
    List,
    String,
    decode_string
);
declare_section!(
    /// Java home the IDE should use instead of the one Bazel reports.
    IdeJavaHomeOverrideSection,
    "ide_java_home_override",
    Singleton,
    PathBuf,
    decode_path
);
declare_section!(
    UseLibOverModSection,
    "experimental_use_lib_over_mod",
    Singleton,
    bool,
    decode_bool
);
declare_section!(
    AddTransitiveCompileTimeJarsSection,
    "experimental_add_transitive_compile_time_jars",
    Singleton,
    bool,
    decode_bool
);

/// Every recognized section, in canonical (rendering) order.
pub const RECOGNIZED_SECTIONS: &[(&str, SectionKind)] = &[
    (TargetsSection::NAME, TargetsSection::KIND),
    (BazelBinarySection::NAME, BazelBinarySection::KIND),
    (BuildFlagsSection::NAME, BuildFlagsSection::KIND),
    (BuildManualTargetsSection::NAME, BuildManualTargetsSection::KIND),
    (DirectoriesSection::NAME, DirectoriesSection::KIND),
    (
        DeriveTargetsFromDirectoriesSection::NAME,
        DeriveTargetsFromDirectoriesSection::KIND,
    ),
    (ImportDepthSection::NAME, ImportDepthSection::KIND),
    (EnabledRulesSection::NAME, EnabledRulesSection::KIND),
    (IdeJavaHomeOverrideSection::NAME, IdeJavaHomeOverrideSection::KIND),
    (UseLibOverModSection::NAME, UseLibOverModSection::KIND),
    (
        AddTransitiveCompileTimeJarsSection::NAME,
        AddTransitiveCompileTimeJarsSection::KIND,
    ),
];

/// Look up the shape of a recognized section.
pub fn section_kind(name: &str) -> Option<SectionKind> {
    recognized_section(name).map(|(_, kind)| kind)
}

pub(crate) fn recognized_section(name: &str) -> Option<(&'static str, SectionKind)> {
    RECOGNIZED_SECTIONS
        .iter()
        .find(|(recognized, _)| *recognized == name)
        .copied()
}

fn decode_string(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

fn decode_path(raw: &str) -> Result<PathBuf, String> {
    Ok(PathBuf::from(raw))
}

fn decode_bool(raw: &str) -> Result<bool, String> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("expected `true` or `false`, got `{raw}`"))
    }
}

fn decode_i32(raw: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|err| format!("expected an integer, got `{raw}` ({err})"))
}

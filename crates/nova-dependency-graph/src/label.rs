use std::fmt;

use serde::{Deserialize, Serialize};

/// A Bazel target label, e.g. `//java/com/example:lib`.
///
/// Labels in the main repository are normalized to their `//` form, so `@//a:a` and
/// `@@//a:a` are the same label as `//a:a`. Any other string is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let main_repo = label
            .strip_prefix("@@//")
            .or_else(|| label.strip_prefix("@//"));
        match main_repo {
            Some(rest) => Self(format!("//{rest}")),
            None => Self(label),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Label {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Label;

/// One build target as reported by Bazel.
///
/// Deserializes from the build-server aspect's target-info JSON. Dependencies may be given as
/// plain labels or as `{"id": "<label>"}` objects; other fields of the JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetNode {
    pub id: Label,
    #[serde(default)]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_dependencies")]
    pub dependencies: BTreeSet<Label>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl TargetNode {
    pub fn new(id: impl Into<Label>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            dependencies: BTreeSet::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_dependencies<I, L>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyRef {
    Label(Label),
    Object { id: Label },
}

fn deserialize_dependencies<'de, D>(deserializer: D) -> Result<BTreeSet<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    let dependencies = Vec::<DependencyRef>::deserialize(deserializer)?;
    Ok(dependencies
        .into_iter()
        .map(|dependency| match dependency {
            DependencyRef::Label(id) | DependencyRef::Object { id } => id,
        })
        .collect())
}

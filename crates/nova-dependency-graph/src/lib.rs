//! Dependency graph over the targets reported by a Bazel sync.
//!
//! [`DependencyGraph`] answers the transitive-dependency questions the IDE model needs
//! (classpaths, dependency sources, depth-limited imports) from the flat list of
//! [`TargetNode`]s Bazel emits. A sync builds a fresh graph and swaps it into a
//! [`SharedDependencyGraph`]; graphs are never mutated in place.

mod graph;
mod label;
mod shared;
mod target;

pub use crate::{
    graph::DependencyGraph, label::Label, shared::SharedDependencyGraph, target::TargetNode,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetInfoError {
    #[error("failed to read target info: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid target info on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

use std::fmt;

use nova_projectview::ProjectViewError;
use thiserror::Error;

/// One entity of the workspace context that couldn't be built from the project view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mapping project view into '{entity}' failed! {message}")]
pub struct EntityError {
    pub entity: &'static str,
    pub message: String,
}

impl EntityError {
    pub fn new(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
        }
    }
}

/// Every entity failure found while constructing a workspace context.
///
/// Construction never stops at the first failure, so this always lists all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContextError {
    errors: Vec<EntityError>,
}

impl WorkspaceContextError {
    pub(crate) fn new(errors: Vec<EntityError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[EntityError] {
        &self.errors
    }

    /// Names of the failed entities, in construction order.
    pub fn entities(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.entity)
    }
}

impl fmt::Display for WorkspaceContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to construct workspace context ({} error{})",
            self.errors.len(),
            if self.errors.len() == 1 { "" } else { "s" }
        )?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for WorkspaceContextError {}

/// Failure to go from a project view file to a workspace context.
#[derive(Debug, Error)]
pub enum LoadWorkspaceContextError {
    #[error(transparent)]
    ProjectView(#[from] ProjectViewError),
    #[error(transparent)]
    WorkspaceContext(#[from] WorkspaceContextError),
}

//! Reference domain repository traits

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{FunctionDescriptor, Tag, Variable};
use crate::domain::DomainError;

/// Read-only source of environment tags, in insertion order
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, DomainError>;
}

/// Global variables; the only reference domain this subsystem writes to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VariableRepository: Send + Sync {
    /// Lists variables in insertion order
    async fn list(&self) -> Result<Vec<Variable>, DomainError>;

    /// Finds a variable by its exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<Variable>, DomainError>;

    /// Appends a new variable, fails with a conflict if the name is taken
    async fn add(&self, variable: Variable) -> Result<Variable, DomainError>;
}

/// Read-only source of callable functions
#[async_trait]
pub trait FunctionRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<FunctionDescriptor>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<FunctionDescriptor>, DomainError> {
        Ok(self.list().await?.into_iter().find(|f| f.name == name))
    }
}

//! Point-in-time copy of the reference domains used while a panel is open

use super::entity::{Candidate, FunctionDescriptor, ReferenceDomain, Tag, Variable};
use super::repository::{FunctionRepository, TagRepository, VariableRepository};
use crate::domain::DomainError;

/// Candidate lists for every reference domain.
///
/// Keystroke handling is synchronous, so the panel works against this
/// snapshot instead of awaiting the repositories on every change.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    tags: Vec<Tag>,
    variables: Vec<Variable>,
    functions: Vec<FunctionDescriptor>,
}

impl ReferenceSnapshot {
    pub fn new(tags: Vec<Tag>, variables: Vec<Variable>, functions: Vec<FunctionDescriptor>) -> Self {
        Self {
            tags,
            variables,
            functions,
        }
    }

    /// Load all three domains from their repositories
    pub async fn load(
        tags: &dyn TagRepository,
        variables: &dyn VariableRepository,
        functions: &dyn FunctionRepository,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            tags: tags.list().await?,
            variables: variables.list().await?,
            functions: functions.list().await?,
        })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }

    /// Append a variable registered while the panel is open
    pub fn push_variable(&mut self, variable: Variable) {
        if !self.has_variable(&variable.name) {
            self.variables.push(variable);
        }
    }

    /// Suggestion candidates for a domain, in store order
    pub fn candidates(&self, domain: ReferenceDomain) -> Vec<Candidate> {
        match domain {
            ReferenceDomain::Tag => self.tags.iter().map(Candidate::from).collect(),
            ReferenceDomain::Variable => self.variables.iter().map(Candidate::from).collect(),
            ReferenceDomain::Function => self.functions.iter().map(Candidate::from).collect(),
        }
    }
}

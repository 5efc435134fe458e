//! In-memory reference repositories

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::seed::ReferenceSeed;
use crate::domain::reference::{
    FunctionDescriptor, FunctionRepository, ReferenceSnapshot, Tag, TagRepository, Variable,
    VariableRepository,
};
use crate::domain::DomainError;

/// In-memory implementation of TagRepository
#[derive(Debug, Default)]
pub struct InMemoryTagRepository {
    tags: RwLock<Vec<Tag>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(tags: Vec<Tag>) -> Self {
        Self {
            tags: RwLock::new(tags),
        }
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.read().await.clone())
    }
}

/// In-memory implementation of VariableRepository; names are unique
#[derive(Debug, Default)]
pub struct InMemoryVariableRepository {
    variables: RwLock<Vec<Variable>>,
}

impl InMemoryVariableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: Vec<Variable>) -> Self {
        Self {
            variables: RwLock::new(variables),
        }
    }
}

#[async_trait]
impl VariableRepository for InMemoryVariableRepository {
    async fn list(&self) -> Result<Vec<Variable>, DomainError> {
        Ok(self.variables.read().await.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Variable>, DomainError> {
        Ok(self
            .variables
            .read()
            .await
            .iter()
            .find(|v| v.name == name)
            .cloned())
    }

    async fn add(&self, variable: Variable) -> Result<Variable, DomainError> {
        let mut variables = self.variables.write().await;

        if variables.iter().any(|v| v.name == variable.name) {
            return Err(DomainError::conflict(format!(
                "Variable '{}' already exists",
                variable.name
            )));
        }

        variables.push(variable.clone());
        Ok(variable)
    }
}

/// In-memory implementation of FunctionRepository
#[derive(Debug, Default)]
pub struct InMemoryFunctionRepository {
    functions: RwLock<Vec<FunctionDescriptor>>,
}

impl InMemoryFunctionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(functions: Vec<FunctionDescriptor>) -> Self {
        Self {
            functions: RwLock::new(functions),
        }
    }
}

#[async_trait]
impl FunctionRepository for InMemoryFunctionRepository {
    async fn list(&self) -> Result<Vec<FunctionDescriptor>, DomainError> {
        Ok(self.functions.read().await.clone())
    }
}

/// The three reference repositories, shared by every open panel
#[derive(Debug, Clone)]
pub struct ReferenceStores {
    pub tags: Arc<InMemoryTagRepository>,
    pub variables: Arc<InMemoryVariableRepository>,
    pub functions: Arc<InMemoryFunctionRepository>,
}

impl ReferenceStores {
    pub fn from_seed(seed: ReferenceSeed) -> Self {
        Self {
            tags: Arc::new(InMemoryTagRepository::with_tags(seed.tags)),
            variables: Arc::new(InMemoryVariableRepository::with_variables(seed.variables)),
            functions: Arc::new(InMemoryFunctionRepository::with_functions(seed.functions)),
        }
    }

    /// Point-in-time copy for a panel about to open
    pub async fn snapshot(&self) -> Result<ReferenceSnapshot, DomainError> {
        ReferenceSnapshot::load(
            self.tags.as_ref(),
            self.variables.as_ref(),
            self.functions.as_ref(),
        )
        .await
    }
}

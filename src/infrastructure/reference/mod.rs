//! Reference domain stores

mod in_memory;
mod seed;

pub use in_memory::{
    InMemoryFunctionRepository, InMemoryTagRepository, InMemoryVariableRepository,
    ReferenceStores,
};
pub use seed::ReferenceSeed;

use crate::config::ReferencesConfig;
use crate::domain::DomainError;

/// Seed the stores from the configured file, or from the built-in samples
pub async fn load_stores(config: &ReferencesConfig) -> Result<ReferenceStores, DomainError> {
    let seed = match &config.seed_file {
        Some(path) => ReferenceSeed::from_file(path).await?,
        None => ReferenceSeed::builtin(),
    };

    Ok(ReferenceStores::from_seed(seed))
}

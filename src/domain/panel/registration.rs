//! Save-time registration of bare return-variable names

use tracing::{debug, info};

use crate::domain::block::FunctionCallConfig;
use crate::domain::reference::{FunctionDescriptor, Variable, VariableRepository, VariableType};
use crate::domain::DomainError;

/// Name to register, if the return variable is a bare identifier
pub fn bare_return_variable<'a>(config: &'a FunctionCallConfig, triggers: &[char]) -> Option<&'a str> {
    let name = config.return_variable.trim();

    if name.is_empty() || name.chars().any(|c| triggers.contains(&c)) {
        return None;
    }

    Some(name)
}

/// Create a global variable for a bare return-variable name.
///
/// An existing variable with the same name wins: nothing is written and
/// `Ok(None)` is returned.
pub async fn register_return_variable(
    config: &FunctionCallConfig,
    function: Option<&FunctionDescriptor>,
    triggers: &[char],
    variables: &dyn VariableRepository,
) -> Result<Option<Variable>, DomainError> {
    if config.function_name.is_none() || function.is_some_and(|f| !f.returns_value()) {
        return Ok(None);
    }

    let Some(name) = bare_return_variable(config, triggers) else {
        return Ok(None);
    };

    if variables.find_by_name(name).await?.is_some() {
        debug!(variable = %name, "Return variable already exists, keeping it");
        return Ok(None);
    }

    let var_type = function
        .map(|f| VariableType::from_return_type(&f.return_type))
        .unwrap_or_default();

    match variables.add(Variable::new(name, "", var_type)).await {
        Ok(variable) => {
            info!(variable = %variable.name, var_type = %variable.var_type, "Registered return variable");
            Ok(Some(variable))
        }
        Err(e) if e.is_conflict() => {
            debug!(variable = %name, "Return variable registered concurrently, keeping existing");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

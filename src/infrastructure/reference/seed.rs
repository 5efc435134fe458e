//! Reference domain seed data

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::reference::{FunctionDescriptor, Tag, Variable, VariableType};
use crate::domain::DomainError;

/// Initial content of the reference repositories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSeed {
    pub tags: Vec<Tag>,
    pub variables: Vec<Variable>,
    pub functions: Vec<FunctionDescriptor>,
}

impl ReferenceSeed {
    /// Sample domains used when no seed file is configured
    pub fn builtin() -> Self {
        Self {
            tags: vec![
                Tag::new("1", "environment", "production", "String"),
                Tag::new("2", "version", "1.2.3", "String"),
                Tag::new("3", "region", "us-east-1", "String"),
                Tag::new("4", "debug", "false", "Boolean"),
            ],
            variables: vec![
                Variable::new("API_URL", "https://api.example.com", VariableType::String).with_id("1"),
                Variable::new("MAX_RETRIES", "3", VariableType::Number).with_id("2"),
                Variable::new("TIMEOUT", "5000", VariableType::Number).with_id("3"),
            ],
            functions: vec![
                FunctionDescriptor::new("1", "validateEmail", "boolean")
                    .with_description("Validates email format")
                    .with_argument("email", "string")
                    .with_code(
                        r"function validateEmail(email) { return /^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(email); }",
                    ),
                FunctionDescriptor::new("2", "formatCurrency", "string")
                    .with_description("Formats number as currency")
                    .with_argument("amount", "number")
                    .with_argument("currency", "string")
                    .with_code(
                        r#"function formatCurrency(amount, currency = "USD") { return new Intl.NumberFormat("en-US", { style: "currency", currency: currency }).format(amount); }"#,
                    ),
            ],
        }
    }

    /// Read a seed file; `.toml` files are parsed as TOML, anything else as JSON
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read seed file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let seed = if is_toml {
            Self::from_toml(&content)?
        } else {
            Self::from_json(&content)?
        };

        info!(
            path = %path.display(),
            tags = seed.tags.len(),
            variables = seed.variables.len(),
            functions = seed.functions.len(),
            "Loaded reference seed"
        );

        Ok(seed)
    }

    pub fn from_json(content: &str) -> Result<Self, DomainError> {
        let seed: Self = serde_json::from_str(content)
            .map_err(|e| DomainError::configuration(format!("Invalid JSON seed: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn from_toml(content: &str) -> Result<Self, DomainError> {
        let seed: Self = toml::from_str(content)
            .map_err(|e| DomainError::configuration(format!("Invalid TOML seed: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Names must be unique within each domain
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::unique("tag", self.tags.iter().map(|t| t.key.as_str()))?;
        Self::unique("variable", self.variables.iter().map(|v| v.name.as_str()))?;
        Self::unique("function", self.functions.iter().map(|f| f.name.as_str()))
    }

    fn unique<'a>(domain: &str, names: impl Iterator<Item = &'a str>) -> Result<(), DomainError> {
        let mut seen = HashSet::new();

        for name in names {
            if name.trim().is_empty() {
                return Err(DomainError::configuration(format!(
                    "Seed contains a {} with an empty name",
                    domain
                )));
            }
            if !seen.insert(name) {
                return Err(DomainError::configuration(format!(
                    "Seed contains duplicate {} '{}'",
                    domain, name
                )));
            }
        }

        Ok(())
    }
}

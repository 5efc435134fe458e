//! Per-kind block configuration and the schema each kind renders

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::{FieldKey, FieldSpec, SelectOption};
use super::kind::BlockKind;
use crate::domain::editor::TriggerProfiles;
use crate::domain::reference::ReferenceSnapshot;

/// What a schema may consult while listing its fields
#[derive(Debug, Clone, Copy)]
pub struct SchemaContext<'a> {
    pub snapshot: &'a ReferenceSnapshot,
    pub triggers: &'a TriggerProfiles,
}

/// Renderer contract implemented by every block configuration
pub trait BlockSchema {
    /// Fields to render, in display order, for the current values
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec>;

    /// Current value of a field as text
    fn value(&self, key: &FieldKey) -> Option<String>;

    /// Store a field value; returns false when the key or value does not apply
    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionalConfig {
    pub condition: String,
}

impl BlockSchema for ConditionalConfig {
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text(FieldKey::Condition, "Condition", "Enter condition...")
                .with_triggers(ctx.triggers.condition.clone()),
        ]
    }

    fn value(&self, key: &FieldKey) -> Option<String> {
        match key {
            FieldKey::Condition => Some(self.condition.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        match key {
            FieldKey::Condition => {
                self.condition = value.to_string();
                true
            }
            _ => false,
        }
    }
}

/// Switch blocks expose no configuration fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {}

impl BlockSchema for SwitchConfig {
    fn fields(&self, _ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        Vec::new()
    }

    fn value(&self, _key: &FieldKey) -> Option<String> {
        None
    }

    fn set_value(&mut self, _key: &FieldKey, _value: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopType {
    #[default]
    For,
    While,
    #[serde(rename = "foreach")]
    ForEach,
}

impl LoopType {
    const OPTIONS: [SelectOption; 3] = [
        SelectOption::new("for", "For Loop"),
        SelectOption::new("while", "While Loop"),
        SelectOption::new("foreach", "For Each"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::While => "while",
            Self::ForEach => "foreach",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "for" => Some(Self::For),
            "while" => Some(Self::While),
            "foreach" => Some(Self::ForEach),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoopConfig {
    pub loop_type: LoopType,
    pub condition: String,
}

impl BlockSchema for LoopConfig {
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        vec![
            FieldSpec::select(FieldKey::LoopType, "Loop Type", LoopType::OPTIONS.to_vec()),
            FieldSpec::text(FieldKey::Condition, "Condition", "Enter loop condition...")
                .with_triggers(ctx.triggers.condition.clone()),
        ]
    }

    fn value(&self, key: &FieldKey) -> Option<String> {
        match key {
            FieldKey::LoopType => Some(self.loop_type.as_str().to_string()),
            FieldKey::Condition => Some(self.condition.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        match key {
            FieldKey::LoopType => match LoopType::parse(value) {
                Some(loop_type) => {
                    self.loop_type = loop_type;
                    true
                }
                None => false,
            },
            FieldKey::Condition => {
                self.condition = value.to_string();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub query: String,
    pub connection: String,
}

impl BlockSchema for DatabaseConfig {
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text_area(FieldKey::Query, "Query", "Enter SQL query...", 4)
                .with_triggers(ctx.triggers.condition.clone()),
            FieldSpec::text(
                FieldKey::Connection,
                "Database Connection",
                "Database connection string...",
            ),
        ]
    }

    fn value(&self, key: &FieldKey) -> Option<String> {
        match key {
            FieldKey::Query => Some(self.query.clone()),
            FieldKey::Connection => Some(self.connection.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        match key {
            FieldKey::Query => {
                self.query = value.to_string();
                true
            }
            FieldKey::Connection => {
                self.connection = value.to_string();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOperation {
    #[default]
    Get,
    Set,
    #[serde(rename = "del")]
    Delete,
    Exists,
}

impl CacheOperation {
    const OPTIONS: [SelectOption; 4] = [
        SelectOption::new("get", "GET"),
        SelectOption::new("set", "SET"),
        SelectOption::new("del", "DELETE"),
        SelectOption::new("exists", "EXISTS"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Delete => "del",
            Self::Exists => "exists",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "del" => Some(Self::Delete),
            "exists" => Some(Self::Exists),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub operation: CacheOperation,
    pub key: String,
    pub value: String,
}

impl BlockSchema for CacheConfig {
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::select(
                FieldKey::Operation,
                "Operation",
                CacheOperation::OPTIONS.to_vec(),
            ),
            FieldSpec::text(FieldKey::Key, "Key", "Cache key...")
                .with_triggers(ctx.triggers.condition.clone()),
        ];

        if self.operation == CacheOperation::Set {
            fields.push(
                FieldSpec::text(FieldKey::Value, "Value", "Cache value...")
                    .with_triggers(ctx.triggers.condition.clone()),
            );
        }

        fields
    }

    fn value(&self, key: &FieldKey) -> Option<String> {
        match key {
            FieldKey::Operation => Some(self.operation.as_str().to_string()),
            FieldKey::Key => Some(self.key.clone()),
            FieldKey::Value => Some(self.value.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        match key {
            FieldKey::Operation => match CacheOperation::parse(value) {
                Some(operation) => {
                    self.operation = operation;
                    true
                }
                None => false,
            },
            FieldKey::Key => {
                self.key = value.to_string();
                true
            }
            FieldKey::Value => {
                self.value = value.to_string();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionCallConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Argument name -> text, possibly holding references
    pub arguments: BTreeMap<String, String>,

    pub return_variable: String,
}

impl FunctionCallConfig {
    /// Select a function; bindings of the previous one never carry over
    pub fn select_function(&mut self, name: impl Into<String>) {
        self.function_name = Some(name.into());
        self.arguments.clear();
        self.return_variable.clear();
    }

    pub fn argument(&self, name: &str) -> &str {
        self.arguments.get(name).map(String::as_str).unwrap_or("")
    }

    /// Strip surrounding whitespace from the return variable.
    ///
    /// Returns whether the stored text changed.
    pub fn normalize_return_variable(&mut self) -> bool {
        let trimmed = self.return_variable.trim();
        if trimmed.len() == self.return_variable.len() {
            return false;
        }

        self.return_variable = trimmed.to_string();
        true
    }
}

impl BlockSchema for FunctionCallConfig {
    fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        let mut fields = vec![FieldSpec::picker(
            FieldKey::Function,
            "Function",
            "Select a function...",
        )];

        let Some(function) = self
            .function_name
            .as_deref()
            .and_then(|name| ctx.snapshot.function(name))
        else {
            return fields;
        };

        for arg in &function.arguments {
            fields.push(
                FieldSpec::text(
                    FieldKey::argument(&arg.name),
                    format!("{} ({})", arg.name, arg.arg_type),
                    format!("Enter {} or press # for variables/tags", arg.name),
                )
                .with_triggers(ctx.triggers.argument.clone()),
            );
        }

        if function.returns_value() {
            fields.push(
                FieldSpec::text(
                    FieldKey::ReturnVariable,
                    format!("Return Variable ({})", function.return_type),
                    "Enter variable name or press # for global variables",
                )
                .with_triggers(ctx.triggers.return_variable.clone()),
            );
        }

        fields
    }

    fn value(&self, key: &FieldKey) -> Option<String> {
        match key {
            FieldKey::Function => Some(self.function_name.clone().unwrap_or_default()),
            FieldKey::Argument(name) => Some(self.argument(name).to_string()),
            FieldKey::ReturnVariable => Some(self.return_variable.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        match key {
            FieldKey::Function => {
                self.select_function(value);
                true
            }
            FieldKey::Argument(name) => {
                self.arguments.insert(name.clone(), value.to_string());
                true
            }
            FieldKey::ReturnVariable => {
                self.return_variable = value.to_string();
                true
            }
            _ => false,
        }
    }
}

/// Configuration of a block, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockConfig {
    Conditional(ConditionalConfig),
    Switch(SwitchConfig),
    Loop(LoopConfig),
    Database(DatabaseConfig),
    Cache(CacheConfig),
    Function(FunctionCallConfig),
}

impl BlockConfig {
    /// Empty configuration for a kind
    pub fn for_kind(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Conditional => Self::Conditional(ConditionalConfig::default()),
            BlockKind::Switch => Self::Switch(SwitchConfig::default()),
            BlockKind::Loop => Self::Loop(LoopConfig::default()),
            BlockKind::Database => Self::Database(DatabaseConfig::default()),
            BlockKind::Cache => Self::Cache(CacheConfig::default()),
            BlockKind::Function => Self::Function(FunctionCallConfig::default()),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Conditional(_) => BlockKind::Conditional,
            Self::Switch(_) => BlockKind::Switch,
            Self::Loop(_) => BlockKind::Loop,
            Self::Database(_) => BlockKind::Database,
            Self::Cache(_) => BlockKind::Cache,
            Self::Function(_) => BlockKind::Function,
        }
    }

    /// Renderer for this variant
    pub fn schema(&self) -> &dyn BlockSchema {
        match self {
            Self::Conditional(c) => c,
            Self::Switch(c) => c,
            Self::Loop(c) => c,
            Self::Database(c) => c,
            Self::Cache(c) => c,
            Self::Function(c) => c,
        }
    }

    pub fn schema_mut(&mut self) -> &mut dyn BlockSchema {
        match self {
            Self::Conditional(c) => c,
            Self::Switch(c) => c,
            Self::Loop(c) => c,
            Self::Database(c) => c,
            Self::Cache(c) => c,
            Self::Function(c) => c,
        }
    }

    pub fn fields(&self, ctx: &SchemaContext<'_>) -> Vec<FieldSpec> {
        self.schema().fields(ctx)
    }

    pub fn value(&self, key: &FieldKey) -> Option<String> {
        self.schema().value(key)
    }

    pub fn set_value(&mut self, key: &FieldKey, value: &str) -> bool {
        self.schema_mut().set_value(key, value)
    }

    pub fn as_function(&self) -> Option<&FunctionCallConfig> {
        match self {
            Self::Function(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionCallConfig> {
        match self {
            Self::Function(c) => Some(c),
            _ => None,
        }
    }
}

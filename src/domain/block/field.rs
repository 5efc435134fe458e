//! Field identities and descriptors of block configuration panels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::editor::TriggerMap;
use crate::domain::DomainError;

/// Identity of a field within a configuration panel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Condition,
    LoopType,
    Query,
    Connection,
    Operation,
    Key,
    Value,
    Function,
    Argument(String),
    ReturnVariable,
}

impl FieldKey {
    pub fn argument(name: impl Into<String>) -> Self {
        Self::Argument(name.into())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition => write!(f, "condition"),
            Self::LoopType => write!(f, "loop_type"),
            Self::Query => write!(f, "query"),
            Self::Connection => write!(f, "connection"),
            Self::Operation => write!(f, "operation"),
            Self::Key => write!(f, "key"),
            Self::Value => write!(f, "value"),
            Self::Function => write!(f, "function"),
            Self::Argument(name) => write!(f, "argument:{}", name),
            Self::ReturnVariable => write!(f, "return_variable"),
        }
    }
}

impl FromStr for FieldKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("argument:") {
            if name.is_empty() {
                return Err(DomainError::validation("Argument field needs a name"));
            }
            return Ok(Self::Argument(name.to_string()));
        }

        match s {
            "condition" => Ok(Self::Condition),
            "loop_type" => Ok(Self::LoopType),
            "query" => Ok(Self::Query),
            "connection" => Ok(Self::Connection),
            "operation" => Ok(Self::Operation),
            "key" => Ok(Self::Key),
            "value" => Ok(Self::Value),
            "function" => Ok(Self::Function),
            "return_variable" => Ok(Self::ReturnVariable),
            other => Err(DomainError::validation(format!(
                "Unknown field '{}'",
                other
            ))),
        }
    }
}

/// Input widget a field renders as
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Text,
    TextArea { rows: u16 },
    Select { options: Vec<SelectOption> },

    /// Read-only input that opens the function picker
    Picker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Descriptor of one rendered field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: String,
    pub placeholder: String,
    pub widget: Widget,

    /// Trigger bindings; `None` for fields without inline references
    pub triggers: Option<TriggerMap>,
}

impl FieldSpec {
    pub fn text(key: FieldKey, label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            placeholder: placeholder.into(),
            widget: Widget::Text,
            triggers: None,
        }
    }

    pub fn text_area(
        key: FieldKey,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        rows: u16,
    ) -> Self {
        Self {
            widget: Widget::TextArea { rows },
            ..Self::text(key, label, placeholder)
        }
    }

    pub fn select(key: FieldKey, label: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            widget: Widget::Select { options },
            ..Self::text(key, label, "")
        }
    }

    pub fn picker(key: FieldKey, label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            widget: Widget::Picker,
            ..Self::text(key, label, placeholder)
        }
    }

    pub fn with_triggers(mut self, triggers: TriggerMap) -> Self {
        self.triggers = Some(triggers);
        self
    }

    /// Whether typing in this field can open suggestions
    pub fn is_reference_bearing(&self) -> bool {
        self.triggers.is_some()
    }

    /// Whether the field accepts free text input
    pub fn is_editable_text(&self) -> bool {
        matches!(self.widget, Widget::Text | Widget::TextArea { .. })
    }
}

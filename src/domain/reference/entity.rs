//! Reference domain records: tags, global variables and functions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Namespace a reference resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceDomain {
    Tag,
    Variable,
    Function,
}

impl ReferenceDomain {
    /// Heading shown above a suggestion list for this domain
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tag => "Tags",
            Self::Variable => "Global Variables",
            Self::Function => "Functions",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Variable => "variable",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for ReferenceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReferenceDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "tags" => Ok(Self::Tag),
            "variable" | "variables" => Ok(Self::Variable),
            "function" | "functions" => Ok(Self::Function),
            other => Err(DomainError::configuration(format!(
                "Unknown reference domain '{}'",
                other
            ))),
        }
    }
}

/// Value type of a global variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl VariableType {
    /// Map a function return type onto the variable type that stores it.
    ///
    /// Anything other than string, number or boolean falls back to `String`.
    pub fn from_return_type(return_type: &str) -> Self {
        match return_type.trim().to_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Object => "Object",
            Self::Array => "Array",
        };
        write!(f, "{}", name)
    }
}

/// Reusable environment tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,

    /// Insertable name
    pub key: String,

    pub value: String,

    /// Display-only type label (String, Boolean, ...)
    #[serde(rename = "type", default = "default_tag_type")]
    pub tag_type: String,
}

fn default_tag_type() -> String {
    "String".to_string()
}

impl Tag {
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        tag_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value: value.into(),
            tag_type: tag_type.into(),
        }
    }
}

/// User-defined global variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,

    /// Insertable identifier
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(rename = "type", default)]
    pub var_type: VariableType,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Variable {
    /// Create a variable with a freshly generated id
    pub fn new(name: impl Into<String>, value: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            value: value.into(),
            var_type,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.value == other.value
            && self.var_type == other.var_type
    }
}

/// Declared argument of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub name: String,

    #[serde(rename = "type")]
    pub arg_type: String,
}

impl FunctionArgument {
    pub fn new(name: impl Into<String>, arg_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: arg_type.into(),
        }
    }
}

/// Scripted function a function block can call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,

    #[serde(default)]
    pub code: String,

    pub return_type: String,
}

impl FunctionDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            code: String::new(),
            return_type: return_type.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, arg_type: impl Into<String>) -> Self {
        self.arguments.push(FunctionArgument::new(name, arg_type));
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Whether the function produces a value worth binding to a variable
    pub fn returns_value(&self) -> bool {
        !self.return_type.trim().eq_ignore_ascii_case("void")
    }

    pub fn argument(&self, name: &str) -> Option<&FunctionArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// Suggestion entry shown in a popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Insertable name
    pub name: String,
    pub domain: ReferenceDomain,

    /// Secondary line, e.g. `Number: 3`
    pub detail: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, domain: ReferenceDomain, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain,
            detail: detail.into(),
        }
    }
}

impl From<&Tag> for Candidate {
    fn from(tag: &Tag) -> Self {
        Self::new(
            &tag.key,
            ReferenceDomain::Tag,
            format!("{}: {}", tag.tag_type, tag.value),
        )
    }
}

impl From<&Variable> for Candidate {
    fn from(variable: &Variable) -> Self {
        Self::new(
            &variable.name,
            ReferenceDomain::Variable,
            format!("{}: {}", variable.var_type, variable.value),
        )
    }
}

impl From<&FunctionDescriptor> for Candidate {
    fn from(function: &FunctionDescriptor) -> Self {
        Self::new(
            &function.name,
            ReferenceDomain::Function,
            function.description.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_str() {
        assert_eq!("tag".parse::<ReferenceDomain>().unwrap(), ReferenceDomain::Tag);
        assert_eq!(
            "Variables".parse::<ReferenceDomain>().unwrap(),
            ReferenceDomain::Variable
        );
        assert!("widgets".parse::<ReferenceDomain>().is_err());
    }

    #[test]
    fn test_variable_type_from_return_type() {
        assert_eq!(VariableType::from_return_type("string"), VariableType::String);
        assert_eq!(VariableType::from_return_type("number"), VariableType::Number);
        assert_eq!(VariableType::from_return_type("Boolean"), VariableType::Boolean);
        assert_eq!(VariableType::from_return_type("object"), VariableType::String);
        assert_eq!(VariableType::from_return_type(""), VariableType::String);
    }

    #[test]
    fn test_function_returns_value() {
        let void = FunctionDescriptor::new("1", "log", "void");
        let number = FunctionDescriptor::new("2", "sum", "number");

        assert!(!void.returns_value());
        assert!(number.returns_value());
    }

    #[test]
    fn test_candidate_detail() {
        let tag = Tag::new("1", "debug", "false", "Boolean");
        let candidate = Candidate::from(&tag);

        assert_eq!(candidate.name, "debug");
        assert_eq!(candidate.domain, ReferenceDomain::Tag);
        assert_eq!(candidate.detail, "Boolean: false");

        let variable = Variable::new("MAX_RETRIES", "3", VariableType::Number);
        assert_eq!(Candidate::from(&variable).detail, "Number: 3");
    }

    #[test]
    fn test_function_descriptor_json() {
        let json = r#"{
            "id": "2",
            "name": "formatCurrency",
            "arguments": [{"name": "amount", "type": "number"}],
            "returnType": "string"
        }"#;

        let function: FunctionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(function.name, "formatCurrency");
        assert_eq!(function.arguments[0].arg_type, "number");
        assert!(function.description.is_none());
        assert!(function.argument("amount").is_some());
    }
}

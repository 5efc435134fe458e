//! Render model of a configuration panel

use serde::{Deserialize, Serialize};

use crate::domain::block::{BlockKind, FieldKey, Widget};
use crate::domain::editor::{Anchor, FieldPhase};
use crate::domain::reference::{Candidate, FunctionDescriptor, ReferenceDomain};

/// Shown when a block kind renders no fields
pub const NO_OPTIONS_MESSAGE: &str = "No configuration options available for this block type";

/// On-screen box of a field as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub top: f32,
    pub left: f32,
    pub height: f32,
}

impl FieldGeometry {
    pub fn new(top: f32, left: f32, height: f32) -> Self {
        Self { top, left, height }
    }

    /// Popups hang from the bottom-left corner of their field
    pub fn anchor(&self) -> Anchor {
        Anchor {
            top: self.top + self.height,
            left: self.left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub node_id: String,
    pub kind: BlockKind,
    pub title: String,
    pub fields: Vec<FieldView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<PopupView>,

    /// Function list, present while the picker is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_picker: Option<Vec<FunctionOption>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl PanelView {
    pub fn field(&self, key: &FieldKey) -> Option<&FieldView> {
        self.fields.iter().find(|f| &f.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: String,
    pub placeholder: String,
    pub widget: Widget,
    pub value: String,
    pub cursor: usize,
    pub focused: bool,
    pub reference_bearing: bool,
    pub phase: FieldPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
    pub owner: FieldKey,
    pub heading: &'static str,
    pub domain: ReferenceDomain,
    pub can_toggle: bool,
    pub anchor: Anchor,
    pub items: Vec<PopupItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupItem {
    pub name: String,
    pub detail: String,
}

impl From<&Candidate> for PopupItem {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            detail: candidate.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOption {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub return_type: String,
}

impl From<&FunctionDescriptor> for FunctionOption {
    fn from(function: &FunctionDescriptor) -> Self {
        Self {
            name: function.name.clone(),
            description: function.description.clone(),
            return_type: function.return_type.clone(),
        }
    }
}

//! Events a configuration panel reports to its host

use serde::Serialize;

use crate::domain::block::{BlockConfig, FieldKey};
use crate::domain::reference::Variable;

/// Result of committing a panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedConfig {
    pub node_id: String,

    /// Assembled configuration, references left unevaluated
    pub config: BlockConfig,

    /// Variable created from a bare return-variable name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<Variable>,
}

/// Outgoing notifications, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Field text changed by a keystroke, a selection or an accepted suggestion
    FieldChanged { field: FieldKey, text: String },

    ConfigSaved(SavedConfig),
}

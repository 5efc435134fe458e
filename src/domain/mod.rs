//! Domain layer - Block configuration and inline reference editing

pub mod block;
pub mod editor;
pub mod error;
pub mod flow;
pub mod panel;
pub mod reference;

pub use block::{BlockConfig, BlockKind, FieldKey, FieldSpec};
pub use editor::{FieldPhase, FieldReferenceState, SuggestionSession, TriggerMap, TriggerProfiles};
pub use error::DomainError;
pub use flow::{FlowNode, NodeKind};
pub use panel::{ConfigPanel, InteractionBus, PanelEvent, PanelSettings, PointerTarget, SavedConfig};
pub use reference::{
    Candidate, FunctionDescriptor, ReferenceDomain, ReferenceSnapshot, Tag, Variable, VariableType,
};

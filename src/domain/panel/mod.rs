//! Block configuration panel
//!
//! The binding layer between a node's rendered fields and the reference
//! editor. A panel is mounted for one node, receives keystrokes, caret moves
//! and pointer presses from the host, and reports field changes and the
//! committed configuration back as [`PanelEvent`]s.

mod caret;
mod config_panel;
mod events;
mod interaction;
mod registration;
mod view;

pub use caret::{CaretRestore, DeferredCarets};
pub use config_panel::{ConfigPanel, PanelSettings};
pub use events::{PanelEvent, SavedConfig};
pub use interaction::{
    InteractionBus, PointerEvent, PointerSubscription, PointerTarget, DEFAULT_BUS_CAPACITY,
};
pub use registration::{bare_return_variable, register_return_variable};
pub use view::{
    FieldGeometry, FieldView, FunctionOption, PanelView, PopupItem, PopupView, NO_OPTIONS_MESSAGE,
};

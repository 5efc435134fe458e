//! Inline reference editing
//!
//! Free-text fields may embed references typed after a trigger character:
//! - `#environment` - a tag (condition-style fields)
//! - `$MAX_RETRIES` - a global variable (condition-style fields)
//! - `#MAX_RETRIES` - a variable or tag (function argument fields, with a toggle)
//!
//! The pieces, leaves first: [`locate`] finds the reference at the cursor,
//! [`filter`] narrows candidates, [`SuggestionSession`] owns the single open
//! popup and [`insert`] rewrites the text when a candidate is accepted.

mod filter;
mod inserter;
mod session;
mod state;
mod tokenizer;
mod trigger;

pub use filter::{filter, filter_limited};
pub use inserter::{insert, Insertion};
pub use session::{Anchor, CloseReason, OpenPopup, SessionState, SuggestionSession};
pub use state::{FieldPhase, FieldReferenceState};
pub use tokenizer::{clamp_cursor, locate, TokenMatch};
pub use trigger::{TriggerBinding, TriggerMap, TriggerProfiles};

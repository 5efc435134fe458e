//! Ephemeral reference state of a single text field

use serde::Serialize;

use super::filter::filter_limited;
use super::tokenizer::{TokenMatch, clamp_cursor, locate};
use super::trigger::TriggerMap;
use crate::domain::reference::{Candidate, ReferenceDomain, ReferenceSnapshot};

/// Where a field stands in the reference lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPhase {
    /// No reference being typed, or it was dismissed
    #[default]
    Idle,

    /// Trigger active, nothing to suggest
    Armed,

    /// Field owns the open popup
    Suggesting,
}

/// Reference state rebuilt from `(text, cursor)` on every change
#[derive(Debug, Clone, Default)]
pub struct FieldReferenceState {
    raw_text: String,
    cursor: usize,
    active: Option<TokenMatch>,
    domain: Option<ReferenceDomain>,
    candidates: Vec<Candidate>,
    phase: FieldPhase,
}

impl FieldReferenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute trigger, domain and candidates for new text or cursor.
    ///
    /// With `keep_domain` the previously chosen domain survives as long as the
    /// same trigger is still active and the binding allows it.
    pub fn recompute(
        &mut self,
        text: &str,
        cursor: usize,
        triggers: &TriggerMap,
        source: &ReferenceSnapshot,
        keep_domain: bool,
        limit: Option<usize>,
    ) {
        let cursor = clamp_cursor(text, cursor);
        let previous = self.active.take();
        let previous_domain = self.domain.take();

        self.raw_text = text.to_string();
        self.cursor = cursor;
        self.candidates.clear();

        let found = locate(text, cursor, &triggers.triggers());
        let (token, binding) = match found {
            Some(token) => match triggers.binding(token.trigger) {
                Some(binding) => (token, binding),
                None => {
                    self.phase = FieldPhase::Idle;
                    return;
                }
            },
            None => {
                self.phase = FieldPhase::Idle;
                return;
            }
        };

        let same_reference = previous
            .as_ref()
            .is_some_and(|p| p.trigger == token.trigger && p.trigger_index == token.trigger_index);

        let domain = match previous_domain {
            Some(d) if keep_domain && same_reference && binding.allows(d) => d,
            _ => binding.default_domain(),
        };

        self.candidates = filter_limited(&source.candidates(domain), &token.fragment, limit);
        self.domain = Some(domain);
        self.active = Some(token);
        self.phase = FieldPhase::Armed;
    }

    /// Switch to the next domain of the active trigger, keeping the fragment
    pub fn toggle_domain(
        &mut self,
        triggers: &TriggerMap,
        source: &ReferenceSnapshot,
        limit: Option<usize>,
    ) -> Option<ReferenceDomain> {
        let token = self.active.as_ref()?;
        let binding = triggers.binding(token.trigger)?;
        if !binding.has_toggle() {
            return None;
        }

        let current = self.domain.unwrap_or_else(|| binding.default_domain());
        let next = binding.next_after(current);

        self.candidates = filter_limited(&source.candidates(next), &token.fragment, limit);
        self.domain = Some(next);
        Some(next)
    }

    /// Whether a popup should be shown for this state
    pub fn wants_popup(&self) -> bool {
        self.active.is_some() && !self.candidates.is_empty()
    }

    pub fn mark_suggesting(&mut self) {
        if self.active.is_some() {
            self.phase = FieldPhase::Suggesting;
        }
    }

    /// Popup owned elsewhere or closed; the trigger stays recorded
    pub fn mark_armed(&mut self) {
        if self.active.is_some() {
            self.phase = FieldPhase::Armed;
        }
    }

    /// Drop the active reference until the next text or cursor change
    pub fn dismiss(&mut self) {
        self.active = None;
        self.domain = None;
        self.candidates.clear();
        self.phase = FieldPhase::Idle;
    }

    /// Record text and caret without looking for a reference
    pub fn settle(&mut self, text: &str, cursor: usize) {
        self.raw_text = text.to_string();
        self.cursor = clamp_cursor(text, cursor);
        self.dismiss();
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn active(&self) -> Option<&TokenMatch> {
        self.active.as_ref()
    }

    pub fn active_trigger(&self) -> Option<char> {
        self.active.as_ref().map(|m| m.trigger)
    }

    pub fn active_fragment(&self) -> &str {
        self.active.as_ref().map(|m| m.fragment.as_str()).unwrap_or("")
    }

    pub fn domain(&self) -> Option<ReferenceDomain> {
        self.domain
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn phase(&self) -> FieldPhase {
        self.phase
    }
}

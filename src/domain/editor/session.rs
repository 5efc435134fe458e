//! Shared suggestion popup owner
//!
//! One session exists per configuration panel. Opening a popup for a field
//! replaces whatever was open before, so at most one field is ever suggesting.

use std::fmt::Debug;

use serde::Serialize;
use tracing::debug;

use crate::domain::reference::{Candidate, ReferenceDomain};

/// Screen position the popup hangs from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Anchor {
    pub top: f32,
    pub left: f32,
}

/// Why a popup was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Accepted,
    OutsidePointer,
    TriggerLost,
    NoMatches,
    Replaced,
    Unmounted,
}

/// Content of an open popup
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup<K> {
    pub owner: K,
    pub trigger: char,
    pub trigger_index: usize,
    pub domain: ReferenceDomain,
    pub can_toggle: bool,
    pub candidates: Vec<Candidate>,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<K> {
    Closed,
    Open(OpenPopup<K>),
}

/// Single-writer owner slot for the panel's suggestion popup
#[derive(Debug, Clone)]
pub struct SuggestionSession<K> {
    state: SessionState<K>,
}

impl<K> Default for SuggestionSession<K> {
    fn default() -> Self {
        Self {
            state: SessionState::Closed,
        }
    }
}

impl<K: Clone + PartialEq + Debug> SuggestionSession<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or replace the popup.
    ///
    /// Returns the previous owner when it was a different field; the caller
    /// must reset that field in the same update.
    pub fn open(&mut self, popup: OpenPopup<K>) -> Option<K> {
        let previous = std::mem::replace(&mut self.state, SessionState::Open(popup));

        let owner = self.owner().cloned();
        match previous {
            SessionState::Open(prev) if Some(&prev.owner) != owner.as_ref() => {
                debug!(evicted = ?prev.owner, owner = ?owner, "Suggestion popup moved to another field");
                Some(prev.owner)
            }
            SessionState::Open(_) => None,
            SessionState::Closed => {
                debug!(owner = ?owner, "Suggestion popup opened");
                None
            }
        }
    }

    /// Close the popup, returning the field that owned it
    pub fn close(&mut self, reason: CloseReason) -> Option<K> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Open(popup) => {
                debug!(owner = ?popup.owner, ?reason, "Suggestion popup closed");
                Some(popup.owner)
            }
            SessionState::Closed => None,
        }
    }

    /// Close only if `key` owns the popup
    pub fn close_if_owner(&mut self, key: &K, reason: CloseReason) -> bool {
        if self.is_owned_by(key) {
            self.close(reason);
            true
        } else {
            false
        }
    }

    /// Replace the domain and candidates of the open popup
    pub fn update_candidates(&mut self, domain: ReferenceDomain, candidates: Vec<Candidate>) {
        if let SessionState::Open(popup) = &mut self.state {
            popup.domain = domain;
            popup.candidates = candidates;
        }
    }

    pub fn state(&self) -> &SessionState<K> {
        &self.state
    }

    pub fn popup(&self) -> Option<&OpenPopup<K>> {
        match &self.state {
            SessionState::Open(popup) => Some(popup),
            SessionState::Closed => None,
        }
    }

    pub fn owner(&self) -> Option<&K> {
        self.popup().map(|p| &p.owner)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    pub fn is_owned_by(&self, key: &K) -> bool {
        self.owner() == Some(key)
    }
}

//! Locates the reference being typed at the cursor
//!
//! A trigger is active when it is the nearest unescaped trigger character
//! before the cursor and no whitespace sits between it and the cursor. A
//! trigger preceded by an odd number of backslashes is literal text.

use serde::Serialize;

/// Active trigger and the fragment typed after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMatch {
    pub trigger: char,

    /// Byte offset of the trigger character
    pub trigger_index: usize,

    /// Clamped cursor the match was computed for
    pub cursor: usize,

    /// Text between the trigger and the cursor
    pub fragment: String,
}

/// Clamp a byte offset to the text length and back onto a char boundary
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut pos = cursor.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Find the active trigger before `cursor`, considering only `triggers`
pub fn locate(text: &str, cursor: usize, triggers: &[char]) -> Option<TokenMatch> {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];

    triggers
        .iter()
        .filter_map(|&trigger| last_unescaped(before, trigger).map(|idx| (idx, trigger)))
        .filter(|&(idx, trigger)| {
            !before[idx + trigger.len_utf8()..]
                .chars()
                .any(char::is_whitespace)
        })
        .max_by_key(|&(idx, _)| idx)
        .map(|(trigger_index, trigger)| TokenMatch {
            trigger,
            trigger_index,
            cursor,
            fragment: before[trigger_index + trigger.len_utf8()..].to_string(),
        })
}

fn last_unescaped(before: &str, trigger: char) -> Option<usize> {
    before
        .char_indices()
        .rev()
        .filter(|&(_, c)| c == trigger)
        .map(|(i, _)| i)
        .find(|&i| !is_escaped(before, i))
}

/// An odd run of backslashes right before `index` escapes that character
fn is_escaped(text: &str, index: usize) -> bool {
    text[..index].chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

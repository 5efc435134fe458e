//! Span replacement when a suggestion is accepted

use super::tokenizer::clamp_cursor;

/// Rewritten text and the caret position after the inserted name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub new_text: String,
    pub new_cursor: usize,
}

/// Replace `text[trigger_index..cursor]` with `trigger + name`.
///
/// Everything before the trigger and after the cursor is kept untouched.
/// Returns `None` when `trigger_index` does not point at `trigger` at or
/// before the cursor.
pub fn insert(
    text: &str,
    trigger_index: usize,
    cursor: usize,
    trigger: char,
    name: &str,
) -> Option<Insertion> {
    let cursor = clamp_cursor(text, cursor);
    if trigger_index > cursor || !text.get(trigger_index..)?.starts_with(trigger) {
        return None;
    }

    let mut new_text = String::with_capacity(
        text.len() - (cursor - trigger_index) + trigger.len_utf8() + name.len(),
    );
    new_text.push_str(&text[..trigger_index]);
    new_text.push(trigger);
    new_text.push_str(name);
    new_text.push_str(&text[cursor..]);

    Some(Insertion {
        new_text,
        new_cursor: trigger_index + trigger.len_utf8() + name.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_end() {
        let result = insert("Hello #", 6, 7, '#', "environment").unwrap();
        assert_eq!(result.new_text, "Hello #environment");
        assert_eq!(result.new_cursor, 18);
    }

    #[test]
    fn test_insert_replaces_fragment() {
        let result = insert("retry count: $ma", 13, 16, '$', "MAX_RETRIES").unwrap();
        assert_eq!(result.new_text, "retry count: $MAX_RETRIES");
        assert_eq!(result.new_cursor, 25);
    }

    #[test]
    fn test_insert_keeps_text_after_cursor() {
        let text = "#ver == '1.0'";
        let result = insert(text, 0, 4, '#', "version").unwrap();
        assert_eq!(result.new_text, "#version == '1.0'");
        assert_eq!(&result.new_text[result.new_cursor..], " == '1.0'");
    }

    #[test]
    fn test_pure_span_replacement() {
        let text = "a #b #cd e";
        for (i, c) in [(2, 4), (5, 8), (5, 10)] {
            let result = insert(text, i, c, '#', "name").unwrap();
            assert_eq!(&result.new_text[..i], &text[..i]);
            assert_eq!(&result.new_text[i..], format!("#name{}", &text[c..]));
        }
    }

    #[test]
    fn test_out_of_range_cursor_clamped() {
        let result = insert("x #a", 2, 100, '#', "abc").unwrap();
        assert_eq!(result.new_text, "x #abc");
        assert_eq!(result.new_cursor, 6);
    }

    #[test]
    fn test_trigger_after_cursor_refused() {
        // caret moved back in front of the trigger
        assert_eq!(insert("Hello #environment #", 19, 18, '#', "environment"), None);
    }

    #[test]
    fn test_trigger_index_must_point_at_trigger() {
        assert_eq!(insert("Hello #", 5, 7, '#', "environment"), None);
        assert_eq!(insert("Hello $", 6, 7, '#', "environment"), None);
        assert_eq!(insert("é#", 1, 3, '#', "x"), None);
        assert_eq!(insert("a", 4, 1, '#', "x"), None);
    }
}

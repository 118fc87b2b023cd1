//! Character-boundary-safe text helpers for backend payload limits.
//!
//! The database backend caps rich-text values at 2000 characters. Korean
//! titles and abstracts are routine here, so every cut must land on a char
//! boundary, not a byte offset.

/// Truncate to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Split into chunks of at most `size` characters, preserving order.
/// Empty input yields one empty chunk.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    if size == 0 || text.chars().count() <= size {
        return vec![text];
    }
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.char_indices().nth(size) {
            Some((idx, _)) => {
                chunks.push(&rest[..idx]);
                rest = &rest[idx..];
            }
            None => {
                chunks.push(rest);
                break;
            }
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_a_noop_for_short_text() {
        assert_eq!(truncate_chars("short", 2000), "short");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let korean = "척추변형교정술";
        assert_eq!(truncate_chars(korean, 3), "척추변");
    }

    #[test]
    fn chunk_splits_long_text() {
        let text = "a".repeat(4500);
        let chunks = chunk_text(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2000);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn chunk_keeps_multibyte_boundaries() {
        let text = "요추".repeat(1500); // 3000 chars, 9000 bytes
        let chunks = chunk_text(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunk_of_empty_text_is_one_empty_chunk() {
        assert_eq!(chunk_text("", 2000), vec![""]);
    }
}

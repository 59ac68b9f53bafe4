use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `s` to at most `max_width` terminal columns, ending in "..." when
/// anything was cut. Never splits a character.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Byte offset of the `char_idx`-th character, or `s.len()` past the end.
pub fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Terminal column of a cursor placed after `char_idx` characters.
pub fn cursor_column(s: &str, char_idx: usize) -> usize {
    s.chars()
        .take(char_idx)
        .map(|ch| ch.width().unwrap_or(0))
        .sum()
}

/// Columns to scroll a single-line field of `width` columns so the cursor at
/// `cursor_col` stays visible.
pub fn horizontal_scroll(cursor_col: usize, width: usize) -> usize {
    if width == 0 {
        return cursor_col;
    }
    (cursor_col + 1).saturating_sub(width)
}

/// Single-line text field editing with a character-based cursor.
pub fn insert_char(buffer: &mut String, cursor: &mut usize, ch: char) {
    let at = byte_index(buffer, *cursor);
    buffer.insert(at, ch);
    *cursor += 1;
}

pub fn delete_before_cursor(buffer: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let at = byte_index(buffer, *cursor - 1);
    buffer.remove(at);
    *cursor -= 1;
}

//! Greedy word wrap.

use crate::font::SizedFont;

/// Marker appended to a word that had to be cut to fit.
pub const ELLIPSIS: &str = "...";

/// Break `text` into lines no wider than `max_width`.
///
/// Words are accumulated greedily with single-space separators. A word wider
/// than the column on its own is cut one trailing character at a time until
/// it fits together with [`ELLIPSIS`], or a single character remains.
/// Empty input yields one empty line.
pub fn wrap(text: &str, font: &SizedFont, max_width: u32) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for word in words {
        let candidate = format!("{} {}", current, word);
        if font.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    for line in lines.iter_mut() {
        if font.text_width(line) > max_width {
            *line = truncate(line, font, max_width);
        }
    }
    lines
}

/// Shorten `line` until `line + ELLIPSIS` fits or one character is left.
fn truncate(line: &str, font: &SizedFont, max_width: u32) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    loop {
        let mut candidate: String = chars.iter().collect();
        candidate.push_str(ELLIPSIS);
        if chars.len() <= 1 || font.text_width(&candidate) <= max_width {
            return candidate;
        }
        chars.pop();
    }
}

//! Greedy word wrapping.

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines start a new line. Words wider than `max_width` are split
/// by character; every line holds at least one character so progress is
/// guaranteed. Empty input yields a single empty line.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                current = break_word(word, max_width, &measure, &mut lines);
            }
        }

        lines.push(current);
    }

    lines
}

/// Push full-width chunks of `word` onto `lines`; return the remainder.
fn break_word(
    word: &str,
    max_width: f32,
    measure: &impl Fn(&str) -> f32,
    lines: &mut Vec<String>,
) -> String {
    let mut chunk = String::new();
    for ch in word.chars() {
        chunk.push(ch);
        if measure(&chunk) > max_width && chunk.chars().count() > 1 {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        }
    }
    chunk
}

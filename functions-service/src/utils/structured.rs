//! Best-effort decoding of structured model output.
//!
//! Completion models are asked for JSON but often wrap it in prose or a
//! markdown fence. [`decode`] tries progressively looser readings and hands
//! back the raw text when none of them parse.

use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Parsed(T),
    /// Nothing parsed; carries the trimmed raw text.
    Fallback(String),
}

#[cfg(test)]
impl<T> Decoded<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            Decoded::Parsed(value) => Some(value),
            Decoded::Fallback(_) => None,
        }
    }
}

/// Whole text, then a fenced code block, then the outermost `{..}` or `[..]`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Decoded<T> {
    let trimmed = text.trim();

    let candidates = [Some(trimmed), fenced_block(trimmed), outermost_span(trimmed)];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            return Decoded::Parsed(value);
        }
    }

    Decoded::Fallback(trimmed.to_string())
}

/// Body of the first ``` fence, with an optional language tag dropped.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &rest[body_start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text.as_bytes()[start] == b'{' { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Non-empty lines with list markers (`-`, `*`, `•`, `1.`, `2)`) and
/// surrounding quotes stripped.
pub fn list_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .map(|line| line.trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

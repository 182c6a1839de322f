//! Small string clean-ups shared by the pipelines.

/// Replaces non-breaking spaces with plain spaces.
pub fn normalize_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Joins the lines of an OCR result into one trimmed line.
pub fn collapse_newlines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends a period unless the text already ends with one.
pub fn ensure_period(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() || trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Case-insensitive prefix test that works for non-ASCII text.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Strips surrounding punctuation and lower-cases, so "Monday:" matches "monday".
pub fn word_key(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

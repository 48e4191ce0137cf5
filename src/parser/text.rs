// Text cleanup applied to every extracted value
use regex::Regex;
use std::sync::LazyLock;

/// Names, prices and other short labels.
pub const LABEL_MAX: usize = 80;
/// Spec rows and feature lines.
pub const LINE_MAX: usize = 120;
pub const SUMMARY_MAX: usize = 200;
pub const URL_MAX: usize = 2048;

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Strips residual tags, collapses whitespace runs, trims, and truncates to
/// `max_chars` characters.
pub fn clean_text(raw: &str, max_chars: usize) -> String {
    let untagged = TAGS.replace_all(raw, " ");
    let collapsed = untagged.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

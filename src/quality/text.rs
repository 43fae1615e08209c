use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\x{4e00}-\x{9fff}\w\s.,!?;:"、。，！？；：“”‘’《》（）]"#)
        .expect("valid disallowed-chars regex")
});
static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+").expect("valid horizontal whitespace regex"));
static LINE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\n[\s]*").expect("valid line break regex"));
static PUNCTUATION_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,!?;:、。，！？；：]{2,}").expect("valid punctuation regex"));
static DECIMAL_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d").expect("valid decimal digit regex"));

/// Separator that replaces a run of two or more punctuation marks.
const PUNCTUATION_SEPARATOR: &str = "，";

/// Normalizes scraped text: drops characters outside CJK, word characters
/// and common punctuation, collapses whitespace (keeping single line breaks
/// between paragraphs) and punctuation runs, then trims.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = DISALLOWED_CHARS.replace_all(&text, "");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = LINE_BREAKS.replace_all(&text, "\n");
    let text = PUNCTUATION_RUNS.replace_all(&text, PUNCTUATION_SEPARATOR);
    text.trim().to_string()
}

/// Decimal digits of any script (`０`-`９` included); other numerals such as
/// `①` or `½` do not count.
pub fn decimal_digit_count(text: &str) -> usize {
    DECIMAL_DIGIT.find_iter(text).count()
}

/// Titles are single-line.
pub fn clean_title(title: &str) -> String {
    clean_text(title).replace('\n', " ")
}

/// Drops repeated paragraphs, keeping the first occurrence of each.
pub fn remove_duplicates(text: &str) -> String {
    let mut seen = HashSet::new();
    text.split('\n')
        .map(str::trim)
        .filter(|para| !para.is_empty() && seen.insert(*para))
        .collect::<Vec<_>>()
        .join("\n")
}

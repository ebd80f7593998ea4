use std::sync::OnceLock;

use regex::Regex;

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug separator regex is valid"))
}

/// Converts arbitrary text into a lowercase, dash-separated, URL-safe slug.
///
/// Accented latin characters are not transliterated; anything outside `[a-z0-9]` becomes a separator.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    separators().replace_all(&lower, "-").trim_matches('-').to_string()
}

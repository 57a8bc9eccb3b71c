//! Text cleanup applied before topic extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").expect("valid URL pattern"));
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));

/// Strip URLs and punctuation, then lowercase.
///
/// `None` and empty input yield an empty string. The trailing URL sweep
/// catches `http…` tokens that only appear once punctuation is gone or the
/// scheme is lowercased (`HTTP://X` → `httpx`), so the function is idempotent.
pub fn normalize(text: Option<&str>) -> String {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };

    let without_urls = URL_RE.replace_all(text, "");
    let words_only = NON_WORD_RE.replace_all(&without_urls, "");
    let lowered = words_only.to_lowercase();
    URL_RE.replace_all(&lowered, "").into_owned()
}

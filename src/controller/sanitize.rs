//! Plain-text field sanitizing for submitted form values.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid script/style regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*>").expect("valid tag regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid whitespace regex"));

static OCTET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid octet regex"));

/// Strips markup, percent-encoded octets and redundant whitespace.
///
/// `<script>`/`<style>` elements go with their contents, other tags are
/// dropped and a stray `<` is kept as `&lt;`. Line breaks, tabs and runs of
/// spaces collapse to one space.
pub fn sanitize_text_field(raw: &str) -> String {
    let mut text = raw.to_string();

    if text.contains('<') {
        text = SCRIPT_STYLE_RE.replace_all(&text, "").into_owned();
        text = TAG_RE.replace_all(&text, "").into_owned();
        text = text.replace('<', "&lt;");
    }

    text = WHITESPACE_RE.replace_all(&text, " ").trim().to_string();

    // Removing one octet can expose another (`%%4141`).
    while OCTET_RE.is_match(&text) {
        text = OCTET_RE.replace_all(&text, "").into_owned();
    }

    text.trim().to_string()
}

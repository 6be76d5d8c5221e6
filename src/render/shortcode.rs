//! `[wds-gmap ...]` shortcode parsing.

use regex::Regex;
use std::sync::LazyLock;

pub const SHORTCODE_TAG: &str = "wds-gmap";

/// `[wds-gmap ...]`, `[wds-gmap ... /]` or `[wds-gmap ...]...[/wds-gmap]`,
/// optionally wrapped in a second pair of brackets to escape it.
static SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[(?P<open>\[?)wds-gmap(?P<atts>\s[^\]]*?)?(?:/\]|\](?:(?s:.*?)\[/wds-gmap\])?)(?P<close>\]?)",
    )
    .expect("valid shortcode regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<k1>[\w-]+)\s*=\s*"(?P<v1>[^"]*)"|(?P<k2>[\w-]+)\s*=\s*'(?P<v2>[^']*)'|(?P<k3>[\w-]+)\s*=\s*(?P<v3>[^\s'"\]]+)"#,
    )
    .expect("valid attribute regex")
});

/// Attributes accepted by the map shortcode. Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeAtts {
    /// CSS height, e.g. `300px`. Default `200px`.
    pub height: Option<String>,
    /// CSS width, e.g. `50%`. Default `100%`.
    pub width: Option<String>,
}

impl ShortcodeAtts {
    /// Parses the text between the tag name and the closing bracket.
    /// Unknown keys are ignored; later duplicates win.
    pub fn parse(raw: &str) -> Self {
        let mut atts = Self::default();
        for caps in ATTR_RE.captures_iter(raw) {
            let (key, value) = match (
                caps.name("k1").zip(caps.name("v1")),
                caps.name("k2").zip(caps.name("v2")),
                caps.name("k3").zip(caps.name("v3")),
            ) {
                (Some(kv), _, _) | (None, Some(kv), _) | (None, None, Some(kv)) => kv,
                _ => continue,
            };
            let value = value.as_str().trim();
            let value = (!value.is_empty()).then(|| value.to_string());
            match key.as_str().to_ascii_lowercase().as_str() {
                "height" => atts.height = value,
                "width" => atts.width = value,
                _ => {}
            }
        }
        atts
    }

    pub fn is_custom(&self) -> bool {
        self.height.is_some() || self.width.is_some()
    }
}

/// One shortcode occurrence: byte range in the source plus its attributes.
/// Enclosed content is part of the range and is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch {
    pub start: usize,
    pub end: usize,
    pub atts: ShortcodeAtts,
    /// `[[wds-gmap]]`: emit the inner text literally instead of a map.
    pub escaped: bool,
}

impl ShortcodeMatch {
    /// Text to emit in place of an escaped shortcode.
    pub fn literal<'a>(&self, content: &'a str) -> &'a str {
        &content[self.start + 1..self.end - 1]
    }
}

pub fn find_shortcodes(content: &str) -> Vec<ShortcodeMatch> {
    SHORTCODE_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = caps.name("open").map_or(0, |m| m.len());
            let close = caps.name("close").map_or(0, |m| m.len());
            let escaped = open == 1 && close == 1;
            let atts = caps
                .name("atts")
                .map(|m| ShortcodeAtts::parse(m.as_str()))
                .unwrap_or_default();
            // A lone extra bracket is ordinary text around the tag.
            let (start, end) = if escaped {
                (whole.start(), whole.end())
            } else {
                (whole.start() + open, whole.end() - close)
            };
            Some(ShortcodeMatch {
                start,
                end,
                atts,
                escaped,
            })
        })
        .collect()
}

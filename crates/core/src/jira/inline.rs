//! Span-level rewrites applied to the whole document.
//!
//! Strong and emphasis share the `*` delimiter, so strong spans are first
//! wrapped in a sentinel marker, emphasis is rewritten, and only then are the
//! markers turned into the final `*`.
//!
//! The `*` runs the block stage emits for bullet items are also swapped for
//! sentinel tokens before any delimiter is scanned, so a level 3 or 4 marker
//! is never read as the opening of a strong span.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::literal::Sentinel;

fn list_marker_regex() -> &'static Regex {
    static RE_LIST_MARKER: OnceLock<Regex> = OnceLock::new();
    RE_LIST_MARKER.get_or_init(|| Regex::new(r"(?m)^(\*+)([ \t])").unwrap())
}

fn strong_star_regex() -> &'static Regex {
    static RE_STRONG_STAR: OnceLock<Regex> = OnceLock::new();
    RE_STRONG_STAR.get_or_init(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").unwrap())
}

fn strong_underscore_regex() -> &'static Regex {
    static RE_STRONG_UNDERSCORE: OnceLock<Regex> = OnceLock::new();
    RE_STRONG_UNDERSCORE.get_or_init(|| Regex::new(r"__(\S(?:.*?\S)?)__").unwrap())
}

fn strikethrough_regex() -> &'static Regex {
    static RE_STRIKE: OnceLock<Regex> = OnceLock::new();
    RE_STRIKE.get_or_init(|| Regex::new(r"~~(.+?)~~").unwrap())
}

fn image_regex() -> &'static Regex {
    static RE_IMAGE: OnceLock<Regex> = OnceLock::new();
    RE_IMAGE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap())
}

fn link_regex() -> &'static Regex {
    static RE_LINK: OnceLock<Regex> = OnceLock::new();
    RE_LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap())
}

/// Apply all span rewrites in order: strong, emphasis, strikethrough,
/// images, links.
pub fn rewrite(text: &str, sentinel: Sentinel) -> String {
    let marker = sentinel.strong_marker();

    let (text, depths) = hide_list_markers(text, sentinel);
    let text = mark_strong(&text, &marker);
    let text = emphasis(&text);
    let text = text.replace(&marker, "*");
    let text = strikethrough(&text);
    let text = images(&text);
    let text = links(&text);
    show_list_markers(text, sentinel, &depths)
}

/// Swap every line-leading `*` run followed by a blank for an `L` token
/// carrying the run length. Returns the distinct run lengths seen.
fn hide_list_markers(text: &str, sentinel: Sentinel) -> (String, BTreeSet<usize>) {
    let mut depths = BTreeSet::new();
    let text = list_marker_regex()
        .replace_all(text, |caps: &Captures| {
            let depth = caps[1].len();
            depths.insert(depth);
            format!("{}{}", sentinel.token('L', depth), &caps[2])
        })
        .into_owned();
    (text, depths)
}

fn show_list_markers(text: String, sentinel: Sentinel, depths: &BTreeSet<usize>) -> String {
    depths.iter().fold(text, |text, &depth| {
        text.replace(&sentinel.token('L', depth), &"*".repeat(depth))
    })
}

/// `**text**` and `__text__` become `marker text marker`.
fn mark_strong(text: &str, marker: &str) -> String {
    let text = strong_star_regex().replace_all(text, |caps: &Captures| {
        format!("{marker}{}{marker}", &caps[1])
    });
    strong_underscore_regex()
        .replace_all(&text, |caps: &Captures| {
            format!("{marker}{}{marker}", &caps[1])
        })
        .into_owned()
}

/// `*text*` becomes `_text_`.
///
/// An opening `*` must not follow a word character or another `*` and must be
/// followed by a non-space character; the closing `*` is the next `*` on the
/// same line, must not follow whitespace and must not be doubled. This keeps
/// `a*b*c` literal and leaves the `*`/`**` bullets of list items alone.
pub fn emphasis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '*' {
            if let Some(close) = emphasis_close(&chars, i) {
                output.push('_');
                output.extend(&chars[i + 1..close]);
                output.push('_');
                i = close + 1;
                continue;
            }
        }
        output.push(chars[i]);
        i += 1;
    }

    output
}

fn emphasis_close(chars: &[char], open: usize) -> Option<usize> {
    if open > 0 && (chars[open - 1] == '*' || is_word(chars[open - 1])) {
        return None;
    }

    let first = *chars.get(open + 1)?;
    if first == '*' || first.is_whitespace() {
        return None;
    }

    let offset = chars[open + 1..]
        .iter()
        .position(|&c| c == '*' || c == '\n')?;
    let close = open + 1 + offset;

    if chars[close] != '*' || chars[close - 1].is_whitespace() {
        return None;
    }
    if chars.get(close + 1) == Some(&'*') {
        return None;
    }

    Some(close)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `~~text~~` becomes `-text-`.
pub fn strikethrough(text: &str) -> String {
    strikethrough_regex().replace_all(text, "-${1}-").into_owned()
}

/// `![alt](url)` becomes `!url|alt=alt!`, or `!url!` without alt text.
pub fn images(text: &str) -> String {
    image_regex()
        .replace_all(text, |caps: &Captures| {
            let (alt, url) = (&caps[1], &caps[2]);
            if alt.is_empty() {
                format!("!{url}!")
            } else {
                format!("!{url}|alt={alt}!")
            }
        })
        .into_owned()
}

/// `[text](url)` becomes `[text|url]`.
pub fn links(text: &str) -> String {
    link_regex().replace_all(text, "[${1}|${2}]").into_owned()
}

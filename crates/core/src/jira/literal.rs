use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Private-use ranges the sentinel is drawn from, searched in order.
const SENTINEL_RANGES: [(u32, u32); 3] = [
    (0xE000, 0xF8FF),
    (0xF0000, 0xFFFFD),
    (0x100000, 0x10FFFD),
];

/// Searched once every private-use code point is taken.
const FALLBACK_RANGE: (u32, u32) = (0x80, 0x10FFFF);

/// A character guaranteed absent from the document being converted.
///
/// Every placeholder token is built as `sentinel + tag + index + sentinel`.
/// Because the sentinel never occurs in the input, no text produced by a
/// rewrite can be mistaken for a token, and no token can be partially
/// matched by document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel(char);

impl Sentinel {
    /// Pick the first private-use character that does not occur in `text`.
    ///
    /// When every private-use code point is present, any other non-ASCII
    /// character that is not a letter, digit, blank or control is tried.
    /// Returns `None` only if the text holds all of those as well.
    pub fn for_text(text: &str) -> Option<Self> {
        let present: HashSet<char> = text.chars().filter(|c| !c.is_ascii()).collect();

        SENTINEL_RANGES
            .iter()
            .chain([&FALLBACK_RANGE])
            .flat_map(|&(start, end)| start..=end)
            .filter_map(char::from_u32)
            .filter(|&c| is_inert(c))
            .find(|c| !present.contains(c))
            .map(Sentinel)
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// Opaque token standing in for entry `index` of a table tagged `tag`.
    pub fn token(self, tag: char, index: usize) -> String {
        format!("{0}{tag}{index}{0}", self.0)
    }

    /// Marker wrapped around strong text while emphasis is being rewritten.
    pub fn strong_marker(self) -> String {
        format!("{0}S{0}", self.0)
    }
}

/// Characters no rewrite rule looks at.
fn is_inert(c: char) -> bool {
    !(c.is_ascii() || c.is_alphanumeric() || c.is_whitespace() || c.is_control())
}

/// Which side table a placeholder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Fenced code block.
    Block,
    /// Inline code span.
    Inline,
}

impl LiteralKind {
    fn tag(self) -> char {
        match self {
            LiteralKind::Block => 'C',
            LiteralKind::Inline => 'I',
        }
    }
}

/// A fenced code block lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    /// Interior of the fence with trailing whitespace trimmed.
    pub body: String,
}

impl CodeBlock {
    /// Render as a `{code}` macro, tagged with the language when known.
    pub fn render(&self) -> String {
        match &self.language {
            Some(language) => format!("{{code:{language}}}\n{}\n{{code}}", self.body),
            None => format!("{{code}}\n{}\n{{code}}", self.body),
        }
    }
}

/// Side tables filled by [`extract`] and drained by [`restore`].
///
/// Index `n` of `blocks` is referenced by exactly one `C` token in the
/// extracted text, index `n` of `spans` by exactly one `I` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literals {
    sentinel: Sentinel,
    blocks: Vec<CodeBlock>,
    spans: Vec<String>,
}

impl Literals {
    pub fn sentinel(&self) -> Sentinel {
        self.sentinel
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.spans.is_empty()
    }

    fn render(&self, kind: LiteralKind, index: usize) -> Option<String> {
        match kind {
            LiteralKind::Block => self.blocks.get(index).map(CodeBlock::render),
            LiteralKind::Inline => self.spans.get(index).map(|span| format!("{{{{{span}}}}}")),
        }
    }
}

fn fence_regex() -> &'static Regex {
    static RE_FENCE: OnceLock<Regex> = OnceLock::new();
    RE_FENCE.get_or_init(|| Regex::new(r"(?s)```(\w[\w+#.-]*)?[ \t]*\n(.*?)```").unwrap())
}

fn span_regex() -> &'static Regex {
    static RE_SPAN: OnceLock<Regex> = OnceLock::new();
    RE_SPAN.get_or_init(|| Regex::new(r"`([^`\n]+)`").unwrap())
}

/// Replace fenced code blocks, then inline code spans, with placeholder tokens
/// built from `sentinel`, which must not occur in `markdown`.
///
/// Spans are searched only in the text left after fences are removed, so a
/// fence interior is never scanned twice.
pub fn extract(markdown: &str, sentinel: Sentinel) -> (String, Literals) {
    let mut blocks = Vec::new();
    let mut spans = Vec::new();

    let without_fences = fence_regex().replace_all(markdown, |caps: &regex::Captures| {
        let token = sentinel.token(LiteralKind::Block.tag(), blocks.len());
        blocks.push(CodeBlock {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            body: caps[2].trim_end().to_string(),
        });
        token
    });

    let text = span_regex()
        .replace_all(&without_fences, |caps: &regex::Captures| {
            let token = sentinel.token(LiteralKind::Inline.tag(), spans.len());
            spans.push(caps[1].to_string());
            token
        })
        .into_owned();

    (
        text,
        Literals {
            sentinel,
            blocks,
            spans,
        },
    )
}

/// Substitute every placeholder with its rendered literal.
///
/// Inline spans are restored before code blocks. Each pass is a single
/// forward scan, and restored text is copied to the output without being
/// looked at again.
pub fn restore(text: &str, literals: &Literals) -> String {
    if literals.is_empty() {
        return text.to_string();
    }

    let text = restore_kind(text, literals, LiteralKind::Inline);
    restore_kind(&text, literals, LiteralKind::Block)
}

fn restore_kind(text: &str, literals: &Literals, kind: LiteralKind) -> String {
    let sentinel = literals.sentinel.as_char();
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(sentinel) {
        output.push_str(&rest[..start]);
        let token = &rest[start..];

        let Some((tag, index, len)) = parse_token(token, sentinel) else {
            output.push(sentinel);
            rest = &token[sentinel.len_utf8()..];
            continue;
        };

        let rendered = (tag == kind.tag())
            .then(|| literals.render(kind, index))
            .flatten();
        match rendered {
            Some(rendered) => output.push_str(&rendered),
            None => output.push_str(&token[..len]),
        }
        rest = &token[len..];
    }

    output.push_str(rest);
    output
}

/// Parse a whole `sentinel tag digits sentinel` token at the start of `text`,
/// returning the tag, the index and the token length in bytes.
fn parse_token(text: &str, sentinel: char) -> Option<(char, usize, usize)> {
    let body = text.strip_prefix(sentinel)?;
    let tag = body.chars().next()?;
    let digits = &body[tag.len_utf8()..];
    let end = digits.find(sentinel)?;
    let index = digits[..end].parse::<usize>().ok()?;
    let len = 2 * sentinel.len_utf8() + tag.len_utf8() + end;
    Some((tag, index, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_plain(markdown: &str) -> (String, Literals) {
        extract(markdown, Sentinel::for_text(markdown).unwrap())
    }

    fn private_use(ranges: &[(u32, u32)]) -> String {
        ranges
            .iter()
            .flat_map(|&(start, end)| start..=end)
            .filter_map(char::from_u32)
            .collect()
    }

    #[test]
    fn test_sentinel_avoids_characters_in_text() {
        let text = "abc \u{E000}\u{E001} def";
        let sentinel = Sentinel::for_text(text).unwrap();
        assert_eq!(sentinel.as_char(), '\u{E002}');
    }

    #[test]
    fn test_sentinel_skips_a_full_private_use_plane() {
        let text = private_use(&SENTINEL_RANGES[..1]).repeat(4);
        let sentinel = Sentinel::for_text(&text).unwrap();
        assert_eq!(sentinel.as_char(), '\u{F0000}');
    }

    #[test]
    fn test_sentinel_outside_private_use_when_all_taken() {
        let text = format!("{} `x`", private_use(&SENTINEL_RANGES));
        let sentinel = Sentinel::for_text(&text).unwrap();
        assert!(!text.contains(sentinel.as_char()));
        assert!(is_inert(sentinel.as_char()));

        let (extracted, literals) = extract(&text, sentinel);
        assert_eq!(literals.spans, vec!["x".to_string()]);
        assert!(restore(&extracted, &literals).ends_with(" {{x}}"));
    }

    #[test]
    fn test_sentinel_token_shape() {
        let sentinel = Sentinel::for_text("plain").unwrap();
        assert_eq!(sentinel.token('C', 12), "\u{E000}C12\u{E000}");
        assert_eq!(sentinel.strong_marker(), "\u{E000}S\u{E000}");
    }

    #[test]
    fn test_extract_without_literals_is_identity() {
        let (text, literals) = extract_plain("# Heading\n\nSome **bold** text");
        assert_eq!(text, "# Heading\n\nSome **bold** text");
        assert!(literals.is_empty());
    }

    #[test]
    fn test_extract_fenced_block_with_language() {
        let (text, literals) = extract_plain("before\n```rust\nfn main() {}\n\n```\nafter");
        let token = literals.sentinel().token('C', 0);
        assert_eq!(text, format!("before\n{token}\nafter"));
        assert_eq!(
            literals.blocks,
            vec![CodeBlock {
                language: Some("rust".to_string()),
                body: "fn main() {}".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_fenced_block_preserves_interior() {
        let (_, literals) = extract_plain("```\n  # not a heading\n`tick` **x**\n```");
        assert_eq!(literals.blocks[0].body, "  # not a heading\n`tick` **x**");
        assert!(literals.spans.is_empty());
    }

    #[test]
    fn test_extract_inline_spans_in_order() {
        let (text, literals) = extract_plain("use `a` then `b`");
        let sentinel = literals.sentinel();
        assert_eq!(
            text,
            format!("use {} then {}", sentinel.token('I', 0), sentinel.token('I', 1))
        );
        assert_eq!(literals.spans, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_inline_span_does_not_cross_lines() {
        let (text, literals) = extract_plain("open `tick\nclose` here");
        assert_eq!(text, "open `tick\nclose` here");
        assert!(literals.is_empty());
    }

    #[test]
    fn test_unclosed_fence_passes_through() {
        let (text, literals) = extract_plain("```\nnever closed");
        assert_eq!(text, "```\nnever closed");
        assert!(literals.blocks.is_empty());
    }

    #[test]
    fn test_restore_round_trips_rendered_literals() {
        let (text, literals) = extract_plain("```js\nlet x;\n```\nand `y`");
        assert_eq!(restore(&text, &literals), "{code:js}\nlet x;\n{code}\nand {{y}}");
    }

    #[test]
    fn test_restore_leaves_unknown_tokens() {
        let (_, literals) = extract_plain("`a`");
        let stray = literals.sentinel().token('I', 7);
        assert_eq!(restore(&stray, &literals), stray);
    }

    #[test]
    fn test_restore_skips_tokens_of_the_other_kind() {
        let (text, literals) = extract_plain("```\nx\n```I0 `y`");
        assert_eq!(restore(&text, &literals), "{code}\nx\n{code}I0 {{y}}");
    }

    #[test]
    fn test_code_block_render_without_language() {
        let block = CodeBlock {
            language: None,
            body: "x = 1".to_string(),
        };
        assert_eq!(block.render(), "{code}\nx = 1\n{code}");
    }
}

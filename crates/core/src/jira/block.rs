//! Line-oriented rewrites: headings, blockquotes, horizontal rules and list markers.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Deepest list nesting the wiki markup is given.
pub const MAX_LIST_DEPTH: usize = 4;

const RULE: &str = "----";

fn heading_regex() -> &'static Regex {
    static RE_HEADING: OnceLock<Regex> = OnceLock::new();
    // `#{1,6}` is greedy and must be followed by whitespace, so a seven-`#`
    // run never degrades into a shorter heading.
    RE_HEADING.get_or_init(|| Regex::new(r"^(#{1,6})[ \t]+(\S.*)$").unwrap())
}

fn blockquote_regex() -> &'static Regex {
    static RE_QUOTE: OnceLock<Regex> = OnceLock::new();
    RE_QUOTE.get_or_init(|| Regex::new(r"^>[ \t]+(\S.*)$").unwrap())
}

fn bullet_regex() -> &'static Regex {
    static RE_BULLET: OnceLock<Regex> = OnceLock::new();
    RE_BULLET.get_or_init(|| Regex::new(r"^([ \t]*)[-*+][ \t]+(\S.*)$").unwrap())
}

fn numbered_regex() -> &'static Regex {
    static RE_NUMBERED: OnceLock<Regex> = OnceLock::new();
    RE_NUMBERED.get_or_init(|| Regex::new(r"^([ \t]*)\d+\.[ \t]+(\S.*)$").unwrap())
}

/// Rewrite every line of `text`, keeping line separators intact.
pub fn rewrite(text: &str) -> String {
    text.split('\n')
        .map(rewrite_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite a single line. The first matching rule wins, tried in the order
/// heading, blockquote, horizontal rule, bullet, numbered item.
pub fn rewrite_line(line: &str) -> Cow<'_, str> {
    if let Some(caps) = heading_regex().captures(line) {
        return Cow::Owned(format!("h{}. {}", caps[1].len(), &caps[2]));
    }

    if let Some(caps) = blockquote_regex().captures(line) {
        return Cow::Owned(format!("bq. {}", &caps[1]));
    }

    if is_horizontal_rule(line) {
        return Cow::Borrowed(RULE);
    }

    if let Some(caps) = bullet_regex().captures(line) {
        let marker = "*".repeat(list_level(&caps[1]));
        return Cow::Owned(format!("{marker} {}", &caps[2]));
    }

    if let Some(caps) = numbered_regex().captures(line) {
        let marker = "#".repeat(list_level(&caps[1]));
        return Cow::Owned(format!("{marker} {}", &caps[2]));
    }

    Cow::Borrowed(line)
}

/// Nesting level for a list item: one level per two columns of indentation,
/// starting at 1 and clamped to [`MAX_LIST_DEPTH`].
pub fn list_level(indent: &str) -> usize {
    (indent.chars().count() / 2 + 1).min(MAX_LIST_DEPTH)
}

/// Three or more of the same rule character (`-`, `*` or `_`), optionally
/// separated by spaces or tabs, after at most three spaces of indentation.
pub fn is_horizontal_rule(line: &str) -> bool {
    let body = line.trim_end();
    let indent = body.len() - body.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }

    let mut marks = body.chars().filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }

    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_all_levels() {
        for level in 1..=6 {
            let line = format!("{} Title", "#".repeat(level));
            assert_eq!(rewrite_line(&line), format!("h{level}. Title"));
        }
    }

    #[test]
    fn test_heading_run_too_long_passes_through() {
        assert_eq!(rewrite_line("####### Seven"), "####### Seven");
    }

    #[test]
    fn test_heading_requires_whitespace_and_text() {
        assert_eq!(rewrite_line("#hashtag"), "#hashtag");
        assert_eq!(rewrite_line("# "), "# ");
    }

    #[test]
    fn test_blockquote_lines_rewritten_independently() {
        assert_eq!(rewrite("> first\n> second"), "bq. first\nbq. second");
    }

    #[test]
    fn test_horizontal_rules() {
        for line in ["---", "***", "___", "- - -", "* * * *", "_____  "] {
            assert_eq!(rewrite_line(line), "----", "{line:?}");
        }
    }

    #[test]
    fn test_not_horizontal_rules() {
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("-*-"));
        assert!(!is_horizontal_rule("--- text"));
        assert!(!is_horizontal_rule("    ---"));
        assert!(!is_horizontal_rule(""));
    }

    #[test]
    fn test_rule_wins_over_dash_bullet() {
        assert_eq!(rewrite_line("- - -"), "----");
        assert_eq!(rewrite_line("- item"), "* item");
    }

    #[test]
    fn test_bullets_all_markers() {
        assert_eq!(rewrite_line("- dash"), "* dash");
        assert_eq!(rewrite_line("* star"), "* star");
        assert_eq!(rewrite_line("+ plus"), "* plus");
    }

    #[test]
    fn test_bullet_nesting_from_indent() {
        assert_eq!(rewrite_line("  - two"), "** two");
        assert_eq!(rewrite_line("   - still two"), "** still two");
        assert_eq!(rewrite_line("    - three"), "*** three");
    }

    #[test]
    fn test_nesting_clamped() {
        assert_eq!(rewrite_line("              - deep"), "**** deep");
        assert_eq!(rewrite_line("              9. deep"), "#### deep");
    }

    #[test]
    fn test_numbered_items() {
        assert_eq!(rewrite_line("1. first"), "# first");
        assert_eq!(rewrite_line("  10. nested"), "## nested");
    }

    #[test]
    fn test_mixed_list_levels_are_per_line() {
        let text = "- a\n  1. b\n  - c";
        assert_eq!(rewrite(text), "* a\n## b\n** c");
    }

    #[test]
    fn test_marker_without_space_is_not_a_list() {
        assert_eq!(rewrite_line("-dash"), "-dash");
        assert_eq!(rewrite_line("1.5 percent"), "1.5 percent");
    }

    #[test]
    fn test_list_level() {
        assert_eq!(list_level(""), 1);
        assert_eq!(list_level(" "), 1);
        assert_eq!(list_level("  "), 2);
        assert_eq!(list_level("\t\t"), 2);
        assert_eq!(list_level(&" ".repeat(40)), MAX_LIST_DEPTH);
    }

    #[test]
    fn test_plain_lines_untouched() {
        let text = "plain text\n\n| a | b |\n";
        assert_eq!(rewrite(text), text);
    }
}

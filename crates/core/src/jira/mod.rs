//! Markdown to Jira wiki markup conversion.
//!
//! The conversion is a fixed sequence of pure `text -> text` stages:
//!
//! 1. [`literal::extract`] swaps fenced code blocks and inline code spans for
//!    placeholder tokens so no later stage can touch their contents.
//! 2. [`block::rewrite`] handles headings, blockquotes, rules and list markers.
//! 3. [`inline::rewrite`] handles strong, emphasis, strikethrough, images and links.
//! 4. [`table::rewrite`] turns pipe tables into wiki tables.
//! 5. [`literal::restore`] puts the literals back as `{{span}}` and `{code}` macros.
//!
//! Conversion never fails: anything that does not match a rule is copied
//! through as-is.

pub mod block;
pub mod inline;
pub mod literal;
pub mod table;

use literal::{Literals, Sentinel};

/// One step of the conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Block,
    Inline,
    Table,
    Restore,
}

impl Stage {
    /// Rewrite stages run between extraction and restoration, in order.
    pub const REWRITES: [Stage; 3] = [Stage::Block, Stage::Inline, Stage::Table];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Block => "block",
            Stage::Inline => "inline",
            Stage::Table => "table",
            Stage::Restore => "restore",
        }
    }

    fn apply(self, text: &str, literals: &Literals) -> String {
        match self {
            // Extraction builds `literals` itself and always runs first.
            Stage::Extract => text.to_string(),
            Stage::Block => block::rewrite(text),
            Stage::Inline => inline::rewrite(text, literals.sentinel()),
            Stage::Table => table::rewrite(text),
            Stage::Restore => literal::restore(text, literals),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Text produced by a stage, handed to the observer of [`convert_with`].
#[derive(Debug, Clone, Copy)]
pub struct StageOutput<'a> {
    pub stage: Stage,
    pub text: &'a str,
    sentinel: Sentinel,
}

impl StageOutput<'_> {
    /// The text with placeholder sentinels shown as `¤`.
    pub fn printable(&self) -> String {
        self.text.replace(self.sentinel.as_char(), "¤")
    }
}

/// Convert GitHub-flavored Markdown to Jira wiki markup.
///
/// ```
/// use jiramark_core::jira::convert;
///
/// assert_eq!(convert("**bold** and *italic*"), "*bold* and _italic_");
/// assert_eq!(convert("# H1"), "h1. H1");
/// ```
pub fn convert(markdown: &str) -> String {
    convert_with(markdown, |_| {})
}

/// [`convert`] for a possibly absent input; `None` converts to `""`.
pub fn convert_optional(markdown: Option<&str>) -> String {
    markdown.map(convert).unwrap_or_default()
}

/// [`convert`], calling `observer` with the intermediate text after every stage.
pub fn convert_with<F>(markdown: &str, mut observer: F) -> String
where
    F: FnMut(StageOutput<'_>),
{
    if markdown.is_empty() {
        return String::new();
    }

    // Only an input holding every candidate character leaves no sentinel.
    let Some(sentinel) = Sentinel::for_text(markdown) else {
        return markdown.to_string();
    };

    let (mut text, literals) = literal::extract(markdown, sentinel);
    observer(StageOutput {
        stage: Stage::Extract,
        text: &text,
        sentinel,
    });

    for stage in Stage::REWRITES.into_iter().chain([Stage::Restore]) {
        text = stage.apply(&text, &literals);
        observer(StageOutput {
            stage,
            text: &text,
            sentinel,
        });
    }

    text
}

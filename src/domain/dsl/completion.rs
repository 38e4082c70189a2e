//! Completion suggestions for DSL editors.

use crate::domain::dsl::catalog::{
    build_catalog, CatalogItem, CatalogKind, CustomIndicator, OperandKind,
};
use serde::Serialize;

/// Characters that re-open the suggestion list while typing.
pub const TRIGGER_CHARACTERS: [char; 5] = ['_', '\'', '"', '(', ','];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Variable,
    Constant,
    Keyword,
    Function,
}

/// Span of the word under the cursor, in character columns (0-based, end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub insert_text: String,
    pub insert_as_snippet: bool,
    pub detail: String,
    pub documentation: Option<String>,
    pub range: WordRange,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Word around `column` so an accepted suggestion replaces the partial token.
/// A column past the end of the line is clamped to the line length.
pub fn word_range_at(line: &str, column: usize) -> WordRange {
    let chars: Vec<char> = line.chars().collect();
    let column = column.min(chars.len());

    let mut start = column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = column;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    WordRange { start, end }
}

// Position of a catalog kind in the suggestion list.
fn group_rank(kind: CatalogKind) -> u8 {
    match kind {
        CatalogKind::Metric | CatalogKind::Variable => 0,
        CatalogKind::Source => 1,
        CatalogKind::Keyword => 2,
        CatalogKind::Function => 3,
        CatalogKind::CustomIndicator => 4,
    }
}

/// Suggestion source installed for one editor language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionProvider {
    items: Vec<CatalogItem>,
}

impl CompletionProvider {
    pub fn new<S: AsRef<str>>(
        operands: &[S],
        custom_indicators: &[CustomIndicator],
        operand_kind: OperandKind,
    ) -> Self {
        Self::from_catalog(build_catalog(operands, custom_indicators, operand_kind))
    }

    /// Reorders into operands, sources, keywords, functions, custom
    /// indicators. Order inside each group is kept.
    pub fn from_catalog(mut items: Vec<CatalogItem>) -> Self {
        items.sort_by_key(|item| group_rank(item.kind));
        Self { items }
    }

    /// Characters the editor should re-request suggestions on.
    pub fn trigger_characters(&self) -> &'static [char] {
        &TRIGGER_CHARACTERS
    }

    pub fn suggestions(&self, line: &str, column: usize) -> Vec<CompletionItem> {
        let range = word_range_at(line, column);
        self.items
            .iter()
            .map(|item| to_completion(item, range))
            .collect()
    }
}

fn to_completion(item: &CatalogItem, range: WordRange) -> CompletionItem {
    match item.kind {
        CatalogKind::Metric | CatalogKind::Variable => CompletionItem {
            label: item.expr.clone(),
            kind: CompletionKind::Variable,
            insert_text: item.expr.clone(),
            insert_as_snippet: false,
            detail: item.kind.to_string(),
            documentation: None,
            range,
        },
        CatalogKind::Source => CompletionItem {
            label: item.expr.clone(),
            kind: CompletionKind::Constant,
            insert_text: item.expr.clone(),
            insert_as_snippet: false,
            detail: "source".to_string(),
            documentation: Some(item.details.clone()),
            range,
        },
        CatalogKind::Keyword => CompletionItem {
            label: item.expr.clone(),
            kind: CompletionKind::Keyword,
            insert_text: item.expr.clone(),
            insert_as_snippet: false,
            detail: item.signature.clone(),
            documentation: Some(item.details.clone()),
            range,
        },
        CatalogKind::Function | CatalogKind::CustomIndicator => CompletionItem {
            label: item.expr.clone(),
            kind: CompletionKind::Function,
            insert_text: match &item.insert_text {
                Some(s) if s.has_placeholders() => s.to_editor_syntax(),
                Some(s) => s.to_plain_text(),
                None => item.expr.clone(),
            },
            insert_as_snippet: item
                .insert_text
                .as_ref()
                .is_some_and(|s| s.has_placeholders()),
            detail: item.signature.clone(),
            documentation: Some(item.details.clone()),
            range,
        },
    }
}

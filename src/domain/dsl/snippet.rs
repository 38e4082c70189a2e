//! Structured insert snippets.
//!
//! A snippet is kept as literal and placeholder segments so the core never
//! commits to one editor's placeholder syntax. [`Snippet::to_editor_syntax`]
//! renders the `${1:default}` form used by Monaco/VS Code style editors;
//! [`Snippet::to_plain_text`] substitutes the defaults.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetSegment {
    Literal(String),
    Placeholder { index: u32, default: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    pub segments: Vec<SnippetSegment>,
}

impl Snippet {
    /// Function call form: `NAME()` with no arguments, otherwise
    /// `NAME(${1:a}, ${2:b}, ...)` with one placeholder per argument in order.
    pub fn call<I, S>(name: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = vec![SnippetSegment::Literal(format!("{}(", name))];
        for (i, default) in args.into_iter().enumerate() {
            if i > 0 {
                segments.push(SnippetSegment::Literal(", ".to_string()));
            }
            segments.push(SnippetSegment::Placeholder {
                index: i as u32 + 1,
                default: default.into(),
            });
        }
        segments.push(SnippetSegment::Literal(")".to_string()));

        let mut snippet = Self { segments };
        snippet.merge_literals();
        snippet
    }

    pub fn placeholder_indices(&self) -> Vec<u32> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                SnippetSegment::Placeholder { index, .. } => Some(*index),
                SnippetSegment::Literal(_) => None,
            })
            .collect()
    }

    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, SnippetSegment::Placeholder { .. }))
    }

    pub fn to_editor_syntax(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                SnippetSegment::Literal(text) => out.push_str(&escape_literal(text)),
                SnippetSegment::Placeholder { index, default } => {
                    if default.is_empty() {
                        out.push_str(&format!("${}", index));
                    } else {
                        out.push_str(&format!("${{{}:{}}}", index, escape_default(default)));
                    }
                }
            }
        }
        out
    }

    pub fn to_plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                SnippetSegment::Literal(text) => text.as_str(),
                SnippetSegment::Placeholder { default, .. } => default.as_str(),
            })
            .collect()
    }

    fn merge_literals(&mut self) {
        let segments = std::mem::take(&mut self.segments);
        let mut merged: Vec<SnippetSegment> = Vec::with_capacity(segments.len());
        for segment in segments {
            if let SnippetSegment::Literal(next) = &segment {
                if let Some(SnippetSegment::Literal(prev)) = merged.last_mut() {
                    prev.push_str(next);
                    continue;
                }
            }
            merged.push(segment);
        }
        self.segments = merged;
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_editor_syntax())
    }
}

fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// Inside `${n:...}` the closing brace also needs escaping.
fn escape_default(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '\\' | '}') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_without_args_has_no_placeholders() {
        let s = Snippet::call("MY_IND", Vec::<String>::new());
        assert_eq!(s.to_editor_syntax(), "MY_IND()");
        assert!(!s.has_placeholders());
        assert_eq!(s.segments.len(), 1);
    }

    #[test]
    fn call_with_args_numbers_placeholders_in_order() {
        let s = Snippet::call("TREND", ["series", "fast", "slow"]);
        assert_eq!(
            s.to_editor_syntax(),
            "TREND(${1:series}, ${2:fast}, ${3:slow})"
        );
        assert_eq!(s.placeholder_indices(), vec![1, 2, 3]);
    }

    #[test]
    fn plain_text_substitutes_defaults() {
        let s = Snippet::call("SMA", ["close", "20", "\"1d\""]);
        assert_eq!(s.to_plain_text(), "SMA(close, 20, \"1d\")");
    }

    #[test]
    fn empty_default_renders_bare_tabstop() {
        let s = Snippet::call("ABS", [""]);
        assert_eq!(s.to_editor_syntax(), "ABS($1)");
    }

    #[test]
    fn escapes_editor_metacharacters() {
        let s = Snippet::call("X", ["a}b", "$c"]);
        assert_eq!(s.to_editor_syntax(), "X(${1:a\\}b}, ${2:\\$c})");
        let literal = Snippet {
            segments: vec![SnippetSegment::Literal("$PNL".into())],
        };
        assert_eq!(literal.to_editor_syntax(), "\\$PNL");
        assert_eq!(literal.to_plain_text(), "$PNL");
    }
}

//! Catalog of insertable DSL items for autocomplete and the help drawer.
//!
//! [`build_catalog`] merges the static tables in [`super::builtins`] with the
//! operands and custom indicators of the current session. The result is a flat
//! list that callers filter repeatedly with [`filter_catalog`] without rebuilding.

use crate::domain::dsl::builtins::{BUILTIN_FUNCTIONS, KEYWORDS, SOURCES};
use crate::domain::dsl::snippet::Snippet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Function,
    Metric,
    Variable,
    CustomIndicator,
    Keyword,
    Source,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Function => "function",
            CatalogKind::Metric => "metric",
            CatalogKind::Variable => "variable",
            CatalogKind::CustomIndicator => "custom_indicator",
            CatalogKind::Keyword => "keyword",
            CatalogKind::Source => "source",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "function" => Ok(CatalogKind::Function),
            "metric" => Ok(CatalogKind::Metric),
            "variable" => Ok(CatalogKind::Variable),
            "custom_indicator" | "custom" => Ok(CatalogKind::CustomIndicator),
            "keyword" => Ok(CatalogKind::Keyword),
            "source" => Ok(CatalogKind::Source),
            other => Err(format!("unknown catalog kind '{}'", other)),
        }
    }
}

/// Which kind operands are listed as; depends on where the editor is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandKind {
    #[default]
    Metric,
    Variable,
}

impl From<OperandKind> for CatalogKind {
    fn from(kind: OperandKind) -> Self {
        match kind {
            OperandKind::Metric => CatalogKind::Metric,
            OperandKind::Variable => CatalogKind::Variable,
        }
    }
}

impl FromStr for OperandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(OperandKind::Metric),
            "variable" => Ok(OperandKind::Variable),
            other => Err(format!("expected metric or variable, found '{}'", other)),
        }
    }
}

/// A user-defined indicator callable like a built-in function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomIndicator {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_params")]
    pub params: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CustomIndicator {
    pub fn new<S: Into<String>>(name: impl Into<String>, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declared parameter names, trimmed, blanks removed.
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub fn signature(&self) -> String {
        format!("{}({})", self.name.trim(), self.param_names().join(", "))
    }

    pub fn snippet(&self) -> Snippet {
        Snippet::call(self.name.trim(), self.param_names())
    }
}

// Anything other than an array of strings is read as "no parameters";
// non-string array elements are dropped.
fn lenient_params<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub kind: CatalogKind,
    pub expr: String,
    pub signature: String,
    pub details: String,
    #[serde(rename = "insertText", serialize_with = "serialize_snippet")]
    pub insert_text: Option<Snippet>,
}

fn serialize_snippet<S>(snippet: &Option<Snippet>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match snippet {
        Some(s) => serializer.serialize_some(&s.to_editor_syntax()),
        None => serializer.serialize_none(),
    }
}

impl CatalogItem {
    /// De-duplication and display key; unique within one build.
    pub fn key(&self) -> (CatalogKind, &str, &str) {
        (self.kind, &self.expr, &self.signature)
    }

    /// Text to insert when no snippet is attached.
    pub fn insert_plain(&self) -> String {
        match &self.insert_text {
            Some(s) => s.to_plain_text(),
            None => self.expr.clone(),
        }
    }

    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.expr.to_lowercase().contains(needle_lower)
            || self.signature.to_lowercase().contains(needle_lower)
            || self.details.to_lowercase().contains(needle_lower)
    }
}

/// Trim, drop blanks, keep the first occurrence of each operand.
pub fn normalize_operands<S: AsRef<str>>(operands: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in operands {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Build the flat catalog.
///
/// Order: built-in functions, sources and keywords in table order, then
/// operands in first-occurrence order, then custom indicators sorted by name.
/// Custom indicators with a blank name are skipped. Never fails.
pub fn build_catalog<S: AsRef<str>>(
    operands: &[S],
    custom_indicators: &[CustomIndicator],
    operand_kind: OperandKind,
) -> Vec<CatalogItem> {
    let mut items = Vec::with_capacity(
        BUILTIN_FUNCTIONS.len() + SOURCES.len() + KEYWORDS.len() + operands.len() + custom_indicators.len(),
    );

    for f in BUILTIN_FUNCTIONS {
        items.push(CatalogItem {
            kind: CatalogKind::Function,
            expr: f.name.to_string(),
            signature: f.signature(),
            details: f.description.to_string(),
            insert_text: Some(f.snippet()),
        });
    }

    for s in SOURCES {
        items.push(CatalogItem {
            kind: CatalogKind::Source,
            expr: s.name.to_string(),
            signature: s.name.to_string(),
            details: s.description.to_string(),
            insert_text: None,
        });
    }

    for k in KEYWORDS {
        items.push(CatalogItem {
            kind: CatalogKind::Keyword,
            expr: k.name.to_string(),
            signature: k.usage.to_string(),
            details: k.description.to_string(),
            insert_text: None,
        });
    }

    let kind = CatalogKind::from(operand_kind);
    for operand in normalize_operands(operands) {
        items.push(CatalogItem {
            kind,
            signature: operand.clone(),
            details: format!("{} available in this context", kind),
            expr: operand,
            insert_text: None,
        });
    }

    let mut customs: Vec<&CustomIndicator> = custom_indicators
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .collect();
    customs.sort_by(|a, b| a.name.trim().cmp(b.name.trim()));
    for ci in customs {
        let params = ci.param_names();
        let mut details = if params.is_empty() {
            "Custom indicator (no parameters)".to_string()
        } else {
            format!("Custom indicator ({})", params.join(", "))
        };
        if let Some(desc) = ci.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            details.push_str(": ");
            details.push_str(desc);
        }
        items.push(CatalogItem {
            kind: CatalogKind::CustomIndicator,
            expr: ci.name.trim().to_string(),
            signature: ci.signature(),
            details,
            insert_text: Some(ci.snippet()),
        });
    }

    dedup_by_key(items)
}

fn dedup_by_key(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut seen: HashSet<(CatalogKind, String, String)> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert((item.kind, item.expr.clone(), item.signature.clone())))
        .collect()
}

/// Case-insensitive substring filter over `expr`, `signature` and `details`,
/// optionally restricted to one kind. A blank query matches everything.
pub fn filter_catalog<'a>(
    items: &'a [CatalogItem],
    query: &str,
    kind: Option<CatalogKind>,
) -> Vec<&'a CatalogItem> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| kind.is_none_or(|k| item.kind == k))
        .filter(|item| item.matches(&needle))
        .collect()
}

//! Per-language registry of installed tokenizers and completion providers.
//!
//! One registry is owned by whatever composes the editor integration and is
//! passed where needed. A language id keeps its tokenizer from the first
//! registration; every later registration replaces the completion provider,
//! so re-rendering an editor never stacks duplicate suggestions.

use crate::domain::dsl::completion::{CompletionItem, CompletionProvider};
use crate::domain::dsl::tokenizer::LanguageDefinition;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Installed,
    Replaced,
}

#[derive(Debug)]
struct LanguageEntry {
    definition: LanguageDefinition,
    provider: Option<CompletionProvider>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageEntry>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `provider` for `language_id`, replacing any previous one.
    pub fn register(&mut self, language_id: &str, provider: CompletionProvider) -> Registration {
        match self.languages.get_mut(language_id) {
            Some(entry) => {
                entry.provider = Some(provider);
                entry.generation += 1;
                debug!(language_id, generation = entry.generation, "replaced completion provider");
                Registration::Replaced
            }
            None => {
                self.languages.insert(
                    language_id.to_string(),
                    LanguageEntry {
                        definition: LanguageDefinition::dsl(),
                        provider: Some(provider),
                        generation: 1,
                    },
                );
                debug!(language_id, "registered language");
                Registration::Installed
            }
        }
    }

    /// Drop the completion provider; the tokenizer stays registered.
    /// Returns false when nothing was installed.
    pub fn dispose(&mut self, language_id: &str) -> bool {
        match self.languages.get_mut(language_id) {
            Some(entry) => {
                let had_provider = entry.provider.take().is_some();
                if had_provider {
                    debug!(language_id, "disposed completion provider");
                }
                had_provider
            }
            None => false,
        }
    }

    pub fn is_registered(&self, language_id: &str) -> bool {
        self.languages.contains_key(language_id)
    }

    pub fn definition(&self, language_id: &str) -> Option<&LanguageDefinition> {
        self.languages.get(language_id).map(|e| &e.definition)
    }

    pub fn provider(&self, language_id: &str) -> Option<&CompletionProvider> {
        self.languages
            .get(language_id)
            .and_then(|e| e.provider.as_ref())
    }

    /// Number of times the provider for `language_id` was installed or replaced.
    pub fn generation(&self, language_id: &str) -> u64 {
        self.languages
            .get(language_id)
            .map(|e| e.generation)
            .unwrap_or(0)
    }

    pub fn active_provider_count(&self) -> usize {
        self.languages
            .values()
            .filter(|e| e.provider.is_some())
            .count()
    }

    /// Trigger characters of the active provider; empty when none is installed.
    pub fn trigger_characters(&self, language_id: &str) -> &'static [char] {
        self.provider(language_id)
            .map(|p| p.trigger_characters())
            .unwrap_or_default()
    }

    /// Suggestions for `line` at `column`; empty when no provider is active.
    pub fn suggestions(&self, language_id: &str, line: &str, column: usize) -> Vec<CompletionItem> {
        self.provider(language_id)
            .map(|p| p.suggestions(line, column))
            .unwrap_or_default()
    }
}

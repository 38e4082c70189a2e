//! DSL editor tooling: static tables, catalog, snippets, tokenizer,
//! completion and the language registry.

pub mod builtins;
pub mod snippet;
pub mod catalog;
pub mod tokenizer;
pub mod completion;
pub mod registry;

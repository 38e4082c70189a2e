//! Core domain logic: DSL editor tooling and backtest analysis.

pub mod dsl;
pub mod analysis;
pub mod error;

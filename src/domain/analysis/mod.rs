//! Client-side post-processing of backtest output: equity period P&L,
//! closed-trade analysis, period summaries and drawdown bucketing.
//!
//! Everything here is pure and total. Bad rows are dropped or their derived
//! fields left empty; nothing returns an error.

pub mod period;
pub mod equity;
pub mod trades;
pub mod summary;
pub mod drawdown;

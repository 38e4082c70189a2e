//! Port traits (interfaces) for configuration and backtest data access.

pub mod config_port;
pub mod data_port;

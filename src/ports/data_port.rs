//! Backtest result access port trait.

use crate::domain::analysis::equity::EquitySeries;
use crate::domain::analysis::trades::RawTrade;
use crate::domain::error::SigmaError;

/// Source of stored backtest runs, addressed by run id.
pub trait DataPort {
    fn fetch_equity(&self, run: &str) -> Result<EquitySeries, SigmaError>;

    fn fetch_trades(&self, run: &str) -> Result<Vec<RawTrade>, SigmaError>;

    fn list_runs(&self) -> Result<Vec<String>, SigmaError>;
}

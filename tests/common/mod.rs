#![allow(dead_code)]

use sigmatrader::domain::analysis::equity::EquitySeries;
pub use sigmatrader::domain::analysis::trades::RawTrade;
use sigmatrader::domain::error::SigmaError;
use sigmatrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

pub struct MockDataPort {
    pub equity: HashMap<String, EquitySeries>,
    pub trades: HashMap<String, Vec<RawTrade>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            equity: HashMap::new(),
            trades: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_equity(mut self, run: &str, points: &[(&str, f64)]) -> Self {
        let series = EquitySeries {
            timestamps: points.iter().map(|(ts, _)| ts.to_string()).collect(),
            equity: points.iter().map(|(_, v)| *v).collect(),
        };
        self.equity.insert(run.to_string(), series);
        self
    }

    pub fn with_trades(mut self, run: &str, trades: Vec<RawTrade>) -> Self {
        self.trades.insert(run.to_string(), trades);
        self
    }

    pub fn with_error(mut self, run: &str, reason: &str) -> Self {
        self.errors.insert(run.to_string(), reason.to_string());
        self
    }

    fn check(&self, run: &str) -> Result<(), SigmaError> {
        match self.errors.get(run) {
            Some(reason) => Err(SigmaError::DataRead {
                path: run.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_equity(&self, run: &str) -> Result<EquitySeries, SigmaError> {
        self.check(run)?;
        Ok(self.equity.get(run).cloned().unwrap_or_default())
    }

    fn fetch_trades(&self, run: &str) -> Result<Vec<RawTrade>, SigmaError> {
        self.check(run)?;
        Ok(self.trades.get(run).cloned().unwrap_or_default())
    }

    fn list_runs(&self) -> Result<Vec<String>, SigmaError> {
        let mut runs: Vec<String> = self
            .equity
            .keys()
            .chain(self.trades.keys())
            .cloned()
            .collect();
        runs.sort();
        runs.dedup();
        Ok(runs)
    }
}

pub fn make_trade(side: &str, entry_ts: &str, exit_ts: &str, entry: f64, exit: f64, qty: f64) -> RawTrade {
    RawTrade {
        symbol: Some("INFY".to_string()),
        side: Some(side.to_string()),
        entry_ts: Some(entry_ts.to_string()),
        exit_ts: Some(exit_ts.to_string()),
        entry_price: Some(entry),
        exit_price: Some(exit),
        qty: Some(qty),
        pnl_pct: None,
        reason: None,
    }
}

pub fn with_pnl_pct(mut trade: RawTrade, pct: f64) -> RawTrade {
    trade.pnl_pct = Some(pct);
    trade
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Write `<run>_equity.csv` and `<run>_trades.csv` under `dir`.
pub fn write_run(dir: &Path, run: &str, equity_csv: &str, trades_csv: &str) {
    std::fs::write(dir.join(format!("{}_equity.csv", run)), equity_csv).unwrap();
    std::fs::write(dir.join(format!("{}_trades.csv", run)), trades_csv).unwrap();
}

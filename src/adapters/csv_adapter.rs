//! CSV file backtest-data adapter and CSV/JSON row writers.
//!
//! A run `R` under the base directory is stored as `R_equity.csv`
//! (`ts,equity`) and `R_trades.csv` (`symbol,side,entry_ts,exit_ts,
//! entry_price,exit_price,qty,pnl_pct,reason`). Blank or unparseable numeric
//! cells load as missing values, and short rows leave their trailing fields
//! missing. Only unreadable files and broken CSV quoting are errors.

use crate::domain::analysis::equity::EquitySeries;
use crate::domain::analysis::trades::RawTrade;
use crate::domain::error::SigmaError;
use crate::ports::data_port::DataPort;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const EQUITY_SUFFIX: &str = "_equity.csv";
const TRADES_SUFFIX: &str = "_trades.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EquityRecord {
    #[serde(alias = "timestamp", alias = "date")]
    ts: String,
    #[serde(alias = "value", deserialize_with = "csv::invalid_option")]
    equity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TradeRecord {
    symbol: Option<String>,
    side: Option<String>,
    entry_ts: Option<String>,
    exit_ts: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    entry_price: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    exit_price: Option<f64>,
    #[serde(alias = "quantity", deserialize_with = "csv::invalid_option")]
    qty: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pnl_pct: Option<f64>,
    reason: Option<String>,
}

impl From<TradeRecord> for RawTrade {
    fn from(r: TradeRecord) -> Self {
        RawTrade {
            symbol: r.symbol,
            side: r.side,
            entry_ts: r.entry_ts,
            exit_ts: r.exit_ts,
            entry_price: r.entry_price,
            exit_price: r.exit_price,
            qty: r.qty,
            pnl_pct: r.pnl_pct,
            reason: r.reason,
        }
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn equity_path(&self, run: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", run, EQUITY_SUFFIX))
    }

    fn trades_path(&self, run: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", run, TRADES_SUFFIX))
    }

    fn read(path: &PathBuf) -> Result<String, SigmaError> {
        fs::read_to_string(path).map_err(|e| SigmaError::DataRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_equity(&self, run: &str) -> Result<EquitySeries, SigmaError> {
        let path = self.equity_path(run);
        let content = Self::read(&path)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut series = EquitySeries::default();

        for result in rdr.deserialize::<EquityRecord>() {
            let record = result.map_err(|e| SigmaError::DataFormat {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            series.timestamps.push(record.ts);
            series.equity.push(record.equity.unwrap_or(f64::NAN));
        }

        Ok(series)
    }

    fn fetch_trades(&self, run: &str) -> Result<Vec<RawTrade>, SigmaError> {
        let path = self.trades_path(run);
        let content = Self::read(&path)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for result in rdr.deserialize::<TradeRecord>() {
            let record = result.map_err(|e| SigmaError::DataFormat {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            trades.push(RawTrade::from(record));
        }

        Ok(trades)
    }

    fn list_runs(&self) -> Result<Vec<String>, SigmaError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SigmaError::DataRead {
            path: self.base_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut runs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SigmaError::DataRead {
                path: self.base_path.display().to_string(),
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            let run = name_str
                .strip_suffix(EQUITY_SUFFIX)
                .or_else(|| name_str.strip_suffix(TRADES_SUFFIX));
            if let Some(run) = run {
                runs.push(run.to_string());
            }
        }

        runs.sort();
        runs.dedup();
        Ok(runs)
    }
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), SigmaError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a value (usually a row slice) as pretty-printed JSON.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<(), SigmaError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("alpha_equity.csv"),
            "ts,equity\n\
             2024-01-05,100\n\
             2024-01-20,110\n\
             2024-01-25,\n\
             2024-02-03,105\n",
        )
        .unwrap();
        fs::write(
            path.join("alpha_trades.csv"),
            "symbol,side,entry_ts,exit_ts,entry_price,exit_price,qty,pnl_pct,reason\n\
             INFY,SHORT,2024-01-10,2024-01-12,100,90,10,10,\"target, hit\"\n\
             ,LONG,2024-01-15,,50,n/a,1,,\n",
        )
        .unwrap();
        fs::write(path.join("beta_equity.csv"), "timestamp,value\n").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_equity_reads_series() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_equity("alpha").unwrap();
        assert_eq!(series.timestamps.len(), 4);
        assert_eq!(series.equity[0], 100.0);
        assert!(series.equity[2].is_nan());
        assert_eq!(series.timestamps[3], "2024-02-03");
    }

    #[test]
    fn fetch_equity_accepts_header_aliases() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_equity("beta").unwrap().is_empty());
    }

    #[test]
    fn fetch_trades_handles_quoting_and_blanks() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let trades = adapter.fetch_trades("alpha").unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].reason.as_deref(), Some("target, hit"));
        assert_eq!(trades[0].entry_price, Some(100.0));
        assert_eq!(trades[1].symbol, None);
        assert_eq!(trades[1].exit_ts, None);
        assert_eq!(trades[1].exit_price, None);
        assert_eq!(trades[1].pnl_pct, None);
    }

    #[test]
    fn short_trade_row_keeps_leading_fields() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("ragged_trades.csv"),
            "symbol,side,entry_ts,exit_ts,entry_price,exit_price,qty,pnl_pct,reason\n\
             INFY,LONG,2024-01-10,2024-01-12,100,110,1,10,target\n\
             TCS,SHORT,2024-01-11,2024-01-13,50,45,2,10\n\
             WIPRO,LONG,2024-01-12,2024-01-14,20,21,5,5,exit\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let trades = adapter.fetch_trades("ragged").unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[1].symbol.as_deref(), Some("TCS"));
        assert_eq!(trades[1].pnl_pct, Some(10.0));
        assert_eq!(trades[1].reason, None);
        assert_eq!(trades[2].reason.as_deref(), Some("exit"));
    }

    #[test]
    fn equity_row_without_value_is_nan() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("ragged_equity.csv"),
            "ts,equity\n2024-01-01,100\n2024-01-02\n2024-01-03,102\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_equity("ragged").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.timestamps[1], "2024-01-02");
        assert!(series.equity[1].is_nan());
        assert_eq!(series.equity[2], 102.0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_trades("beta"),
            Err(SigmaError::DataRead { .. })
        ));
    }

    #[test]
    fn list_runs_collects_unique_run_ids() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_runs().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn write_csv_emits_header() {
        #[derive(Serialize)]
        struct Row {
            period: String,
            pnl: Option<f64>,
        }
        let mut out = Vec::new();
        write_csv(
            &mut out,
            &[
                Row {
                    period: "2024-01".into(),
                    pnl: Some(1.5),
                },
                Row {
                    period: "2024-02".into(),
                    pnl: None,
                },
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "period,pnl\n2024-01,1.5\n2024-02,\n"
        );
    }

    #[test]
    fn write_json_emits_array() {
        let mut out = Vec::new();
        write_json(&mut out, &[1, 2]).unwrap();
        let parsed: Vec<i32> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, vec![1, 2]);
    }
}

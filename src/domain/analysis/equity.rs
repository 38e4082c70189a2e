//! Equity curve period P&L.

use super::period::{bucket_key, format_ymd, parse_ymd, Period};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPeriodRow {
    /// Bucket key: `YYYY-MM` for months, the Monday `YYYY-MM-DD` for weeks.
    pub period: String,
    pub start_ymd: String,
    pub end_ymd: String,
    pub start_equity: f64,
    pub end_equity: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// Parallel timestamp and equity arrays as produced by a backtest run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquitySeries {
    pub timestamps: Vec<String>,
    pub equity: Vec<f64>,
}

impl EquitySeries {
    pub fn len(&self) -> usize {
        self.timestamps.len().min(self.equity.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn period_rows(&self, period: Period) -> Vec<EquityPeriodRow> {
        compute_equity_period_pnl_rows(&self.timestamps, &self.equity, period)
    }
}

struct OpenBucket {
    key: String,
    start_ymd: String,
    end_ymd: String,
    end_equity: f64,
}

fn pnl_pct(start: f64, end: f64) -> f64 {
    if start > 0.0 {
        (end / start - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Bucket an equity curve by week or month.
///
/// Only the overlapping prefix of the two slices is read. Rows with a blank or
/// unparseable timestamp or a non-finite equity are skipped. Consecutive rows
/// with the same key extend a bucket; each bucket starts from the previous
/// bucket's end equity, the first from the first valid equity value.
pub fn compute_equity_period_pnl_rows<S: AsRef<str>>(
    timestamps: &[S],
    equity: &[f64],
    period: Period,
) -> Vec<EquityPeriodRow> {
    let mut rows = Vec::new();
    // Start equity of the open bucket.
    let mut baseline: Option<f64> = None;
    let mut current: Option<OpenBucket> = None;

    for (ts, &value) in timestamps.iter().zip(equity.iter()) {
        let ts = ts.as_ref();
        if ts.trim().is_empty() || !value.is_finite() {
            continue;
        }
        let Some(date) = parse_ymd(ts) else {
            continue;
        };
        let key = bucket_key(date, period);
        let ymd = format_ymd(date);
        let start_equity = *baseline.get_or_insert(value);

        match current.as_mut() {
            Some(bucket) if bucket.key == key => {
                bucket.end_ymd = ymd;
                bucket.end_equity = value;
            }
            _ => {
                if let Some(done) = current.take() {
                    baseline = Some(done.end_equity);
                    rows.push(close_bucket(done, start_equity));
                }
                current = Some(OpenBucket {
                    key,
                    start_ymd: ymd.clone(),
                    end_ymd: ymd,
                    end_equity: value,
                });
            }
        }
    }

    if let Some(done) = current {
        let start = baseline.unwrap_or(done.end_equity);
        rows.push(close_bucket(done, start));
    }

    rows
}

fn close_bucket(bucket: OpenBucket, start_equity: f64) -> EquityPeriodRow {
    EquityPeriodRow {
        period: bucket.key,
        start_ymd: bucket.start_ymd,
        end_ymd: bucket.end_ymd,
        start_equity,
        end_equity: bucket.end_equity,
        pnl: bucket.end_equity - start_equity,
        pnl_pct: pnl_pct(start_equity, bucket.end_equity),
    }
}

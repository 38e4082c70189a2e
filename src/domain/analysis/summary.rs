//! Per-period aggregation of closed-trade rows.

use super::period::Period;
use super::trades::ClosedTradeRow;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePeriodSummaryRow {
    pub period: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate_pct: f64,
    pub pnl_inr: f64,
    pub avg_pnl_pct: f64,
    pub avg_hold_days: f64,
}

#[derive(Default)]
struct Accumulator {
    trades: usize,
    wins: usize,
    losses: usize,
    pnl_inr: f64,
    pnl_pct_sum: f64,
    pnl_pct_count: usize,
    hold_sum: f64,
    hold_count: usize,
}

impl Accumulator {
    fn add(&mut self, row: &ClosedTradeRow) {
        self.trades += 1;
        if let Some(pct) = row.pnl_pct.filter(|p| p.is_finite()) {
            if pct > 0.0 {
                self.wins += 1;
            } else if pct < 0.0 {
                self.losses += 1;
            }
            self.pnl_pct_sum += pct;
            self.pnl_pct_count += 1;
        }
        if let Some(pnl) = row.pnl_inr.filter(|p| p.is_finite()) {
            self.pnl_inr += pnl;
        }
        if let Some(days) = row.hold_days {
            self.hold_sum += days as f64;
            self.hold_count += 1;
        }
    }

    fn finish(self, period: String) -> TradePeriodSummaryRow {
        let mean = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };
        TradePeriodSummaryRow {
            period,
            trades: self.trades,
            wins: self.wins,
            losses: self.losses,
            win_rate_pct: mean(self.wins as f64 * 100.0, self.trades),
            pnl_inr: self.pnl_inr,
            avg_pnl_pct: mean(self.pnl_pct_sum, self.pnl_pct_count),
            avg_hold_days: mean(self.hold_sum, self.hold_count),
        }
    }
}

/// Group trade rows by exit month or exit week, in first-seen order.
///
/// Rows with an empty bucket key are skipped. Wins and losses count only
/// finite, non-zero `pnl_pct`; sums and means leave out missing values.
pub fn compute_trade_period_summary_rows(
    rows: &[ClosedTradeRow],
    period: Period,
) -> Vec<TradePeriodSummaryRow> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Accumulator> = HashMap::new();

    for row in rows {
        let key = match period {
            Period::Month => &row.month,
            Period::Week => &row.week_start,
        };
        if key.is_empty() {
            continue;
        }
        if !buckets.contains_key(key) {
            order.push(key.clone());
        }
        buckets.entry(key.clone()).or_default().add(row);
    }

    order
        .into_iter()
        .filter_map(|key| buckets.remove(&key).map(|acc| acc.finish(key)))
        .collect()
}

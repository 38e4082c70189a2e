//! Closed-trade analysis rows.

use super::period::{days_between_iso_dates, format_ymd, month_key, parse_ymd, week_start};
use serde::{Deserialize, Serialize};

/// Closed trade as reported by the backtest engine. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTrade {
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub entry_ts: Option<String>,
    pub exit_ts: Option<String>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub qty: Option<f64>,
    pub pnl_pct: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Anything other than `SHORT` (any case) is treated as long.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("SHORT") => Side::Short,
            _ => Side::Long,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTradeRow {
    pub id: usize,
    pub symbol: String,
    pub side: Side,
    pub entry_ts: String,
    pub exit_ts: String,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub qty: Option<f64>,
    pub pnl_pct: Option<f64>,
    pub pnl_inr: Option<f64>,
    pub hold_days: Option<i64>,
    /// Exit month, `YYYY-MM`; empty when the exit date does not parse.
    pub month: String,
    /// Monday of the exit week, `YYYY-MM-DD`; empty when the exit date does not parse.
    pub week_start: String,
    pub reason: String,
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn non_blank(s: Option<&String>) -> Option<&str> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// One row per trade that has both an entry and an exit timestamp.
///
/// Shorts buy at the exit and sell at the entry. Month and week keys come from
/// the exit date. `id` is the position of the source record.
pub fn compute_closed_trade_analysis_rows(
    trades: &[RawTrade],
    default_symbol: Option<&str>,
) -> Vec<ClosedTradeRow> {
    trades
        .iter()
        .enumerate()
        .filter_map(|(i, trade)| analyze_trade(i, trade, default_symbol))
        .collect()
}

fn analyze_trade(id: usize, trade: &RawTrade, default_symbol: Option<&str>) -> Option<ClosedTradeRow> {
    let entry_ts = non_blank(trade.entry_ts.as_ref())?;
    let exit_ts = non_blank(trade.exit_ts.as_ref())?;

    let side = Side::from_raw(trade.side.as_deref());
    let entry_price = finite(trade.entry_price);
    let exit_price = finite(trade.exit_price);
    let (buy_price, sell_price) = match side {
        Side::Short => (exit_price, entry_price),
        Side::Long => (entry_price, exit_price),
    };
    let qty = finite(trade.qty);
    let pnl_inr = match (buy_price, sell_price, qty) {
        (Some(buy), Some(sell), Some(q)) => Some((sell - buy) * q),
        _ => None,
    };

    let exit_date = parse_ymd(exit_ts);
    let symbol = non_blank(trade.symbol.as_ref())
        .or(default_symbol.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string();

    Some(ClosedTradeRow {
        id,
        symbol,
        side,
        entry_ts: entry_ts.to_string(),
        exit_ts: exit_ts.to_string(),
        buy_price,
        sell_price,
        qty,
        pnl_pct: finite(trade.pnl_pct),
        pnl_inr,
        hold_days: days_between_iso_dates(entry_ts, exit_ts),
        month: exit_date.map(month_key).unwrap_or_default(),
        week_start: exit_date
            .map(|d| format_ymd(week_start(d)))
            .unwrap_or_default(),
        reason: trade.reason.as_deref().unwrap_or_default().trim().to_string(),
    })
}

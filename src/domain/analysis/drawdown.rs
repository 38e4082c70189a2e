//! Drawdown series and drawdown-depth bucketing.

use super::period::{format_ymd, parse_ymd};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownPoint {
    pub ymd: String,
    pub equity: f64,
    pub peak: f64,
    /// Percent below the running peak; 0 at a new high.
    pub drawdown_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownBucket {
    pub label: String,
    /// Lower bound, exclusive except for the flat `0%` band.
    pub min_pct: f64,
    /// Upper bound, inclusive; None for the open-ended band.
    pub max_pct: Option<f64>,
    pub points: usize,
    pub share_pct: f64,
}

/// Depth bands as (label, lower, upper).
pub const DRAWDOWN_BANDS: &[(&str, f64, Option<f64>)] = &[
    ("0%", 0.0, Some(0.0)),
    ("0-5%", 0.0, Some(5.0)),
    ("5-10%", 5.0, Some(10.0)),
    ("10-20%", 10.0, Some(20.0)),
    (">20%", 20.0, None),
];

/// Running peak and drawdown per valid point. Skips the same rows as
/// [`super::equity::compute_equity_period_pnl_rows`].
pub fn compute_drawdown_series<S: AsRef<str>>(timestamps: &[S], equity: &[f64]) -> Vec<DrawdownPoint> {
    let mut peak: Option<f64> = None;
    let mut points = Vec::new();

    for (ts, &value) in timestamps.iter().zip(equity.iter()) {
        if !value.is_finite() {
            continue;
        }
        let Some(date) = parse_ymd(ts.as_ref()) else {
            continue;
        };
        let current_peak = peak.map_or(value, |p| p.max(value));
        peak = Some(current_peak);
        let drawdown_pct = if current_peak > 0.0 {
            (current_peak - value) / current_peak * 100.0
        } else {
            0.0
        };
        points.push(DrawdownPoint {
            ymd: format_ymd(date),
            equity: value,
            peak: current_peak,
            drawdown_pct,
        });
    }

    points
}

// Absorbs rounding in `drawdown_pct` so a drawdown of exactly a band bound
// lands in the band that includes it.
const BAND_EPSILON: f64 = 1e-9;

fn band_index(dd: f64) -> usize {
    if dd <= BAND_EPSILON {
        return 0;
    }
    DRAWDOWN_BANDS
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, (_, lo, hi))| dd > lo + BAND_EPSILON && hi.is_none_or(|h| dd <= h + BAND_EPSILON))
        .map(|(i, _)| i)
        .unwrap_or(DRAWDOWN_BANDS.len() - 1)
}

/// Count points per depth band. All bands are returned, empty ones with zero.
pub fn bucket_drawdowns(points: &[DrawdownPoint]) -> Vec<DrawdownBucket> {
    let mut counts = vec![0usize; DRAWDOWN_BANDS.len()];
    for p in points {
        counts[band_index(p.drawdown_pct)] += 1;
    }
    let total = points.len();

    DRAWDOWN_BANDS
        .iter()
        .zip(counts)
        .map(|(&(label, min_pct, max_pct), n)| DrawdownBucket {
            label: label.to_string(),
            min_pct,
            max_pct,
            points: n,
            share_pct: if total > 0 {
                n as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Deepest drawdown in percent; 0 for an empty series.
pub fn max_drawdown_pct(points: &[DrawdownPoint]) -> f64 {
    points.iter().map(|p| p.drawdown_pct).fold(0.0, f64::max)
}

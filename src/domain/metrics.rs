//! Performance metrics and the drawdown series.

use serde::Serialize;

use crate::domain::trade::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const MIN_VARIANCE: f64 = 1e-12;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub cagr_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe: f64,
    pub win_rate_pct: f64,
    pub trade_count: usize,
}

/// Percentage decline from the running peak, one value per equity point.
/// Zero at every new peak, non-positive elsewhere.
pub fn compute_drawdowns(equity: &[f64]) -> Vec<f64> {
    let mut drawdowns = Vec::with_capacity(equity.len());
    let mut peak = f64::MIN;

    for &value in equity {
        if value > peak {
            peak = value;
        }
        let dd = if peak > 0.0 {
            (value - peak) / peak * 100.0
        } else {
            0.0
        };
        drawdowns.push(dd);
    }

    drawdowns
}

impl PerformanceMetrics {
    /// Derive the summary from full-precision equity, drawdown, and trade
    /// data. Rounding happens here and only here: 2 decimals throughout,
    /// 3 for Sharpe.
    pub fn compute(
        equity: &[f64],
        drawdowns_pct: &[f64],
        trades: &[Trade],
        initial_capital: f64,
    ) -> Self {
        let final_equity = equity.last().copied().unwrap_or(initial_capital);

        let total_return_pct = (final_equity / initial_capital - 1.0) * 100.0;

        let years = (equity.len() as f64 / TRADING_DAYS_PER_YEAR).max(1.0 / TRADING_DAYS_PER_YEAR);
        let cagr_pct = ((final_equity / initial_capital).powf(1.0 / years) - 1.0) * 100.0;

        let max_drawdown_pct = drawdowns_pct
            .iter()
            .copied()
            .fold(0.0_f64, |min, dd| min.min(dd));

        let sharpe = compute_sharpe(equity);

        let wins = trades
            .iter()
            .filter(|t| t.pnl.is_some_and(|p| p > 0.0))
            .count();
        let win_rate_pct = if trades.is_empty() {
            0.0
        } else {
            wins as f64 / trades.len() as f64 * 100.0
        };

        PerformanceMetrics {
            initial: round2(initial_capital),
            final_equity: round2(final_equity),
            total_return_pct: round2(total_return_pct),
            cagr_pct: round2(cagr_pct),
            max_drawdown_pct: round2(max_drawdown_pct),
            sharpe: round3(sharpe),
            win_rate_pct: round2(win_rate_pct),
            trade_count: trades.len(),
        }
    }
}

fn compute_sharpe(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    // Sample variance, denominator floored at 1 so a single return is safe.
    let denom = (returns.len().saturating_sub(1)).max(1) as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / denom;
    let stddev = variance.max(MIN_VARIANCE).sqrt();

    mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
}

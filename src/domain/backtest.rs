//! Backtest engine: synthetic price path, crossover signals, trade
//! simulation, and mark-to-market equity reconstruction.
//!
//! The run is a pure function of its parameters. The price path is seeded
//! from the date range and capital, so the whole result (path, trades,
//! equity, metrics) replays identically for identical inputs.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::error::QuantflowError;
use crate::domain::indicator::calc_sma;
use crate::domain::metrics::{compute_drawdowns, round2, PerformanceMetrics};
use crate::domain::params::BacktestParams;
use crate::domain::price_model::generate_price_path;
use crate::domain::rng::Lcg;
use crate::domain::trade::Trade;

pub const FAST_PERIOD: usize = 5;
pub const SLOW_PERIOD: usize = 20;

/// Ranges shorter than this are not simulated: the result is a flat
/// equity series at the starting capital with no trades.
const MIN_SIMULATION_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub dates: Vec<NaiveDate>,
    pub equity: Vec<f64>,
    pub drawdowns_pct: Vec<f64>,
    pub trades: Vec<Trade>,
    pub metrics: PerformanceMetrics,
}

pub fn run_backtest(params: &BacktestParams) -> Result<BacktestResult, QuantflowError> {
    let days = params.span_days();
    let dates: Vec<NaiveDate> = (0..days)
        .map(|i| params.start_date + Duration::days(i as i64))
        .collect();

    if days < MIN_SIMULATION_DAYS {
        let equity = vec![round2(params.initial_capital); days];
        let drawdowns_pct = vec![0.0; days];
        let metrics =
            PerformanceMetrics::compute(&equity, &drawdowns_pct, &[], params.initial_capital);
        return Ok(BacktestResult {
            dates,
            equity,
            drawdowns_pct,
            trades: Vec::new(),
            metrics,
        });
    }

    let mut rng = Lcg::from_inputs(params.start_date, params.end_date, params.initial_capital);
    let prices = generate_price_path(&mut rng, days);

    let mut trades = simulate_trades(&dates, &prices, params);

    let equity_raw = reconstruct_equity(&dates, &prices, &trades, params);
    if equity_raw.iter().any(|e| !e.is_finite()) {
        return Err(QuantflowError::Computation {
            reason: "equity series is not finite".to_string(),
        });
    }
    let drawdowns_raw = compute_drawdowns(&equity_raw);

    let metrics =
        PerformanceMetrics::compute(&equity_raw, &drawdowns_raw, &trades, params.initial_capital);

    for trade in &mut trades {
        trade.round_fields();
    }

    Ok(BacktestResult {
        dates,
        equity: equity_raw.into_iter().map(round2).collect(),
        drawdowns_pct: drawdowns_raw.into_iter().map(round2).collect(),
        trades,
        metrics,
    })
}

/// Walk the price series with 5/20 SMA crossover signals. Single-position:
/// entry only fires when flat, so at most one trade is ever open.
fn simulate_trades(dates: &[NaiveDate], prices: &[f64], params: &BacktestParams) -> Vec<Trade> {
    let sma_fast = calc_sma(prices, FAST_PERIOD);
    let sma_slow = calc_sma(prices, SLOW_PERIOD);

    let commission = params.commission;
    let mut cash = params.initial_capital;
    let mut held: i64 = 0;
    let mut trades: Vec<Trade> = Vec::new();
    let mut next_id: u32 = 1;
    let last = prices.len() - 1;

    for i in 0..prices.len() {
        // Both averages must exist; warmup days leave the position alone.
        let fast_above = match (sma_fast[i], sma_slow[i]) {
            (Some(fast), Some(slow)) => fast > slow,
            _ => continue,
        };

        let price = prices[i];
        let open_idx = trades.iter().rposition(Trade::is_open);
        debug_assert!(trades.iter().filter(|t| t.is_open()).count() <= 1);

        if fast_above && open_idx.is_none() && i < last {
            let equity_now = cash + held as f64 * price;
            let allocation = params.position_size_pct / 100.0 * equity_now;
            let size = ((allocation / price).floor() as i64).max(1);
            let entry_fee = size as f64 * price * commission;
            cash -= size as f64 * price + entry_fee;
            held += size;
            trades.push(Trade::open(next_id, dates[i], price, size, entry_fee));
            next_id += 1;
        } else if !fast_above {
            if let Some(idx) = open_idx {
                let size = trades[idx].size;
                let exit_fee = size as f64 * price * commission;
                cash += size as f64 * price - exit_fee;
                held -= size;
                trades[idx].close(dates[i], price, exit_fee, params.initial_capital);
            }
        }
        debug_assert!(held >= 0);
    }

    // Whatever is still open settles at the final close.
    if let Some(idx) = trades.iter().rposition(Trade::is_open) {
        let price = prices[last];
        let size = trades[idx].size;
        let exit_fee = size as f64 * price * commission;
        trades[idx].close(dates[last], price, exit_fee, params.initial_capital);
    }

    trades
}

/// Mark-to-market equity by full replay: for each day, fold every trade's
/// dated cash flows and surviving share count over the day's close. Not
/// incremental; reproduces exactly what the forward walk accrued.
fn reconstruct_equity(
    dates: &[NaiveDate],
    prices: &[f64],
    trades: &[Trade],
    params: &BacktestParams,
) -> Vec<f64> {
    let commission = params.commission;

    dates
        .iter()
        .enumerate()
        .map(|(i, &day)| {
            let mut cash_flow = params.initial_capital;
            let mut net_shares: i64 = 0;

            for trade in trades {
                if trade.entry_date > day {
                    continue;
                }
                cash_flow -= trade.size as f64 * trade.entry_price * (1.0 + commission);
                match (trade.exit_date, trade.exit_price) {
                    (Some(exit_date), Some(exit_price)) if exit_date <= day => {
                        cash_flow += trade.size as f64 * exit_price * (1.0 - commission);
                    }
                    _ => net_shares += trade.size,
                }
            }

            debug_assert!(net_shares >= 0);
            cash_flow + net_shares as f64 * prices[i]
        })
        .collect()
}

//! Deterministic pseudo-random source for the synthetic price model.
//!
//! Numerical Recipes LCG (1664525 / 1013904223, mod 2^32). The seed is a
//! pure function of the backtest inputs, so a given parameter set always
//! replays the same price path.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Lcg { state: seed }
    }

    /// Seed from the two range endpoints and the rounded capital:
    /// `start_ms ^ end_ms ^ round(capital)` truncated to 32 bits.
    pub fn from_inputs(start_date: NaiveDate, end_date: NaiveDate, initial_capital: f64) -> Self {
        let start_ms = epoch_millis(start_date);
        let end_ms = epoch_millis(end_date);
        let seed = (start_ms ^ end_ms ^ initial_capital.round() as i64) as u32;
        Lcg::new(seed)
    }

    /// Next uniform draw in [0, 1].
    pub fn next_uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state as f64 / u32::MAX as f64
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

//! Synthetic daily price path: regime-switching GBM with jumps.
//!
//! Drift and volatility are redrawn when a regime starts; between regimes
//! the previous pair keeps applying. The shock is a centered, scaled
//! uniform draw rather than a true Gaussian, kept that way so a seed
//! replays bit-identically.

use crate::domain::rng::Lcg;

const START_PRICE: f64 = 100.0;
const DT: f64 = 1.0 / 252.0;
const REGIME_SWITCH_PROB: f64 = 0.03;
const JUMP_PROB: f64 = 0.01;
const PRICE_FLOOR: f64 = 0.01;

/// Generate one synthetic close per day.
pub fn generate_price_path(rng: &mut Lcg, days: usize) -> Vec<f64> {
    let mut prices = Vec::with_capacity(days);
    let mut price = START_PRICE;

    let mut regime_days_left: u32 = 0;
    let mut mu = 0.08;
    let mut sigma = 0.20;

    for _ in 0..days {
        if regime_days_left == 0 && rng.next_uniform() < REGIME_SWITCH_PROB {
            regime_days_left = 5 + (rng.next_uniform() * 15.0).floor() as u32;
            mu = 0.04 + rng.next_uniform() * 0.12;
            sigma = 0.12 + rng.next_uniform() * 0.28;
        }

        let z = 2.0 * (rng.next_uniform() - 0.5);
        let mut log_return = (mu - 0.5 * sigma * sigma) * DT + sigma * DT.sqrt() * z;

        if rng.next_uniform() < JUMP_PROB {
            log_return += (rng.next_uniform() - 0.5) * 0.25;
        }

        price = (price * log_return.exp()).max(PRICE_FLOOR);
        prices.push(price);

        regime_days_left = regime_days_left.saturating_sub(1);
    }

    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_has_one_price_per_day() {
        let mut rng = Lcg::new(7);
        let prices = generate_price_path(&mut rng, 60);
        assert_eq!(prices.len(), 60);
    }

    #[test]
    fn path_is_seed_deterministic() {
        let a = generate_price_path(&mut Lcg::new(12345), 252);
        let b = generate_price_path(&mut Lcg::new(12345), 252);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_paths() {
        let a = generate_price_path(&mut Lcg::new(1), 252);
        let b = generate_price_path(&mut Lcg::new(2), 252);
        assert_ne!(a, b);
    }

    #[test]
    fn prices_never_below_floor() {
        for seed in 0..50u32 {
            let prices = generate_price_path(&mut Lcg::new(seed), 500);
            assert!(prices.iter().all(|&p| p >= PRICE_FLOOR));
        }
    }

    #[test]
    fn prices_stay_finite() {
        let prices = generate_price_path(&mut Lcg::new(u32::MAX), 2000);
        assert!(prices.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn empty_range_gives_empty_path() {
        let mut rng = Lcg::new(9);
        assert!(generate_price_path(&mut rng, 0).is_empty());
    }

    #[test]
    fn first_price_is_one_step_from_start() {
        // One day's log-return from 100.0 stays well inside (50, 200).
        let prices = generate_price_path(&mut Lcg::new(3), 1);
        assert!(prices[0] > 50.0 && prices[0] < 200.0);
    }
}

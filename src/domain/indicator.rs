//! Moving-average computation and the indicator parameter registry.
//!
//! The registry describes the parameter set of each indicator the canvas
//! can place: an ordered list of (name, type) pairs, with enumerated
//! choices where a parameter is a selection rather than a number. The
//! engine itself only consumes SMA; the rest describe graph nodes.

use std::fmt;

/// Simple moving average over a trailing window. Indices with fewer than
/// `period` closes behind them (inclusive) are `None`.
pub fn calc_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut values = Vec::with_capacity(prices.len());
    let mut window_sum = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        window_sum += price;
        if i >= period {
            window_sum -= prices[i - period];
        }
        if i + 1 >= period {
            values.push(Some(window_sum / period as f64));
        } else {
            values.push(None);
        }
    }

    values
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Float,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub param_type: ParamType,
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param_type {
            ParamType::Int => write!(f, "{}: int", self.name),
            ParamType::Float => write!(f, "{}: float", self.name),
            ParamType::Choice(choices) => write!(f, "{}: one of {}", self.name, choices.join("|")),
        }
    }
}

pub const WMA_WEIGHTS: &[&str] = &[
    "linear",
    "normalized linear",
    "harmonic",
    "triangular",
    "quadratic",
    "cubic",
    "root",
];

const PERIOD: ParamSpec = ParamSpec {
    name: "period",
    param_type: ParamType::Int,
};

/// Ordered parameter schema for a canvas indicator, `None` for unknown
/// names. Parameter names match the indicator backend's request bodies.
pub fn parameter_schema(indicator: &str) -> Option<&'static [ParamSpec]> {
    match indicator {
        "SMA" | "EMA" | "RSI" | "ATR" | "VWMA" => Some(&[PERIOD]),
        "MACD" => Some(&[
            ParamSpec {
                name: "fast",
                param_type: ParamType::Int,
            },
            ParamSpec {
                name: "slow",
                param_type: ParamType::Int,
            },
        ]),
        "BollingerBands" => Some(&[
            PERIOD,
            ParamSpec {
                name: "multiplier",
                param_type: ParamType::Float,
            },
        ]),
        "WMA" => Some(&[
            PERIOD,
            ParamSpec {
                name: "weights",
                param_type: ParamType::Choice(WMA_WEIGHTS),
            },
        ]),
        _ => None,
    }
}

/// Indicator names the canvas palette offers, in palette order.
pub const INDICATOR_NAMES: &[&str] = &[
    "SMA",
    "EMA",
    "WMA",
    "VWMA",
    "MACD",
    "RSI",
    "BollingerBands",
    "ATR",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup_is_none() {
        let values = calc_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert!(values[0].is_none());
        assert!(values[1].is_none());
        assert!(values[2].is_some());
        assert!(values[3].is_some());
        assert!(values[4].is_some());
    }

    #[test]
    fn sma_known_values() {
        let values = calc_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert!((values[2].unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((values[3].unwrap() - 30.0).abs() < f64::EPSILON);
        assert!((values[4].unwrap() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_one_echoes_prices() {
        let values = calc_sma(&[10.0, 20.0, 30.0], 1);
        assert!((values[0].unwrap() - 10.0).abs() < f64::EPSILON);
        assert!((values[1].unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((values[2].unwrap() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_equal_prices() {
        let values = calc_sma(&[100.0; 10], 5);
        assert!((values[9].unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sma_period_longer_than_series() {
        let values = calc_sma(&[10.0, 20.0], 5);
        assert!(values.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_period_zero() {
        let values = calc_sma(&[10.0, 20.0], 0);
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn sma_empty_prices() {
        assert!(calc_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_sliding_window_matches_direct_sum() {
        let prices: Vec<f64> = (1..=50).map(|i| (i as f64) * 1.5).collect();
        let values = calc_sma(&prices, 20);
        let direct: f64 = prices[10..30].iter().sum::<f64>() / 20.0;
        assert!((values[29].unwrap() - direct).abs() < 1e-9);
    }

    #[test]
    fn schema_period_indicators() {
        for name in ["SMA", "EMA", "RSI", "ATR", "VWMA"] {
            let schema = parameter_schema(name).unwrap();
            assert_eq!(schema.len(), 1);
            assert_eq!(schema[0].name, "period");
            assert_eq!(schema[0].param_type, ParamType::Int);
        }
    }

    #[test]
    fn schema_macd_has_fast_and_slow() {
        let schema = parameter_schema("MACD").unwrap();
        let names: Vec<&str> = schema.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["fast", "slow"]);
    }

    #[test]
    fn schema_bollinger_multiplier_is_float() {
        let schema = parameter_schema("BollingerBands").unwrap();
        assert_eq!(schema[1].name, "multiplier");
        assert_eq!(schema[1].param_type, ParamType::Float);
    }

    #[test]
    fn schema_wma_weight_choices() {
        let schema = parameter_schema("WMA").unwrap();
        assert_eq!(schema[0].name, "period");
        match schema[1].param_type {
            ParamType::Choice(choices) => {
                assert_eq!(choices.len(), 7);
                assert!(choices.contains(&"triangular"));
                assert!(choices.contains(&"normalized linear"));
            }
            _ => panic!("expected choice parameter"),
        }
    }

    #[test]
    fn schema_unknown_indicator_is_none() {
        assert!(parameter_schema("OBV").is_none());
        assert!(parameter_schema("").is_none());
    }

    #[test]
    fn every_palette_indicator_has_a_schema() {
        for name in INDICATOR_NAMES {
            assert!(parameter_schema(name).is_some(), "missing schema: {name}");
        }
    }

    #[test]
    fn param_spec_display() {
        assert_eq!(PERIOD.to_string(), "period: int");
        let weights = ParamSpec {
            name: "weights",
            param_type: ParamType::Choice(&["linear", "harmonic"]),
        };
        assert_eq!(weights.to_string(), "weights: one of linear|harmonic");
    }
}

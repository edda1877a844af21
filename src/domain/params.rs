//! Backtest parameter parsing and validation.
//!
//! All five fields arrive as raw strings (form inputs, config values, CLI
//! flags) and are checked fail-fast: the first failing field aborts the run
//! with a message naming that field.

use chrono::NaiveDate;

use crate::domain::error::QuantflowError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub position_size_pct: f64,
    pub commission: f64,
}

impl BacktestParams {
    /// Validate raw field values in order: capital, position size,
    /// commission, then dates. Stops at the first failure.
    pub fn from_raw(
        start_date: &str,
        end_date: &str,
        capital: &str,
        position_size: &str,
        commission: &str,
    ) -> Result<Self, QuantflowError> {
        let initial_capital = parse_numeric(capital, "capital")?;
        let position_size_pct = parse_numeric(position_size, "position size")?;
        let commission = parse_numeric(commission, "commission")?;

        let start = parse_date(start_date, "start date")?;
        let end = parse_date(end_date, "end date")?;

        if start > end {
            return Err(QuantflowError::invalid_input(
                "start date",
                "start date cannot be after end date",
            ));
        }
        if start == end {
            return Err(QuantflowError::invalid_input(
                "start date",
                "start date and end date cannot be the same",
            ));
        }

        if initial_capital <= 0.0 {
            return Err(QuantflowError::invalid_input(
                "capital",
                "must be positive",
            ));
        }
        if position_size_pct <= 0.0 || position_size_pct > 100.0 {
            return Err(QuantflowError::invalid_input(
                "position size",
                "must be greater than 0 and at most 100",
            ));
        }
        if commission < 0.0 {
            return Err(QuantflowError::invalid_input(
                "commission",
                "must be non-negative",
            ));
        }

        Ok(BacktestParams {
            start_date: start,
            end_date: end,
            initial_capital,
            position_size_pct,
            commission,
        })
    }

    /// Number of calendar days in the inclusive backtest range.
    pub fn span_days(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }
}

/// Optionally signed integer or decimal: `[+-]?digits[.digits]`.
fn is_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.is_empty() {
        return false;
    }
    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()),
    }
}

fn parse_numeric(value: &str, field: &str) -> Result<f64, QuantflowError> {
    let trimmed = value.trim();
    if !is_numeric(trimmed) {
        return Err(QuantflowError::invalid_input(field, "must be a number"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| QuantflowError::invalid_input(field, "must be a number"))
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, QuantflowError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        QuantflowError::invalid_input(field, "invalid date format, expected YYYY-MM-DD")
    })
}

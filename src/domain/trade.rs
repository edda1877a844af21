//! Trade lifecycle: opened on an entry signal, closed exactly once.
//!
//! Values stay full-precision while the simulation runs; the engine rounds
//! them in one pass when the result is assembled.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::metrics::{round2, round3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Long,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u32,
    pub side: TradeSide,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub size: i64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub fees: f64,
    pub pnl: Option<f64>,
    pub pnl_pct: Option<f64>,
}

impl Trade {
    pub fn open(id: u32, entry_date: NaiveDate, entry_price: f64, size: i64, entry_fee: f64) -> Self {
        Trade {
            id,
            side: TradeSide::Long,
            entry_date,
            entry_price,
            size,
            exit_date: None,
            exit_price: None,
            fees: entry_fee,
            pnl: None,
            pnl_pct: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }

    /// Close at `exit_price`, accumulating the exit fee and realizing P&L.
    /// `initial_capital` is the base for the percentage figure.
    pub fn close(
        &mut self,
        exit_date: NaiveDate,
        exit_price: f64,
        exit_fee: f64,
        initial_capital: f64,
    ) {
        self.fees += exit_fee;
        let pnl = (exit_price - self.entry_price) * self.size as f64 - self.fees;
        self.exit_date = Some(exit_date);
        self.exit_price = Some(exit_price);
        self.pnl = Some(pnl);
        self.pnl_pct = Some(pnl / initial_capital * 100.0);
    }

    /// Fixed-decimal rounding for the published result: 2 decimals for
    /// prices, fees, and P&L, 3 for the percentage.
    pub fn round_fields(&mut self) {
        self.entry_price = round2(self.entry_price);
        self.exit_price = self.exit_price.map(round2);
        self.fees = round2(self.fees);
        self.pnl = self.pnl.map(round2);
        self.pnl_pct = self.pnl_pct.map(round3);
    }
}

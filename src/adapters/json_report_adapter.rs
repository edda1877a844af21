//! JSON report writer for backtest results.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::QuantflowError;

pub fn to_json_string(result: &BacktestResult) -> Result<String, QuantflowError> {
    serde_json::to_string_pretty(result).map_err(|e| QuantflowError::Computation {
        reason: format!("result serialization failed: {e}"),
    })
}

pub fn write_report(result: &BacktestResult, path: &Path) -> Result<(), QuantflowError> {
    let json = to_json_string(result)?;
    fs::write(path, json)?;
    Ok(())
}

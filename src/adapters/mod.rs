//! Concrete adapter implementations.

pub mod file_config_adapter;
pub mod json_report_adapter;
pub mod strategy_export;

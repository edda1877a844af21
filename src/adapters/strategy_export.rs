//! Strategy snapshot codec.
//!
//! Encodes a graph (and optionally its backtest parameters) into the
//! portable document the rest of the toolchain consumes. Field names are
//! part of the contract: `nodes[].id/data/position`, `edges[].src/dest`,
//! and a `backtest` key that is `null` when no parameters are attached.
//! Encoding performs no graph validation, and there is no decode path:
//! snapshots are export-only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::domain::error::QuantflowError;
use crate::domain::graph::{ParamValue, StrategyGraph};
use crate::domain::params::{BacktestParams, DATE_FORMAT};

#[derive(Debug, Clone, Serialize)]
pub struct StrategyDocument {
    pub nodes: Vec<NodeDocument>,
    pub edges: Vec<EdgeDocument>,
    pub backtest: Option<BacktestDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDocument {
    pub id: String,
    pub data: NodeData,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub kind: String,
    pub label: String,
    pub parameters: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeDocument {
    pub src: String,
    pub dest: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestDocument {
    pub start_date: String,
    pub end_date: String,
    pub capital: f64,
    pub position_size: f64,
    pub commission: f64,
}

pub fn encode(graph: &StrategyGraph, params: Option<&BacktestParams>) -> StrategyDocument {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| NodeDocument {
            id: node.id.clone(),
            data: NodeData {
                kind: node.kind.to_string(),
                label: node.label.clone(),
                parameters: node
                    .parameters
                    .iter()
                    .map(|(name, value)| (name.clone(), param_to_json(value)))
                    .collect(),
            },
            position: Position {
                x: node.position.0,
                y: node.position.1,
            },
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| EdgeDocument {
            src: edge.source.clone(),
            dest: edge.target.clone(),
        })
        .collect();

    let backtest = params.map(|p| BacktestDocument {
        start_date: p.start_date.format(DATE_FORMAT).to_string(),
        end_date: p.end_date.format(DATE_FORMAT).to_string(),
        capital: p.initial_capital,
        position_size: p.position_size_pct,
        commission: p.commission,
    });

    StrategyDocument {
        nodes,
        edges,
        backtest,
    }
}

fn param_to_json(value: &ParamValue) -> serde_json::Value {
    match value {
        ParamValue::Text(s) => serde_json::Value::from(s.as_str()),
        ParamValue::Number(n) => serde_json::Value::from(*n),
    }
}

/// Write a snapshot into `dir` as `strategy_<uuid>.json` and return the
/// full path.
pub fn write_snapshot(
    dir: &Path,
    graph: &StrategyGraph,
    params: Option<&BacktestParams>,
) -> Result<PathBuf, QuantflowError> {
    let document = encode(graph, params);
    let json = serde_json::to_string_pretty(&document).map_err(|e| {
        QuantflowError::Computation {
            reason: format!("snapshot serialization failed: {e}"),
        }
    })?;

    let path = dir.join(format!("strategy_{}.json", Uuid::new_v4()));
    fs::write(&path, json)?;
    Ok(path)
}

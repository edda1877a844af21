//! Strategy graph model: nodes wired on the canvas, directed edges.
//!
//! The graph is an export artifact. The engine does not interpret it; the
//! built-in crossover rule below is the one strategy the engine runs, and
//! `crossover_graph` renders that rule in graph form for snapshots.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use crate::domain::backtest::{FAST_PERIOD, SLOW_PERIOD};
use crate::domain::error::QuantflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Indicator,
    Operator,
    Action,
    Control,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            NodeKind::Indicator => "indicator",
            NodeKind::Operator => "operator",
            NodeKind::Action => "action",
            NodeKind::Control => "control",
        };
        write!(f, "{kind}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Ordered map so snapshots of the same graph are byte-identical.
    pub parameters: BTreeMap<String, ParamValue>,
    pub position: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyGraph {
    pub nodes: Vec<StrategyNode>,
    pub edges: Vec<StrategyEdge>,
}

impl StrategyGraph {
    /// Every edge endpoint must name an existing node. Encoding does not
    /// run this; callers opt in before persisting a snapshot.
    pub fn check_integrity(&self) -> Result<(), QuantflowError> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        for (i, edge) in self.edges.iter().enumerate() {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(QuantflowError::GraphIntegrity {
                        edge_index: i,
                        node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn node(
    id: &str,
    kind: NodeKind,
    label: &str,
    parameters: BTreeMap<String, ParamValue>,
    position: (f64, f64),
) -> StrategyNode {
    StrategyNode {
        id: id.to_string(),
        kind,
        label: label.to_string(),
        parameters,
        position,
    }
}

fn edge(source: &str, target: &str) -> StrategyEdge {
    StrategyEdge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

/// The engine's fixed rule as a canvas graph: two SMA nodes compared by a
/// more-than operator that drives buy and sell actions.
pub fn crossover_graph() -> StrategyGraph {
    let sma_params = |period: usize| {
        BTreeMap::from([("period".to_string(), ParamValue::Number(period as f64))])
    };

    let nodes = vec![
        node("node_0", NodeKind::Control, "Start", BTreeMap::new(), (0.0, 120.0)),
        node("node_1", NodeKind::Indicator, "SMA", sma_params(FAST_PERIOD), (180.0, 40.0)),
        node("node_2", NodeKind::Indicator, "SMA", sma_params(SLOW_PERIOD), (180.0, 200.0)),
        node(
            "node_3",
            NodeKind::Operator,
            "More Than (>)",
            BTreeMap::new(),
            (380.0, 120.0),
        ),
        node("node_4", NodeKind::Action, "Buy", BTreeMap::new(), (560.0, 40.0)),
        node("node_5", NodeKind::Action, "Sell", BTreeMap::new(), (560.0, 200.0)),
        node("node_6", NodeKind::Control, "End", BTreeMap::new(), (740.0, 120.0)),
    ];

    let edges = vec![
        edge("node_0", "node_1"),
        edge("node_0", "node_2"),
        edge("node_1", "node_3"),
        edge("node_2", "node_3"),
        edge("node_3", "node_4"),
        edge("node_3", "node_5"),
        edge("node_4", "node_6"),
        edge("node_5", "node_6"),
    ];

    StrategyGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> StrategyGraph {
        StrategyGraph {
            nodes: vec![
                node("a", NodeKind::Indicator, "SMA", BTreeMap::new(), (0.0, 0.0)),
                node("b", NodeKind::Action, "Buy", BTreeMap::new(), (100.0, 0.0)),
            ],
            edges: vec![edge("a", "b")],
        }
    }

    #[test]
    fn node_kind_display_is_lowercase() {
        assert_eq!(NodeKind::Indicator.to_string(), "indicator");
        assert_eq!(NodeKind::Operator.to_string(), "operator");
        assert_eq!(NodeKind::Action.to_string(), "action");
        assert_eq!(NodeKind::Control.to_string(), "control");
    }

    #[test]
    fn integrity_passes_for_wellformed_graph() {
        assert!(two_node_graph().check_integrity().is_ok());
    }

    #[test]
    fn integrity_passes_for_empty_graph() {
        assert!(StrategyGraph::default().check_integrity().is_ok());
    }

    #[test]
    fn integrity_rejects_dangling_source() {
        let mut graph = two_node_graph();
        graph.edges.push(edge("ghost", "b"));
        let err = graph.check_integrity().unwrap_err();
        assert!(matches!(
            err,
            QuantflowError::GraphIntegrity { edge_index: 1, node_id } if node_id == "ghost"
        ));
    }

    #[test]
    fn integrity_rejects_dangling_target() {
        let mut graph = two_node_graph();
        graph.edges.push(edge("a", "nowhere"));
        assert!(graph.check_integrity().is_err());
    }

    #[test]
    fn duplicate_edges_are_allowed() {
        let mut graph = two_node_graph();
        graph.edges.push(edge("a", "b"));
        assert!(graph.check_integrity().is_ok());
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn crossover_graph_is_wellformed() {
        let graph = crossover_graph();
        assert!(graph.check_integrity().is_ok());
        assert_eq!(graph.nodes.len(), 7);
        assert_eq!(graph.edges.len(), 8);
    }

    #[test]
    fn crossover_graph_periods_match_engine() {
        let graph = crossover_graph();
        let periods: Vec<f64> = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Indicator)
            .filter_map(|n| match n.parameters.get("period") {
                Some(ParamValue::Number(p)) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(periods, vec![FAST_PERIOD as f64, SLOW_PERIOD as f64]);
    }

    #[test]
    fn crossover_graph_has_unique_ids() {
        let graph = crossover_graph();
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());
    }
}

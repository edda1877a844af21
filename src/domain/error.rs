//! Domain error types.

/// Top-level error type for quantflow.
#[derive(Debug, thiserror::Error)]
pub enum QuantflowError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("backtest computation failed: {reason}")]
    Computation { reason: String },

    #[error("edge {edge_index} references unknown node '{node_id}'")]
    GraphIntegrity { edge_index: usize, node_id: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantflowError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        QuantflowError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantflowError> for std::process::ExitCode {
    fn from(err: &QuantflowError) -> Self {
        let code: u8 = match err {
            QuantflowError::Io(_) => 1,
            QuantflowError::ConfigParse { .. } | QuantflowError::ConfigMissing { .. } => 2,
            QuantflowError::InvalidInput { .. } => 3,
            QuantflowError::GraphIntegrity { .. } => 4,
            QuantflowError::Computation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display_names_field() {
        let err = QuantflowError::invalid_input("capital", "must be a number");
        assert_eq!(err.to_string(), "invalid capital: must be a number");
    }

    #[test]
    fn graph_integrity_display() {
        let err = QuantflowError::GraphIntegrity {
            edge_index: 2,
            node_id: "node_7".into(),
        };
        assert_eq!(err.to_string(), "edge 2 references unknown node 'node_7'");
    }

    #[test]
    fn config_missing_display() {
        let err = QuantflowError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        };
        assert_eq!(err.to_string(), "missing config key [backtest] start_date");
    }
}

//! Operator-facing failure reports.

use std::fmt;

use serde_json::Value;

use crate::pipeline::PipelineError;

/// Structured failure report written to the error stream.
///
/// The report is a tagged variant so each shape can be constructed and
/// asserted on explicitly: either the remote node's error payload surfaced
/// verbatim, or a single generic message field.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReport {
    /// Structured payload returned by the remote node, surfaced verbatim.
    Remote {
        /// Error payload as returned by the node.
        payload: Value,
    },
    /// Local failure described by one message.
    General {
        /// Human-readable description.
        message: String,
    },
}

impl FailureReport {
    /// Builds a general report from a message.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Builds the report for a pipeline failure, preferring the remote
    /// node's structured payload when one was returned.
    #[must_use]
    pub fn from_pipeline_error(error: &PipelineError) -> Self {
        match error.remote_payload() {
            Some(payload) => Self::Remote {
                payload: payload.clone(),
            },
            None => Self::General {
                message: error.to_string(),
            },
        }
    }

    /// Returns the report as one JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Remote { payload } => payload.clone(),
            Self::General { message } => serde_json::json!({ "message": message }),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_report_has_a_single_message_field() {
        let report = FailureReport::general("actions.json file not found");
        assert_eq!(
            report.to_json(),
            serde_json::json!({"message": "actions.json file not found"})
        );
    }

    #[test]
    fn remote_report_is_the_payload_verbatim() {
        let payload = serde_json::json!({
            "code": -32002,
            "message": "Transaction simulation failed",
            "data": {"err": "BlockhashNotFound"},
        });
        let report = FailureReport::Remote {
            payload: payload.clone(),
        };
        assert_eq!(report.to_json(), payload);
    }

    #[test]
    fn display_renders_one_json_object() {
        let report = FailureReport::general("boom");
        let rendered = report.to_string();
        assert_eq!(rendered, r#"{"message":"boom"}"#);
        let parsed: Result<Value, _> = serde_json::from_str(&rendered);
        assert!(parsed.is_ok());
    }
}

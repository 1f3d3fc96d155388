//! Transaction outcomes.

use crate::error::TxnFailure;

/// The result of one transaction run.
///
/// No partial or intermediate states are modeled: the driver's transaction
/// primitive is atomic and opaque, so a run either commits with the body's
/// return value or fails with a classified failure.
#[derive(Debug)]
pub enum TxnOutcome {
    /// The transaction committed; carries the body's return value.
    Committed(String),
    /// The transaction raised a runtime failure.
    Failed(TxnFailure),
}

impl TxnOutcome {
    /// True when the transaction committed and returned exactly `expected`.
    pub fn committed_with(&self, expected: &str) -> bool {
        matches!(self, TxnOutcome::Committed(value) if value == expected)
    }

    /// True when the failure classified as transactions being unsupported
    /// on the target topology.
    pub fn failed_unsupported(&self) -> bool {
        matches!(
            self,
            TxnOutcome::Failed(TxnFailure::TopologyUnsupported { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_with_requires_exact_value() {
        let outcome = TxnOutcome::Committed("done".to_string());
        assert!(outcome.committed_with("done"));
        assert!(!outcome.committed_with("done "));
        assert!(!outcome.failed_unsupported());
    }

    #[test]
    fn unsupported_failure_is_recognized() {
        let outcome = TxnOutcome::Failed(TxnFailure::TopologyUnsupported {
            code: Some(20),
            server_message: "no transaction numbers here".to_string(),
        });
        assert!(outcome.failed_unsupported());
        assert!(!outcome.committed_with("done"));
    }
}

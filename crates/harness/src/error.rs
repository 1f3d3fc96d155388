//! Error types for transaction execution.
//!
//! Two families: [`TxnError`] for failures outside the transaction boundary
//! (client setup, seed writes, session start), and [`TxnFailure`] for
//! runtime failures raised by the transaction itself. Failures are
//! classified by structured error kind, not by message equality, so the
//! classification survives driver rewording.

// Variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use mongodb::error::{CommandError, Error as DriverError, ErrorKind};
use thiserror::Error;

/// Server error code for operations the deployment cannot perform.
/// Standalone servers reject transaction-numbered operations with it.
const ILLEGAL_OPERATION: i32 = 20;

/// Diagnostic older servers attach when rejecting transaction numbers,
/// kept as a fallback for replies that carry no usable code.
const NO_TXN_NUMBERS: &str =
    "Transaction numbers are only allowed on a replica set member or mongos";

/// Errors raised before the transaction boundary is reached.
#[derive(Error, Debug)]
pub enum TxnError {
    /// The client could not be opened from the descriptor URL.
    #[error("failed to open client for {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: DriverError,
    },

    /// A baseline seed write failed.
    #[error("seed write into {namespace} failed: {source}")]
    Seed {
        namespace: String,
        #[source]
        source: DriverError,
    },

    /// The session could not be started.
    #[error("failed to start session: {0}")]
    Session(#[source] DriverError),
}

/// A runtime failure raised while executing the transaction body or commit.
#[derive(Error, Debug)]
pub enum TxnFailure {
    /// The deployment does not support multi-document transactions. This is
    /// the expected failure shape on standalone targets.
    #[error("multi-document transactions are not supported on this deployment topology")]
    TopologyUnsupported {
        code: Option<i32>,
        server_message: String,
    },

    /// Any other failure; the transaction was aborted.
    #[error("transaction aborted: {0}")]
    Aborted(#[source] DriverError),
}

/// Classifies a driver error raised by the transaction.
pub(crate) fn classify(err: DriverError) -> TxnFailure {
    let (code, message) = match err.kind.as_ref() {
        ErrorKind::Command(CommandError { code, message, .. }) => (Some(*code), message.clone()),
        _ => (None, err.to_string()),
    };

    if unsupported_topology(code, &message) {
        TxnFailure::TopologyUnsupported {
            code,
            server_message: message,
        }
    } else {
        TxnFailure::Aborted(err)
    }
}

fn unsupported_topology(code: Option<i32>, message: &str) -> bool {
    code == Some(ILLEGAL_OPERATION) || message.contains(NO_TXN_NUMBERS)
}

//! Cross-database MongoDB transaction harness.
//!
//! This crate exercises the transactional write path of a MongoDB
//! deployment: it seeds two collections in two separate databases with
//! majority-acknowledged baseline writes, then inserts one document into
//! each collection inside a single session-bound transaction configured
//! with primary-only routing, local read concern, and majority write
//! concern.
//!
//! The run produces a [`TxnOutcome`]: either the transaction committed and
//! returned the intent's success value, or it failed and the failure was
//! classified by structured error kind. A failure classifying as
//! [`TxnFailure::TopologyUnsupported`] is the expected shape on standalone
//! deployments, which do not support multi-document transactions.
//!
//! # Quick Start
//!
//! ```no_run
//! use mongotx_harness::{SUCCESS_VALUE, TransactionIntent, run_transaction};
//! use mongotx_topology::{ReplicaSetConfig, ReplicaSetFixture};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let deployment = ReplicaSetFixture::provision(&ReplicaSetConfig::default()).await?;
//! let outcome =
//!     run_transaction(deployment.descriptor(), &TransactionIntent::cross_database()).await?;
//! assert!(outcome.committed_with(SUCCESS_VALUE));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod exec;
pub mod intent;
pub mod outcome;

// Re-export commonly used types at crate root
pub use error::{TxnError, TxnFailure};
pub use exec::run_transaction;
pub use intent::{ConsistencyConfig, SUCCESS_VALUE, TransactionIntent, WriteTarget};
pub use outcome::TxnOutcome;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Deployment provisioning for MongoDB transaction tests.
//!
//! This crate brings up real MongoDB deployments in Docker and yields
//! connection descriptors for them. Two topologies are supported:
//!
//! - a **replica set** (three `mongod` members by default on a dedicated
//!   network, initiated via `replSetInitiate` and waited on until the set
//!   reports a primary), and
//! - a **standalone** node (a single `mongod` with no replication, which is
//!   not expected to support multi-document transactions).
//!
//! Provisioning failures are fatal and surface as [`ProvisionError`]; the
//! readiness waits are bounded rather than open-ended, and expiry is an
//! error, never a silent retry loop.
//!
//! # Quick Start
//!
//! ```no_run
//! use mongotx_topology::{ReplicaSetConfig, ReplicaSetFixture};
//!
//! # async fn example() -> Result<(), mongotx_topology::ProvisionError> {
//! let deployment = ReplicaSetFixture::provision(&ReplicaSetConfig::default()).await?;
//! println!("{}", deployment.descriptor().url());
//! # Ok(())
//! # }
//! ```
//!
//! A fixture owns its containers; dropping it at the end of the test suite
//! tears the deployment down.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod provision;
pub mod target;

// Re-export commonly used types at crate root
pub use config::{ReplicaSetConfig, StandaloneConfig};
pub use descriptor::ConnectionDescriptor;
pub use error::ProvisionError;
pub use provision::{ReplicaSetFixture, StandaloneFixture};
pub use target::{DeploymentTarget, NodeAddress};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

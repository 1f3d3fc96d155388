//! Error types for environment provisioning.
//!
//! Provisioning errors are fatal to the test run: they are propagated, not
//! retried. The only retrying that happens during provisioning is the
//! bounded readiness polling, and its expiry is itself an error here.

// Variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::time::Duration;

use thiserror::Error;

/// Errors raised while provisioning a deployment.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The configuration cannot describe a runnable deployment.
    #[error("invalid provisioning config: {message}")]
    InvalidConfig { message: String },

    /// A container failed to start.
    #[error("failed to start container '{name}': {source}")]
    ContainerStart {
        name: String,
        #[source]
        source: testcontainers::TestcontainersError,
    },

    /// The host port mapping of a started container could not be resolved.
    #[error("no host port mapping for container '{name}': {source}")]
    PortMapping {
        name: String,
        #[source]
        source: testcontainers::TestcontainersError,
    },

    /// A client for a provisioning command could not be constructed.
    #[error("failed to build client for {address}: {source}")]
    Client {
        address: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// A node did not become reachable before the deadline.
    #[error("node {address} not reachable within {timeout:?}")]
    Unreachable { address: String, timeout: Duration },

    /// The `replSetInitiate` command failed.
    #[error("replica set initiation failed: {0}")]
    Initiate(#[source] mongodb::error::Error),

    /// No primary was elected before the deadline.
    #[error("replica set '{set_name}' reported no primary within {timeout:?}")]
    PrimaryTimeout { set_name: String, timeout: Duration },
}

//! Deployment targets.
//!
//! A deployment target identifies the topology a test run executes against:
//! either a replica set (member addresses plus a set name) or a single
//! standalone node. Exactly one target is active per fixture, for the whole
//! lifetime of that fixture.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::ConnectionDescriptor;

/// A reachable `host:port` pair for one database node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl NodeAddress {
    /// Creates an address from a host and a port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The topology a test run executes against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentTarget {
    /// A replica set: one elected primary plus secondaries holding copies of
    /// the same data.
    ReplicaSet {
        /// Replica set identifier (the `replicaSet` URL parameter).
        set_name: String,
        /// Member addresses as reachable from the test process.
        nodes: Vec<NodeAddress>,
    },
    /// A single node with no replication. Standalone deployments are not
    /// expected to support multi-document transactions.
    Standalone {
        /// The node address.
        node: NodeAddress,
    },
}

impl DeploymentTarget {
    /// Derives the connection descriptor for this target and the given
    /// default database.
    pub fn descriptor(&self, database: &str) -> ConnectionDescriptor {
        match self {
            DeploymentTarget::ReplicaSet { set_name, nodes } => {
                ConnectionDescriptor::replica_set(nodes.clone(), database, set_name)
            }
            DeploymentTarget::Standalone { node } => {
                ConnectionDescriptor::standalone(node.clone(), database)
            }
        }
    }

    /// Returns true for replica-set targets.
    pub fn is_replica_set(&self) -> bool {
        matches!(self, DeploymentTarget::ReplicaSet { .. })
    }
}

//! Connection descriptors.
//!
//! A connection descriptor encodes the host(s), default database, and (for
//! replica sets) the set name of a deployment, and renders them as a MongoDB
//! connection URL. The URL formats are fixed for driver interoperability:
//!
//! - replica set: `mongodb://<h1>:<p1>,<h2>:<p2>,<h3>:<p3>/<db>?replicaSet=<name>`
//! - standalone: `mongodb://<host>:<port>/<db>`

use serde::{Deserialize, Serialize};

use crate::target::NodeAddress;

/// A MongoDB connection URL in structured form.
///
/// Descriptors are derived deterministically from a
/// [`DeploymentTarget`](crate::target::DeploymentTarget); see
/// [`DeploymentTarget::descriptor`](crate::target::DeploymentTarget::descriptor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    hosts: Vec<NodeAddress>,
    database: String,
    replica_set: Option<String>,
}

impl ConnectionDescriptor {
    /// Descriptor for a replica set.
    pub fn replica_set(hosts: Vec<NodeAddress>, database: &str, set_name: &str) -> Self {
        Self {
            hosts,
            database: database.to_string(),
            replica_set: Some(set_name.to_string()),
        }
    }

    /// Descriptor for a standalone node.
    pub fn standalone(node: NodeAddress, database: &str) -> Self {
        Self {
            hosts: vec![node],
            database: database.to_string(),
            replica_set: None,
        }
    }

    /// The default database named in the URL path.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The replica set name, if this descriptor addresses a replica set.
    pub fn replica_set_name(&self) -> Option<&str> {
        self.replica_set.as_deref()
    }

    /// The node addresses.
    pub fn hosts(&self) -> &[NodeAddress] {
        &self.hosts
    }

    /// Renders the connection URL.
    ///
    /// Hosts are joined with commas; the `replicaSet` query parameter is
    /// present only for replica-set descriptors.
    pub fn url(&self) -> String {
        let hosts = self
            .hosts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        match &self.replica_set {
            Some(name) => format!("mongodb://{}/{}?replicaSet={}", hosts, self.database, name),
            None => format!("mongodb://{}/{}", hosts, self.database),
        }
    }
}

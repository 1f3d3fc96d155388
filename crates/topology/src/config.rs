//! Provisioning configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a replica-set deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
    /// Container image name.
    #[serde(default = "default_image")]
    pub image: String,

    /// Container image tag.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Replica set identifier.
    #[serde(default = "default_set_name")]
    pub set_name: String,

    /// Number of members. Must be at least 1.
    #[serde(default = "default_members")]
    pub members: u16,

    /// Default database named in the connection URL.
    #[serde(default = "default_database")]
    pub database: String,

    /// Per-container startup timeout in seconds.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// Bound on the post-start readiness waits (TCP reachability and
    /// primary election) in seconds.
    #[serde(default = "default_replica_readiness_secs")]
    pub readiness_timeout_secs: u64,
}

impl Default for ReplicaSetConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            tag: default_tag(),
            set_name: default_set_name(),
            members: default_members(),
            database: default_database(),
            startup_timeout_secs: default_startup_timeout_secs(),
            readiness_timeout_secs: default_replica_readiness_secs(),
        }
    }
}

/// Configuration for a standalone deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandaloneConfig {
    /// Container image name.
    #[serde(default = "default_image")]
    pub image: String,

    /// Container image tag.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Default database named in the connection URL.
    #[serde(default = "default_database")]
    pub database: String,

    /// Container startup timeout in seconds.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// Bound on the post-start readiness waits in seconds.
    #[serde(default = "default_standalone_readiness_secs")]
    pub readiness_timeout_secs: u64,
}

impl Default for StandaloneConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            tag: default_tag(),
            database: default_database(),
            startup_timeout_secs: default_startup_timeout_secs(),
            readiness_timeout_secs: default_standalone_readiness_secs(),
        }
    }
}

fn default_image() -> String {
    "mongo".to_string()
}

fn default_tag() -> String {
    "4.0.8".to_string()
}

fn default_set_name() -> String {
    "rs0".to_string()
}

fn default_members() -> u16 {
    3
}

fn default_database() -> String {
    "test".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    240
}

fn default_replica_readiness_secs() -> u64 {
    120
}

fn default_standalone_readiness_secs() -> u64 {
    60
}

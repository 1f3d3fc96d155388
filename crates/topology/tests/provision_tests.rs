//! Deployment provisioning integration tests.
//!
//! These tests start real MongoDB containers via testcontainers and require
//! Docker.
//!
//! Run with: `cargo test -p mongotx-topology --features container-tests`
//!
//! Without the feature, the default build compiles none of this file.

#![cfg(feature = "container-tests")]

use mongodb::bson::doc;
use mongotx_topology::{
    DeploymentTarget, ReplicaSetConfig, ReplicaSetFixture, StandaloneConfig, StandaloneFixture,
};
use tokio::sync::OnceCell;

/// Shared replica set reused across all tests in this binary.
static SHARED_REPLICA_SET: OnceCell<ReplicaSetFixture> = OnceCell::const_new();

async fn shared_replica_set() -> &'static ReplicaSetFixture {
    SHARED_REPLICA_SET
        .get_or_init(|| async {
            ReplicaSetFixture::provision(&ReplicaSetConfig::default())
                .await
                .expect("Failed to provision replica set")
        })
        .await
}

// ============================================================================
// Replica set
// ============================================================================

#[tokio::test]
async fn replica_set_descriptor_lists_every_member() {
    let fixture = shared_replica_set().await;
    let url = fixture.descriptor().url();

    match fixture.target() {
        DeploymentTarget::ReplicaSet { set_name, nodes } => {
            assert_eq!(nodes.len(), 3);
            assert!(url.ends_with(&format!("/test?replicaSet={set_name}")));
            assert_eq!(url.matches(',').count(), 2);
        }
        other => panic!("expected a replica set target, got {other:?}"),
    }
}

#[tokio::test]
async fn replica_set_first_member_becomes_primary() {
    let fixture = shared_replica_set().await;
    let DeploymentTarget::ReplicaSet { nodes, .. } = fixture.target() else {
        panic!("expected a replica set target");
    };

    let url = format!("mongodb://{}/?directConnection=true", nodes[0]);
    let client = mongodb::Client::with_uri_str(&url)
        .await
        .expect("Failed to open direct client");
    let reply = client
        .database("admin")
        .run_command(doc! { "isMaster": 1 })
        .await
        .expect("Failed to run isMaster");

    assert!(reply.get_bool("ismaster").unwrap_or(false));
}

#[tokio::test]
async fn replica_set_rejects_zero_members() {
    let config = ReplicaSetConfig {
        members: 0,
        ..Default::default()
    };

    let result = ReplicaSetFixture::provision(&config).await;
    assert!(result.is_err());
}

// ============================================================================
// Standalone
// ============================================================================

#[tokio::test]
async fn standalone_node_answers_ping() {
    let fixture = StandaloneFixture::provision(&StandaloneConfig::default())
        .await
        .expect("Failed to provision standalone node");

    let url = fixture.descriptor().url();
    assert!(!url.contains("replicaSet"));
    assert!(!fixture.target().is_replica_set());

    let client = mongodb::Client::with_uri_str(&url)
        .await
        .expect("Failed to open client");
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .expect("Failed to ping standalone node");
}

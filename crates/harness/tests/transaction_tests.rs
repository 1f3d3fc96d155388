//! MongoDB transaction integration tests.
//!
//! These tests provision real MongoDB deployments in Docker via
//! testcontainers and exercise the transactional write path against each
//! topology: a 3-node replica set, where the transaction is expected to
//! commit, and a standalone node, where the transaction either commits or
//! fails in a way that classifies as transactions being unsupported.
//!
//! Run with: `cargo test -p mongotx-harness --features container-tests`
//!
//! Without the feature, the default build compiles none of this file.

#![cfg(feature = "container-tests")]

use mongodb::Client;
use mongodb::bson::{Document, doc};
use mongotx_harness::{SUCCESS_VALUE, TransactionIntent, TxnFailure, TxnOutcome, run_transaction};
use mongotx_topology::{
    ReplicaSetConfig, ReplicaSetFixture, StandaloneConfig, StandaloneFixture,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared replica set reused across all tests in this binary.
static SHARED_REPLICA_SET: OnceCell<ReplicaSetFixture> = OnceCell::const_new();

/// Shared standalone node reused across all tests in this binary.
static SHARED_STANDALONE: OnceCell<StandaloneFixture> = OnceCell::const_new();

async fn shared_replica_set() -> &'static ReplicaSetFixture {
    SHARED_REPLICA_SET
        .get_or_init(|| async {
            ReplicaSetFixture::provision(&ReplicaSetConfig::default())
                .await
                .expect("Failed to provision replica set")
        })
        .await
}

async fn shared_standalone() -> &'static StandaloneFixture {
    SHARED_STANDALONE
        .get_or_init(|| async {
            StandaloneFixture::provision(&StandaloneConfig::default())
                .await
                .expect("Failed to provision standalone node")
        })
        .await
}

/// Unique database pair so tests running concurrently against the shared
/// deployment never observe each other's documents.
fn unique_databases(label: &str) -> (String, String) {
    let suffix = Uuid::new_v4().simple().to_string()[..10].to_string();
    (format!("{label}1_{suffix}"), format!("{label}2_{suffix}"))
}

async fn count(client: &Client, database: &str, collection: &str) -> u64 {
    client
        .database(database)
        .collection::<Document>(collection)
        .count_documents(doc! {})
        .await
        .expect("Failed to count documents")
}

// ============================================================================
// Replica set
// ============================================================================

#[tokio::test]
async fn replica_set_commits_cross_database_transaction() {
    let deployment = shared_replica_set().await;

    let outcome = run_transaction(deployment.descriptor(), &TransactionIntent::cross_database())
        .await
        .expect("Failed to reach the transaction boundary");

    match outcome {
        TxnOutcome::Committed(value) => assert_eq!(value, SUCCESS_VALUE),
        TxnOutcome::Failed(failure) => {
            panic!("transaction failed on a replica set: {failure}")
        }
    }
}

#[tokio::test]
async fn replica_set_inserts_are_visible_after_commit() {
    let deployment = shared_replica_set().await;
    let (db1, db2) = unique_databases("visible");
    let intent = TransactionIntent::cross_database_between(&db1, &db2);

    let outcome = run_transaction(deployment.descriptor(), &intent)
        .await
        .expect("Failed to reach the transaction boundary");
    assert!(
        outcome.committed_with(SUCCESS_VALUE),
        "unexpected outcome: {outcome:?}"
    );

    let client = Client::with_uri_str(&deployment.descriptor().url())
        .await
        .expect("Failed to open verification client");

    // One seed document plus one transactional document per collection.
    assert_eq!(count(&client, &db1, "foo").await, 2);
    assert_eq!(count(&client, &db2, "bar").await, 2);
}

#[tokio::test]
async fn replica_set_rerun_appends_documents() {
    let deployment = shared_replica_set().await;
    let (db1, db2) = unique_databases("rerun");
    let intent = TransactionIntent::cross_database_between(&db1, &db2);

    for _ in 0..2 {
        let outcome = run_transaction(deployment.descriptor(), &intent)
            .await
            .expect("Failed to reach the transaction boundary");
        assert!(
            outcome.committed_with(SUCCESS_VALUE),
            "unexpected outcome: {outcome:?}"
        );
    }

    let client = Client::with_uri_str(&deployment.descriptor().url())
        .await
        .expect("Failed to open verification client");

    // Two seeds and two transactional inserts per collection: re-running an
    // intent appends, there is no exactly-once claim.
    assert_eq!(count(&client, &db1, "foo").await, 4);
    assert_eq!(count(&client, &db2, "bar").await, 4);
}

// ============================================================================
// Standalone
// ============================================================================

#[tokio::test]
async fn standalone_commits_or_reports_unsupported_topology() {
    let deployment = shared_standalone().await;

    let outcome = run_transaction(deployment.descriptor(), &TransactionIntent::cross_database())
        .await
        .expect("Failed to reach the transaction boundary");

    // Standalone deployments are not expected to support multi-document
    // transactions; a commit (should a server permit one) and a failure
    // classified as unsupported are both acceptable. Anything else fails.
    match outcome {
        TxnOutcome::Committed(value) => assert_eq!(value, SUCCESS_VALUE),
        TxnOutcome::Failed(TxnFailure::TopologyUnsupported { .. }) => {}
        TxnOutcome::Failed(failure) => {
            panic!("standalone failure did not classify as unsupported: {failure}")
        }
    }
}

#[tokio::test]
async fn standalone_seed_writes_succeed_outside_transactions() {
    let deployment = shared_standalone().await;
    let (db1, db2) = unique_databases("seed");
    let intent = TransactionIntent::cross_database_between(&db1, &db2);

    run_transaction(deployment.descriptor(), &intent)
        .await
        .expect("Failed to reach the transaction boundary");

    let client = Client::with_uri_str(&deployment.descriptor().url())
        .await
        .expect("Failed to open verification client");

    // Whatever the transaction outcome, the untransacted seed writes must
    // have landed.
    assert!(count(&client, &db1, "foo").await >= 1);
    assert!(count(&client, &db2, "bar").await >= 1);
}

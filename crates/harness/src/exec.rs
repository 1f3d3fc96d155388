//! Transaction execution.
//!
//! [`run_transaction`] exercises the transactional write path once against
//! a deployment: connect, seed both collections outside the transaction,
//! then insert into both inside one session-bound transaction. A run moves
//! through connected, seeded, and in-transaction states to either committed
//! or failed; the session and client are released on every exit path.

use futures::FutureExt;
use mongodb::bson::Document;
use mongodb::options::{CollectionOptions, SelectionCriteria};
use mongodb::{Client, Collection};
use mongotx_topology::ConnectionDescriptor;

use crate::error::{self, TxnError};
use crate::intent::{TransactionIntent, WriteTarget};
use crate::outcome::TxnOutcome;

/// Runs `intent` against the deployment behind `descriptor`.
///
/// Returns `Ok(TxnOutcome)` whenever the transaction boundary was reached:
/// a committed run carries the body's return value, a failed run carries
/// the classified failure. Errors before that boundary (client setup, seed
/// writes, session start) surface as `Err(TxnError)`. The client is shut
/// down unconditionally before returning.
pub async fn run_transaction(
    descriptor: &ConnectionDescriptor,
    intent: &TransactionIntent,
) -> Result<TxnOutcome, TxnError> {
    let url = descriptor.url();
    tracing::debug!("url: {}", url);

    let client = Client::with_uri_str(&url)
        .await
        .map_err(|source| TxnError::Connect {
            url: url.clone(),
            source,
        })?;

    let result = seed_and_execute(&client, intent).await;
    client.shutdown().await;
    result
}

async fn seed_and_execute(
    client: &Client,
    intent: &TransactionIntent,
) -> Result<TxnOutcome, TxnError> {
    seed(client, &intent.first, intent).await?;
    seed(client, &intent.second, intent).await?;

    let mut session = client.start_session().await.map_err(TxnError::Session)?;

    // The context is cloned state only; the driver may re-invoke the body
    // on transient transaction errors.
    let ctx = (
        collection(client, &intent.first),
        collection(client, &intent.second),
        intent.first.document.clone(),
        intent.second.document.clone(),
        intent.success_value.clone(),
    );

    let consistency = &intent.consistency;
    let run = session
        .start_transaction()
        .read_concern(consistency.read_concern.clone())
        .write_concern(consistency.write_concern.clone())
        .selection_criteria(SelectionCriteria::ReadPreference(
            consistency.read_preference.clone(),
        ))
        .and_run(ctx, |session, ctx| {
            async move {
                ctx.0.insert_one(ctx.2.clone()).session(&mut *session).await?;
                ctx.1.insert_one(ctx.3.clone()).session(&mut *session).await?;
                Ok(ctx.4.clone())
            }
            .boxed()
        })
        .await;

    let outcome = match run {
        Ok(value) => {
            tracing::debug!("transaction committed with '{}'", value);
            TxnOutcome::Committed(value)
        }
        Err(err) => {
            let failure = error::classify(err);
            tracing::debug!("transaction failed: {}", failure);
            TxnOutcome::Failed(failure)
        }
    };

    Ok(outcome)
}

/// Collection handle used inside the transaction; the write concern there
/// comes from the transaction options, not the handle.
fn collection(client: &Client, target: &WriteTarget) -> Collection<Document> {
    client
        .database(&target.database)
        .collection(&target.collection)
}

/// Performs one untransacted baseline insert under the seed write concern.
async fn seed(
    client: &Client,
    target: &WriteTarget,
    intent: &TransactionIntent,
) -> Result<(), TxnError> {
    let options = CollectionOptions::builder()
        .write_concern(intent.consistency.seed_write_concern.clone())
        .build();
    let coll: Collection<Document> = client
        .database(&target.database)
        .collection_with_options(&target.collection, options);

    coll.insert_one(target.seed.clone())
        .await
        .map_err(|source| TxnError::Seed {
            namespace: target.namespace(),
            source,
        })?;

    Ok(())
}

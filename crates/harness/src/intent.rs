//! Transaction intents.
//!
//! An intent captures the pair of writes a transaction performs, the
//! consistency configuration to run it under, and the value a successful
//! run returns. Intents are constructed fresh per test case and carry no
//! connection state.

use mongodb::bson::{Document, doc};
use mongodb::options::{ReadConcern, ReadPreference, WriteConcern};

/// Value returned by a successfully committed canonical intent.
pub const SUCCESS_VALUE: &str = "Inserted into collections in different databases";

/// One of the two writes in a transaction intent.
#[derive(Debug, Clone)]
pub struct WriteTarget {
    /// Target database.
    pub database: String,
    /// Target collection.
    pub collection: String,
    /// Baseline document inserted outside the transaction.
    pub seed: Document,
    /// Document inserted inside the transaction.
    pub document: Document,
}

impl WriteTarget {
    /// Returns the `database.collection` namespace string.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

/// Consistency configuration for one transaction run.
#[derive(Debug, Clone)]
pub struct ConsistencyConfig {
    /// Read routing for the transaction.
    pub read_preference: ReadPreference,
    /// Read consistency for the transaction.
    pub read_concern: ReadConcern,
    /// Write durability for the transaction commit.
    pub write_concern: WriteConcern,
    /// Write durability for the untransacted seed writes, applied
    /// independently of the transaction's own write concern.
    pub seed_write_concern: WriteConcern,
}

impl Default for ConsistencyConfig {
    /// Primary-only routing, local reads, majority writes for both the
    /// transaction and the seed writes.
    fn default() -> Self {
        Self {
            read_preference: ReadPreference::Primary,
            read_concern: ReadConcern::local(),
            write_concern: WriteConcern::majority(),
            seed_write_concern: WriteConcern::majority(),
        }
    }
}

/// The pair of writes to perform, their consistency configuration, and the
/// expected success value.
#[derive(Debug, Clone)]
pub struct TransactionIntent {
    /// First write.
    pub first: WriteTarget,
    /// Second write.
    pub second: WriteTarget,
    /// Consistency configuration.
    pub consistency: ConsistencyConfig,
    /// Value the transaction body returns on success.
    pub success_value: String,
}

impl TransactionIntent {
    /// The canonical cross-database intent: `{abc: 1}` into `mydb1.foo` and
    /// `{xyz: 999}` into `mydb2.bar`, seeded with `{abc: 0}` and `{xyz: 0}`.
    pub fn cross_database() -> Self {
        Self::cross_database_between("mydb1", "mydb2")
    }

    /// The canonical intent against caller-chosen databases, so tests
    /// running concurrently against one deployment can isolate their state.
    pub fn cross_database_between(first_db: &str, second_db: &str) -> Self {
        Self {
            first: WriteTarget {
                database: first_db.to_string(),
                collection: "foo".to_string(),
                seed: doc! { "abc": 0 },
                document: doc! { "abc": 1 },
            },
            second: WriteTarget {
                database: second_db.to_string(),
                collection: "bar".to_string(),
                seed: doc! { "xyz": 0 },
                document: doc! { "xyz": 999 },
            },
            consistency: ConsistencyConfig::default(),
            success_value: SUCCESS_VALUE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_consistency_targets_primary_with_majority_writes() {
        let config = ConsistencyConfig::default();
        assert!(matches!(config.read_preference, ReadPreference::Primary));
        assert_eq!(config.read_concern, ReadConcern::local());
        assert_eq!(config.write_concern, WriteConcern::majority());
        assert_eq!(config.seed_write_concern, WriteConcern::majority());
    }

    #[test]
    fn canonical_intent_spans_two_databases() {
        let intent = TransactionIntent::cross_database();
        assert_eq!(intent.first.namespace(), "mydb1.foo");
        assert_eq!(intent.second.namespace(), "mydb2.bar");
        assert_ne!(intent.first.database, intent.second.database);
        assert_eq!(intent.success_value, SUCCESS_VALUE);
    }

    #[test]
    fn canonical_intent_documents() {
        let intent = TransactionIntent::cross_database();
        assert_eq!(intent.first.seed, doc! { "abc": 0 });
        assert_eq!(intent.first.document, doc! { "abc": 1 });
        assert_eq!(intent.second.seed, doc! { "xyz": 0 });
        assert_eq!(intent.second.document, doc! { "xyz": 999 });
    }

    #[test]
    fn intent_between_uses_given_databases() {
        let intent = TransactionIntent::cross_database_between("left", "right");
        assert_eq!(intent.first.namespace(), "left.foo");
        assert_eq!(intent.second.namespace(), "right.bar");
    }
}

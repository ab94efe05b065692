//! Address-to-name enrichment — optional display-layer lookup applied
//! uniformly to snapshot and live records.
//!
//! Enrichment never touches the feed itself: sort and dedup keys stay
//! `timestamp_us`, and the record's `actor` field keeps the raw address.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use counterfeed_core::error::RelayError;
use counterfeed_core::types::CounterRecord;

/// Trait for resolving an address to a primary display name (e.g. an ANS
/// name). A `None` result means the address has no registered name.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn primary_name(&self, address: &str) -> Result<Option<String>, RelayError>;
}

/// Address → display-name table built once per snapshot/session.
#[derive(Debug, Default)]
pub struct NameDirectory {
    names: HashMap<String, String>,
}

impl NameDirectory {
    /// Resolve names for every unique actor in `records`. Resolver
    /// failures for individual addresses leave them unresolved; lookup
    /// then falls back to the raw address.
    pub async fn resolve(
        resolver: &dyn NameResolver,
        records: &[CounterRecord],
    ) -> Self {
        let mut names = HashMap::new();
        for record in records {
            if names.contains_key(&record.actor) {
                continue;
            }
            match resolver.primary_name(&record.actor).await {
                Ok(Some(name)) => {
                    names.insert(record.actor.clone(), name);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(address = %record.actor, %err, "name lookup failed");
                }
            }
        }
        Self { names }
    }

    /// Display name for a record's actor: the resolved name, or the raw
    /// address.
    pub fn display_actor<'a>(&'a self, record: &'a CounterRecord) -> &'a str {
        self.names.get(&record.actor).map(String::as_str).unwrap_or(&record.actor)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterfeed_core::types::CounterAction;

    struct TableResolver(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl NameResolver for TableResolver {
        async fn primary_name(&self, address: &str) -> Result<Option<String>, RelayError> {
            if address == "0xerr" {
                return Err(RelayError::Snapshot("ans timeout".into()));
            }
            Ok(self.0.get(address).map(|n| n.to_string()))
        }
    }

    fn record(actor: &str, timestamp_us: u64) -> CounterRecord {
        CounterRecord {
            timestamp_us,
            actor: actor.into(),
            action: CounterAction::Random,
        }
    }

    #[tokio::test]
    async fn resolves_unique_actors_once() {
        let resolver = TableResolver(HashMap::from([("0xaaa", "alice.apt")]));
        let records = vec![record("0xaaa", 1), record("0xaaa", 2), record("0xbbb", 3)];

        let directory = NameDirectory::resolve(&resolver, &records).await;
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.display_actor(&records[0]), "alice.apt");
        assert_eq!(directory.display_actor(&records[2]), "0xbbb");
    }

    #[tokio::test]
    async fn lookup_failure_falls_back_to_address() {
        let resolver = TableResolver(HashMap::new());
        let records = vec![record("0xerr", 1)];

        let directory = NameDirectory::resolve(&resolver, &records).await;
        assert!(directory.is_empty());
        assert_eq!(directory.display_actor(&records[0]), "0xerr");
    }

    #[tokio::test]
    async fn enrichment_does_not_mutate_records() {
        let resolver = TableResolver(HashMap::from([("0xaaa", "alice.apt")]));
        let records = vec![record("0xaaa", 1)];

        let _directory = NameDirectory::resolve(&resolver, &records).await;
        // Identity fields are untouched; only the display layer changes.
        assert_eq!(records[0].actor, "0xaaa");
        assert_eq!(records[0].timestamp_us, 1);
    }
}

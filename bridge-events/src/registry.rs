//! Listener reference counting
//!
//! Tracks how many host listeners are registered for each qualified event
//! key. The router consults these counts before doing any delivery work.
//!
//! Entries are created on first subscribe and are never removed. A channel
//! that drops back to zero stays in the map at zero, which keeps repeated
//! unsubscribe calls idempotent.

use std::collections::HashMap;

use dashmap::DashMap;

use crate::error::Result;
use crate::key::QualifiedEventKey;

/// Thread-safe subscriber counts per qualified event key
///
/// Increments and decrements are atomic per key: each operation holds the
/// shard lock for its key for the whole read-modify-write. Independent keys
/// never contend on a shared lock.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    counts: DashMap<QualifiedEventKey, usize>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `key`, creating it at 1 when absent
    ///
    /// Returns the new count.
    pub fn subscribe(&self, key: QualifiedEventKey) -> usize {
        let mut count = self.counts.entry(key).or_insert(0);
        let previous = *count;
        *count += 1;

        tracing::debug!(
            "Listener count for {}: {} -> {}",
            count.key(),
            previous,
            *count
        );

        *count
    }

    /// Decrement the count for `key`, never going below zero
    ///
    /// Returns the new count. Unsubscribing a key that is already at zero,
    /// or that was never subscribed, leaves it untouched.
    pub fn unsubscribe(&self, key: &QualifiedEventKey) -> usize {
        match self.counts.get_mut(key) {
            Some(mut count) => {
                let previous = *count;
                *count = count.saturating_sub(1);

                tracing::debug!("Listener count for {}: {} -> {}", key, previous, *count);

                *count
            }
            None => {
                tracing::debug!("Release for {} ignored, no listeners registered", key);
                0
            }
        }
    }

    /// Current count for `key`, 0 when absent
    pub fn count(&self, key: &QualifiedEventKey) -> usize {
        self.counts.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Whether at least one listener is registered for `key`
    pub fn is_subscribed(&self, key: &QualifiedEventKey) -> bool {
        self.count(key) > 0
    }

    /// Parse a raw `<kind>[@<scope>]` name and subscribe to it
    ///
    /// Unknown event names are logged and leave the registry untouched.
    pub fn add_listener(&self, raw: &str) -> Result<usize> {
        let key = parse_logged(raw, "add")?;
        Ok(self.subscribe(key))
    }

    /// Parse a raw `<kind>[@<scope>]` name and unsubscribe from it
    ///
    /// Unknown event names are logged and leave the registry untouched.
    pub fn remove_listener(&self, raw: &str) -> Result<usize> {
        let key = parse_logged(raw, "remove")?;
        Ok(self.unsubscribe(&key))
    }

    /// Snapshot of every key seen so far and its current count
    pub fn stats(&self) -> HashMap<QualifiedEventKey, usize> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Number of distinct keys that currently have listeners
    pub fn active_channels(&self) -> usize {
        self.counts.iter().filter(|entry| *entry.value() > 0).count()
    }
}

fn parse_logged(raw: &str, action: &str) -> Result<QualifiedEventKey> {
    QualifiedEventKey::parse(raw).map_err(|e| {
        tracing::warn!("Cannot {} listener for \"{}\": {}", action, raw, e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EventKind;
    use crate::error::EventError;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    fn audio() -> QualifiedEventKey {
        QualifiedEventKey::new(EventKind::AudioChange)
    }

    #[test]
    fn test_reference_counting() {
        let registry = ListenerRegistry::new();
        let key = audio();

        assert!(!registry.is_subscribed(&key));
        assert_eq!(registry.count(&key), 0);

        assert_eq!(registry.subscribe(key.clone()), 1);
        assert_eq!(registry.subscribe(key.clone()), 2);
        assert!(registry.is_subscribed(&key));

        assert_eq!(registry.unsubscribe(&key), 1);
        assert!(registry.is_subscribed(&key));

        assert_eq!(registry.unsubscribe(&key), 0);
        assert!(!registry.is_subscribed(&key));
    }

    #[test]
    fn test_unsubscribe_at_zero_is_idempotent() {
        let registry = ListenerRegistry::new();
        let key = audio();

        registry.subscribe(key.clone());
        registry.unsubscribe(&key);
        registry.unsubscribe(&key);
        registry.unsubscribe(&key);

        assert_eq!(registry.count(&key), 0);
        // zeroed channels stay in the map
        assert_eq!(registry.stats().get(&key), Some(&0));
    }

    #[test]
    fn test_unsubscribe_unknown_key_does_not_create_entry() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.unsubscribe(&audio()), 0);
        assert!(registry.stats().is_empty());
    }

    #[test]
    fn test_scoped_keys_are_independent() {
        let registry = ListenerRegistry::new();
        let scoped = QualifiedEventKey::scoped(EventKind::AudioChange, "dev123");

        registry.subscribe(scoped.clone());

        assert!(registry.is_subscribed(&scoped));
        assert!(!registry.is_subscribed(&audio()));
    }

    #[test]
    fn test_add_listener_parses_scope() {
        let registry = ListenerRegistry::new();

        registry.add_listener("AUDIO_CHANGE@dev123").unwrap();

        let key = QualifiedEventKey::scoped(EventKind::AudioChange, "dev123");
        assert_eq!(registry.count(&key), 1);
        assert_eq!(registry.active_channels(), 1);
    }

    #[test]
    fn test_invalid_name_does_not_mutate() {
        let registry = ListenerRegistry::new();

        let result = registry.add_listener("BOGUS_EVENT");
        assert!(matches!(result, Err(EventError::UnknownEvent(_))));
        assert!(registry.remove_listener("BOGUS_EVENT@dev").is_err());

        assert!(registry.stats().is_empty());
    }

    #[test]
    fn test_concurrent_subscribe_is_atomic_per_key() {
        let registry = Arc::new(ListenerRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..500 {
                        registry.subscribe(audio());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.count(&audio()), 4000);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Subscribe,
        Unsubscribe,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Subscribe), Just(Op::Unsubscribe)]
    }

    proptest! {
        /// Counts follow a floored model of the operation sequence.
        #[test]
        fn prop_count_matches_floored_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let registry = ListenerRegistry::new();
            let key = audio();
            let mut model: usize = 0;

            for op in ops {
                match op {
                    Op::Subscribe => {
                        model += 1;
                        prop_assert_eq!(registry.subscribe(key.clone()), model);
                    }
                    Op::Unsubscribe => {
                        model = model.saturating_sub(1);
                        prop_assert_eq!(registry.unsubscribe(&key), model);
                    }
                }
                prop_assert_eq!(registry.count(&key), model);
                prop_assert_eq!(registry.is_subscribed(&key), model > 0);
            }
        }
    }
}

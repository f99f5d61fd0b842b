//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the index and lookup cache over generated inputs.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::{OrderedIndex, UserLookupCache, UserRecord};
use crate::config::CacheLimits;
use crate::store::MemoryStore;

// == Strategies ==
/// Generates usernames
fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Generates (username, payload) pairs with frequent key collisions
fn keyed_entry_strategy() -> impl Strategy<Value = (String, u32)> {
    ("[a-e]{1,2}", any::<u32>())
}

fn record(id: u64, username: &str) -> Arc<UserRecord> {
    Arc::new(UserRecord::new(id, username))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any insertion sequence, each key resolves to the first element
    // inserted with that key.
    #[test]
    fn prop_first_insert_wins(entries in prop::collection::vec(keyed_entry_strategy(), 1..60)) {
        let index = OrderedIndex::new();
        let mut first_seen: HashMap<String, u64> = HashMap::new();

        for (name, payload) in &entries {
            let id = u64::from(*payload);
            index.insert(record(id, name));
            first_seen.entry(name.clone()).or_insert(id);
        }

        prop_assert_eq!(index.len(), first_seen.len());
        for (name, id) in &first_seen {
            let found = index.search(&UserRecord::probe(name.as_str()));
            prop_assert_eq!(found.map(|u| u.id), Some(*id));
        }
    }

    // Keys never inserted are never found.
    #[test]
    fn prop_missing_keys_not_found(
        inserted in prop::collection::hash_set(username_strategy(), 0..40),
        probes in prop::collection::vec(username_strategy(), 1..40)
    ) {
        let index = OrderedIndex::new();
        for (id, name) in inserted.iter().enumerate() {
            index.insert(record(id as u64, name));
        }

        for probe in probes {
            let found = index.search(&UserRecord::probe(probe.as_str()));
            prop_assert_eq!(found.is_some(), inserted.contains(&probe));
        }
    }

    // Clearing leaves nothing searchable.
    #[test]
    fn prop_clear_forgets_everything(names in prop::collection::vec(username_strategy(), 0..40)) {
        let index = OrderedIndex::new();
        for (id, name) in names.iter().enumerate() {
            index.insert(record(id as u64, name));
        }

        index.clear();

        prop_assert!(index.is_empty());
        for name in &names {
            prop_assert!(index.search(&UserRecord::probe(name.as_str())).is_none());
        }
    }

    // Depth never exceeds the element count, and sorted input hits that bound.
    #[test]
    fn prop_depth_bounded_by_len(names in prop::collection::hash_set(username_strategy(), 1..40)) {
        let mut sorted: Vec<String> = names.into_iter().collect();
        sorted.sort();

        let index = OrderedIndex::new();
        for (id, name) in sorted.iter().enumerate() {
            index.insert(record(id as u64, name));
        }

        prop_assert_eq!(index.depth(), index.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Lookups racing a rebuild observe either the old user set or the new
    // one in full.
    #[test]
    fn prop_refresh_is_never_torn(
        before in prop::collection::hash_set(username_strategy(), 1..30),
        added in prop::collection::hash_set(username_strategy(), 1..30)
    ) {
        let added: HashSet<String> = added.difference(&before).cloned().collect();
        prop_assume!(!added.is_empty());

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let store = Arc::new(MemoryStore::with_users(&before).await.unwrap());
            let cache = Arc::new(UserLookupCache::new(store.clone(), CacheLimits::default()));
            cache.refresh().await.unwrap();
            for name in &added {
                store.add_user(name).await.unwrap();
            }

            let everyone: Vec<String> = before.iter().chain(added.iter()).cloned().collect();
            let (old_count, new_count) = (before.len(), everyone.len());

            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let cache = Arc::clone(&cache);
                    let everyone = everyone.clone();
                    tokio::spawn(async move {
                        let mut counts = Vec::new();
                        for _ in 0..10 {
                            let snapshot = cache.snapshot();
                            let visible = everyone
                                .iter()
                                .filter(|n| snapshot.search(&UserRecord::probe(n.as_str())).is_some())
                                .count();
                            counts.push(visible);
                            tokio::task::yield_now().await;
                        }
                        counts
                    })
                })
                .collect();

            let rebuilt = cache.refresh().await.unwrap();
            prop_assert_eq!(rebuilt, new_count);

            for reader in readers {
                for visible in reader.await.unwrap() {
                    prop_assert!(
                        visible == old_count || visible == new_count,
                        "observed {} users, expected {} or {}",
                        visible,
                        old_count,
                        new_count
                    );
                }
            }
            Ok(())
        })?;
    }

    // Content length acceptance matches the configured limit exactly.
    #[test]
    fn prop_post_length_limit(len in 1usize..400) {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::with_users(["alice"]).await.unwrap());
            let cache = UserLookupCache::new(store, CacheLimits::default());
            cache.refresh().await.unwrap();

            let result = cache.record_new_post("alice", &"x".repeat(len)).await;
            prop_assert_eq!(result.is_ok(), len <= 280);
            Ok(())
        })?;
    }
}

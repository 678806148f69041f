//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's counting, eviction and expiry rules
//! across arbitrary operation sequences. Time is simulated with a
//! `ManualClock`, so no test sleeps.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{
    build_key, CacheConfig, CacheStatus, KeyOptions, ManualClock, TtlCache,
};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 16;

fn test_cache(max_size: usize) -> (TtlCache<String>, ManualClock) {
    let clock = ManualClock::new(0);
    let config = CacheConfig::default()
        .with_max_size(max_size)
        .with_default_ttl(Duration::from_millis(1_000))
        .with_stale_threshold(Duration::from_millis(400));
    (TtlCache::with_clock(config, Arc::new(clock.clone())), clock)
}

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9:]{1,16}".prop_map(|s| s)
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Tick { ms: u64 },
    Cleanup,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        (0u64..600).prop_map(|ms| CacheOp::Tick { ms }),
        Just(CacheOp::Cleanup),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Counters match what each read observed, and size always tracks the map.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut cache, clock) = test_cache(TEST_MAX_SIZE);
        let mut expected_hits: u64 = 0;
        let mut expected_stale: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, None),
                CacheOp::Get { key } => {
                    let status = cache.status(&key);
                    match cache.get(&key) {
                        Some(_) => {
                            expected_hits += 1;
                            if status == CacheStatus::Stale {
                                expected_stale += 1;
                            }
                        }
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
                CacheOp::Tick { ms } => clock.advance(Duration::from_millis(ms)),
                CacheOp::Cleanup => {
                    cache.cleanup();
                }
            }

            prop_assert_eq!(cache.stats().size, cache.len(), "Size out of sync");
            prop_assert_eq!(cache.keys().count(), cache.len(), "Order out of sync");
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.stale_hits, expected_stale, "Stale hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
    }

    // A value read back before expiry equals the value written.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (mut cache, _) = test_cache(TEST_MAX_SIZE);

        cache.set(key.clone(), value.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // The cache never holds more than max_size entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let max_size = 8;
        let (mut cache, _) = test_cache(max_size);

        for (key, value) in entries {
            cache.set(key, value, None);
            prop_assert!(
                cache.len() <= max_size,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_size
            );
        }
    }

    // Filling the cache and writing one new key evicts the first key written,
    // regardless of reads in between.
    #[test]
    fn prop_oldest_write_is_evicted(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        reads in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        new_key in valid_key_strategy(),
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let (mut cache, _) = test_cache(capacity);

        for key in &unique_keys {
            cache.set(key.clone(), format!("value_{}", key), None);
        }
        for idx in reads {
            cache.get(idx.get::<String>(&unique_keys));
        }

        cache.set(new_key.clone(), "new".to_string(), None);

        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(cache.status(&unique_keys[0]), CacheStatus::Missing);
        for key in &unique_keys[1..] {
            prop_assert!(cache.is_valid(key), "Key '{}' should survive", key);
        }
        prop_assert!(cache.is_valid(&new_key));
    }

    // Once the TTL has elapsed no read returns the entry.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_ms in 1u64..10_000,
        extra_ms in 0u64..10_000,
    ) {
        let (mut cache, clock) = test_cache(TEST_MAX_SIZE);

        cache.set(key.clone(), value, Some(Duration::from_millis(ttl_ms)));
        clock.advance(Duration::from_millis(ttl_ms + extra_ms));

        prop_assert_eq!(cache.status(&key), CacheStatus::Expired);
        prop_assert_eq!(cache.get(&key), None);
        prop_assert_eq!(cache.status(&key), CacheStatus::Missing);
    }

    // Equal option sets produce equal keys.
    #[test]
    fn prop_key_determinism(
        venue in proptest::option::of("[a-zA-Z ]{0,12}"),
        limit in 1u32..100,
        page in 1u32..1_000,
    ) {
        let options = KeyOptions { venue: venue.as_deref(), limit, page };
        let copy = options;

        prop_assert_eq!(build_key(&options), build_key(&copy));
    }
}

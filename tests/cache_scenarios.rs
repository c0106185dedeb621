// ==============================================
// END-TO-END CACHE SCENARIOS (integration)
// ==============================================
//
// Drives the public `Cache` handle through the behaviours callers rely on:
// eviction order and counts, recency updates, compound operations, resizing,
// purging and lazy expiration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use evictkit::entry::Expiry;
use evictkit::{Cache, CacheBuilder, CachePolicy};

fn counting_lru(capacity: usize) -> (Cache<u64, u64>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let cache = Cache::new_lru_with_evict(capacity, move |k: &u64, v: &u64, _: Expiry| {
        assert_eq!(k, v, "evicted key and value should match");
        seen.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    (cache, count)
}

fn counting_lfu(capacity: usize) -> (Cache<u64, u64>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let cache = Cache::new_lfu_with_evict(capacity, move |_: &u64, _: &u64, _: Expiry| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    (cache, count)
}

// ==============================================
// LRU walkthrough
// ==============================================

#[test]
fn lru_walkthrough_256_into_128() {
    let (cache, evictions) = counting_lru(128);

    for i in 0..256 {
        cache.add(i, i, None);
    }
    assert_eq!(cache.len(), 128);
    assert_eq!(evictions.load(Ordering::SeqCst), 128);

    let keys = cache.keys();
    assert_eq!(keys, (128..256).collect::<Vec<_>>());
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(cache.get(k), Some((i as u64 + 128, None)));
    }
    for i in 0..128 {
        assert!(cache.get(&i).is_none(), "{i} should be evicted");
    }
    for i in 128..256 {
        assert!(cache.get(&i).is_some(), "{i} should not be evicted");
    }

    for i in 128..192 {
        assert!(cache.remove(&i));
        assert!(cache.get(&i).is_none(), "{i} should be deleted");
    }

    // 192 becomes the most recently used key
    cache.get(&192);
    let keys = cache.keys();
    assert_eq!(keys.len(), 64);
    assert_eq!(&keys[..63], (193..256).collect::<Vec<_>>().as_slice());
    assert_eq!(keys[63], 192);

    cache.purge();
    assert_eq!(cache.len(), 0);
    assert!(cache.get(&200).is_none());
    // removals and purge never notify
    assert_eq!(evictions.load(Ordering::SeqCst), 128);
}

#[test]
fn lru_get_refreshes_recency() {
    let cache: Cache<u32, u32> = Cache::new_lru(4).unwrap();
    for k in 0..4 {
        cache.add(k, k, None);
    }
    cache.get(&0);
    cache.add(4, 4, None);
    assert!(cache.contains(&0));
    assert!(!cache.contains(&1));
}

#[test]
fn lru_peek_and_contains_leave_recency_alone() {
    let peeked: Cache<u32, u32> = Cache::new_lru(2).unwrap();
    peeked.add(1, 1, None);
    peeked.add(2, 2, None);
    assert_eq!(peeked.peek(&1), Some((1, None)));
    peeked.add(3, 3, None);
    assert!(!peeked.contains(&1), "peek should not have updated recency of 1");

    let checked: Cache<u32, u32> = Cache::new_lru(2).unwrap();
    checked.add(1, 1, None);
    checked.add(2, 2, None);
    assert!(checked.contains(&1));
    checked.add(3, 3, None);
    assert!(!checked.contains(&1), "contains should not have updated recency of 1");
}

// ==============================================
// LFU
// ==============================================

#[test]
fn lfu_single_slot_add_reports_eviction() {
    let (cache, evictions) = counting_lfu(1);
    assert!(!cache.add(1, 1, None));
    assert_eq!(evictions.load(Ordering::SeqCst), 0);
    assert!(cache.add(2, 2, None));
    assert_eq!(evictions.load(Ordering::SeqCst), 1);
    assert!(!cache.contains(&1));
}

#[test]
fn lfu_keeps_frequently_read_keys() {
    let cache: Cache<&str, u32> = Cache::new_lfu(3).unwrap();
    for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
        cache.add(key, i as u32, None);
    }
    for _ in 0..3 {
        cache.get(&"a");
    }
    cache.get(&"c");

    // "b" is the only key still at frequency 1
    assert!(cache.add("d", 3, None));
    assert!(!cache.contains(&"b"));
    // "d" (freq 1) is now the coldest
    assert_eq!(cache.peek_victim().map(|(k, _, _)| k), Some("d"));
    assert_eq!(cache.keys(), vec!["d", "c", "a"]);
    assert_eq!(cache.frequency(&"a"), Some(4));
}

#[test]
fn lfu_overwrite_counts_as_access() {
    let cache: Cache<u32, &str> = Cache::new_lfu(2).unwrap();
    cache.add(1, "one", None);
    cache.add(2, "two", None);
    assert!(!cache.add(1, "uno", None));
    assert!(cache.add(3, "three", None));
    assert_eq!(cache.keys(), vec![3, 1]);
    assert_eq!(cache.get(&1), Some(("uno", None)));
}

// ==============================================
// Compound operations
// ==============================================

#[test]
fn contains_or_add_does_not_touch() {
    let cache: Cache<u32, u32> = Cache::new_lru(2).unwrap();
    cache.add(1, 1, None);
    cache.add(2, 2, None);
    assert_eq!(cache.contains_or_add(1, 1, None), (true, false));

    cache.add(3, 3, None);
    assert_eq!(cache.contains_or_add(1, 1, None), (false, true));
    assert!(cache.contains(&1));
}

#[test]
fn peek_or_add_returns_previous_value() {
    let cache: Cache<u32, u32> = Cache::new_lru(2).unwrap();
    cache.add(1, 1, None);
    cache.add(2, 2, None);
    assert_eq!(cache.peek_or_add(1, 100, None), (Some(1), true, false));
    assert_eq!(cache.peek(&1), Some((1, None)));

    cache.add(3, 3, None);
    assert_eq!(cache.peek_or_add(1, 1, None), (None, false, true));
    assert!(cache.contains(&1));
}

#[test]
fn compound_ops_are_atomic_across_threads() {
    let cache: Cache<u32, usize> = Cache::new_lfu(64).unwrap();
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                if let (None, false, _) = cache.peek_or_add(7, t, None) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

// ==============================================
// Resize / Purge
// ==============================================

#[test]
fn lfu_resize_down_then_up() {
    let (cache, evictions) = counting_lfu(2);
    cache.add(1, 1, None);
    cache.add(2, 2, None);

    assert_eq!(cache.resize(1), 1);
    assert_eq!(evictions.load(Ordering::SeqCst), 1);

    cache.add(3, 3, None);
    assert!(!cache.contains(&1));

    assert_eq!(cache.resize(2), 0);
    cache.add(4, 4, None);
    assert!(cache.contains(&3));
    assert!(cache.contains(&4));
}

#[test]
fn resize_evicts_exactly_overflow_for_each_policy() {
    for policy in [CachePolicy::Lru, CachePolicy::Lfu] {
        let cache: Cache<u32, u32> = CacheBuilder::new(10).policy(policy).build().unwrap();
        for k in 0..10 {
            cache.add(k, k, None);
        }
        assert_eq!(cache.resize(4), 6, "{policy}");
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.resize(40), 0, "{policy}");
        assert_eq!(cache.len(), 4);
    }
}

#[test]
fn purge_never_notifies() {
    let (cache, evictions) = counting_lru(8);
    for k in 0..8 {
        cache.add(k, k, None);
    }
    cache.purge();
    assert!(cache.is_empty());
    for k in 0..8 {
        assert!(!cache.contains(&k));
    }
    assert_eq!(evictions.load(Ordering::SeqCst), 0);
}

// ==============================================
// Expiration
// ==============================================

#[test]
fn expired_entries_are_lazy_misses() {
    let (cache, evictions) = counting_lfu(4);
    // a deadline of "now" has been reached by the time any later call samples the clock
    let reached = Instant::now();
    let later = Instant::now() + Duration::from_secs(3600);

    cache.add(1, 1, Some(reached));
    cache.add(2, 2, Some(later));
    cache.add(3, 3, None);

    // still occupying a slot until someone looks
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.keys(), vec![2, 3]);

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&1));
    assert_eq!(cache.get(&2), Some((2, Some(later))));
    assert_eq!(cache.peek(&3), Some((3, None)));
    assert_eq!(evictions.load(Ordering::SeqCst), 0);
}

#[test]
fn expired_entry_can_still_be_evicted_with_callback() {
    let (cache, evictions) = counting_lru(1);
    cache.add(1, 1, Some(Instant::now()));
    assert!(cache.add(2, 2, None));
    assert_eq!(evictions.load(Ordering::SeqCst), 1);
}

#[test]
fn remove_victim_bypasses_callback() {
    let (cache, evictions) = counting_lru(3);
    for k in 0..3 {
        cache.add(k, k, None);
    }
    assert_eq!(cache.remove_victim(), Some((0, 0, None)));
    assert_eq!(cache.len(), 2);
    assert_eq!(evictions.load(Ordering::SeqCst), 0);
}

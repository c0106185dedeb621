#![no_main]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use evictkit::CachePolicy;
use evictkit::builder::CacheBuilder;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on the locked cache handle
//
// The first byte picks the policy and capacity; every following pair is an
// operation and a key. Checks the capacity bound, the index/order agreement
// and that the callback fires exactly once per reported eviction.
fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let policy = if head & 1 == 0 { CachePolicy::Lru } else { CachePolicy::Lfu };
    let capacity = usize::from(head >> 1) % 32 + 1;

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let cache = CacheBuilder::<u8, u8>::new(capacity)
        .policy(policy)
        .on_evict(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .build()
        .unwrap();
    let mut reported = 0usize;

    for chunk in rest.chunks_exact(2) {
        let key = chunk[1] % 64;
        match chunk[0] % 9 {
            0 | 1 => reported += usize::from(cache.add(key, chunk[0], None)),
            2 | 3 => {
                cache.get(&key);
            },
            4 => {
                cache.peek(&key);
            },
            5 => reported += usize::from(cache.contains_or_add(key, key, None).1),
            6 => reported += usize::from(cache.peek_or_add(key, key, None).2),
            7 => {
                cache.remove(&key);
            },
            _ => reported += cache.resize(usize::from(key % 40)),
        }

        assert!(cache.len() <= cache.capacity());
        cache.check_invariants().unwrap();
        assert_eq!(fired.load(Ordering::Relaxed), reported);
    }
});

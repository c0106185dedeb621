#![no_main]

use evictkit::ds::FrequencyBuckets;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on FrequencyBuckets
//
// Random insert, touch, remove, pop_min, peek_min and clear operations on
// handles that may or may not still be live.
fuzz_target!(|data: &[u8]| {
    let mut buckets: FrequencyBuckets<u32> = FrequencyBuckets::new();
    let mut ids = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 8;
        let arg = chunk[1];
        let pick = |ids: &Vec<_>| (!ids.is_empty()).then(|| ids[usize::from(arg) % ids.len()]);

        match op {
            0 | 1 => {
                let id = buckets.insert(u32::from(arg));
                assert_eq!(buckets.frequency(id), Some(1));
                assert_eq!(buckets.min_freq(), Some(1));
                ids.push(id);
            },
            2 | 3 => {
                if let Some(id) = pick(&ids) {
                    let before = buckets.frequency(id);
                    let after = buckets.touch(id);
                    assert_eq!(after, before.map(|f| f.saturating_add(1)));
                }
            },
            4 => {
                if let Some(id) = pick(&ids) {
                    let live = buckets.contains(id);
                    assert_eq!(buckets.remove(id).is_some(), live);
                }
            },
            5 => {
                let min = buckets.min_freq();
                let peeked = buckets.peek_min().map(|(id, _)| id);
                let popped = buckets.pop_min();
                assert_eq!(popped.map(|(_, f)| f), min);
                if let Some(id) = peeked {
                    assert!(!buckets.contains(id));
                }
            },
            6 => {
                let mut last = 0;
                for (_, _, freq) in buckets.iter() {
                    assert!(freq >= last);
                    last = freq;
                }
            },
            _ => {
                buckets.clear();
                ids.clear();
            },
        }

        buckets.debug_validate_invariants();
        assert_eq!(buckets.is_empty(), buckets.min_freq().is_none());
        assert_eq!(buckets.is_empty(), buckets.peek_min().is_none());
    }
});

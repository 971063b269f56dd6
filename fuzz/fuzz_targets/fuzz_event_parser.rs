#![no_main]

use hwcheck_core::event::parse_push_event;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // A successful parse always carries the three identity fields
        if let Ok(event) = parse_push_event(text) {
            assert!(!event.head_sha.is_empty());
            assert!(!event.owner.is_empty());
            assert!(!event.repo.is_empty());

            let paths = event.changed_paths();
            let mut sorted = paths.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), paths.len());
        }
    }
});

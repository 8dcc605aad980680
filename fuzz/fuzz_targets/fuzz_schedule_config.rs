#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use stormclock::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // Any outcome is fine as long as it doesn't panic; a schedule that
        // loads must have passed every construction check
        if let Ok(loaded) = ConfigLoader::with_defaults().load_str(yaml, Path::new("fuzz.yaml")) {
            let schedule = &loaded.schedule;
            assert!(!schedule.is_empty());
            assert!(schedule.boss_pause_after() < schedule.len());
            assert!(schedule.phases().iter().all(|p| !p.duration.is_zero()));
        }
    }
});

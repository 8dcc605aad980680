#![no_main]

use std::sync::Arc;
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use stormclock::phase::{PhaseKind, PhaseSpec, PhaseTimer, RunStatus, Schedule};
use tokio::time::Instant;

// Layout: [phase count, boss index, (kind, secs) per phase..., then ops]
// Each op byte: high bit set is a trigger, otherwise a tick after (low 7 bits * 100 ms)
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 8) + 1;
    let Some((&boss, rest)) = rest.split_first() else {
        return;
    };
    if rest.len() < count * 2 {
        return;
    }
    let (spec, ops) = rest.split_at(count * 2);

    let phases = spec
        .chunks(2)
        .map(|c| {
            let kind = if c[0] % 2 == 0 { PhaseKind::Safe } else { PhaseKind::Closing };
            PhaseSpec::new(kind, Duration::from_secs(u64::from(c[1]) + 1), "p")
        })
        .collect();
    let Ok(schedule) = Schedule::new(
        "fuzz",
        phases,
        usize::from(boss) % count,
        Duration::from_secs(5),
    ) else {
        return;
    };
    let total = schedule.total_duration();
    let mut timer = PhaseTimer::new(Arc::new(schedule));

    let mut now = Instant::now();
    for &op in ops {
        if op & 0x80 != 0 {
            timer.trigger_at(now);
        } else {
            now += Duration::from_millis(u64::from(op) * 100);
            timer.tick_at(now);
        }
        let view = timer.view_at(now);
        assert!(view.phase_elapsed <= view.phase_duration);
        assert!(view.total_elapsed <= total);
        if timer.status() == RunStatus::Completed {
            assert_eq!(timer.total_elapsed_at(now), total);
        }
    }
});

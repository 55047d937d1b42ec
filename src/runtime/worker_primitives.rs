use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const SLEEP_SLICE_MS: u64 = 200;

/// Sleeps for `total` unless `stop` is raised first. Returns false when
/// the wait was cut short.
pub fn sleep_with_stop(stop: &AtomicBool, total: Duration) -> bool {
    let mut remaining = total;
    while remaining > Duration::from_millis(0) {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let step = remaining.min(Duration::from_millis(SLEEP_SLICE_MS));
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
    !stop.load(Ordering::Relaxed)
}

/// Plain sleep when no stop flag is supplied.
pub fn pause(stop: Option<&AtomicBool>, total: Duration) -> bool {
    match stop {
        Some(stop) => sleep_with_stop(stop, total),
        None => {
            thread::sleep(total);
            true
        }
    }
}

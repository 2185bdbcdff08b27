use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const TIMING_ENV: &str = "CXXBLOCKS_TIMING";

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable timing when `CXXBLOCKS_TIMING` is set or `force` is true.
pub fn init(force: bool) {
    if force || std::env::var_os(TIMING_ENV).is_some() {
        TIMING_ENABLED.store(true, Ordering::Relaxed);
    }
}

pub fn is_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

pub fn log(label: &str, duration: Duration) {
    if is_enabled() {
        eprintln!("[TIMING] {}", format_line(label, duration));
    }
}

pub fn log_with_count(label: &str, duration: Duration, count: usize) {
    if is_enabled() {
        eprintln!(
            "[TIMING] {} ({} files, {:.3}ms/file)",
            format_line(label, duration),
            count,
            if count > 0 {
                duration.as_secs_f64() * 1000.0 / count as f64
            } else {
                0.0
            }
        );
    }
}

fn format_line(label: &str, duration: Duration) -> String {
    format!("{}: {:.3}ms", label, duration.as_secs_f64() * 1000.0)
}

/// Time an expression and log it under `label`.
#[macro_export]
macro_rules! time_block {
    ($label:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        $crate::timing::log($label, start.elapsed());
        result
    }};
}

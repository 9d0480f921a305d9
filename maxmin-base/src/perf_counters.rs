use std::sync::atomic::{AtomicU64, Ordering};

pub static GLOBAL_DISTANCE_COUNT: AtomicU64 = AtomicU64::new(0);
pub static GLOBAL_GROWTH_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn inc_distance_count() {
    GLOBAL_DISTANCE_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_growth_count() {
    GLOBAL_GROWTH_COUNT.fetch_add(1, Ordering::SeqCst);
}

/// gets the value of the counter, and sets the value to 0.
/// if multiple threads read this concurrently, they will all get 0 except the first one,
/// assuming the counter is not incremented in-between
pub fn distance_count() -> u64 {
    GLOBAL_DISTANCE_COUNT.swap(0, Ordering::SeqCst)
}

pub fn growth_count() -> u64 {
    GLOBAL_GROWTH_COUNT.swap(0, Ordering::SeqCst)
}

/// Wraps a distance function so that every evaluation bumps the global
/// distance counter.
pub fn counting<P, D>(distance: D) -> impl Fn(&P, &P) -> f64 + Sync
where
    D: Fn(&P, &P) -> f64 + Sync,
{
    move |a, b| {
        inc_distance_count();
        distance(a, b)
    }
}

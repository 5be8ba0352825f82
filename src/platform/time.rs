//! Time sources
//!
//! `monotonic_ms` feeds the frame loop; `timestamp_ms` dates high score entries.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::OnceLock;
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    static START: OnceLock<Instant> = OnceLock::new();

    pub fn monotonic_ms() -> f64 {
        START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }

    pub fn timestamp_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    pub fn monotonic_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn timestamp_ms() -> f64 {
        js_sys::Date::now()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{monotonic_ms, timestamp_ms};
#[cfg(target_arch = "wasm32")]
pub use web::{monotonic_ms, timestamp_ms};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_never_goes_backwards() {
        let a = monotonic_ms();
        let b = monotonic_ms();
        assert!(b >= a);
    }

    #[test]
    fn test_timestamp_is_after_2020() {
        assert!(timestamp_ms() > 1_577_836_800_000.0);
    }
}

// Time Provider Port (for testability)

use std::time::{Duration, Instant};

/// Time provider interface (allows a virtual clock in tests)
pub trait TimeProvider: Send + Sync {
    /// Monotonic milliseconds since an arbitrary origin
    fn now_millis(&self) -> i64;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// System time provider (production), backed by `Instant`
pub struct SystemTimeProvider {
    origin: Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Virtual clock: `sleep` returns at once and advances `now`
    #[derive(Default)]
    pub struct FakeClock {
        now_millis: Mutex<i64>,
        sleeps: Mutex<Vec<Duration>>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self::default()
        }

        /// Move time forward without recording a sleep (e.g. a slow request)
        pub fn advance(&self, duration: Duration) {
            *self.now_millis.lock().unwrap() += duration.as_millis() as i64;
        }

        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    impl TimeProvider for FakeClock {
        fn now_millis(&self) -> i64 {
            *self.now_millis.lock().unwrap()
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
            self.advance(duration);
        }
    }
}

//! Backoff suspension for the blocking driver.

use std::time::Duration;

/// Suspends the caller between attempts.
pub trait Sleeper {
    fn sleep(&mut self, d: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, d: Duration) {
        (**self).sleep(d)
    }
}

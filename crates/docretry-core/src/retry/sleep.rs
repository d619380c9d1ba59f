//! Blocking waits between retry attempts.
//!
//! The orchestrators never call `std::thread::sleep` directly; they go through
//! a [`Sleeper`] so that callers can wake a waiting call early and tests can
//! observe the requested delays without actually waiting.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// How a retry delay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full delay elapsed.
    Elapsed,
    /// The wait was cut short. The retry loop proceeds as if it had elapsed.
    Interrupted,
}

/// Blocks the calling thread for a retry delay.
pub trait Sleeper {
    fn sleep(&self, delay: Duration) -> SleepOutcome;
}

/// Plain `std::thread::sleep`. Cannot be interrupted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) -> SleepOutcome {
        std::thread::sleep(delay);
        SleepOutcome::Elapsed
    }
}

/// Sleeper whose current (or next) wait can be ended early via [`interrupt`].
///
/// An interrupt is consumed by the wait it ends. It never aborts the call:
/// the retry loop issues the next attempt immediately.
///
/// [`interrupt`]: InterruptibleSleeper::interrupt
#[derive(Debug, Default)]
pub struct InterruptibleSleeper {
    interrupted: Mutex<bool>,
    wake: Condvar,
}

impl InterruptibleSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the waiting thread, or make the next wait return immediately.
    pub fn interrupt(&self) {
        let mut flag = self
            .interrupted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *flag = true;
        self.wake.notify_all();
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&self, delay: Duration) -> SleepOutcome {
        let deadline = Instant::now() + delay;
        let mut flag = self
            .interrupted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            if *flag {
                *flag = false;
                return SleepOutcome::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return SleepOutcome::Elapsed;
            }
            // Spurious wakeups land back at the top of the loop.
            flag = match self.wake.wait_timeout(flag, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, delay: Duration) -> SleepOutcome {
        (**self).sleep(delay)
    }
}

impl<S: Sleeper + ?Sized> Sleeper for std::sync::Arc<S> {
    fn sleep(&self, delay: Duration) -> SleepOutcome {
        (**self).sleep(delay)
    }
}

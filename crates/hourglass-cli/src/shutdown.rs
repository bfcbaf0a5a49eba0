use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Stop flag shared by the replay threads.
///
/// Waits on the signal end early once it is triggered, so frame pacing never
/// delays shutdown.
#[derive(Default)]
pub struct ShutdownSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn stopped(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Trigger the shutdown signal, waking all waiting threads.
    pub fn trigger(&self) {
        *self.stopped() = true;
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.stopped()
    }

    /// Wait for the specified duration or until shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, duration: Duration) -> bool {
        let guard = self.stopped();
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Stop flag for the watch loop whose waits wake up as soon as it is set.
pub struct ShutdownSignal {
    shutdown: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Set the flag and wake every waiter.
    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless shutdown is triggered first.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        let (_guard, timeout) = self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
            .unwrap_or_else(PoisonError::into_inner);

        !timeout.timed_out()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

//! Emulated interrupt mask for POSIX hosts
//!
//! A host has no global interrupt flag, so "interrupts masked" is modelled as
//! ownership of a lock. Interrupt handlers run on their own threads and must
//! take the mask before touching shared state, which makes them wait while
//! the foreground holds a critical section, just as a masked IRQ stays
//! pending on a microcontroller.

use std::thread::{self, ThreadId};

use lmic_hal_sync::InterruptMask;
use parking_lot::{Condvar, Mutex};

/// Host stand-in for the processor's global interrupt mask
pub struct HostInterrupts {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl HostInterrupts {
    pub const fn new() -> Self {
        Self {
            owner: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    /// Thread currently holding the mask, if any
    pub fn owner(&self) -> Option<ThreadId> {
        *self.owner.lock()
    }
}

impl Default for HostInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptMask for HostInterrupts {
    fn disable(&self) {
        let me = thread::current().id();
        let mut owner = self.owner.lock();
        while let Some(current) = *owner {
            if current == me {
                return;
            }
            self.released.wait(&mut owner);
        }
        *owner = Some(me);
    }

    unsafe fn enable(&self) {
        let mut owner = self.owner.lock();
        if *owner == Some(thread::current().id()) {
            *owner = None;
            self.released.notify_all();
        }
    }

    fn is_masked(&self) -> bool {
        self.owner.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn disable_is_idempotent_for_owner() {
        let mask = HostInterrupts::new();
        mask.disable();
        mask.disable();
        assert_eq!(mask.owner(), Some(thread::current().id()));
        unsafe { mask.enable() };
        assert!(!mask.is_masked());
    }

    #[test]
    fn other_threads_wait_for_release() {
        let mask = Arc::new(HostInterrupts::new());
        let entered = Arc::new(AtomicBool::new(false));

        mask.disable();
        let handle = {
            let mask = Arc::clone(&mask);
            let entered = Arc::clone(&entered);
            thread::spawn(move || {
                mask.disable();
                entered.store(true, Ordering::SeqCst);
                unsafe { mask.enable() };
            })
        };

        thread::sleep(Duration::from_millis(30));
        assert!(!entered.load(Ordering::SeqCst));

        unsafe { mask.enable() };
        handle.join().unwrap();
        assert!(entered.load(Ordering::SeqCst));
        assert!(!mask.is_masked());
    }

    #[test]
    fn enable_from_non_owner_is_ignored() {
        let mask = Arc::new(HostInterrupts::new());
        mask.disable();
        {
            let mask = Arc::clone(&mask);
            thread::spawn(move || unsafe { mask.enable() })
                .join()
                .unwrap();
        }
        assert!(mask.is_masked());
        unsafe { mask.enable() };
    }
}

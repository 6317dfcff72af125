//! # Pill
//!
//! A panic propagation mechanism that surfaces panics from the scheduler loop
//! task to whoever tears it down.
//!
//! The scheduler loop is a long-lived background task; if it ever panics, a
//! caller joining it would otherwise see nothing but a closed channel. A
//! `Pill` moved into the loop task is dropped during unwinding, detects the
//! panic via `thread::panicking()`, and re-raises so the failure is loud
//! instead of a silent hang.

use std::thread;

pub struct Pill {}

impl Pill {
    pub fn new() -> Self {
        Self {}
    }
}

impl Drop for Pill {
    /// Detects if this `Pill` is being dropped due to a panic and propagates
    /// the panic if so. Panics are non-recoverable here: a loop panic must
    /// not be swallowed.
    fn drop(&mut self) {
        if thread::panicking() {
            panic!("scheduler loop panicked - propagating to parent thread");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn pill_is_silent_on_normal_drop() {
        let _pill = Pill::new();
    }

    #[test]
    fn pill_propagates_panic_through_thread_boundary() {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let pill = Pill::new();
            sender.send(pill).unwrap();
            panic!("intentional panic in child thread");
        });

        // The pill escaped before the panic, so it must not re-raise here.
        let pill = receiver.recv().unwrap();
        assert!(handle.join().is_err(), "child thread should have panicked");
        drop(pill);
    }
}

//! Terminal failure sink

/// Halt forever.
///
/// The only response to a fault the protocol stack cannot recover from.
/// Nothing is saved or reported here; pair it with a watchdog to get a reset.
pub fn failed() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

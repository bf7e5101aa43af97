//! Text and hex debug logger
//!
//! Writes human-readable traces to any [`fmt::Write`] sink, typically a UART.
//! Lines end in CRLF for serial terminals.

use core::fmt::{self, Write};

use crate::event::MacEvent;

/// Banner written by [`DebugLog::init`]
pub const BANNER: &str = "\r\n============== DEBUG STARTED ==============\r\n";

/// Byte-oriented trace writer
pub struct DebugLog<W> {
    out: W,
}

impl<W: Write> DebugLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the start banner
    pub fn init(&mut self) -> fmt::Result {
        self.str(BANNER)
    }

    pub fn char(&mut self, c: char) -> fmt::Result {
        self.out.write_char(c)
    }

    /// Byte as two uppercase hex digits
    pub fn hex(&mut self, b: u8) -> fmt::Result {
        write!(self.out, "{:02X}", b)
    }

    /// Hex dump: each byte followed by a space, then CRLF
    pub fn buf(&mut self, buf: &[u8]) -> fmt::Result {
        for &b in buf {
            self.hex(b)?;
            self.char(' ')?;
        }
        self.crlf()
    }

    /// 32-bit value as eight hex digits
    pub fn uint(&mut self, v: u32) -> fmt::Result {
        write!(self.out, "{:08X}", v)
    }

    pub fn str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }

    /// `label` followed by `val` in hex, then CRLF
    pub fn val(&mut self, label: &str, val: u32) -> fmt::Result {
        self.str(label)?;
        self.uint(val)?;
        self.crlf()
    }

    pub fn led(&mut self, val: u8) -> fmt::Result {
        self.val("LED = ", u32::from(val))
    }

    /// Event name, then CRLF
    pub fn event(&mut self, ev: MacEvent) -> fmt::Result {
        self.str(ev.name())?;
        self.crlf()
    }

    /// Like [`event`](Self::event) for a raw code; unknown codes are printed in hex
    pub fn event_code(&mut self, code: u8) -> fmt::Result {
        match MacEvent::from_raw(code) {
            Some(ev) => self.event(ev),
            None => self.val("UNKNOWN EVENT = ", u32::from(code)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn crlf(&mut self) -> fmt::Result {
        self.out.write_str("\r\n")
    }
}

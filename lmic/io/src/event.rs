//! MAC event codes reported to the application

use core::fmt;

/// Events the LMIC MAC reports through its `onEvent` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MacEvent {
    ScanTimeout = 1,
    BeaconFound = 2,
    BeaconMissed = 3,
    BeaconTracked = 4,
    Joining = 5,
    Joined = 6,
    Rfu1 = 7,
    JoinFailed = 8,
    RejoinFailed = 9,
    TxComplete = 10,
    LostTsync = 11,
    Reset = 12,
    RxComplete = 13,
    LinkDead = 14,
    LinkAlive = 15,
}

impl MacEvent {
    /// Every event, in code order
    pub const ALL: [MacEvent; 15] = [
        MacEvent::ScanTimeout,
        MacEvent::BeaconFound,
        MacEvent::BeaconMissed,
        MacEvent::BeaconTracked,
        MacEvent::Joining,
        MacEvent::Joined,
        MacEvent::Rfu1,
        MacEvent::JoinFailed,
        MacEvent::RejoinFailed,
        MacEvent::TxComplete,
        MacEvent::LostTsync,
        MacEvent::Reset,
        MacEvent::RxComplete,
        MacEvent::LinkDead,
        MacEvent::LinkAlive,
    ];

    /// Decode a raw event code
    pub fn from_raw(code: u8) -> Option<Self> {
        match code {
            1..=15 => Some(Self::ALL[usize::from(code) - 1]),
            _ => None,
        }
    }

    /// Raw event code
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Name printed by the debug logger
    pub const fn name(self) -> &'static str {
        match self {
            MacEvent::ScanTimeout => "SCAN_TIMEOUT",
            MacEvent::BeaconFound => "BEACON_FOUND",
            MacEvent::BeaconMissed => "BEACON_MISSED",
            MacEvent::BeaconTracked => "BEACON_TRACKED",
            MacEvent::Joining => "JOINING",
            MacEvent::Joined => "JOINED",
            MacEvent::Rfu1 => "RFU1",
            MacEvent::JoinFailed => "JOIN_FAILED",
            MacEvent::RejoinFailed => "REJOIN_FAILED",
            MacEvent::TxComplete => "TXCOMPLETE",
            MacEvent::LostTsync => "LOST_TSYNC",
            MacEvent::Reset => "RESET",
            MacEvent::RxComplete => "RXCOMPLETE",
            MacEvent::LinkDead => "LINK_DEAD",
            MacEvent::LinkAlive => "LINK_ALIVE",
        }
    }
}

impl fmt::Display for MacEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MacEvent {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_table() {
        for (index, event) in MacEvent::ALL.iter().enumerate() {
            assert_eq!(usize::from(event.raw()), index + 1);
            assert_eq!(MacEvent::from_raw(event.raw()), Some(*event));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(MacEvent::from_raw(0), None);
        assert_eq!(MacEvent::from_raw(16), None);
        assert_eq!(MacEvent::from_raw(u8::MAX), None);
    }
}

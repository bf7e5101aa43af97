//! Radio transceiver pins and SPI
//!
//! The MAC drives the transceiver through four primitives: chip select, reset,
//! antenna switch direction and single-byte SPI transfers. DIO interrupt lines
//! are routed straight to the MAC's handler.

use core::fmt;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use embedded_hal::spi::SpiBus;

/// Requested state of the radio reset line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RstLevel {
    Low,
    High,
    /// Stop driving the line and let it float
    Float,
}

impl RstLevel {
    /// Decode the MAC's encoding: 0 low, 1 high, anything else floating
    pub const fn from_raw(val: u8) -> Self {
        match val {
            0 => RstLevel::Low,
            1 => RstLevel::High,
            _ => RstLevel::Float,
        }
    }
}

/// A pin that can either be driven or released to high impedance
pub trait ResetLine: ErrorType {
    /// Switch to output and drive `state`
    fn drive(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Switch to input so the radio's own pull decides the level
    fn float(&mut self) -> Result<(), Self::Error>;
}

/// Error raised by [`RadioPins`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// A control pin could not be driven
    Pin(P),
}

impl<S: fmt::Debug, P: fmt::Debug> fmt::Display for RadioError<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::Spi(err) => write!(f, "radio SPI error: {:?}", err),
            RadioError::Pin(err) => write!(f, "radio pin error: {:?}", err),
        }
    }
}

/// Control lines and bus of the radio transceiver
pub struct RadioPins<SPI, NSS, RXTX, RST> {
    spi: SPI,
    nss: NSS,
    rxtx: RXTX,
    rst: RST,
}

impl<SPI, NSS, RXTX, RST, E> RadioPins<SPI, NSS, RXTX, RST>
where
    SPI: SpiBus<u8>,
    NSS: OutputPin + ErrorType<Error = E>,
    RXTX: OutputPin + ErrorType<Error = E>,
    RST: ResetLine + ErrorType<Error = E>,
{
    pub fn new(spi: SPI, nss: NSS, rxtx: RXTX, rst: RST) -> Self {
        Self { spi, nss, rxtx, rst }
    }

    /// Set the antenna switch: `tx` true for transmit.
    ///
    /// The switch input is active low, so the pin is driven to `!tx`.
    pub fn set_rxtx(&mut self, tx: bool) -> Result<(), RadioError<SPI::Error, E>> {
        self.rxtx
            .set_state(PinState::from(!tx))
            .map_err(RadioError::Pin)
    }

    /// Drive chip select (active low)
    pub fn set_nss(&mut self, high: bool) -> Result<(), RadioError<SPI::Error, E>> {
        self.nss
            .set_state(PinState::from(high))
            .map_err(RadioError::Pin)
    }

    pub fn reset(&mut self, level: RstLevel) -> Result<(), RadioError<SPI::Error, E>> {
        let result = match level {
            RstLevel::Low => self.rst.drive(PinState::Low),
            RstLevel::High => self.rst.drive(PinState::High),
            RstLevel::Float => self.rst.float(),
        };
        result.map_err(RadioError::Pin)
    }

    /// Full-duplex single byte transfer; returns the byte clocked in
    pub fn spi(&mut self, out: u8) -> Result<u8, RadioError<SPI::Error, E>> {
        let mut word = [out];
        self.spi
            .transfer_in_place(&mut word)
            .map_err(RadioError::Spi)?;
        Ok(word[0])
    }

    pub fn release(self) -> (SPI, NSS, RXTX, RST) {
        (self.spi, self.nss, self.rxtx, self.rst)
    }
}

/// Radio interrupt lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DioLine {
    Dio0 = 0,
    Dio1 = 1,
    Dio2 = 2,
}

impl DioLine {
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Routes DIO rising edges to the MAC's radio interrupt handler.
///
/// Runs in interrupt context, in parallel with the tick clock's rebase.
#[derive(Clone, Copy)]
pub struct RadioIrq {
    handler: fn(DioLine),
}

impl RadioIrq {
    pub const fn new(handler: fn(DioLine)) -> Self {
        Self { handler }
    }

    /// Call from the GPIO interrupt of `line`
    pub fn on_rising_edge(&self, line: DioLine) {
        (self.handler)(line);
    }
}

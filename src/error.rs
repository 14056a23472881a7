//! Driver error type

use core::convert::Infallible;

/// Errors reported by the driver.
///
/// Every error is returned synchronously from the call that detected it. The driver never
/// retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The value is outside the encodable domain of the parameter, or a register held a bit
    /// pattern with no defined meaning
    InvalidParameter,
    /// The requested mode does not exist in the requested modem family, or the modem family
    /// cannot be switched from the current mode
    InvalidModeTransition,
    /// The payload exceeds the maximum payload length or the FIFO space above the TX base
    PayloadTooLarge,
    /// The receive buffer is shorter than the received packet
    BufferTooSmall,
    /// The underlying SPI transaction failed
    TransportFailure,
    /// The reset line or an interrupt line reported an error
    PinFailure,
    /// The completed receive carries the PayloadCrcError flag
    StaleFlagRead,
    /// The silicon version register reported an unsupported part
    UnsupportedChip(u8),
    /// Image calibration did not finish in time
    CalibrationTimeout,
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParameter => f.write_str("parameter outside encodable domain"),
            Self::InvalidModeTransition => f.write_str("mode not valid for the modem family"),
            Self::PayloadTooLarge => f.write_str("payload exceeds FIFO or length limit"),
            Self::BufferTooSmall => f.write_str("receive buffer too small for packet"),
            Self::TransportFailure => f.write_str("SPI transaction failed"),
            Self::PinFailure => f.write_str("reset or interrupt line failed"),
            Self::StaleFlagRead => f.write_str("payload received with CRC error"),
            Self::UnsupportedChip(version) => write!(f, "unsupported chip version {:#04x}", version),
            Self::CalibrationTimeout => f.write_str("image calibration did not finish"),
        }
    }
}

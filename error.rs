use core::convert::Infallible;
use core::fmt::Debug;

use thiserror_no_std::Error;

/// Stored and recomputed CRC4 of a calibration table that failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("calibration checksum mismatch: stored {stored:#x}, computed {computed:#x}")]
pub struct ChecksumMismatch {
    pub stored: u8,
    pub computed: u8,
}

/// Caller-side mistakes, rejected before the bus is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidParameter {
    #[error("oversampling index {0} outside 0..=4")]
    Oversampling(i32),
    #[error("unknown conversion command {0:#04x}")]
    Channel(u8),
}

/// Errors raised by the MS5803 driver, generic over the transport error `E`.
#[derive(Debug, Error)]
pub enum Error<E: Debug> {
    #[error("bus transfer failed: {0:?}")]
    Bus(E),
    #[error("short read for command {command:#04x}: expected {expected} bytes, got {actual}")]
    ShortRead {
        command: u8,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Checksum(#[from] ChecksumMismatch),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameter),
}

impl<E: Debug> Error<E> {
    /// True for transport failures, including short reads.
    pub fn is_bus_error(&self) -> bool {
        matches!(self, Error::Bus(_) | Error::ShortRead { .. })
    }
}

// Lets typed arguments flow through the same conversion path as raw indices.
impl<E: Debug> From<Infallible> for Error<E> {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

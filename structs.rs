use crate::crc4::{verify_crc4, PROM_WORDS};
use crate::error::ChecksumMismatch;

/// Factory calibration read from the sensor PROM.
///
/// `C[0]` is reserved, `C[7]` carries the CRC in its low byte and `C[1..=6]`
/// are the coefficients used by the compensation formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationTable {
    words: [u16; PROM_WORDS],
}

impl CalibrationTable {
    pub fn from_words(words: [u16; PROM_WORDS]) -> Result<Self, ChecksumMismatch> {
        verify_crc4(&words)?;
        Ok(Self { words })
    }

    // Skips the CRC4 check.
    pub const fn from_words_unchecked(words: [u16; PROM_WORDS]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u16; PROM_WORDS] {
        &self.words
    }

    // C1..C6 in datasheet order: SENS_T1, OFF_T1, TCS, TCO, T_REF, TEMPSENS.
    pub fn pressure_sensitivity(&self) -> i64 {
        i64::from(self.words[1])
    }

    pub fn pressure_offset(&self) -> i64 {
        i64::from(self.words[2])
    }

    pub fn sensitivity_temp_coeff(&self) -> i64 {
        i64::from(self.words[3])
    }

    pub fn offset_temp_coeff(&self) -> i64 {
        i64::from(self.words[4])
    }

    pub fn reference_temperature(&self) -> i64 {
        i64::from(self.words[5])
    }

    pub fn temperature_sensitivity(&self) -> i64 {
        i64::from(self.words[6])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub pressure: u32,    // D1
    pub temperature: u32, // D2
}

/// Compensated output of one `RawSample`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Hundredths of a degree Celsius.
    pub temperature: i32,
    /// Tenths of a millibar.
    pub pressure: i32,
}

impl Reading {
    pub fn celsius(&self) -> f64 {
        f64::from(self.temperature) / 100.0
    }

    pub fn millibar(&self) -> f64 {
        f64::from(self.pressure) / 10.0
    }
}

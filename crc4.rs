//! CRC4 over the MS5803 PROM, as given in the MEAS application note AN520.

use crate::error::ChecksumMismatch;

/// Number of 16-bit words in the PROM.
pub const PROM_WORDS: usize = 8;

const POLYNOMIAL: u16 = 0x3000;

/// Computes the 4-bit CRC of a PROM image.
///
/// The low byte of the last word holds the CRC under test and is treated as
/// zero. The remainder is kept in a `u16`, so shifted-out bits are dropped.
pub fn crc4(words: &[u16; PROM_WORDS]) -> u8 {
    let mut remainder: u16 = 0;

    for (i, &word) in words.iter().enumerate() {
        let word = if i == PROM_WORDS - 1 {
            word & 0xFF00
        } else {
            word
        };

        for byte in word.to_be_bytes() {
            remainder ^= u16::from(byte);
            for _ in 0..8 {
                remainder = if remainder & 0x8000 != 0 {
                    (remainder << 1) ^ POLYNOMIAL
                } else {
                    remainder << 1
                };
            }
        }
    }

    ((remainder >> 12) & 0x0F) as u8
}

/// Checks the CRC stored in the low byte of the last word.
pub fn verify_crc4(words: &[u16; PROM_WORDS]) -> Result<(), ChecksumMismatch> {
    let stored = (words[PROM_WORDS - 1] & 0x00FF) as u8;
    let computed = crc4(words);
    if stored == computed {
        Ok(())
    } else {
        Err(ChecksumMismatch { stored, computed })
    }
}

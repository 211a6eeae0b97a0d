use log::{debug, info, warn};

use crate::bus::Bus;
use crate::crc4::PROM_WORDS;
use crate::error::Error;
use crate::structs::CalibrationTable;

/// PROM read command for word 0; word `i` is at `PROM_READ | (2 * i)`.
const PROM_READ: u8 = 0xA0;
const PROM_WORD_LEN: usize = 2;

/// Reads the eight PROM words from the device and verifies their CRC4.
///
/// The device must have been reset, and given its startup time, beforehand.
pub fn load<B: Bus>(bus: &mut B, address: u8) -> Result<CalibrationTable, Error<B::Error>> {
    let mut words = [0u16; PROM_WORDS];

    for (i, word) in words.iter_mut().enumerate() {
        let command = PROM_READ | (2 * i as u8);
        let mut buf = [0u8; PROM_WORD_LEN];
        let received = bus
            .read_block(address, command, &mut buf)
            .map_err(Error::Bus)?;
        if received != PROM_WORD_LEN {
            return Err(Error::ShortRead {
                command,
                expected: PROM_WORD_LEN,
                actual: received,
            });
        }
        *word = u16::from_be_bytes(buf);
        debug!("prom C{} = {:#06x}", i, *word);
    }

    match CalibrationTable::from_words(words) {
        Ok(table) => {
            info!("calibration loaded from {:#04x}", address);
            Ok(table)
        }
        Err(mismatch) => {
            warn!("{}", mismatch);
            Err(mismatch.into())
        }
    }
}

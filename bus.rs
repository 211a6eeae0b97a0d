//! Two-wire bus transport consumed by the sensor driver.

use core::fmt::Debug;

use log::trace;
use rppal::i2c::I2c;

/// Byte-level access to a device on the bus.
///
/// One transfer must complete before the next one starts; implementations
/// are not expected to pipeline.
pub trait Bus {
    type Error: Debug;

    /// Writes a single command byte to the device at `address`.
    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error>;

    /// Sends `register` to the device, then reads `buf.len()` bytes back.
    ///
    /// Returns the number of bytes actually received.
    fn read_block(&mut self, address: u8, register: u8, buf: &mut [u8])
        -> Result<usize, Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(address, byte)
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        (**self).read_block(address, register, buf)
    }
}

impl Bus for I2c {
    type Error = rppal::i2c::Error;

    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error> {
        trace!("i2c {:#04x} <- {:#04x}", address, byte);
        self.set_slave_address(u16::from(address))?;
        self.smbus_send_byte(byte)
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.set_slave_address(u16::from(address))?;
        self.block_read(register, buf)?;
        trace!("i2c {:#04x} [{:#04x}] -> {:02x?}", address, register, buf);
        Ok(buf.len())
    }
}

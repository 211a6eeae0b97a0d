//! Raspberry Pi drivers for an MS5803-14BA pressure sensor on I2C and a
//! TLS8204/PCD8544 dot-matrix LCD on SPI.
//!
//! The sensor side reads the factory calibration once, checks its CRC4 and
//! turns raw 24-bit conversions into temperature and pressure:
//!
//! ```ignore
//! let i2c = rppal::i2c::I2c::with_bus(0)?;
//! let delay = rppal::hal::Delay::new();
//! let mut sensor = Ms5803::init(i2c, delay, MS5803_ADDRESS, ConversionDelay::Scaled)?;
//! let reading = sensor.read(Oversampling::Osr4096, true)?;
//! println!("{:.2} C {:.1} mbar", reading.celsius(), reading.millibar());
//! ```

pub mod bus;
pub mod calibration;
pub mod compensation;
pub mod config;
pub mod conversion;
pub mod crc4;
pub mod error;
pub mod font;
pub mod lcd;
pub mod sampling;
pub mod sensor;
pub mod structs;

pub use bus::Bus;
pub use compensation::compensate;
pub use config::{Config, ConfigError};
pub use conversion::{Channel, ConversionDelay, Oversampling};
pub use crc4::{crc4, verify_crc4};
pub use error::{ChecksumMismatch, Error, InvalidParameter};
pub use lcd::{LcdTransport, Nokia3310, RppalLcd};
pub use sampling::{RollingWindow, Summary};
pub use sensor::{FixedChannel, Ms5803, SensorChannel, MS5803_ADDRESS};
pub use structs::{CalibrationTable, RawSample, Reading};

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::bus::Bus;
use crate::calibration;
use crate::compensation::compensate;
use crate::conversion::{self, Channel, ConversionDelay, Oversampling, STARTUP_DELAY_US};
use crate::error::Error;
use crate::structs::{CalibrationTable, RawSample, Reading};

/// Default 7-bit address of the MS5803-14BA with CSB pulled low.
pub const MS5803_ADDRESS: u8 = 0x77;

/// Datasheet example calibration, with a valid CRC in `C[7]`.
pub const DATASHEET_CALIBRATION: CalibrationTable =
    CalibrationTable::from_words_unchecked([0, 46546, 42845, 29751, 29457, 32745, 29059, 0x0006]);

/// Datasheet example conversions for `DATASHEET_CALIBRATION`.
pub const DATASHEET_SAMPLE: RawSample = RawSample {
    pressure: 4311550,
    temperature: 8387300,
};

/// Something that yields raw conversions and the calibration that applies to them.
pub trait SensorChannel {
    type Error;

    fn calibration(&self) -> &CalibrationTable;

    fn raw(&mut self, channel: Channel, oversampling: Oversampling) -> Result<u32, Self::Error>;

    /// Converts pressure, then temperature.
    fn sample(&mut self, oversampling: Oversampling) -> Result<RawSample, Self::Error> {
        let pressure = self.raw(Channel::Pressure, oversampling)?;
        let temperature = self.raw(Channel::Temperature, oversampling)?;
        Ok(RawSample {
            pressure,
            temperature,
        })
    }

    fn read(
        &mut self,
        oversampling: Oversampling,
        second_order: bool,
    ) -> Result<Reading, Self::Error> {
        let sample = self.sample(oversampling)?;
        Ok(compensate(
            self.calibration(),
            sample.pressure,
            sample.temperature,
            second_order,
        ))
    }
}

/// A session with one MS5803-14BA on the bus.
///
/// The calibration table is read once in `init` and never changes afterwards.
pub struct Ms5803<B, D> {
    bus: B,
    delay: D,
    address: u8,
    timing: ConversionDelay,
    calibration: CalibrationTable,
}

impl<B, D> Ms5803<B, D>
where
    B: Bus,
    D: DelayNs,
{
    /// Resets the device, waits for it to start up and loads its calibration.
    pub fn init(
        mut bus: B,
        mut delay: D,
        address: u8,
        timing: ConversionDelay,
    ) -> Result<Self, Error<B::Error>> {
        conversion::reset(&mut bus, address)?;
        delay.delay_us(STARTUP_DELAY_US);
        let calibration = calibration::load(&mut bus, address)?;
        info!("MS5803 ready at {:#04x} ({:?} conversion wait)", address, timing);

        Ok(Self {
            bus,
            delay,
            address,
            timing,
            calibration,
        })
    }

    /// Aborts any pending conversion. The calibration is kept.
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        conversion::reset(&mut self.bus, self.address)?;
        self.delay.delay_us(STARTUP_DELAY_US);
        Ok(())
    }

    /// Runs one conversion; `channel` may be a raw command byte and
    /// `oversampling` a raw index.
    pub fn convert<C, O>(&mut self, channel: C, oversampling: O) -> Result<u32, Error<B::Error>>
    where
        C: TryInto<Channel>,
        O: TryInto<Oversampling>,
        Error<B::Error>: From<C::Error> + From<O::Error>,
    {
        conversion::convert(
            &mut self.bus,
            &mut self.delay,
            self.address,
            channel,
            oversampling,
            self.timing,
        )
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Ends the session and hands back the bus and the delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B, D> SensorChannel for Ms5803<B, D>
where
    B: Bus,
    D: DelayNs,
{
    type Error = Error<B::Error>;

    fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    fn raw(&mut self, channel: Channel, oversampling: Oversampling) -> Result<u32, Self::Error> {
        self.convert(channel, oversampling)
    }
}

/// Hardware-free channel returning constant conversions.
#[derive(Debug, Clone, Copy)]
pub struct FixedChannel {
    calibration: CalibrationTable,
    sample: RawSample,
}

impl FixedChannel {
    pub const fn new(calibration: CalibrationTable, sample: RawSample) -> Self {
        Self {
            calibration,
            sample,
        }
    }

    /// The worked example from the MS5803-14BA datasheet.
    pub const fn datasheet() -> Self {
        Self::new(DATASHEET_CALIBRATION, DATASHEET_SAMPLE)
    }
}

impl SensorChannel for FixedChannel {
    type Error = Infallible;

    fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    fn raw(&mut self, channel: Channel, _oversampling: Oversampling) -> Result<u32, Infallible> {
        Ok(match channel {
            Channel::Pressure => self.sample.pressure,
            Channel::Temperature => self.sample.temperature,
        })
    }
}

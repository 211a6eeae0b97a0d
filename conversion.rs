//! Reset and ADC conversion commands.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::bus::Bus;
use crate::error::{Error, InvalidParameter};

const CMD_RESET: u8 = 0x1E;
const CMD_CONVERT_D1: u8 = 0x40;
const CMD_CONVERT_D2: u8 = 0x50;
const CMD_ADC_READ: u8 = 0x00;
const ADC_LEN: usize = 3;

pub const STARTUP_DELAY_US: u32 = 3_000;

pub const FIXED_CONVERSION_DELAY_US: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Pressure,    // D1
    Temperature, // D2
}

impl Channel {
    pub const fn command(self) -> u8 {
        match self {
            Channel::Pressure => CMD_CONVERT_D1,
            Channel::Temperature => CMD_CONVERT_D2,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = InvalidParameter;

    fn try_from(command: u8) -> Result<Self, Self::Error> {
        match command {
            CMD_CONVERT_D1 => Ok(Channel::Pressure),
            CMD_CONVERT_D2 => Ok(Channel::Temperature),
            other => Err(InvalidParameter::Channel(other)),
        }
    }
}

/// Oversampling ratio; higher ratios trade conversion time for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Oversampling {
    Osr256 = 0,
    Osr512 = 1,
    Osr1024 = 2,
    Osr2048 = 3,
    #[default]
    Osr4096 = 4,
}

impl Oversampling {
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn ratio(self) -> u16 {
        256 << (self as u16)
    }

    pub const fn max_conversion_time_us(self) -> u32 {
        match self {
            Oversampling::Osr256 => 600,
            Oversampling::Osr512 => 1_170,
            Oversampling::Osr1024 => 2_280,
            Oversampling::Osr2048 => 4_540,
            Oversampling::Osr4096 => 9_040,
        }
    }
}

impl TryFrom<i32> for Oversampling {
    type Error = InvalidParameter;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Oversampling::Osr256),
            1 => Ok(Oversampling::Osr512),
            2 => Ok(Oversampling::Osr1024),
            3 => Ok(Oversampling::Osr2048),
            4 => Ok(Oversampling::Osr4096),
            other => Err(InvalidParameter::Oversampling(other)),
        }
    }
}

/// How long to wait between starting a conversion and reading the ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionDelay {
    Fixed,
    /// Datasheet maximum for the selected oversampling.
    #[default]
    Scaled,
}

impl ConversionDelay {
    pub const fn wait_us(self, oversampling: Oversampling) -> u32 {
        match self {
            ConversionDelay::Fixed => FIXED_CONVERSION_DELAY_US,
            ConversionDelay::Scaled => oversampling.max_conversion_time_us(),
        }
    }
}

/// Sends the reset command, aborting any conversion in progress.
///
/// Callers must wait `STARTUP_DELAY_US` before the next command.
pub fn reset<B: Bus>(bus: &mut B, address: u8) -> Result<(), Error<B::Error>> {
    debug!("reset {:#04x}", address);
    bus.write_byte(address, CMD_RESET).map_err(Error::Bus)
}

/// Runs one ADC conversion and returns the raw 24-bit result.
///
/// `channel` may be a `Channel` or a raw conversion command (`0x40`, `0x50`),
/// `oversampling` an `Oversampling` or a raw index. Anything else fails with
/// `InvalidParameter` before anything is sent.
pub fn convert<B, D, C, O>(
    bus: &mut B,
    delay: &mut D,
    address: u8,
    channel: C,
    oversampling: O,
    timing: ConversionDelay,
) -> Result<u32, Error<B::Error>>
where
    B: Bus,
    D: DelayNs,
    C: TryInto<Channel>,
    O: TryInto<Oversampling>,
    Error<B::Error>: From<C::Error> + From<O::Error>,
{
    let channel = channel.try_into()?;
    let oversampling = oversampling.try_into()?;
    let command = channel.command() | (2 * oversampling.index());

    bus.write_byte(address, command).map_err(Error::Bus)?;
    delay.delay_us(timing.wait_us(oversampling));

    let mut buf = [0u8; ADC_LEN];
    let received = bus
        .read_block(address, CMD_ADC_READ, &mut buf)
        .map_err(Error::Bus)?;
    if received != ADC_LEN {
        return Err(Error::ShortRead {
            command: CMD_ADC_READ,
            expected: ADC_LEN,
            actual: received,
        });
    }

    let [high, mid, low] = buf;
    let value = (u32::from(high) << 16) | (u32::from(mid) << 8) | u32::from(low);
    debug!("{:?} @ OSR {}: {}", channel, oversampling.ratio(), value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::testing::{FakeBus, NoDelay};

    fn fake() -> FakeBus {
        FakeBus::new([0; 8], 4311550, 8387300)
    }

    #[test]
    fn oversampling_indices() {
        for index in 0i32..=4 {
            let osr = Oversampling::try_from(index).unwrap();
            assert_eq!(i32::from(osr.index()), index);
        }
        assert_eq!(Oversampling::Osr256.ratio(), 256);
        assert_eq!(Oversampling::Osr4096.ratio(), 4096);
        assert_eq!(
            Oversampling::try_from(-1),
            Err(InvalidParameter::Oversampling(-1))
        );
        assert_eq!(
            Oversampling::try_from(5),
            Err(InvalidParameter::Oversampling(5))
        );
    }

    #[test]
    fn channel_commands() {
        assert_eq!(Channel::try_from(0x40), Ok(Channel::Pressure));
        assert_eq!(Channel::try_from(0x50), Ok(Channel::Temperature));
        assert_eq!(Channel::try_from(0x48), Err(InvalidParameter::Channel(0x48)));
    }

    #[test]
    fn reset_writes_command() {
        let mut bus = fake();
        reset(&mut bus, 0x77).unwrap();
        assert_eq!(bus.writes, [(0x77, 0x1E)]);
    }

    #[test]
    fn converts_pressure_and_temperature() {
        let mut bus = fake();
        let mut delay = NoDelay::default();

        let d1 = convert(
            &mut bus,
            &mut delay,
            0x77,
            Channel::Pressure,
            Oversampling::Osr4096,
            ConversionDelay::Fixed,
        )
        .unwrap();
        let d2 = convert(
            &mut bus,
            &mut delay,
            0x77,
            Channel::Temperature,
            Oversampling::Osr256,
            ConversionDelay::Fixed,
        )
        .unwrap();

        assert_eq!(d1, 4311550);
        assert_eq!(d2, 8387300);
        assert_eq!(bus.writes, [(0x77, 0x48), (0x77, 0x50)]);
        assert_eq!(bus.reads, [(0x77, 0x00, 3), (0x77, 0x00, 3)]);
        assert_eq!(delay.waits_us, [10_000, 10_000]);
    }

    #[test]
    fn accepts_raw_indices() {
        for index in 0i32..=4 {
            let mut bus = fake();
            let mut delay = NoDelay::default();
            let value = convert(
                &mut bus,
                &mut delay,
                0x77,
                Channel::Temperature,
                index,
                ConversionDelay::Scaled,
            )
            .unwrap();
            assert_eq!(value, 8387300);
            assert_eq!(bus.writes, [(0x77, 0x50 | (2 * index as u8))]);
        }
    }

    #[test]
    fn out_of_range_index_touches_nothing() {
        for index in [-1i32, 5] {
            let mut bus = fake();
            let mut delay = NoDelay::default();
            let err = convert(
                &mut bus,
                &mut delay,
                0x77,
                Channel::Pressure,
                index,
                ConversionDelay::Scaled,
            )
            .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter(InvalidParameter::Oversampling(i)) if i == index
            ));
            assert_eq!(bus.transfers(), 0);
            assert!(delay.waits_us.is_empty());
        }
    }

    #[test]
    fn accepts_raw_commands() {
        let mut bus = fake();
        let mut delay = NoDelay::default();
        let d1 = convert(&mut bus, &mut delay, 0x77, 0x40u8, 2i32, ConversionDelay::Fixed);
        let d2 = convert(&mut bus, &mut delay, 0x77, 0x50u8, 2i32, ConversionDelay::Fixed);
        assert_eq!(d1.unwrap(), 4311550);
        assert_eq!(d2.unwrap(), 8387300);
        assert_eq!(bus.writes, [(0x77, 0x44), (0x77, 0x54)]);
    }

    #[test]
    fn unknown_command_touches_nothing() {
        for command in [0x00u8, 0x48, 0x1E, 0xA0] {
            let mut bus = fake();
            let mut delay = NoDelay::default();
            let err = convert(
                &mut bus,
                &mut delay,
                0x77,
                command,
                Oversampling::Osr256,
                ConversionDelay::Scaled,
            )
            .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter(InvalidParameter::Channel(c)) if c == command
            ));
            assert_eq!(bus.transfers(), 0);
            assert!(delay.waits_us.is_empty());
        }
    }

    #[test]
    fn scaled_wait_covers_datasheet_maximum() {
        let mut bus = fake();
        let mut delay = NoDelay::default();
        for osr in [
            Oversampling::Osr256,
            Oversampling::Osr512,
            Oversampling::Osr1024,
            Oversampling::Osr2048,
            Oversampling::Osr4096,
        ] {
            convert(
                &mut bus,
                &mut delay,
                0x77,
                Channel::Pressure,
                osr,
                ConversionDelay::Scaled,
            )
            .unwrap();
        }
        assert_eq!(delay.waits_us, [600, 1_170, 2_280, 4_540, 9_040]);
        assert!(delay.waits_us.iter().all(|&us| us <= FIXED_CONVERSION_DELAY_US));
    }

    #[test]
    fn short_adc_read() {
        let mut bus = fake();
        bus.short_read_at = Some(0x00);
        let mut delay = NoDelay::default();
        let err = convert(
            &mut bus,
            &mut delay,
            0x77,
            Channel::Pressure,
            Oversampling::Osr4096,
            ConversionDelay::Scaled,
        )
        .unwrap_err();
        assert!(err.is_bus_error());
    }
}

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use rpms5803::{
    Bus, Channel, ConversionDelay, Error, Ms5803, Oversampling, RollingWindow, SensorChannel,
    MS5803_ADDRESS,
};

const PROM: [u16; 8] = [0, 46546, 42845, 29751, 29457, 32745, 29059, 0x0006];

/// Replays canned responses and records every command byte.
#[derive(Default)]
struct ScriptedBus {
    responses: VecDeque<Vec<u8>>,
    commands: Vec<u8>,
}

impl ScriptedBus {
    fn with_prom(prom: [u16; 8]) -> Self {
        let mut bus = Self::default();
        for word in prom {
            bus.responses.push_back(word.to_be_bytes().to_vec());
        }
        bus
    }

    fn adc(mut self, value: u32) -> Self {
        self.responses.push_back(value.to_be_bytes()[1..].to_vec());
        self
    }
}

impl Bus for ScriptedBus {
    type Error = &'static str;

    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error> {
        assert_eq!(address, MS5803_ADDRESS);
        self.commands.push(byte);
        Ok(())
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        assert_eq!(address, MS5803_ADDRESS);
        self.commands.push(register);
        let response = self.responses.pop_front().ok_or("nack")?;
        let len = response.len().min(buf.len());
        buf[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }
}

#[derive(Default)]
struct TotalDelay {
    us: u64,
}

impl DelayNs for TotalDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.us += u64::from(ns) / 1_000;
    }
}

#[test]
fn full_session_reproduces_datasheet() {
    let bus = ScriptedBus::with_prom(PROM).adc(4311550).adc(8387300);
    let mut sensor = Ms5803::init(
        bus,
        TotalDelay::default(),
        MS5803_ADDRESS,
        ConversionDelay::Fixed,
    )
    .unwrap();

    let reading = sensor.read(Oversampling::Osr4096, false).unwrap();
    assert_eq!(reading.celsius(), 20.15);
    assert_eq!(reading.millibar(), 1000.5);

    let (bus, delay) = sensor.release();
    assert_eq!(
        bus.commands,
        [0x1E, 0xA0, 0xA2, 0xA4, 0xA6, 0xA8, 0xAA, 0xAC, 0xAE, 0x48, 0x00, 0x58, 0x00]
    );
    // Startup plus two worst-case conversion waits.
    assert!(delay.us >= 3_000 + 2 * 10_000);
}

#[test]
fn rolling_window_over_session() {
    let mut bus = ScriptedBus::with_prom(PROM);
    for _ in 0..6 {
        bus = bus.adc(4311550).adc(8387300);
    }
    let mut sensor = Ms5803::init(
        bus,
        TotalDelay::default(),
        MS5803_ADDRESS,
        ConversionDelay::Scaled,
    )
    .unwrap();

    let mut window = RollingWindow::default();
    for _ in 0..6 {
        window.push(sensor.read(Oversampling::Osr2048, true).unwrap());
    }
    let summary = window.summary().unwrap();
    assert_eq!(summary.temperature.average, 20.15);
    assert_eq!(summary.pressure.spread(), 0.0);
    assert_eq!(window.len(), 5);
}

#[test]
fn exhausted_bus_is_a_bus_error() {
    let bus = ScriptedBus::with_prom(PROM);
    let mut sensor = Ms5803::init(
        bus,
        TotalDelay::default(),
        MS5803_ADDRESS,
        ConversionDelay::Scaled,
    )
    .unwrap();

    let err = sensor.convert(Channel::Pressure, Oversampling::Osr256).unwrap_err();
    assert!(err.is_bus_error());
    assert!(matches!(err, Error::Bus("nack")));
}

#[test]
fn truncated_prom_word_is_short_read() {
    let mut bus = ScriptedBus::with_prom(PROM);
    bus.responses[2] = vec![0xA7];
    let result = Ms5803::init(
        bus,
        TotalDelay::default(),
        MS5803_ADDRESS,
        ConversionDelay::Scaled,
    );
    assert!(matches!(
        result,
        Err(Error::ShortRead {
            command: 0xA4,
            expected: 2,
            actual: 1
        })
    ));
}

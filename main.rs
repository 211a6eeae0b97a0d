use std::error::Error as StdError;
use std::thread;

use log::{error, info, warn};
use rppal::hal::Delay;
use rppal::i2c::I2c;

use rpms5803::lcd::LcdError;
use rpms5803::sampling::WINDOW_LEN;
use rpms5803::{
    crc4, verify_crc4, Config, FixedChannel, LcdTransport, Ms5803, Nokia3310, Oversampling,
    RollingWindow, RppalLcd, SensorChannel, Summary,
};

// CRC4 test vector from MEAS application note AN520.
const CRC4_VECTOR: [u16; 8] = [
    0x3132, 0x3334, 0x3536, 0x3738, 0x3940, 0x4142, 0x4344, 0x4500,
];
const CRC4_EXPECTED: u8 = 0x0B;

fn self_test() {
    let mut words = CRC4_VECTOR;
    assert_eq!(crc4(&words), CRC4_EXPECTED, "CRC4 self-test");
    words[7] |= u16::from(CRC4_EXPECTED);
    assert!(verify_crc4(&words).is_ok(), "CRC4 verification self-test");

    // Datasheet values only need first-order compensation, but the second
    // order terms must not change them either.
    let mut channel = FixedChannel::datasheet();
    for second_order in [false, true] {
        let reading = match channel.read(Oversampling::Osr4096, second_order) {
            Ok(reading) => reading,
            Err(never) => match never {},
        };
        assert_eq!(reading.celsius(), 20.15, "temperature self-test");
        assert_eq!(reading.millibar(), 1000.5, "pressure self-test");
    }

    info!("self-test passed");
}

fn show<T: LcdTransport>(
    lcd: &mut Nokia3310<T>,
    summary: &Summary,
) -> Result<(), LcdError<T::Error>> {
    lcd.goto(0, 1)?;
    lcd.text(&format!("{:>8.2} C", summary.temperature.average))?;
    lcd.goto(0, 3)?;
    lcd.text(&format!("{:>7.1} mb", summary.pressure.average))
}

fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::init();

    self_test();

    let config = Config::from_env()?;
    info!("{:?}", config);

    let i2c = I2c::with_bus(config.i2c_bus)?;
    let mut sensor = Ms5803::init(i2c, Delay::new(), config.address, config.conversion_delay)?;

    let mut lcd = if config.lcd {
        let mut lcd = Nokia3310::new(RppalLcd::open()?);
        lcd.setup()?;
        Some(lcd)
    } else {
        None
    };

    let mut window = RollingWindow::new(WINDOW_LEN);
    loop {
        match sensor.read(config.oversampling, config.second_order) {
            Ok(reading) => {
                let summary = window.push(reading);
                println!("{}", summary);
                if let Some(lcd) = lcd.as_mut() {
                    if let Err(e) = show(lcd, &summary) {
                        warn!("LCD update failed: {}", e);
                    }
                }
            }
            Err(e) if e.is_bus_error() => warn!("sample skipped: {}", e),
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        }
        thread::sleep(config.poll_interval);
    }
}

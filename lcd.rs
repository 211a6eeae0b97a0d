//! Nokia 3310 style 84x48 LCD driven by a TLS8204 (or PCD8544) over SPI.
//!
//! Only the basic instruction set and the first extended set are used. Apart
//! from `start_line`, which the PCD8544 lacks, everything here also works on
//! a PCD8544.

use core::fmt::Debug;

use log::debug;
use rppal::gpio::{Gpio, OutputPin};
use rppal::spi::{Bus as SpiBus, Mode, SlaveSelect, Spi};
use thiserror_no_std::Error;

use crate::font;

pub const LCD_WIDTH: usize = 84;
pub const LCD_HEIGHT: usize = 48;
/// Rows of 8 pixels addressed by `set_y`.
pub const LCD_BANKS: usize = LCD_HEIGHT / 8;
/// Start line that maps the 6 visible banks onto the TLS8204's 68 lines.
pub const LCD_START_LINE: u8 = 66 - 2;

/// BCM pin driving the data/command select line.
pub const DC_PIN: u8 = 25;
/// BCM pin driving the controller's reset line.
pub const RESET_PIN: u8 = 24;
const SPI_CLOCK_HZ: u32 = 1_000_000;

/// Empirically determined for the Olimex MOD-LCD3310.
const BIAS: u8 = 4;
const VOP: u8 = 80;

/// Command/data transport to the controller.
pub trait LcdTransport {
    type Error: Debug;

    /// Sends `bytes` with D/C low.
    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Sends `bytes` with D/C high.
    fn send_data(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Pulses the hardware reset line.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum RppalLcdError {
    #[error(transparent)]
    Spi(#[from] rppal::spi::Error),
    #[error(transparent)]
    Gpio(#[from] rppal::gpio::Error),
}

/// `LcdTransport` on SPI0/CE0 plus two GPIO lines.
pub struct RppalLcd {
    spi: Spi,
    dc: OutputPin,
    reset: OutputPin,
}

impl RppalLcd {
    pub fn new(dc_pin: u8, reset_pin: u8) -> Result<Self, RppalLcdError> {
        let spi = Spi::new(SpiBus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)?;
        let gpio = Gpio::new()?;
        let dc = gpio.get(dc_pin)?.into_output_low();
        let reset = gpio.get(reset_pin)?.into_output_high();
        Ok(Self { spi, dc, reset })
    }

    /// Opens the transport with the MOD-LCD3310 wiring.
    pub fn open() -> Result<Self, RppalLcdError> {
        Self::new(DC_PIN, RESET_PIN)
    }
}

impl LcdTransport for RppalLcd {
    type Error = RppalLcdError;

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_low();
        self.spi.write(bytes)?;
        Ok(())
    }

    fn send_data(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high();
        self.spi.write(bytes)?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.reset.set_low();
        self.reset.set_high();
        Ok(())
    }
}

/// Instruction set selected by the last function-set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstructionSet {
    Basic = 0x00,
    Extended = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    Blank = 0x00,
    AllOn = 0x01,
    Normal = 0x04,
    Inverse = 0x05,
}

#[derive(Debug, Error)]
pub enum LcdError<E: Debug> {
    #[error("LCD transport failed: {0:?}")]
    Transport(E),
    #[error("command needs the {expected:?} instruction set, controller is in {actual:?}")]
    WrongInstructionSet {
        expected: InstructionSet,
        actual: InstructionSet,
    },
}

pub struct Nokia3310<T> {
    transport: T,
    instruction_set: InstructionSet,
}

impl<T: LcdTransport> Nokia3310<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            instruction_set: InstructionSet::Basic,
        }
    }

    pub fn instruction_set(&self) -> InstructionSet {
        self.instruction_set
    }

    pub fn release(self) -> T {
        self.transport
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), LcdError<T::Error>> {
        self.transport.send_command(bytes).map_err(LcdError::Transport)
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), LcdError<T::Error>> {
        self.transport.send_data(bytes).map_err(LcdError::Transport)
    }

    fn require(&self, expected: InstructionSet) -> Result<(), LcdError<T::Error>> {
        if self.instruction_set == expected {
            Ok(())
        } else {
            Err(LcdError::WrongInstructionSet {
                expected,
                actual: self.instruction_set,
            })
        }
    }

    pub fn reset(&mut self) -> Result<(), LcdError<T::Error>> {
        self.transport.reset().map_err(LcdError::Transport)?;
        self.instruction_set = InstructionSet::Basic;
        Ok(())
    }

    pub fn function_set(
        &mut self,
        instruction_set: InstructionSet,
        power_down: bool,
    ) -> Result<(), LcdError<T::Error>> {
        let mut cmd = 0x20 | instruction_set as u8;
        if power_down {
            cmd |= 0x04;
        }
        self.command(&[cmd])?;
        self.instruction_set = instruction_set;
        Ok(())
    }

    pub fn display_control(&mut self, mode: DisplayMode) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Basic)?;
        self.command(&[0x08 | mode as u8])
    }

    pub fn set_x(&mut self, x: u8) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Basic)?;
        self.command(&[0x80 | (x & 0x7F)])
    }

    pub fn set_y(&mut self, y: u8) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Basic)?;
        self.command(&[0x40 | (y & 0x07)])
    }

    pub fn goto(&mut self, x: u8, y: u8) -> Result<(), LcdError<T::Error>> {
        self.set_x(x)?;
        self.set_y(y)
    }

    pub fn vlcd_range(&mut self, high: bool) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Basic)?;
        self.command(&[0x04 | u8::from(high)])
    }

    /// Bit order of display RAM: top-down, or bottom-up when `reverse`.
    pub fn display_config(&mut self, reverse: bool) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Extended)?;
        self.command(&[0x08 | if reverse { 0x04 } else { 0x00 }])
    }

    pub fn bias(&mut self, mode: u8) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Extended)?;
        self.command(&[0x10 | (mode & 0x07)])
    }

    /// TLS8204 only.
    pub fn start_line(&mut self, line: u8) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Extended)?;
        self.command(&[0x04 | ((line >> 6) & 0x01)])?;
        self.command(&[0x40 | (line & 0x3F)])
    }

    /// Operating voltage, i.e. contrast.
    pub fn vop(&mut self, vop: u8) -> Result<(), LcdError<T::Error>> {
        self.require(InstructionSet::Extended)?;
        self.command(&[0x80 | (vop & 0x7F)])
    }

    /// Resets and configures the panel, then clears it.
    pub fn setup(&mut self) -> Result<(), LcdError<T::Error>> {
        self.reset()?;

        self.function_set(InstructionSet::Basic, false)?;
        self.vlcd_range(false)?;

        self.function_set(InstructionSet::Extended, false)?;
        self.start_line(LCD_START_LINE)?;
        self.bias(BIAS)?;
        self.vop(VOP)?;

        self.function_set(InstructionSet::Basic, false)?;
        self.clear()?;
        self.display_control(DisplayMode::Normal)?;
        debug!("LCD configured");
        Ok(())
    }

    /// Writes `pattern` to every column of every bank.
    pub fn fill(&mut self, pattern: u8) -> Result<(), LcdError<T::Error>> {
        for bank in 0..LCD_BANKS as u8 {
            self.goto(0, bank)?;
            self.data(&[pattern; LCD_WIDTH])?;
        }
        self.goto(0, 0)
    }

    pub fn clear(&mut self) -> Result<(), LcdError<T::Error>> {
        self.fill(0x00)
    }

    /// Lights every pixel without touching display RAM.
    pub fn overlay_fill(&mut self) -> Result<(), LcdError<T::Error>> {
        self.display_control(DisplayMode::AllOn)
    }

    /// Blanks the panel without touching display RAM.
    pub fn overlay_clear(&mut self) -> Result<(), LcdError<T::Error>> {
        self.display_control(DisplayMode::Blank)
    }

    pub fn test_pattern(&mut self) -> Result<(), LcdError<T::Error>> {
        self.fill(0xA5)
    }

    /// Draws a bank-ordered bitmap, `LCD_WIDTH` bytes per bank.
    ///
    /// The controller's RAM is wider than the panel, so each bank is
    /// addressed separately.
    pub fn bitmap(&mut self, bitmap: &[u8]) -> Result<(), LcdError<T::Error>> {
        for (bank, row) in bitmap.chunks(LCD_WIDTH).take(LCD_BANKS).enumerate() {
            self.goto(0, bank as u8)?;
            self.data(row)?;
        }
        Ok(())
    }

    /// Draws one 7-pixel wide character at the current address.
    pub fn character(&mut self, c: char) -> Result<(), LcdError<T::Error>> {
        let mut columns = [0u8; 7];
        columns[1..6].copy_from_slice(font::glyph(c));
        self.data(&columns)
    }

    pub fn text(&mut self, text: &str) -> Result<(), LcdError<T::Error>> {
        text.chars().try_for_each(|c| self.character(c))
    }
}

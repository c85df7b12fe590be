use crate::MotorError;
use embedded_hal::blocking::i2c::{Write, WriteRead};
use hal::I2cdev;
use linux_embedded_hal as hal;
use std::fmt::Debug;
use std::path::Path;

/// Fixed I2C address of the MCP23017 with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Bus the expander hangs off on a Raspberry Pi revision 2 and later.
pub const DEFAULT_DEVICE: &str = "/dev/i2c-1";

/// MCP23017 registers (IOCON.BANK = 0 layout).
pub mod reg {
    pub const IODIRA: u8 = 0x00;
    pub const IODIRB: u8 = 0x01;
    pub const GPIOA: u8 = 0x12;
    pub const GPIOB: u8 = 0x13;
}

/// A device addressed by 8-bit registers.
pub trait RegisterDevice {
    fn address(&self) -> u8;

    fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), MotorError>;

    fn read_register(&mut self, register: u8) -> Result<u8, MotorError>;
}

pub struct Mcp23017<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Mcp23017<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
        }
    }

    /// Gives back the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl Mcp23017<I2cdev> {
    /// Opens the expander on a Linux I2C character device such as
    /// `/dev/i2c-1`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MotorError> {
        let path = path.as_ref();
        let i2c = I2cdev::new(path).map_err(|e| MotorError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(i2c))
    }
}

impl<I2C, E> RegisterDevice for Mcp23017<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    fn address(&self) -> u8 {
        self.address
    }

    fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), MotorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| MotorError::Write {
                register,
                value,
                message: format!("{:?}", e),
            })
    }

    fn read_register(&mut self, register: u8) -> Result<u8, MotorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| MotorError::Read {
                register,
                message: format!("{:?}", e),
            })?;
        Ok(buf[0])
    }
}

/// Stands in for the expander when simulating. Any bus access is an error,
/// so a simulated run that tries to touch hardware fails loudly.
#[derive(Debug, Default)]
pub struct Detached;

impl RegisterDevice for Detached {
    fn address(&self) -> u8 {
        DEFAULT_ADDRESS
    }

    fn write_register(
        &mut self,
        _register: u8,
        _value: u8,
    ) -> Result<(), MotorError> {
        Err(MotorError::Detached)
    }

    fn read_register(&mut self, _register: u8) -> Result<u8, MotorError> {
        Err(MotorError::Detached)
    }
}

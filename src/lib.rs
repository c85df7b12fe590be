//! Turn a stepper motor wired to bank A of an MCP23017 I2C IO expander.
//!
//! A [`Driver`] owns the expander and writes one coil mask per step to the
//! bank A output register, sleeping between writes. Simulate mode logs the
//! writes it would make without touching the bus.

use log::{debug, info};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

pub mod cli;
pub mod expander;
pub mod sequence;
pub mod stepper;

pub use expander::{Detached, Mcp23017, RegisterDevice};
pub use sequence::{masks_for, CoilPattern};
pub use stepper::{step_count, DriveParameters, Driver, StepDirection};

#[derive(Error, Debug)]
pub enum MotorError {
    #[error("couldn't open I2C device {path}: {message}")]
    Open { path: String, message: String },
    #[error(
        "write of 0x{value:02X} to register 0x{register:02X} failed: {message}"
    )]
    Write {
        register: u8,
        value: u8,
        message: String,
    },
    #[error("read of register 0x{register:02X} failed: {message}")]
    Read { register: u8, message: String },
    #[error("no I2C device attached")]
    Detached,
    #[error("can't turn {0} degrees")]
    InvalidDegrees(f64),
    #[error("can't sleep {0} seconds between steps")]
    InvalidDelay(f64),
    #[error("interrupted after {completed} of {total} steps")]
    Interrupted { completed: u64, total: u64 },
}

/// Performs one invocation: set up bank A, turn by `params`, then rest the
/// coils. The coils are also rested if turning fails part way.
pub fn run<D: RegisterDevice>(
    device: D,
    params: DriveParameters,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<(), MotorError> {
    info!(
        "turn {} degrees {} steps",
        params.degrees,
        params.steps()
    );
    debug!("sleep time {:.3}", params.delay.as_secs_f64());
    if params.simulate {
        debug!("simulating, no output to device");
    }
    if params.direction == StepDirection::Backward {
        debug!("reverse direction");
    }
    debug!("using {} sequence", params.pattern.name());

    let mut driver = Driver::new(device, params);
    if let Some(flag) = cancel {
        driver = driver.with_cancel(flag);
    }
    driver.turn()
}

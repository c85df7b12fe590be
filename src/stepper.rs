use crate::expander::{reg, RegisterDevice};
use crate::sequence::{masks_for, CoilPattern};
use crate::MotorError;
use log::{debug, error, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// 510 steps turn the shaft through a full 360 degrees.
pub const DEGREE_RATE: f64 = 510.0 / 360.0;

/// Delay between two coil writes unless told otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(6);

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Converts an angle into the number of sequence cycles needed to turn it.
pub fn step_count(degrees: f64) -> u64 {
    // Negative angles saturate to zero.
    (degrees * DEGREE_RATE).round() as u64
}

/// Everything one invocation needs to know about how to turn the motor.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveParameters {
    pub degrees: f64,
    pub pattern: CoilPattern,
    pub direction: StepDirection,
    pub simulate: bool,
    pub delay: Duration,
    pub verbosity: u8,
}

impl DriveParameters {
    pub fn try_new(degrees: f64) -> Result<Self, MotorError> {
        if !degrees.is_finite()
            || degrees < 0.0
            || (degrees * DEGREE_RATE).round() >= u64::MAX as f64
        {
            return Err(MotorError::InvalidDegrees(degrees));
        }
        Ok(Self {
            degrees,
            pattern: CoilPattern::FourStep,
            direction: StepDirection::Forward,
            simulate: false,
            delay: DEFAULT_DELAY,
            verbosity: 0,
        })
    }

    /// Sets the pause after every coil write, in seconds.
    pub fn with_delay_secs(mut self, secs: f64) -> Result<Self, MotorError> {
        self.delay = Duration::try_from_secs_f64(secs)
            .map_err(|_| MotorError::InvalidDelay(secs))?;
        Ok(self)
    }

    pub fn steps(&self) -> u64 {
        step_count(self.degrees)
    }
}

/// Sequences coil writes to bank A of the expander.
///
/// Dropping a driver whose coils are still energized writes 0 to the output
/// register, so the motor never keeps drawing current after an error or an
/// interrupt.
pub struct Driver<D: RegisterDevice> {
    device: D,
    params: DriveParameters,
    energized: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl<D: RegisterDevice> Driver<D> {
    pub fn new(device: D, params: DriveParameters) -> Self {
        Self {
            device,
            params,
            energized: false,
            cancel: None,
        }
    }

    /// Stops `drive` before its next write once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn params(&self) -> &DriveParameters {
        &self.params
    }

    /// Makes every pin of bank A an output.
    pub fn setup(&mut self) -> Result<(), MotorError> {
        debug!(
            "prepare bus: address 0x{:02x} bank A 0x{:02x} bank B 0x{:02x}",
            self.device.address(),
            reg::IODIRA,
            reg::IODIRB
        );
        if self.params.simulate {
            debug!("simulating, bank A left unconfigured");
            return Ok(());
        }
        self.device.write_register(reg::IODIRA, 0x00)
    }

    /// Runs `steps` full cycles of `pattern`, pausing `delay` after each
    /// write. Any failed write aborts the remaining cycles.
    pub fn drive(
        &mut self,
        steps: u64,
        pattern: CoilPattern,
        direction: StepDirection,
        delay: Duration,
    ) -> Result<(), MotorError> {
        let masks = masks_for(pattern);
        let total = steps.saturating_mul(masks.len() as u64);
        info!(
            "----- {} steps using {} sequence, delay {:.3} -----",
            steps,
            pattern.name(),
            delay.as_secs_f64()
        );
        if self.params.verbosity > 1 {
            match direction {
                StepDirection::Forward => debug!("turn ->"),
                StepDirection::Backward => debug!("turn <-"),
            }
        }

        let mut completed = 0u64;
        for _ in 0..steps {
            for i in 0..masks.len() {
                let index = match direction {
                    StepDirection::Forward => i,
                    StepDirection::Backward => masks.len() - 1 - i,
                };
                if self.cancelled() {
                    return Err(MotorError::Interrupted { completed, total });
                }
                self.write_output(masks[index])?;
                completed += 1;
                thread::sleep(delay);
            }
        }
        Ok(())
    }

    /// De-energizes every coil.
    pub fn rest(&mut self) -> Result<(), MotorError> {
        self.write_output(0x00)?;
        self.energized = false;
        Ok(())
    }

    /// Configures the bank, turns by the stored parameters and rests.
    pub fn turn(&mut self) -> Result<(), MotorError> {
        let steps = self.params.steps();
        let pattern = self.params.pattern;
        let direction = self.params.direction;
        let delay = self.params.delay;
        self.setup()?;
        self.drive(steps, pattern, direction, delay)?;
        self.rest()
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    fn write_output(&mut self, value: u8) -> Result<(), MotorError> {
        let register = reg::GPIOA;
        trace!(
            "Set  : Address 0x{:02x}  Register 0x{:02x} \
             / Value 0x{:02X} = {:#b}",
            self.device.address(),
            register,
            value,
            value
        );
        if self.params.simulate {
            return Ok(());
        }
        self.device.write_register(register, value)?;
        self.energized = value != 0;
        if self.params.verbosity > 3 {
            let read = self.device.read_register(register)?;
            trace!(
                "Read : Address 0x{:02x}  Register 0x{:02x} \
                 / Value 0x{:02X} = {:#b}",
                self.device.address(),
                register,
                read,
                read
            );
        }
        Ok(())
    }

    fn rest_quietly(&mut self) {
        if let Err(e) = self.rest() {
            error!("couldn't release the coils: {}", e);
        }
    }
}

impl<D: RegisterDevice> Drop for Driver<D> {
    fn drop(&mut self) {
        if self.energized {
            self.rest_quietly();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_rounds() {
        assert_eq!(step_count(360.0), 510);
        assert_eq!(step_count(180.0), 255);
        assert_eq!(step_count(0.0), 0);
        // 2 * 510 / 360 = 2.83
        assert_eq!(step_count(2.0), 3);
        assert_eq!(step_count(1.0), 1);
    }

    #[test]
    fn step_count_beyond_u32() {
        // The largest angle the command line accepts.
        let degrees = f64::from(u32::MAX);
        assert_eq!(step_count(degrees), 6_084_537_001);
        let params = DriveParameters::try_new(degrees).unwrap();
        assert!(params.steps() > u64::from(u32::MAX));
        assert!(matches!(
            DriveParameters::try_new(1e300),
            Err(MotorError::InvalidDegrees(_))
        ));
    }

    #[test]
    fn parameters_default() {
        let params = DriveParameters::try_new(90.0).unwrap();
        assert_eq!(params.pattern, CoilPattern::FourStep);
        assert_eq!(params.direction, StepDirection::Forward);
        assert_eq!(params.delay, Duration::from_millis(6));
        assert_eq!(params.verbosity, 0);
        assert!(!params.simulate);
        assert_eq!(params.steps(), 128);
    }

    #[test]
    fn negative_degrees_rejected() {
        assert!(matches!(
            DriveParameters::try_new(-10.0),
            Err(MotorError::InvalidDegrees(_))
        ));
        assert!(DriveParameters::try_new(f64::NAN).is_err());
    }

    #[test]
    fn delay_must_fit_a_duration() {
        let params = DriveParameters::try_new(10.0).unwrap();
        assert!(matches!(
            params.clone().with_delay_secs(-0.1),
            Err(MotorError::InvalidDelay(_))
        ));
        assert!(matches!(
            params.clone().with_delay_secs(1e300),
            Err(MotorError::InvalidDelay(_))
        ));
        let params = params.with_delay_secs(0.25).unwrap();
        assert_eq!(params.delay, Duration::from_millis(250));
    }
}

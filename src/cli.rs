use crate::expander::DEFAULT_DEVICE;
use crate::sequence::CoilPattern;
use crate::stepper::{DriveParameters, StepDirection};
use crate::MotorError;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

pub const USAGE_EXAMPLES: &str = "\
Examples
step -d 360          # turn 360 degrees
step -d 360 -r       # turn 360 degrees into reverse direction
step -d 360 -s       # turn 360 degrees using 8 step sequence
step -d 360 -t 0.01  # turn 360 degrees with delay of 0.01 seconds
step -d 360 -n -v 2  # simulate and print debug messages";

/// Write to an MCP23017 over I2C to turn a stepper motor.
#[derive(Debug, Parser)]
#[command(name = "step", version, about, after_help = USAGE_EXAMPLES)]
pub struct Args {
    /// Turn this many degrees
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub degree: u32,

    /// Use the 8 step sequence with strong torque
    #[arg(short, long)]
    pub strong: bool,

    /// Sleep TIME seconds after every step
    #[arg(short, long, default_value_t = 0.006, value_parser = parse_delay)]
    pub time: f64,

    /// No write, just simulate
    #[arg(short, long)]
    pub nowrite: bool,

    /// Reverse direction
    #[arg(short, long)]
    pub reverse: bool,

    /// Output verbosity, 0 to 4
    #[arg(short, long, default_value_t = 0)]
    pub verbose: u8,

    /// I2C bus the expander is attached to
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
}

fn parse_delay(s: &str) -> Result<f64, String> {
    let secs: f64 =
        s.parse().map_err(|_| format!("`{}` isn't a number", s))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("`{}` isn't a usable delay", s))?;
    Ok(secs)
}

pub fn parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args)
}

impl Args {
    pub fn parameters(&self) -> Result<DriveParameters, MotorError> {
        let mut params = DriveParameters::try_new(f64::from(self.degree))?
            .with_delay_secs(self.time)?;
        if self.strong {
            params.pattern = CoilPattern::EightStep;
        }
        if self.reverse {
            params.direction = StepDirection::Backward;
        }
        params.simulate = self.nowrite;
        params.verbosity = self.verbose;
        Ok(params)
    }
}

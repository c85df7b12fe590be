use anyhow::Context;
use clap::error::ErrorKind;
use log::{warn, LevelFilter};
use mcp_stepper::cli::{self, USAGE_EXAMPLES};
use mcp_stepper::{run, Detached, Mcp23017};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 | 2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .format_level(false)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                e.print().ok();
                eprintln!("\n{}", USAGE_EXAMPLES);
                process::exit(1);
            }
        },
    };
    init_logger(args.verbose);
    let params = args.parameters()?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping");
        flag.store(true, Ordering::SeqCst);
    })
    .context("couldn't install the interrupt handler")?;

    if params.simulate {
        run(Detached, params, Some(cancel))?;
    } else {
        let device = Mcp23017::open(&args.device)?;
        run(device, params, Some(cancel))?;
    }
    Ok(())
}

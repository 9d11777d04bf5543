use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use subsync_logging::SubsyncLogger;

use crate::console::PrintSink;
use crate::errors::Result;
use crate::subsync::{Subsync, SubsyncArgs};

mod console;
mod errors;
mod subsync;

fn main() -> ExitCode {
    let args = SubsyncArgs::parse();

    match start(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("subsync: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn start(args: SubsyncArgs) -> Result<()> {
    let mut logger = SubsyncLogger::builder();
    logger.root_level(args.log_level);
    if let Some(path) = args.log_file.as_ref() {
        logger.log_path(path);
    }
    let _logger = logger.build()?;

    info!("Starting subsync {} for {}", subsync_core::VERSION, args);
    let mut subsync = Subsync::new(args)?;
    let mut sink = PrintSink::stdout();
    subsync.run(&mut sink)?;
    info!("Printed {} subtitles", sink.printed());

    Ok(())
}

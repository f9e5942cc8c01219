//! Logger setup for the command line tool.
//!
//! Warnings go to stderr by default; `-v` adds info and `-vv` debug output.
//! When a log file is configured it receives everything at debug level.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level_for(verbosity),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::LevelFilter;
use riddle_app::commands::{run, Cli, Outcome};
use riddle_app::logging;
use riddle_engine::{FetchSettings, ReqwestFetcher, SystemClock};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let mut stdout = io::stdout().lock();
    match run(&cli, fetcher, Arc::new(SystemClock), &mut stdout) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::FeedUnavailable) => {
            eprintln!("riddle: feed unavailable, showing fallback");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("riddle: {err:#}");
            ExitCode::FAILURE
        }
    }
}

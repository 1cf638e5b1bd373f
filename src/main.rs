use std::{
    env,
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use libpin::{
    cli::{Cli, normalize_args},
    command,
    config::Config,
    input,
};

fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("pin: {e}");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_from(normalize_args(env::args_os()));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("pin: {report:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    let request = input::resolve(cli.command, input::read_piped)?;
    let config = Config::load(&cli.settings);
    log::debug!("using API at {}", config.api_url);

    let mut stdout = io::stdout().lock();
    command::run(request, &config, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

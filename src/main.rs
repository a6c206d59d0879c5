use clap::Parser;
use mpeds::cli::{Cli, Command};
use mpeds::config::{load_config, resolve_settings};
use mpeds::{Mpeds, MpedsError, commands};
use std::process::ExitCode;

fn run() -> Result<(), MpedsError> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let settings = resolve_settings(&config, cli.artifacts)?;
    let mpeds = Mpeds::new(settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Classify(args) => commands::handle_classify(&mpeds, args, &mut out),
        Command::Extract(args) => commands::handle_extract(&mpeds, args, &mut out),
        Command::Lede(args) => commands::handle_lede(&mpeds, args, &mut out),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mpeds: {e}");
            ExitCode::from(1)
        }
    }
}

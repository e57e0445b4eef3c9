mod click;
mod config;
mod device;
mod dump;
mod emit;
mod input;

use config::{Cli, Command, Config};

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (cli, ignored) = match Cli::parse_lenient(std::env::args()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };
    for arg in &ignored {
        eprintln!("Unknown argument {}", arg);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose)))
        .init();

    let config = Config::load(&cli);

    if let Some(Command::Dump) = cli.command {
        return dump::run_dump(&config);
    }

    log::info!("rm-stylus-button {}", env!("CARGO_PKG_VERSION"));
    log::info!("Mode: {} ({})", config.mode(), config.profile.name);

    input::run_pen(&config)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

mod cli;

use std::process::ExitCode;

use clap::Parser;
use gsage_core::config::{ConfigData, EngineSettings};
use gsage_core::kernel::error::Result;
use gsage_core::Application;

use crate::cli::{CliArgs, Commands};

/// Settings file, then `--set` overrides on top
fn load_settings(args: &CliArgs) -> Result<EngineSettings> {
    let mut config = match &args.config {
        Some(path) => ConfigData::load(path)?,
        None => ConfigData::new(),
    };
    for assignment in &args.overrides {
        config.apply_override(assignment)?;
    }
    Ok(EngineSettings::from_config(&config)?)
}

fn init_logging(settings: &EngineSettings) {
    let env = env_logger::Env::default().default_filter_or(settings.log_level.as_str());
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Failed to initialize env_logger: {}", e);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings);

    if let Some(Commands::EventTypes) = args.command {
        cli::print_event_types();
        return ExitCode::SUCCESS;
    }

    println!("Initializing application...");
    let mut app = Application::with_settings(settings);
    if let Err(e) = app.start().await {
        eprintln!("Application error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut status = ExitCode::SUCCESS;
    if let Some(Commands::Demo) = args.command {
        if let Err(e) = cli::run_demo(&mut app).await {
            eprintln!("Demo failed: {}", e);
            status = ExitCode::FAILURE;
        }
    }

    println!("Shutting down application...");
    if let Err(e) = app.shutdown().await {
        eprintln!("Application error: {}", e);
        status = ExitCode::FAILURE;
    }
    status
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tock", version, about = "Markdown-file time tracker")]
struct Cli {
    /// Timer directory (overrides settings)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Settings file (defaults to ~/.config/tock/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Timer(commands::timer::TimerAction),
    /// Print the effective settings as JSON
    Config,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let settings = commands::load_settings(cli.settings.as_deref());

    let result = match cli.command {
        Commands::Timer(action) => commands::timer::run(action, cli.dir, &settings),
        Commands::Config => commands::config::run(cli.dir, &settings),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

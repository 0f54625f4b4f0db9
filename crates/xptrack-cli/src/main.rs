use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "xptrack", version, about = "Personal XP tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one tick and print the result as JSON
    Tick(commands::tick::TickArgs),
    /// Interactive session loop
    Run,
    /// Scheduled task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Task catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Level, progress bars and level-up estimate
    Stats,
    /// Outcome log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xptrack=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tick(args) => commands::tick::run(args),
        Commands::Run => commands::run::run(),
        Commands::Task { action } => commands::task::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Log { action } => commands::log::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

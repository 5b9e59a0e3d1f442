use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use fitpulse_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fitpulse-cli", version, about = "FitPulse workout timer and log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the exercise sequence
    Sequence {
        #[command(subcommand)]
        action: commands::sequence::SequenceAction,
    },
    /// Workout timer control
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Stored workout history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions { shell: Shell },
}

/// Log to stderr so stdout stays machine-readable. `FITPULSE_LOG` takes
/// precedence over `log.level` from the config file.
fn init_logging() {
    let filter = EnvFilter::try_from_env("FITPULSE_LOG").unwrap_or_else(|_| {
        let level = Config::load_or_default().log.level;
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "fitpulse-cli",
            &mut std::io::stdout(),
        );
        return;
    }

    init_logging();
    let result = match cli.command {
        Commands::Sequence { action } => commands::sequence::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

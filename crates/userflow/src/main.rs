mod commands;
mod runtime;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "userflow")]
#[command(about = "Declarative management of Azure AD B2C user flows", long_about = None)]
struct Cli {
    /// Configuration file (defaults to userflow.yaml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding .userflow/state.json
    #[arg(long, global = true, default_value = ".")]
    state_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the changes apply would make
    Plan,
    /// Create or update the user flow to match configuration
    Apply,
    /// Refresh state from the service
    Refresh,
    /// Delete the user flow
    Destroy,
    /// Start tracking an existing user flow
    Import {
        /// User flow identifier (B2C_1_<name>)
        id: String,
    },
    /// Print tracked state
    Show,
    /// Print the resource schema
    Schema,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Version => {
            println!("userflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Schema => commands::show::handle_schema(),
        Commands::Show => commands::show::handle_state(&cli.state_dir).await,
        Commands::Plan => {
            let rt = runtime::Runtime::load(cli.config.as_deref(), &cli.state_dir)?;
            commands::plan::handle(&rt).await
        }
        Commands::Apply => {
            let rt = runtime::Runtime::load(cli.config.as_deref(), &cli.state_dir)?;
            commands::apply::handle(&rt).await
        }
        Commands::Refresh => {
            let rt = runtime::Runtime::load_optional(cli.config.as_deref(), &cli.state_dir)?;
            commands::refresh::handle(&rt).await
        }
        Commands::Destroy => {
            let rt = runtime::Runtime::load_optional(cli.config.as_deref(), &cli.state_dir)?;
            commands::destroy::handle(&rt).await
        }
        Commands::Import { id } => {
            let rt = runtime::Runtime::load_optional(cli.config.as_deref(), &cli.state_dir)?;
            commands::import::handle(&rt, &id).await
        }
    }
}

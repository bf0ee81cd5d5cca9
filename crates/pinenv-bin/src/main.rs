use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use miette::IntoDiagnostic;
use pinenv_config::ProvisionConfig;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

mod commands;

/// Provision conda environments with pinned package versions
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Additional configuration files, later files take precedence
    #[arg(long = "config", global = true, value_name = "FILE")]
    config: Vec<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create an environment, replacing whatever exists at the prefix
    Create(commands::create::Opt),

    /// List the packages installed in an environment
    List(commands::list::Opt),

    /// Print the path of the python interpreter of an environment
    Python(commands::python::Opt),

    /// Show the effective configuration and the detected package manager
    Info(commands::info::Opt),
}

/// Entry point of the `pinenv` cli.
fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env()
        .into_diagnostic()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .try_init()
        .into_diagnostic()?;

    let config = ProvisionConfig::load(&cli.config).into_diagnostic()?;
    tracing::debug!("loaded configuration from {:?}", config.loaded_from);

    match cli.command {
        Commands::Create(opt) => commands::create::create(config, opt),
        Commands::List(opt) => commands::list::list(&config, opt),
        Commands::Python(opt) => commands::python::python(opt),
        Commands::Info(opt) => commands::info::info(&config, opt),
    }
}

//! gnokii supervisor - drive `gnokii --shell` from scripts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gnokii_supervisor::batch::{command_from_tokens, run_batch, OutputFormat};
use gnokii_supervisor::config::{ConfigLoader, ShellConfig};
use gnokii_supervisor::display;
use gnokii_supervisor::phone::Gnokii;

#[derive(Parser)]
#[command(
    name = "gnokii-supervisor",
    about = "Supervised gnokii shell with request/response framing",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supervisor config file (TOML).
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// gnokii binary name or path.
    #[arg(long)]
    binary: Option<String>,

    /// Phone section from the gnokii config.
    #[arg(long)]
    phone: Option<String>,

    /// gnokii config file passed to the shell.
    #[arg(long)]
    gnokii_config: Option<PathBuf>,

    /// Read timeout in milliseconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print transport counters on exit.
    #[arg(long)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run commands read from stdin, one per line.
    Batch {
        /// Write one JSON record per command.
        #[arg(long)]
        json: bool,
    },
    /// Run a single command, e.g. `exec getsms SM 1 end`.
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<ShellConfig, gnokii_supervisor::config::ConfigError> {
    let loader = match &cli.config_file {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(binary) = &cli.binary {
        config.binary.clone_from(binary);
    }
    if let Some(phone) = &cli.phone {
        config.phone = Some(phone.clone());
    }
    if let Some(path) = &cli.gnokii_config {
        config.gnokii_config = Some(path.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.read_timeout_ms = timeout;
    }
    Ok(config)
}

async fn run(cli: Cli, config: ShellConfig) -> ExitCode {
    let binary = config.binary.clone();
    let mut phone = Gnokii::new(config);

    if let Err(e) = phone.start().await {
        display::print_error(&e);
        return ExitCode::FAILURE;
    }
    if cli.verbose > 0 {
        display::print_started(phone.supervisor().id(), &binary);
    }

    let code = match cli.command {
        Commands::Batch { json } => {
            let format = if json {
                OutputFormat::JsonLines
            } else {
                OutputFormat::Text
            };
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            match run_batch(&mut phone, stdin, &mut stdout, format).await {
                Ok(summary) if summary.incomplete == 0 => ExitCode::SUCCESS,
                Ok(_) => ExitCode::from(2),
                Err(e) => {
                    display::print_error(&e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Exec { tokens } => exec(&mut phone, tokens).await,
    };

    if cli.stats {
        if let Some(stats) = phone.supervisor().stats() {
            display::print_stats(&stats);
        }
    }
    phone.stop().await;
    code
}

async fn write_response<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

async fn exec(phone: &mut Gnokii, tokens: Vec<String>) -> ExitCode {
    let Some(command) = command_from_tokens(tokens) else {
        return ExitCode::FAILURE;
    };

    match phone.send(&command).await {
        Ok(response) => {
            display::print_incomplete(&command.line(), response.outcome);
            let mut stdout = tokio::io::stdout();
            let text = format!("{}\n", response.text);
            if let Err(e) = write_response(&mut stdout, &text).await {
                display::print_error(&e);
                return ExitCode::FAILURE;
            }
            if response.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            display::print_error(&e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        binary = %config.binary,
        args = ?config.launch_args(),
        "Loaded configuration"
    );

    run(cli, config).await
}

mod clipboard;
mod config;
mod display;
mod export;
mod run;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use equalizer_agent::HttpAgentClient;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConnectionArgs;

#[derive(Parser, Debug)]
#[command(name = "equalizer")]
#[command(version, about = "Rebalance one-sided contract clauses with hosted agents")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan, equalize, and draft an email for one contract
    Run {
        /// PDF contract, or a text file with --sample-text
        file: PathBuf,

        /// Treat the file as plain contract text instead of a PDF
        #[arg(long)]
        sample_text: bool,

        /// Upload the document and scan the attached asset
        #[arg(long)]
        upload: bool,

        /// Write the equalized contract here
        #[arg(long)]
        export: Option<PathBuf>,

        /// Copy the drafted email to the clipboard
        #[arg(long)]
        copy_email: bool,
    },
    /// Interactive session
    Shell,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("equalizer v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.connection.agent_config();
    tracing::info!(url = %config.base_url, timeout_secs = config.timeout.as_secs(), "agent service");
    let agent = HttpAgentClient::new(&config)?;

    match cli.command {
        Command::Run {
            file,
            sample_text,
            upload,
            export,
            copy_email,
        } => {
            let options = run::RunOptions {
                sample_text,
                upload,
                export,
                copy_email,
            };
            run::run(&agent, config.agents, &file, &options).await?;
            Ok(())
        }
        Command::Shell => shell::run_shell(&agent, config.agents).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "equalizer",
            "--agent-url",
            "http://agents.test/",
            "run",
            "lease.pdf",
            "--upload",
            "--export",
            "out.txt",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.connection.agent_url, "http://agents.test/");
        match cli.command {
            Command::Run {
                file,
                sample_text,
                upload,
                export,
                copy_email,
            } => {
                assert_eq!(file, PathBuf::from("lease.pdf"));
                assert!(!sample_text);
                assert!(upload);
                assert_eq!(export, Some(PathBuf::from("out.txt")));
                assert!(!copy_email);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_a_file() {
        assert!(Cli::try_parse_from(["equalizer", "run"]).is_err());
    }

    #[test]
    fn shell_subcommand() {
        let cli = Cli::try_parse_from(["equalizer", "shell"]).unwrap();
        assert!(matches!(cli.command, Command::Shell));
        assert!(!cli.verbose);
    }
}

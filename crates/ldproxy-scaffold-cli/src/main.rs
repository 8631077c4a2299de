//! ldproxy-scaffold: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use ldproxy_scaffold_cli::commands::{list_blocks, run_generate, GenerateArgs};

#[derive(Parser)]
#[command(
    name = "ldproxy-scaffold",
    about = "Generate ldproxy service and provider configuration from a schema snapshot",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema snapshot into service, provider and tile documents.
    Generate(GenerateArgs),

    /// Print the selectable capabilities as JSON.
    Blocks,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   ldproxy-scaffold completions bash > ~/.local/share/bash-completion/completions/ldproxy-scaffold
    ///   ldproxy-scaffold completions zsh > ~/.zfunc/_ldproxy-scaffold
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => {
            let mut stdout = std::io::stdout().lock();
            let summary = run_generate(&args, &mut stdout)?;
            if summary.written {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }

        Commands::Blocks => {
            println!("{}", serde_json::to_string_pretty(&list_blocks())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ldproxy-scaffold", &mut std::io::stdout());
        }
    }

    Ok(())
}

//! htmcp-install - installer for the ht-mcp terminal server

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use htmcp_cli::cmd;
use htmcp_cli::ui::Output;
use htmcp_cli::{Cli, Commands, RecipeCommands};
use htmcp_core::InstallError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Drop trailing '#' comments so copy-pasted commands still parse.
    let args: Vec<String> = std::env::args()
        .take_while(|arg| !arg.starts_with('#'))
        .collect();

    let cli = Cli::parse_from(args);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.quiet);
    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("{err:#}"));
            let code = err
                .downcast_ref::<InstallError>()
                .map_or(1, InstallError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::Install {
            recipe,
            bin_dir,
            smoke_timeout,
        } => {
            cmd::install::install(recipe.as_deref(), bin_dir, smoke_timeout, dry_run, output).await
        }
        Commands::Resolve {
            recipe,
            os,
            arch,
            all,
        } => cmd::resolve::resolve(
            recipe.as_deref(),
            os.as_deref(),
            arch.as_deref(),
            all,
            output,
        ),
        Commands::Test {
            recipe,
            bin_dir,
            smoke_timeout,
        } => cmd::test::test(recipe.as_deref(), bin_dir, smoke_timeout, output).await,
        Commands::Recipe { command } => match command {
            RecipeCommands::Check { path } => cmd::recipe::check(&path, output),
            RecipeCommands::Pin { path } => cmd::recipe::pin(&path, dry_run, output).await,
            RecipeCommands::Show => {
                cmd::recipe::show();
                Ok(())
            }
        },
        Commands::Hash { files } => cmd::hash::hash(&files),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}

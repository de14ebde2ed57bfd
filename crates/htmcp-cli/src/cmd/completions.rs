//! Shell completions

use clap::CommandFactory;

use crate::Cli;

pub fn completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "htmcp-install", &mut std::io::stdout());
}

//! Command line arguments handling

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    /// Task file, overrides the DUKE_FILE environment variable
    #[arg(short, long)]
    pub(crate) file: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) action: Option<Action>,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Action {
    /// Read commands from standard input until "bye" (default)
    Interactive,
    /// Run a single command, ie. "duke exec todo read book"
    Exec {
        #[arg(required = true)]
        args: Vec<String>,
    },
}

//! Command-line argument parsing for the `fnc` demo binary.
//!
//! Only the binary's own flags are parsed here with `clap`. Everything from
//! the first unrecognised token onwards is forwarded untouched to the
//! dispatcher, which handles global options, subcommands and help.

use clap::Parser;
use fncli_core::Config;

/// Command-line arguments for the `fnc` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use fncli_cli::cli_args::Args;
///
/// let args = Args::parse_from(["fnc", "--no-interactive", "runServer", "--port", "80"]);
/// assert!(args.no_interactive);
/// assert_eq!(args.tokens, vec!["runServer", "--port", "80"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0, disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Print help and exit instead of opening the interactive shell when no
    /// command is given.
    #[arg(long, action)]
    pub no_interactive: bool,

    /// Prompt printed before each line in the interactive shell.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Global options, the command name and the command's arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

impl Args {
    /// Builds the dispatcher configuration these flags describe.
    #[must_use]
    pub fn config(&self) -> Config {
        let config = Config::default().interactive(!self.no_interactive);
        match &self.prompt {
            Some(prompt) => config.prompt(prompt),
            None => config,
        }
    }
}

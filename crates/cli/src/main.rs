use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::debug;

use fncli_cli::cli_args::Args;
use fncli_cli::commands;
use fncli_core::Result;

fn execute() -> Result<()> {
    let args = Args::parse();
    debug!("Forwarding tokens: {:?}", args.tokens);

    let (cli, _session) = commands::build(args.config())?;
    debug!("Registered commands: {}", cli.commands().names().join(", "));
    cli.run(&args.tokens)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

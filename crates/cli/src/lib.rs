//! fncli CLI Library
//!
//! This crate provides `fnc`, a small program built on `fncli-core` that
//! shows how ordinary closures become subcommands with typed arguments,
//! global options, generated help and an interactive shell.
//!
//! # Key Features
//!
//! - **Demo Commands**: `runServer`, `migrate`, `dump`, `deleteItems` and `greet`
//! - **Global Options**: `--dry-run`, consumed by the setup command before the subcommand
//! - **Custom Types**: `PathBuf` arguments built through a registered string constructor
//! - **Interactive Shell**: Opened when no subcommand is given
//!
//! # Architecture
//!
//! - [`cli_args`]: The binary's own flags, parsed with `clap`
//! - [`commands`]: The command set, its setup command and coercions
//!
//! # Examples
//!
//! ```bash
//! # Interactive mode
//! fnc
//!
//! # Positional and named arguments
//! fnc runServer 127.0.0.1 --port 9000
//!
//! # Global options come before the subcommand
//! fnc --dry-run deleteItems 1 2 3
//!
//! # Full help
//! fnc --help
//! ```

pub mod cli_args;
pub mod commands;

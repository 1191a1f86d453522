//! fncli Core Library
//!
//! This crate turns a list of ordinary closures into a command-line
//! interface: it picks a subcommand from the process arguments, converts
//! string tokens into typed arguments, invokes the matching closure and
//! prints its result.
//!
//! # Key Features
//!
//! - **Argument Binding**: Positional, `--name value`, optional, boolean flag and variadic parameters
//! - **Type Coercion**: Primitive literals, enumerations and registered string constructors
//! - **Help Rendering**: Usage text generated from the same parameter metadata the binder uses
//! - **Global Options**: A setup command that consumes leading options before the subcommand
//! - **Interactive Shell**: A read loop that dispatches each line when no subcommand is given
//!
//! # Examples
//!
//! ```no_run
//! use fncli_core::{Cli, Command, Kind, Parameter};
//!
//! let cli = Cli::new([
//!     Command::new("runServer")
//!         .param(Parameter::optional("host", Kind::Str).default_value("0.0.0.0"))
//!         .param(Parameter::optional("port", Kind::I32).default_value(8080))
//!         .handler(|args| {
//!             let host: String = args.get("host")?;
//!             let port: i32 = args.get("port")?;
//!             println!("Running the server at {host} on port {port}");
//!             Ok::<_, fncli_core::Error>(())
//!         }),
//! ])?;
//!
//! let tokens: Vec<String> = std::env::args().skip(1).collect();
//! cli.run(&tokens)?;
//! # Ok::<(), fncli_core::Error>(())
//! ```

pub mod binder;
pub mod cli;
pub mod coercion;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod shell;
pub mod value;

pub use cli::Cli;
pub use coercion::{Coercions, Kind};
pub use command::{Command, Parameter, Registry};
pub use config::Config;
pub use dispatch::Outcome;
pub use error::{Error, Result};
pub use value::{BoundArgs, Value};

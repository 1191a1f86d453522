//! The top-level entry point tying the registry, coercions and config together.

use std::io::{stdin, stdout, BufRead, Write};

use log::debug;

use crate::coercion::Coercions;
use crate::command::{validate_setup, Command, Registry};
use crate::config::Config;
use crate::dispatch::{bind_or_help, Dispatcher, Outcome};
use crate::error::{Error, Result};
use crate::value::Value;

/// A set of commands exposed as subcommands of one program.
///
/// # Examples
///
/// ```
/// use fncli_core::{Cli, Command, Kind, Parameter, Value};
///
/// let cli = Cli::new([Command::new("double")
///     .param(Parameter::required("n", Kind::I32))
///     .returns("i32")
///     .handler(|args| args.get::<i32>("n").map(|n| n * 2))])?;
///
/// let mut output = Vec::new();
/// let value = cli.call("double", &["21".to_string()], &mut output)?;
/// assert_eq!(value, Value::I32(42));
/// # Ok::<(), fncli_core::Error>(())
/// ```
pub struct Cli {
    setup: Command,
    commands: Registry,
    coercions: Coercions,
    config: Config,
}

impl Cli {
    /// Registers `commands` with no setup, no custom coercions and the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if the commands fail registry validation.
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Result<Self> {
        Ok(Self {
            setup: Command::no_setup(),
            commands: Registry::new(commands)?,
            coercions: Coercions::new(),
            config: Config::default(),
        })
    }

    /// Sets the command whose parameters are the global options.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup command has invalid or duplicate
    /// parameter names or more than one variadic parameter.
    pub fn with_setup(mut self, setup: Command) -> Result<Self> {
        validate_setup(&setup)?;
        self.setup = setup;
        Ok(self)
    }

    #[must_use]
    pub fn with_coercions(mut self, coercions: Coercions) -> Self {
        self.coercions = coercions;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn commands(&self) -> &Registry {
        &self.commands
    }

    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher {
            setup: &self.setup,
            commands: &self.commands,
            coercions: &self.coercions,
            config: &self.config,
        }
    }

    /// Dispatches `tokens` and hands back the outcome instead of printing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongArguments`] after help was printed for bad input,
    /// and any handler, constructor or I/O failure.
    pub fn run_returning<R: BufRead, W: Write>(
        &self,
        tokens: &[String],
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome> {
        self.dispatcher()
            .dispatch(tokens, self.config.interactive, input, output)
    }

    /// Dispatches `tokens` and prints a non-unit result to `output`.
    ///
    /// Bad arguments end quietly since the help text has already been printed.
    ///
    /// # Errors
    ///
    /// Returns handler, constructor and I/O failures.
    pub fn run_with<R: BufRead, W: Write>(
        &self,
        tokens: &[String],
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        match self.run_returning(tokens, input, output) {
            Ok(Outcome::Invoked(value)) => {
                if !value.is_unit() {
                    writeln!(output, "{value}")?;
                }
                Ok(())
            }
            Ok(Outcome::ShellClosed) => Ok(()),
            Err(e) if e.is_wrong_arguments() => {
                debug!("Dispatch aborted on wrong arguments");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// [`Cli::run_with`] on the process's standard input and output.
    ///
    /// # Errors
    ///
    /// Returns handler, constructor and I/O failures.
    pub fn run(&self, tokens: &[String]) -> Result<()> {
        let mut input = stdin().lock();
        let mut output = stdout().lock();
        self.run_with(tokens, &mut input, &mut output)
    }

    /// Binds `tokens` straight to the command called `name` and invokes it,
    /// skipping setup and subcommand selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommand`] if no such command is registered,
    /// [`Error::WrongArguments`] after printing the command's help for bad
    /// input, and any handler, constructor or I/O failure.
    pub fn call<W: Write>(&self, name: &str, tokens: &[String], output: &mut W) -> Result<Value> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
        let args = bind_or_help(command, tokens, &self.coercions, output)?;
        command.invoke(args)
    }
}

//! Subcommand selection: global options, command lookup, binding and invocation.

use std::io::{BufRead, Write};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{debug, info, warn};

use crate::binder::{bind, is_flag_shorthand, is_help_request};
use crate::coercion::Coercions;
use crate::command::{Command, Registry};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::help::{render_all, render_command};
use crate::shell::Shell;
use crate::value::{BoundArgs, Value};

/// How a dispatch finished when it did not abort.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A command ran and returned this value.
    Invoked(Value),
    /// No command was given, so the interactive shell ran until it was closed.
    ShellClosed,
}

/// Splits a token list into global options, a command name and the
/// command's own tokens, then binds and invokes both the setup and the
/// command.
pub struct Dispatcher<'a> {
    pub setup: &'a Command,
    pub commands: &'a Registry,
    pub coercions: &'a Coercions,
    pub config: &'a Config,
}

impl Dispatcher<'_> {
    /// Runs one dispatch over `tokens`.
    ///
    /// The setup command is always invoked before the chosen command. When no
    /// command name is present, the shell is opened if `interactive` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongArguments`] after printing help for any bad
    /// input. Handler failures ([`Error::Invocation`]), string constructor
    /// failures ([`Error::Construct`]) and I/O errors propagate unchanged.
    pub fn dispatch<R: BufRead, W: Write>(
        &self,
        tokens: &[String],
        interactive: bool,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome> {
        if is_help_request(tokens) {
            debug!("Help requested, listing commands");
            return self.abort_with_summary(output, None);
        }

        let split = match self.split_global(tokens) {
            Ok(split) => split,
            Err(e) => return self.abort_with_summary(output, Some(&e)),
        };
        let (global, rest) = tokens.split_at(split);

        let global_args = match bind(self.setup, global, self.coercions) {
            Ok(args) => args,
            Err(e) if e.is_bind_failure() => return self.abort_with_summary(output, Some(&e)),
            Err(e) => return Err(e),
        };
        self.setup.invoke(global_args)?;

        let Some((name, command_tokens)) = rest.split_first() else {
            if interactive {
                info!("No command given, opening the shell");
                return self.open_shell(input, output);
            }
            return self.abort_with_summary(output, None);
        };

        let Some(command) = self.commands.get(name) else {
            warn!("No command named `{name}`");
            writeln!(output, "{}", Error::UnknownCommand(name.clone()))?;
            if let Some(suggestion) = self.closest_command(name) {
                writeln!(output, "Did you mean `{suggestion}`?")?;
            }
            writeln!(output)?;

            if interactive && command_tokens.is_empty() {
                return self.open_shell(input, output);
            }
            return self.abort_with_summary(output, None);
        };

        debug!("Dispatching to `{}` with {command_tokens:?}", command.name);
        let args = bind_or_help(command, command_tokens, self.coercions, output)?;
        command.invoke(args).map(Outcome::Invoked)
    }

    /// Index of the first token that is not part of a leading `--name value`
    /// global option.
    fn split_global(&self, tokens: &[String]) -> Result<usize> {
        let mut index = 0;
        while index < tokens.len() {
            let Some(option) = tokens[index].strip_prefix("--") else {
                return Ok(index);
            };

            let parameter = self
                .setup
                .parameter(option)
                .ok_or_else(|| Error::UnknownOption(option.to_string()))?;
            let next = tokens.get(index + 1).map(String::as_str);
            index += if is_flag_shorthand(parameter, next) { 1 } else { 2 };
        }

        Ok(tokens.len())
    }

    fn open_shell<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<Outcome> {
        Shell::new(self.commands, self.coercions, self.config).run(input, output)?;
        Ok(Outcome::ShellClosed)
    }

    fn abort_with_summary<W: Write>(&self, output: &mut W, error: Option<&Error>) -> Result<Outcome> {
        if let Some(error) = error {
            writeln!(output, "{error}")?;
            writeln!(output)?;
        }
        write!(output, "{}", render_all(self.commands, self.setup))?;
        Err(Error::WrongArguments)
    }

    fn closest_command(&self, name: &str) -> Option<&str> {
        if !self.config.suggest_commands {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        self.commands
            .names()
            .filter_map(|candidate| {
                matcher
                    .fuzzy_match(candidate, name)
                    .or_else(|| matcher.fuzzy_match(name, candidate))
                    .map(|score| (score, candidate))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, candidate)| candidate)
    }
}

/// Binds `tokens` to `command`, printing the command's help and returning
/// [`Error::WrongArguments`] if the input is rejected.
///
/// # Errors
///
/// Returns [`Error::WrongArguments`] for bad input; string constructor and
/// I/O failures propagate unchanged.
pub fn bind_or_help<W: Write>(
    command: &Command,
    tokens: &[String],
    coercions: &Coercions,
    output: &mut W,
) -> Result<BoundArgs> {
    match bind(command, tokens, coercions) {
        Ok(args) => Ok(args),
        Err(Error::HelpRequested) => {
            write!(output, "{}", render_command(command, None))?;
            Err(Error::WrongArguments)
        }
        Err(e) if e.is_bind_failure() => {
            debug!("Rejected arguments for `{}`: {e}", command.name);
            write!(output, "{}", render_command(command, Some(&e.to_string())))?;
            Err(Error::WrongArguments)
        }
        Err(e) => Err(e),
    }
}

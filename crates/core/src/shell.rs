//! Line-oriented interactive shell that feeds each line back through the dispatcher.

use std::io::{BufRead, Write};

use log::{debug, info, warn};

use crate::coercion::Coercions;
use crate::command::{Command, Registry};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::{Error, Result};
use crate::help::render_all;

/// Reads commands line by line until `exit`, `quit` or end of input.
pub struct Shell<'a> {
    commands: &'a Registry,
    coercions: &'a Coercions,
    config: &'a Config,
}

impl<'a> Shell<'a> {
    #[must_use]
    pub fn new(commands: &'a Registry, coercions: &'a Coercions, config: &'a Config) -> Self {
        Self {
            commands,
            coercions,
            config,
        }
    }

    /// Runs the read loop. Lines are dispatched without global options and
    /// never open a nested shell.
    ///
    /// # Errors
    ///
    /// Returns I/O errors and [`Error::Construct`] failures. Bad arguments and
    /// failing commands are reported on `output` and the loop continues.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let setup = Command::no_setup();
        let dispatcher = Dispatcher {
            setup: &setup,
            commands: self.commands,
            coercions: self.coercions,
            config: self.config,
        };

        if !self.config.banner.is_empty() {
            writeln!(output, "{}", self.config.banner)?;
        }

        loop {
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;

            let mut buffer = String::new();
            if input.read_line(&mut buffer)? == 0 {
                info!("End of input, leaving the shell");
                writeln!(output)?;
                return Ok(());
            }
            let line = buffer.trim_end_matches(&['\n', '\r'][..]);

            if line.trim().is_empty() || line == "help" {
                write!(output, "{}", render_all(self.commands, &setup))?;
                continue;
            }

            if line == "exit" || line == "quit" {
                info!("Leaving the shell");
                return Ok(());
            }

            let tokens = split_line(line);
            debug!("Shell dispatching {tokens:?}");
            match dispatcher.dispatch(&tokens, false, input, output) {
                Ok(Outcome::Invoked(value)) => {
                    if !value.is_unit() {
                        writeln!(output, "{value}")?;
                    }
                }
                Ok(Outcome::ShellClosed) => {}
                Err(e) if e.is_wrong_arguments() => {}
                Err(e @ Error::Invocation { .. }) => {
                    warn!("{e}");
                    writeln!(output, "Error: {e}")?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Splits a shell line into tokens.
///
/// Whitespace separates tokens except inside `"` quotes. A quote opens a
/// quoted span only at the start of a token; any other quote closes the span
/// and ends the token. A backslash keeps the next character from ending a
/// token or acting as a quote. Known
/// escapes (`\n`, `\b`, `\r`, `\t`, `\\`, `\'`, `\"`) are decoded afterwards.
/// Blank tokens are dropped.
#[must_use]
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quote && current.is_empty() => in_quote = true,
            '"' => {
                in_quote = false;
                finish_token(&mut tokens, &mut current);
            }
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quote => {
                finish_token(&mut tokens, &mut current);
            }
            c => current.push(c),
        }
    }
    finish_token(&mut tokens, &mut current);

    tokens
}

fn finish_token(tokens: &mut Vec<String>, current: &mut String) {
    if !current.trim().is_empty() {
        tokens.push(unescape(current));
    }
    current.clear();
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('b') => out.push('\u{8}'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

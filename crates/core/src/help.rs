//! Usage text built from the same descriptors the binder reads.

use crate::command::{Command, Parameter, Registry};

/// One parameter in option form, e.g. `--port <i32> (optional)`.
#[must_use]
pub fn option_usage(parameter: &Parameter) -> String {
    let mut usage = format!("--{} <{}>", parameter.name, parameter.ty);
    if parameter.variadic {
        usage.push_str("...");
    }
    if parameter.optional {
        usage.push_str(" (optional)");
    }
    usage
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn write_parameter(out: &mut String, parameter: &Parameter) {
    push_line(out, &option_usage(parameter));
    for text in [&parameter.description, &parameter.documentation]
        .into_iter()
        .flatten()
    {
        out.push_str("    ");
        push_line(out, text);
    }
}

/// Help for a single command, optionally preceded by the reason the
/// arguments were rejected.
#[must_use]
pub fn render_command(command: &Command, error: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(error) = error {
        push_line(&mut out, error);
        out.push('\n');
    }

    push_line(&mut out, &command.name);
    for text in [&command.description, &command.documentation]
        .into_iter()
        .flatten()
    {
        push_line(&mut out, text);
    }

    for parameter in &command.parameters {
        write_parameter(&mut out, parameter);
    }

    out
}

/// Full help: the setup command's options (if it has any) followed by a
/// summary line per available command.
#[must_use]
pub fn render_all(commands: &Registry, setup: &Command) -> String {
    let mut out = String::new();

    if !setup.parameters.is_empty() {
        out.push_str("Global options:\n");
        for parameter in &setup.parameters {
            write_parameter(&mut out, parameter);
        }
        out.push('\n');
    }

    out.push_str("Available commands:\n");
    for command in commands.iter() {
        push_line(&mut out, &command.to_string());
    }

    out
}

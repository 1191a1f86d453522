//! Binding of raw string tokens onto a command's declared parameters.
//!
//! Tokens are read left to right. `--name` selects a parameter by name and
//! takes the following token as its value, except for boolean parameters,
//! which bind `true` when the next token is not a `true`/`false` literal.
//! Bare tokens fill parameters in declaration order until the first named
//! option is used; after that, bare tokens can only go to the variadic
//! parameter.

use log::trace;

use crate::coercion::Coercions;
use crate::command::{Command, Parameter};
use crate::error::{Error, Result};
use crate::value::{BoundArgs, Value};

/// Whether `tokens` is a lone help request such as `--help` or `-help`.
#[must_use]
pub fn is_help_request(tokens: &[String]) -> bool {
    match tokens {
        [token] => is_help_marker(token),
        _ => false,
    }
}

fn is_help_marker(token: &str) -> bool {
    token.starts_with('-') && token.ends_with("help")
}

/// Whether a `--flag` with `next` following it should bind `true` without
/// consuming `next`.
pub(crate) fn is_flag_shorthand(parameter: &Parameter, next: Option<&str>) -> bool {
    parameter.ty.kind.is_bool()
        && match next {
            None => true,
            Some(value) => value.starts_with("--") || (value != "true" && value != "false"),
        }
}

/// Binds `tokens` to the parameters of `command`.
///
/// Optional parameters that were not given stay unbound; the command's
/// invocation supplies their defaults.
///
/// # Errors
///
/// Returns [`Error::HelpRequested`] for a lone help marker, one of the bind
/// failures ([`Error::UnknownOption`], [`Error::MissingValue`],
/// [`Error::MissingRequired`], [`Error::TooManyArguments`],
/// [`Error::NoVarargSlot`]) for malformed input, or any coercion error.
pub fn bind(command: &Command, tokens: &[String], coercions: &Coercions) -> Result<BoundArgs> {
    if is_help_request(tokens) {
        return Err(Error::HelpRequested);
    }

    let mut args = BoundArgs::new();
    let mut used_named = false;
    let mut positional_count = 0;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index].as_str();

        if let Some(option) = token.strip_prefix("--") {
            let parameter = command
                .parameter(option)
                .ok_or_else(|| Error::UnknownOption(option.to_string()))?;
            let next = tokens.get(index + 1).map(String::as_str);

            if is_flag_shorthand(parameter, next) {
                trace!("Flag `{option}` given without a value");
                store(&mut args, parameter, Value::Bool(true));
                index += 1;
                continue;
            }

            let value = next.ok_or_else(|| Error::MissingValue(option.to_string()))?;
            store(&mut args, parameter, coercions.coerce(&parameter.ty, value)?);
            used_named = true;
            index += 2;
            continue;
        }

        let parameter = if used_named {
            command.variadic_parameter().ok_or(Error::NoVarargSlot)?
        } else {
            command
                .positional(positional_count)
                .or_else(|| command.variadic_parameter())
                .ok_or(Error::TooManyArguments)?
        };

        trace!("Positional `{token}` goes to `{}`", parameter.name);
        store(&mut args, parameter, coercions.coerce(&parameter.ty, token)?);
        positional_count += 1;
        index += 1;
    }

    for parameter in &command.parameters {
        if args.contains(&parameter.name) || parameter.optional {
            continue;
        }

        if parameter.variadic {
            args.set(&parameter.name, Value::List(Vec::new()));
        } else {
            return Err(Error::MissingRequired(parameter.name.clone()));
        }
    }

    Ok(args)
}

fn store(args: &mut BoundArgs, parameter: &Parameter, value: Value) {
    if parameter.variadic {
        args.push(&parameter.name, value);
    } else {
        args.set(&parameter.name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::Kind;
    use std::path::PathBuf;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn coercions() -> Coercions {
        Coercions::new().register_from_str::<PathBuf>("PathBuf")
    }

    fn command_b() -> Command {
        Command::new("commandB")
            .param(Parameter::required("number", Kind::I32))
            .param(Parameter::required("text", Kind::Str))
    }

    fn command_d() -> Command {
        Command::new("commandD")
            .param(Parameter::required("file", Kind::custom("PathBuf")))
            .param(Parameter::variadic("ints", Kind::I32))
    }

    fn command_e() -> Command {
        Command::new("commandE")
            .param(Parameter::required("file", Kind::custom("PathBuf")))
            .param(Parameter::optional("flag", Kind::Bool).default_value(false))
    }

    fn bind_ok(command: &Command, raw: &[&str]) -> BoundArgs {
        bind(command, &tokens(raw), &coercions()).unwrap()
    }

    fn file(args: &BoundArgs) -> PathBuf {
        args.value("file")
            .and_then(Value::downcast_ref::<PathBuf>)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_positional_and_named_bind_the_same() {
        let command = command_b();
        let positional = bind_ok(&command, &["10", "Hello world!"]);
        let named = bind_ok(&command, &["--number", "10", "--text", "Hello world!"]);
        let mixed = bind_ok(&command, &["10", "--text", "Hello world!"]);

        assert_eq!(positional.get::<i32>("number").unwrap(), 10);
        assert_eq!(positional.get::<String>("text").unwrap(), "Hello world!");
        assert_eq!(named.value("number"), positional.value("number"));
        assert_eq!(named.value("text"), positional.value("text"));
        assert_eq!(mixed.value("number"), positional.value("number"));
        assert_eq!(mixed.value("text"), positional.value("text"));
    }

    #[test]
    fn test_named_binding_overwrites() {
        let args = bind_ok(&command_b(), &["--number", "1", "--text", "a", "--number", "2"]);
        assert_eq!(args.get::<i32>("number").unwrap(), 2);
    }

    #[test]
    fn test_flag_shorthand() {
        let command = command_e();

        let args = bind_ok(&command, &["test.txt"]);
        assert!(!args.contains("flag"));
        assert_eq!(file(&args), PathBuf::from("test.txt"));

        let args = bind_ok(&command, &["test.txt", "--flag"]);
        assert!(args.get::<bool>("flag").unwrap());

        let args = bind_ok(&command, &["test.txt", "--flag", "true"]);
        assert!(args.get::<bool>("flag").unwrap());

        let args = bind_ok(&command, &["test.txt", "--flag", "false"]);
        assert!(!args.get::<bool>("flag").unwrap());

        let args = bind_ok(&command, &["--flag", "--file", "test.txt"]);
        assert!(args.get::<bool>("flag").unwrap());
        assert_eq!(file(&args), PathBuf::from("test.txt"));

        let args = bind_ok(&command, &["--flag", "true", "--file", "test.txt"]);
        assert!(args.get::<bool>("flag").unwrap());
    }

    #[test]
    fn test_flag_shorthand_keeps_positional_style() {
        let args = bind_ok(&command_e(), &["--flag", "test.txt"]);
        assert!(args.get::<bool>("flag").unwrap());
        assert_eq!(file(&args), PathBuf::from("test.txt"));
    }

    #[test]
    fn test_variadic_accumulation() {
        let command = command_d();

        let args = bind_ok(&command, &["test.txt"]);
        assert_eq!(args.get::<Vec<i32>>("ints").unwrap(), Vec::<i32>::new());

        let args = bind_ok(&command, &["test.txt", "33", "22", "89"]);
        assert_eq!(args.get::<Vec<i32>>("ints").unwrap(), vec![33, 22, 89]);

        let args = bind_ok(&command, &["--file", "test.txt", "22", "33"]);
        assert_eq!(args.get::<Vec<i32>>("ints").unwrap(), vec![22, 33]);

        let args = bind_ok(&command, &["test.txt", "--ints", "1", "--ints", "2", "3"]);
        assert_eq!(args.get::<Vec<i32>>("ints").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_variadic_declared_first_fills_last() {
        let command = Command::new("c")
            .param(Parameter::variadic("xs", Kind::I32))
            .param(Parameter::required("label", Kind::Str));

        let args = bind_ok(&command, &["lbl", "1", "2"]);
        assert_eq!(args.get::<String>("label").unwrap(), "lbl");
        assert_eq!(args.get::<Vec<i32>>("xs").unwrap(), vec![1, 2]);

        let args = bind_ok(&command, &["lbl"]);
        assert_eq!(args.get::<Vec<i32>>("xs").unwrap(), Vec::<i32>::new());

        let result = bind(&command, &tokens(&["1", "2", "lbl"]), &coercions());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_bare_token_after_named_needs_vararg() {
        let result = bind(&command_b(), &tokens(&["--number", "10", "text"]), &coercions());
        assert!(matches!(result, Err(Error::NoVarargSlot)));
    }

    #[test]
    fn test_too_many_arguments() {
        let result = bind(&command_b(), &tokens(&["1", "a", "extra"]), &coercions());
        assert!(matches!(result, Err(Error::TooManyArguments)));
    }

    #[test]
    fn test_missing_required() {
        let result = bind(&command_b(), &tokens(&["1"]), &coercions());
        assert!(matches!(result, Err(Error::MissingRequired(ref name)) if name == "text"));
    }

    #[test]
    fn test_unknown_option_and_missing_value() {
        let result = bind(&command_b(), &tokens(&["--count", "1"]), &coercions());
        assert!(matches!(result, Err(Error::UnknownOption(ref name)) if name == "count"));

        let result = bind(&command_b(), &tokens(&["1", "--text"]), &coercions());
        assert!(matches!(result, Err(Error::MissingValue(ref name)) if name == "text"));
    }

    #[test]
    fn test_parse_failure() {
        let result = bind(&command_b(), &tokens(&["ten", "a"]), &coercions());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_help_marker() {
        for marker in ["--help", "-help", "--h-help", "-superhelp"] {
            let result = bind(&command_b(), &tokens(&[marker]), &coercions());
            assert!(matches!(result, Err(Error::HelpRequested)), "{marker}");
        }
        assert!(!is_help_request(&tokens(&["help"])));
        assert!(!is_help_request(&tokens(&["--help", "x"])));
    }

    #[test]
    fn test_nullable_parameter() {
        let command = Command::new("c").param(Parameter::required("n", Kind::I32).nullable());
        let args = bind_ok(&command, &["null"]);
        assert_eq!(args.value("n"), Some(&Value::Null));

        let strict = Command::new("c").param(Parameter::required("n", Kind::I32));
        assert!(bind(&strict, &tokens(&["null"]), &coercions()).is_err());
    }

    #[test]
    fn test_optional_left_unbound() {
        let command = Command::new("c")
            .param(Parameter::required("file", Kind::Str))
            .param(Parameter::optional("default", Kind::I32).default_value(2));
        let args = bind_ok(&command, &["test.txt"]);
        assert!(!args.contains("default"));

        let args = bind_ok(&command, &["test.txt", "33"]);
        assert_eq!(args.get::<i32>("default").unwrap(), 33);

        let args = bind_ok(&command, &["test.txt", "--default", "33"]);
        assert_eq!(args.get::<i32>("default").unwrap(), 33);
    }
}

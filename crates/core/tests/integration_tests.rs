//! Integration tests for fncli-core
//!
//! These tests drive complete dispatches through [`Cli`] with in-memory
//! input and output, the way a program's `main` would.

use fncli_core::{
    shell::split_line, Cli, Coercions, Command, Config, Error, Kind, Outcome, Parameter, Value,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

/// Records what each command was called with.
#[derive(Default, Clone)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn test_cli(calls: &Calls) -> Cli {
    let b_calls = calls.clone();
    let c_calls = calls.clone();
    let d_calls = calls.clone();

    Cli::new([
        Command::new("commandA"),
        Command::new("commandB")
            .param(Parameter::required("number", Kind::I32))
            .param(Parameter::required("text", Kind::Str))
            .handler(move |args| {
                let number: i32 = args.get("number")?;
                let text: String = args.get("text")?;
                b_calls.record(format!("commandB {number} {text}"));
                Ok::<_, Error>(())
            }),
        Command::new("commandC")
            .param(Parameter::required("file", Kind::custom("PathBuf")))
            .param(Parameter::optional("default", Kind::I32).default_value(2))
            .handler(move |args| {
                let file: Arc<PathBuf> = args.get("file")?;
                let default: i32 = args.get("default")?;
                c_calls.record(format!("commandC {} {default}", file.display()));
                Ok::<_, Error>(())
            }),
        Command::new("commandD")
            .param(Parameter::required("file", Kind::custom("PathBuf")))
            .param(Parameter::variadic("multiple", Kind::I32))
            .handler(move |args| {
                let multiple: Vec<i32> = args.get("multiple")?;
                d_calls.record(format!("commandD {multiple:?}"));
                Ok::<_, Error>(())
            }),
        Command::new("commandE")
            .param(Parameter::required("file", Kind::custom("PathBuf")))
            .param(Parameter::optional("flag", Kind::Bool).default_value(false))
            .returns("bool")
            .handler(|args| args.get::<bool>("flag")),
    ])
    .unwrap()
    .with_coercions(Coercions::new().register_from_str::<PathBuf>("PathBuf"))
    .with_config(Config::default().interactive(false))
}

fn dispatch(cli: &Cli, raw: &[&str]) -> (fncli_core::Result<Outcome>, String) {
    let mut output = Vec::new();
    let result = cli.run_returning(&tokens(raw), &mut Cursor::new(Vec::new()), &mut output);
    (result, String::from_utf8(output).unwrap())
}

fn invoked(cli: &Cli, raw: &[&str]) -> Value {
    match dispatch(cli, raw) {
        (Ok(Outcome::Invoked(value)), _) => value,
        (other, output) => panic!("{raw:?} did not invoke a command: {other:?}\n{output}"),
    }
}

#[test]
fn test_no_params() {
    let calls = Calls::default();
    assert_eq!(invoked(&test_cli(&calls), &["commandA"]), Value::Unit);
}

#[test]
fn test_basic_params_in_every_style() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    invoked(&cli, &["commandB", "10", "Hello world!"]);
    invoked(&cli, &["commandB", "10", "--text", "Hello world!"]);
    invoked(&cli, &["commandB", "--number", "10", "--text", "Hello world!"]);

    assert_eq!(calls.entries(), vec!["commandB 10 Hello world!"; 3]);
}

#[test]
fn test_optional_param_defaults_and_overrides() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    invoked(&cli, &["commandC", "test.txt"]);
    invoked(&cli, &["commandC", "test.txt", "33"]);
    invoked(&cli, &["commandC", "test.txt", "--default", "33"]);
    invoked(&cli, &["commandC", "--file", "test.txt", "--default", "33"]);

    assert_eq!(
        calls.entries(),
        vec![
            "commandC test.txt 2",
            "commandC test.txt 33",
            "commandC test.txt 33",
            "commandC test.txt 33",
        ]
    );
}

#[test]
fn test_vararg() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    invoked(&cli, &["commandD", "test.txt"]);
    invoked(&cli, &["commandD", "test.txt", "33"]);
    invoked(&cli, &["commandD", "test.txt", "33", "22", "89"]);
    invoked(&cli, &["commandD", "--file", "test.txt", "22", "33"]);

    assert_eq!(
        calls.entries(),
        vec![
            "commandD []",
            "commandD [33]",
            "commandD [33, 22, 89]",
            "commandD [22, 33]",
        ]
    );
}

#[test]
fn test_flag() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    assert_eq!(invoked(&cli, &["commandE", "test.txt"]), Value::Bool(false));
    assert_eq!(invoked(&cli, &["commandE", "test.txt", "--flag"]), Value::Bool(true));
    assert_eq!(
        invoked(&cli, &["commandE", "test.txt", "--flag", "true"]),
        Value::Bool(true)
    );
    assert_eq!(invoked(&cli, &["commandE", "--file", "test.txt"]), Value::Bool(false));
    assert_eq!(
        invoked(&cli, &["commandE", "--file", "test.txt", "--flag", "true"]),
        Value::Bool(true)
    );
    assert_eq!(invoked(&cli, &["commandE", "--file", "test.txt", "--flag"]), Value::Bool(true));
    assert_eq!(invoked(&cli, &["commandE", "--flag", "--file", "test.txt"]), Value::Bool(true));
    assert_eq!(
        invoked(&cli, &["commandE", "--flag", "true", "--file", "test.txt"]),
        Value::Bool(true)
    );
}

#[test]
fn test_help_token_invokes_nothing() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    let (result, output) = dispatch(&cli, &["--help"]);
    assert!(matches!(result, Err(Error::WrongArguments)));
    assert!(output.starts_with("Available commands:\n"));
    assert!(output.contains("commandB(number: i32, text: String): ()\n"));
    assert!(output.contains("commandD(file: PathBuf, multiple: i32...): ()\n"));
    assert!(calls.entries().is_empty());
}

#[test]
fn test_named_then_bare_without_vararg_fails() {
    let calls = Calls::default();
    let cli = test_cli(&calls);

    let (result, output) = dispatch(&cli, &["commandB", "--number", "10", "Hello"]);
    assert!(matches!(result, Err(Error::WrongArguments)));
    assert!(output.starts_with(
        "No varargs parameter found and named parameters have already been used.\n\ncommandB\n"
    ));
    assert!(calls.entries().is_empty());
}

#[test]
fn test_missing_constructor_is_a_bind_failure() {
    let cli = test_cli(&Calls::default()).with_coercions(Coercions::new());
    let (result, output) = dispatch(&cli, &["commandE", "test.txt"]);
    assert!(matches!(result, Err(Error::WrongArguments)));
    assert!(output.starts_with("Found no string constructors for PathBuf\n"));
}

#[test]
fn test_failing_constructor_propagates() {
    let cli = test_cli(&Calls::default()).with_coercions(Coercions::new().register(
        "PathBuf",
        |token: &str| -> Result<PathBuf, String> { Err(format!("refusing {token}")) },
    ));
    let (result, output) = dispatch(&cli, &["commandE", "test.txt"]);
    assert!(matches!(result, Err(Error::Construct { .. })));
    assert!(output.is_empty());
}

#[test]
fn test_setup_consumes_global_options() {
    let seen = Arc::new(Mutex::new(None));
    let record = Arc::clone(&seen);
    let setup = Command::new("setup")
        .param(Parameter::optional("verbose", Kind::Bool).description("Log more"))
        .handler(move |args| {
            *record.lock().unwrap() = Some(args.get_opt::<bool>("verbose")?.unwrap_or(false));
            Ok::<_, Error>(())
        });
    let cli = test_cli(&Calls::default()).with_setup(setup).unwrap();

    assert_eq!(invoked(&cli, &["--verbose", "commandA"]), Value::Unit);
    assert_eq!(*seen.lock().unwrap(), Some(true));

    let (_, output) = dispatch(&cli, &["--help"]);
    assert!(output.starts_with("Global options:\n--verbose <bool> (optional)\n    Log more\n\n"));
}

#[test]
fn test_shell_redispatches_lines() {
    let calls = Calls::default();
    let cli = test_cli(&calls).with_config(Config::default().prompt(""));

    let script = "commandB 10 \"Hello world!\"\n\ncommandE test.txt --flag\nquit\ncommandA\n";
    let mut output = Vec::new();
    let result = cli
        .run_returning(&[], &mut Cursor::new(script.as_bytes().to_vec()), &mut output)
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(result, Outcome::ShellClosed);
    assert_eq!(calls.entries(), vec!["commandB 10 Hello world!"]);
    assert!(output.starts_with("Entering interactive mode:\nAvailable commands:\n"));
    assert!(output.ends_with("true\n"));
}

#[test]
fn test_shell_tokens_match_process_tokens() {
    assert_eq!(
        split_line(r#"commandB 10 "Hello world!""#),
        tokens(&["commandB", "10", "Hello world!"])
    );
}

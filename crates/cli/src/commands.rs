//! The demo command set exposed by `fnc`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fncli_core::{Cli, Coercions, Command, Config, Error, Kind, Parameter, Result};
use itertools::Itertools;
use log::info;

/// State set by the global options and read by the commands.
#[derive(Debug, Default)]
pub struct Session {
    dry_run: AtomicBool,
}

impl Session {
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run.load(Ordering::Relaxed)
    }

    fn prefix(&self) -> &'static str {
        if self.dry_run() {
            "[dry run] "
        } else {
            ""
        }
    }
}

/// The global options: `--dry-run`.
#[must_use]
pub fn setup(session: Arc<Session>) -> Command {
    Command::new("setup")
        .param(
            Parameter::optional("dry-run", Kind::Bool)
                .default_value(false)
                .description("Describe what would happen without doing it"),
        )
        .handler(move |args| {
            let dry_run: bool = args.get("dry-run")?;
            if dry_run {
                info!("Dry run enabled");
            }
            session.dry_run.store(dry_run, Ordering::Relaxed);
            Ok::<_, Error>(())
        })
}

#[must_use]
pub fn available(session: &Arc<Session>) -> Vec<Command> {
    let server_session = Arc::clone(session);
    let migrate_session = Arc::clone(session);
    let dump_session = Arc::clone(session);
    let delete_session = Arc::clone(session);

    vec![
        Command::new("runServer")
            .param(Parameter::optional("host", Kind::Str).default_value("0.0.0.0"))
            .param(Parameter::optional("port", Kind::U16).default_value(8080_u16))
            .returns("String")
            .description("Runs the server")
            .handler(move |args| {
                let host: String = args.get("host")?;
                let port: u16 = args.get("port")?;
                Ok::<_, Error>(format!(
                    "{}Running the server at {host} on port {port}",
                    server_session.prefix()
                ))
            }),
        Command::new("migrate")
            .param(Parameter::required("version", Kind::I32).description("Target schema version"))
            .returns("String")
            .description("Upgrades the database")
            .handler(move |args| {
                let version: i32 = args.get("version")?;
                Ok::<_, Error>(format!(
                    "{}Upgrading the database to version {version}",
                    migrate_session.prefix()
                ))
            }),
        Command::new("dump")
            .param(Parameter::required("to", Kind::custom("PathBuf")))
            .param(
                Parameter::optional("format", Kind::enumeration("Format", ["Json", "Csv"]))
                    .default_value("Json")
                    .documentation("Matched case-insensitively"),
            )
            .returns("String")
            .description("Dumps to a file")
            .handler(move |args| {
                let to: Arc<PathBuf> = args.get("to")?;
                let format: String = args.get("format")?;
                Ok::<_, Error>(format!(
                    "{}Dumping {format} to {}",
                    dump_session.prefix(),
                    to.display()
                ))
            }),
        Command::new("deleteItems")
            .param(Parameter::variadic("ids", Kind::I64))
            .returns("String")
            .description("Deletes items by ID")
            .handler(move |args| {
                let ids: Vec<i64> = args.get("ids")?;
                Ok::<_, Error>(format!(
                    "{}Deleting {}",
                    delete_session.prefix(),
                    ids.iter().join(", ")
                ))
            }),
        Command::new("greet")
            .param(Parameter::required("name", Kind::Str).nullable())
            .param(
                Parameter::optional("shout", Kind::Bool)
                    .default_value(false)
                    .description("Greet in capitals"),
            )
            .returns("String")
            .handler(|args| {
                let name: Option<String> = args.get("name")?;
                let greeting = format!("Hello {}!", name.as_deref().unwrap_or("stranger"));
                let shout: bool = args.get("shout")?;
                Ok::<_, Error>(if shout {
                    greeting.to_uppercase()
                } else {
                    greeting
                })
            }),
    ]
}

/// String constructors for the custom types the commands take.
#[must_use]
pub fn coercions() -> Coercions {
    Coercions::new().register_from_str::<PathBuf>("PathBuf")
}

/// Assembles the demo program.
///
/// # Errors
///
/// Returns an error if the command set fails registry validation.
pub fn build(config: Config) -> Result<(Cli, Arc<Session>)> {
    let session = Arc::new(Session::default());
    let cli = Cli::new(available(&session))?
        .with_setup(setup(Arc::clone(&session)))?
        .with_coercions(coercions())
        .with_config(config);
    Ok((cli, session))
}

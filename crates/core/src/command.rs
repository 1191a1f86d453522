//! Command and parameter descriptors, and the registry of available commands.

use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

use crate::coercion::{Kind, ParamType};
use crate::error::{BoxError, Error, Result};
use crate::value::{BoundArgs, Value};

/// One formal parameter of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// For a variadic parameter, the type of each element.
    pub ty: ParamType,
    pub optional: bool,
    pub variadic: bool,
    /// Value the invocation layer supplies when an optional parameter is not bound.
    pub default: Option<Value>,
    pub description: Option<String>,
    pub documentation: Option<String>,
}

impl Parameter {
    fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            ty: ParamType::new(kind),
            optional: false,
            variadic: false,
            default: None,
            description: None,
            documentation: None,
        }
    }

    #[must_use]
    pub fn required(name: &str, kind: Kind) -> Self {
        Self::new(name, kind)
    }

    #[must_use]
    pub fn optional(name: &str, kind: Kind) -> Self {
        Self {
            optional: true,
            ..Self::new(name, kind)
        }
    }

    /// A parameter accepting zero or more values of `element`.
    #[must_use]
    pub fn variadic(name: &str, element: Kind) -> Self {
        Self {
            variadic: true,
            ..Self::new(name, element)
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.ty.nullable = true;
        self
    }

    /// Makes the parameter optional with `value` filled in when it is omitted.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn documentation(mut self, documentation: &str) -> Self {
        self.documentation = Some(documentation.to_string());
        self
    }
}

impl Display for Parameter {
    /// Summary form, e.g. `port: i32 = ...` or `ids: i32...`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;
        if self.variadic {
            f.write_str("...")
        } else if self.optional {
            f.write_str(" = ...")
        } else {
            Ok(())
        }
    }
}

type Handler = Arc<dyn Fn(&BoundArgs) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// One invokable unit exposed as a subcommand.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Type name shown after the parameter list in summaries.
    pub returns: String,
    pub description: Option<String>,
    pub documentation: Option<String>,
    handler: Handler,
}

impl Command {
    /// A command with no parameters whose handler does nothing.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            returns: "()".to_string(),
            description: None,
            documentation: None,
            handler: Arc::new(unit_handler),
        }
    }

    /// The setup used when the caller supplies none: no global options, no effect.
    #[must_use]
    pub fn no_setup() -> Self {
        Self::new("setup")
    }

    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn returns(mut self, type_name: &str) -> Self {
        self.returns = type_name.to_string();
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn documentation(mut self, documentation: &str) -> Self {
        self.documentation = Some(documentation.to_string());
        self
    }

    #[must_use]
    pub fn handler<F, R, E>(mut self, handler: F) -> Self
    where
        F: Fn(&BoundArgs) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Into<Value>,
        E: Into<BoxError>,
    {
        self.handler = Arc::new(move |args: &BoundArgs| {
            handler(args).map(Into::into).map_err(Into::into)
        });
        self
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The non-variadic parameter at `index` in declaration order. The
    /// variadic parameter is never a numbered slot; bare tokens reach it only
    /// once every other slot is filled.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Parameter> {
        self.parameters.iter().filter(|p| !p.variadic).nth(index)
    }

    #[must_use]
    pub fn variadic_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.variadic)
    }

    /// Fills declared defaults for unbound optional parameters and calls the handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invocation`] if the handler fails.
    pub fn invoke(&self, mut args: BoundArgs) -> Result<Value> {
        for parameter in &self.parameters {
            if let Some(default) = &parameter.default {
                if !args.contains(&parameter.name) {
                    args.set(&parameter.name, default.clone());
                }
            }
        }

        if args.is_empty() {
            debug!("Invoking `{}`", self.name);
        } else {
            debug!(
                "Invoking `{}` with {}",
                self.name,
                args.iter()
                    .map(|(name, value)| format!("{name}={value:?}"))
                    .join(", ")
            );
        }
        (self.handler)(&args).map_err(|source| Error::Invocation {
            command: self.name.clone(),
            source,
        })
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            validate_name(&parameter.name)?;
            if !seen.insert(parameter.name.as_str()) {
                return Err(Error::NonUniqueParameterName(
                    self.name.clone(),
                    parameter.name.clone(),
                ));
            }
        }

        if self.parameters.iter().filter(|p| p.variadic).count() > 1 {
            return Err(Error::MultipleVariadicParameters(self.name.clone()));
        }

        Ok(())
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

impl Display for Command {
    /// Summary form, e.g. `runServer(host: String = ..., port: i32 = ...): () - Run it`.
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}({}): {}",
            self.name,
            self.parameters.iter().join(", "),
            self.returns
        )?;

        if let Some(desc) = &self.description {
            write!(formatter, " - {desc}")?;
        }

        Ok(())
    }
}

fn unit_handler(_: &BoundArgs) -> std::result::Result<Value, BoxError> {
    Ok(Value::Unit)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    if name.chars().any(char::is_whitespace) {
        return Err(Error::NameWithSpace(name.to_string()));
    }

    if name.starts_with('-') {
        return Err(Error::NameWithDash(name.to_string()));
    }

    Ok(())
}

/// The available commands, in registration order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: IndexMap<String, Command>,
}

impl Registry {
    /// Validates and registers `commands`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid or duplicate command or parameter names,
    /// or for a command with more than one variadic parameter.
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Result<Self> {
        let mut registered = IndexMap::new();
        for command in commands {
            command.validate()?;
            if registered.contains_key(&command.name) {
                return Err(Error::NonUniqueCommandName(command.name.clone()));
            }
            registered.insert(command.name.clone(), command);
        }

        Ok(Self {
            commands: registered,
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

/// Validates a setup command the same way registered commands are validated.
pub(crate) fn validate_setup(setup: &Command) -> Result<()> {
    setup.validate()
}

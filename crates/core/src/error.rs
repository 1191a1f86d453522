use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by command handlers and string constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parameter with name '{}' not found", .0)]
    UnknownOption(String),

    #[error("No value provided for parameter '{}'", .0)]
    MissingValue(String),

    #[error("'{}' is required, but wasn't provided.", .0)]
    MissingRequired(String),

    #[error("More arguments provided than the function can receive.")]
    TooManyArguments,

    #[error("No varargs parameter found and named parameters have already been used.")]
    NoVarargSlot,

    #[error("Cannot parse `{}` as {}", .token, .kind)]
    Parse { kind: String, token: String },

    #[error("Unknown value `{}` for {}, expected one of: {}", .token, .type_name, .expected)]
    UnknownEnumValue {
        type_name: String,
        token: String,
        expected: String,
    },

    #[error("Found no string constructors for {}", .0)]
    NoStringConstructor(String),

    #[error("Help was requested.")]
    HelpRequested,

    #[error("No command named `{}`", .0)]
    UnknownCommand(String),

    /// The single signal raised after help has been printed for bad input.
    #[error("Wrong command-line arguments.")]
    WrongArguments,

    #[error("Error constructing {} from `{}`: {}", .type_name, .token, .source)]
    Construct {
        type_name: String,
        token: String,
        source: BoxError,
    },

    #[error("Command `{}` failed: {}", .command, .source)]
    Invocation { command: String, source: BoxError },

    #[error("Argument `{}` is not bound to a value of type {}", .name, .expected)]
    ArgumentType { name: String, expected: String },

    #[error("Found a non-unique command name: `{}`", .0)]
    NonUniqueCommandName(String),

    #[error("Found a non-unique parameter name on command {}: `{}`", .0, .1)]
    NonUniqueParameterName(String, String),

    #[error("Command `{}` declares more than one variadic parameter", .0)]
    MultipleVariadicParameters(String),

    #[error("Invalid name: name may not be empty")]
    EmptyName,

    #[error("Invalid name `{}`: name may not contain whitespace", .0)]
    NameWithSpace(String),

    #[error("Invalid name `{}`: name may not start with `-`", .0)]
    NameWithDash(String),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn parse_error(kind: impl Into<String>, token: &str) -> Self {
        Self::Parse {
            kind: kind.into(),
            token: token.to_string(),
        }
    }

    pub fn argument_type(name: &str, expected: &str) -> Self {
        Self::ArgumentType {
            name: name.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Whether this is a user-input failure that should print help and abort
    /// the current dispatch.
    #[must_use]
    pub fn is_bind_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownOption(_)
                | Self::MissingValue(_)
                | Self::MissingRequired(_)
                | Self::TooManyArguments
                | Self::NoVarargSlot
                | Self::Parse { .. }
                | Self::UnknownEnumValue { .. }
                | Self::NoStringConstructor(_)
                | Self::HelpRequested
                | Self::UnknownCommand(_)
        )
    }

    #[must_use]
    pub fn is_wrong_arguments(&self) -> bool {
        matches!(self, Self::WrongArguments)
    }
}

//! Conversion of a single string token into a typed [`Value`].
//!
//! Primitive kinds are parsed with the standard library's locale-independent
//! `FromStr` implementations. Enumerations match their member names
//! case-insensitively. Any other type must have a string constructor
//! registered in [`Coercions`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use itertools::Itertools;
use log::trace;

use crate::error::{BoxError, Error, Result};
use crate::value::Value;

/// The declared type of a parameter (or of each element of a variadic one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Enum(EnumType),
    /// A type built from a string by a constructor registered under this name.
    Custom(String),
}

impl Kind {
    pub fn enumeration<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Kind::Enum(EnumType::new(name, members))
    }

    pub fn custom(type_name: impl Into<String>) -> Self {
        Kind::Custom(type_name.into())
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Kind::Bool)
    }

    /// Name shown in help output.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::Str => "String",
            Kind::Enum(enum_type) => enum_type.name.as_str(),
            Kind::Custom(name) => name.as_str(),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An enumeration with nameable members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    fn resolve(&self, token: &str) -> Result<Value> {
        self.members
            .iter()
            .find(|member| member.eq_ignore_ascii_case(token))
            .map(|member| Value::Enum {
                type_name: self.name.clone(),
                member: member.clone(),
            })
            .ok_or_else(|| Error::UnknownEnumValue {
                type_name: self.name.clone(),
                token: token.to_string(),
                expected: self.members.iter().join(", "),
            })
    }
}

/// A kind plus whether the literal `null` is accepted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    pub kind: Kind,
    pub nullable: bool,
}

impl ParamType {
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.display_name())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

type Constructor = Arc<dyn Fn(&str) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Registry of string constructors for [`Kind::Custom`] types.
///
/// Populated once at startup and read-only during dispatch.
#[derive(Clone, Default)]
pub struct Coercions {
    constructors: HashMap<String, Constructor>,
}

impl Coercions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` as the way to build `type_name` from a token.
    #[must_use]
    pub fn register<T, E, F>(mut self, type_name: &str, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
    {
        let name = type_name.to_string();
        let constructor: Constructor = Arc::new(move |token: &str| {
            constructor(token)
                .map(|value| Value::object(name.clone(), value))
                .map_err(Into::into)
        });
        self.constructors.insert(type_name.to_string(), constructor);
        self
    }

    /// Registers any `FromStr` type under `type_name`.
    #[must_use]
    pub fn register_from_str<T>(self, type_name: &str) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<BoxError>,
    {
        self.register(type_name, T::from_str)
    }

    /// Converts `token` into a value of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed primitive literals,
    /// [`Error::UnknownEnumValue`] when no enumeration member matches,
    /// [`Error::NoStringConstructor`] for unregistered custom types and
    /// [`Error::Construct`] when a registered constructor fails.
    pub fn coerce(&self, target: &ParamType, token: &str) -> Result<Value> {
        trace!("Coercing `{token}` to {target}");
        if target.nullable && token == "null" {
            return Ok(Value::Null);
        }

        match &target.kind {
            Kind::I8 => parse_primitive::<i8>(&target.kind, token).map(Value::I8),
            Kind::I16 => parse_primitive::<i16>(&target.kind, token).map(Value::I16),
            Kind::I32 => parse_primitive::<i32>(&target.kind, token).map(Value::I32),
            Kind::I64 => parse_primitive::<i64>(&target.kind, token).map(Value::I64),
            Kind::U8 => parse_primitive::<u8>(&target.kind, token).map(Value::U8),
            Kind::U16 => parse_primitive::<u16>(&target.kind, token).map(Value::U16),
            Kind::U32 => parse_primitive::<u32>(&target.kind, token).map(Value::U32),
            Kind::U64 => parse_primitive::<u64>(&target.kind, token).map(Value::U64),
            Kind::F32 => parse_primitive::<f32>(&target.kind, token).map(Value::F32),
            Kind::F64 => parse_primitive::<f64>(&target.kind, token).map(Value::F64),
            Kind::Bool => match token {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(Error::parse_error(target.kind.display_name(), token)),
            },
            Kind::Char => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(Error::parse_error(target.kind.display_name(), token)),
                }
            }
            Kind::Str => Ok(Value::Str(token.to_string())),
            Kind::Enum(enum_type) => enum_type.resolve(token),
            Kind::Custom(type_name) => {
                let constructor = self
                    .constructors
                    .get(type_name)
                    .ok_or_else(|| Error::NoStringConstructor(type_name.clone()))?;
                constructor(token).map_err(|source| Error::Construct {
                    type_name: type_name.clone(),
                    token: token.to_string(),
                    source,
                })
            }
        }
    }
}

fn parse_primitive<T: FromStr>(kind: &Kind, token: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| Error::parse_error(kind.display_name(), token))
}

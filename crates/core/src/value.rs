//! Typed values produced by coercion and the argument sets handed to commands.

use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{Error, Result};

/// A value bound to a parameter or returned from a command.
#[derive(Clone)]
pub enum Value {
    /// The "no value" result. Never printed.
    Unit,
    Null,
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Str(String),
    /// A member of a declared enumeration, stored under its canonical name.
    Enum { type_name: String, member: String },
    /// A value built by a registered string constructor.
    Object {
        type_name: String,
        value: Arc<dyn Any + Send + Sync>,
    },
    /// The accumulated values of a variadic parameter.
    List(Vec<Value>),
}

impl Value {
    pub fn object<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self::Object {
            type_name: type_name.into(),
            value: Arc::new(value),
        }
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Borrows a constructed object as its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) | (Self::Null, Self::Null) => true,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (
                Self::Enum {
                    type_name: t1,
                    member: m1,
                },
                Self::Enum {
                    type_name: t2,
                    member: m2,
                },
            ) => t1 == t2 && m1 == m2,
            // Objects are opaque, so only the same allocation compares equal
            (
                Self::Object {
                    type_name: t1,
                    value: v1,
                },
                Self::Object {
                    type_name: t2,
                    value: v2,
                },
            ) => t1 == t2 && Arc::ptr_eq(v1, v2),
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => f.write_str("Unit"),
            Self::Null => f.write_str("Null"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Char(c) => write!(f, "Char({c:?})"),
            Self::Enum { type_name, member } => write!(f, "Enum({type_name}::{member})"),
            Self::Object { type_name, .. } => write!(f, "Object({type_name})"),
            Self::List(values) => f.debug_list().entries(values).finish(),
            other => write!(f, "{other}"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => Ok(()),
            Self::Null => f.write_str("null"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Enum { member, .. } => f.write_str(member),
            Self::Object { type_name, .. } => write!(f, "<{type_name}>"),
            Self::List(values) => write!(f, "[{}]", values.iter().join(", ")),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64, bool => Bool, char => Char, String => Str,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Unit
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a bound [`Value`] into a Rust type a handler works with.
pub trait FromValue: Sized {
    /// Human-readable name used in type mismatch errors.
    fn expected() -> String;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn expected() -> String {
                    stringify!($ty).to_string()
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64, bool => Bool, char => Char,
}

impl FromValue for String {
    fn expected() -> String {
        "String".to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            Value::Enum { member, .. } => Some(member.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn expected() -> String {
        format!("{}?", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn expected() -> String {
        format!("{}...", T::expected())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(values) => values.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: Any + Send + Sync> FromValue for Arc<T> {
    fn expected() -> String {
        std::any::type_name::<T>().to_string()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object { value, .. } => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }
}

/// The arguments bound for one invocation, keyed by parameter name in the
/// order they were bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: IndexMap<String, Value>,
}

impl BoundArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing any earlier value.
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Appends to the list bound under `name`, starting one if needed.
    pub fn push(&mut self, name: &str, value: Value) {
        match self.values.get_mut(name) {
            Some(Value::List(values)) => values.push(value),
            _ => {
                self.values.insert(name.to_string(), Value::List(vec![value]));
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Typed access to a bound argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequired`] if nothing is bound under `name` and
    /// [`Error::ArgumentType`] if the bound value has a different type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| Error::MissingRequired(name.to_string()))?;
        T::from_value(value).ok_or_else(|| Error::argument_type(name, &T::expected()))
    }

    /// Like [`BoundArgs::get`], but an unbound parameter yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentType`] if the bound value has a different type.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| Error::argument_type(name, &T::expected())),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

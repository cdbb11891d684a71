//! Parameter models
//!
//! Declared parameter types, literal parameter sets and typed argument lists.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::TestSignal;

/// Declared type of a single method parameter
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
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
    Char,
    Str,
    /// Closed set of variant names, matched case-sensitively
    Enum {
        name: String,
        variants: Vec<String>,
    },
    /// Type converted by a registered custom converter
    Custom(String),
}

impl ParamType {
    pub fn enumeration(name: impl Into<String>, variants: &[&str]) -> Self {
        ParamType::Enum {
            name: name.into(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        ParamType::Custom(name.into())
    }

    /// Type name as shown in error messages and listings
    pub fn name(&self) -> &str {
        match self {
            ParamType::Bool => "bool",
            ParamType::I8 => "i8",
            ParamType::I16 => "i16",
            ParamType::I32 => "i32",
            ParamType::I64 => "i64",
            ParamType::U8 => "u8",
            ParamType::U16 => "u16",
            ParamType::U32 => "u32",
            ParamType::U64 => "u64",
            ParamType::F32 => "f32",
            ParamType::F64 => "f64",
            ParamType::Char => "char",
            ParamType::Str => "String",
            ParamType::Enum { name, .. } => name,
            ParamType::Custom(name) => name,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed argument value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    Bool(bool),
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
    Char(char),
    Str(String),
    Enum {
        type_name: String,
        variant: String,
    },
    Custom {
        type_name: String,
        value: serde_json::Value,
    },
}

impl ArgValue {
    /// Name of the value's type, matching [`ParamType::name`]
    pub fn type_name(&self) -> &str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::I8(_) => "i8",
            ArgValue::I16(_) => "i16",
            ArgValue::I32(_) => "i32",
            ArgValue::I64(_) => "i64",
            ArgValue::U8(_) => "u8",
            ArgValue::U16(_) => "u16",
            ArgValue::U32(_) => "u32",
            ArgValue::U64(_) => "u64",
            ArgValue::F32(_) => "f32",
            ArgValue::F64(_) => "f64",
            ArgValue::Char(_) => "char",
            ArgValue::Str(_) => "String",
            ArgValue::Enum { type_name, .. } => type_name,
            ArgValue::Custom { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(v) => write!(f, "{v}"),
            ArgValue::I8(v) => write!(f, "{v}"),
            ArgValue::I16(v) => write!(f, "{v}"),
            ArgValue::I32(v) => write!(f, "{v}"),
            ArgValue::I64(v) => write!(f, "{v}"),
            ArgValue::U8(v) => write!(f, "{v}"),
            ArgValue::U16(v) => write!(f, "{v}"),
            ArgValue::U32(v) => write!(f, "{v}"),
            ArgValue::U64(v) => write!(f, "{v}"),
            ArgValue::F32(v) => write!(f, "{v}"),
            ArgValue::F64(v) => write!(f, "{v}"),
            ArgValue::Char(v) => write!(f, "{v}"),
            ArgValue::Str(v) => write!(f, "{v}"),
            ArgValue::Enum { variant, .. } => write!(f, "{variant}"),
            ArgValue::Custom { value, .. } => write!(f, "{value}"),
        }
    }
}

/// Extraction of a concrete Rust value from an [`ArgValue`]
pub trait FromArg: Sized {
    fn from_arg(value: &ArgValue) -> Option<Self>;
}

macro_rules! impl_from_arg {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromArg for $ty {
                fn from_arg(value: &ArgValue) -> Option<Self> {
                    match value {
                        ArgValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_arg!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => Str,
);

impl FromArg for serde_json::Value {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Custom { value, .. } => Some(value.clone()),
            _ => None,
        }
    }
}

/// Tokens of one declared parameter set, in declaration order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// The literal exactly as declared
    pub literal: String,
    pub tokens: Vec<String>,
}

impl ParameterSpec {
    pub fn new(literal: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            literal: literal.into(),
            tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Typed arguments for one invocation, one value per declared parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedArguments {
    values: Vec<ArgValue>,
}

impl TypedArguments {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// Typed access to the argument at `index`.
    ///
    /// A missing argument or a type mismatch is an error signal of the test
    /// body, so it is classified as a failure of that invocation only.
    pub fn get<T: FromArg>(&self, index: usize) -> Result<T, TestSignal> {
        let value = self.values.get(index).ok_or_else(|| {
            TestSignal::error(format!(
                "argument {index} out of range ({} arguments)",
                self.values.len()
            ))
        })?;

        T::from_arg(value).ok_or_else(|| {
            TestSignal::error(format!(
                "argument {index} is {} but a different type was requested",
                value.type_name()
            ))
        })
    }

    pub fn bool(&self, index: usize) -> Result<bool, TestSignal> {
        self.get(index)
    }

    pub fn i32(&self, index: usize) -> Result<i32, TestSignal> {
        self.get(index)
    }

    pub fn i64(&self, index: usize) -> Result<i64, TestSignal> {
        self.get(index)
    }

    pub fn f64(&self, index: usize) -> Result<f64, TestSignal> {
        self.get(index)
    }

    pub fn str(&self, index: usize) -> Result<&str, TestSignal> {
        match self.values.get(index) {
            Some(ArgValue::Str(s)) => Ok(s),
            Some(other) => Err(TestSignal::error(format!(
                "argument {index} is {} but String was requested",
                other.type_name()
            ))),
            None => Err(TestSignal::error(format!(
                "argument {index} out of range ({} arguments)",
                self.values.len()
            ))),
        }
    }

    /// Variant name of an enum argument
    pub fn variant(&self, index: usize) -> Result<&str, TestSignal> {
        match self.values.get(index) {
            Some(ArgValue::Enum { variant, .. }) => Ok(variant),
            Some(other) => Err(TestSignal::error(format!(
                "argument {index} is {} but an enum was requested",
                other.type_name()
            ))),
            None => Err(TestSignal::error(format!(
                "argument {index} out of range ({} arguments)",
                self.values.len()
            ))),
        }
    }
}

impl fmt::Display for TypedArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "({})", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalKind;

    #[test]
    fn test_param_type_names() {
        assert_eq!(ParamType::Bool.name(), "bool");
        assert_eq!(ParamType::Str.name(), "String");
        assert_eq!(ParamType::enumeration("Color", &["Red"]).name(), "Color");
        assert_eq!(ParamType::custom("Duration").to_string(), "Duration");
    }

    #[test]
    fn test_typed_access() {
        let args = TypedArguments::new(vec![
            ArgValue::Bool(true),
            ArgValue::I32(42),
            ArgValue::Str("hello".to_string()),
        ]);

        assert_eq!(args.bool(0).unwrap(), true);
        assert_eq!(args.i32(1).unwrap(), 42);
        assert_eq!(args.str(2).unwrap(), "hello");
        assert_eq!(args.get::<String>(2).unwrap(), "hello");
    }

    #[test]
    fn test_typed_access_mismatch_is_error_signal() {
        let args = TypedArguments::new(vec![ArgValue::Bool(false)]);

        let err = args.i32(0).unwrap_err();
        assert_eq!(err.kind(), SignalKind::Error);

        let err = args.bool(3).unwrap_err();
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn test_arguments_display() {
        let args = TypedArguments::new(vec![ArgValue::I64(1), ArgValue::Char('x')]);
        assert_eq!(args.to_string(), "(1, x)");
    }
}

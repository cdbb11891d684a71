//! Type-directed token conversion

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;

use crate::models::{ArgValue, ParamType};

/// Converter for a declared type with no built-in rule
pub trait ParamConverter: Send + Sync {
    fn convert(&self, token: &str) -> Result<serde_json::Value, String>;
}

impl<F> ParamConverter for F
where
    F: Fn(&str) -> Result<serde_json::Value, String> + Send + Sync,
{
    fn convert(&self, token: &str) -> Result<serde_json::Value, String> {
        self(token)
    }
}

/// Custom converters keyed by declared type name
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn ParamConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        type_name: impl Into<String>,
        converter: impl ParamConverter + 'static,
    ) -> Self {
        self.converters.insert(type_name.into(), Arc::new(converter));
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn ParamConverter>> {
        self.converters.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.converters.contains_key(type_name)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.converters.keys().collect();
        names.sort();
        f.debug_struct("ConverterRegistry")
            .field("types", &names)
            .finish()
    }
}

/// Why a single token could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    Invalid(String),
    MissingConverter,
}

/// Convert one token into a value of the declared type
pub fn convert_token(
    token: &str,
    ty: &ParamType,
    registry: &ConverterRegistry,
) -> Result<ArgValue, ConversionFailure> {
    match ty {
        ParamType::Bool => parse_bool(token).map(ArgValue::Bool),
        ParamType::I8 => parse_number(token).map(ArgValue::I8),
        ParamType::I16 => parse_number(token).map(ArgValue::I16),
        ParamType::I32 => parse_number(token).map(ArgValue::I32),
        ParamType::I64 => parse_number(token).map(ArgValue::I64),
        ParamType::U8 => parse_number(token).map(ArgValue::U8),
        ParamType::U16 => parse_number(token).map(ArgValue::U16),
        ParamType::U32 => parse_number(token).map(ArgValue::U32),
        ParamType::U64 => parse_number(token).map(ArgValue::U64),
        ParamType::F32 => parse_number(token).map(ArgValue::F32),
        ParamType::F64 => parse_number(token).map(ArgValue::F64),
        ParamType::Char => parse_char(token).map(ArgValue::Char),
        ParamType::Str => Ok(ArgValue::Str(token.to_string())),
        ParamType::Enum { name, variants } => {
            if variants.iter().any(|v| v == token) {
                Ok(ArgValue::Enum {
                    type_name: name.clone(),
                    variant: token.to_string(),
                })
            } else {
                Err(ConversionFailure::Invalid(format!(
                    "expected one of [{}]",
                    variants.join(", ")
                )))
            }
        }
        ParamType::Custom(name) => {
            let converter = registry
                .get(name)
                .ok_or(ConversionFailure::MissingConverter)?;
            // a panicking converter is a configuration problem of this method only
            let converted = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(token)))
                .map_err(|payload| {
                    ConversionFailure::Invalid(format!(
                        "converter panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                })?;
            converted
                .map(|value| ArgValue::Custom {
                    type_name: name.clone(),
                    value,
                })
                .map_err(ConversionFailure::Invalid)
        }
    }
}

/// Text of a panic payload raised with `panic!`
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn parse_bool(token: &str) -> Result<bool, ConversionFailure> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConversionFailure::Invalid(
            "expected true or false".to_string(),
        ))
    }
}

fn parse_number<T>(token: &str) -> Result<T, ConversionFailure>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    token
        .parse::<T>()
        .map_err(|e| ConversionFailure::Invalid(e.to_string()))
}

fn parse_char(token: &str) -> Result<char, ConversionFailure> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConversionFailure::Invalid(
            "expected exactly one character".to_string(),
        )),
    }
}

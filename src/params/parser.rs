//! Parameter literal parser
//!
//! Converts declared literal sets into typed arguments for a method's
//! declared parameter types. Pure function of its inputs.

use crate::models::{ParamType, ParameterSpec, TypedArguments};

use super::convert::{convert_token, ConversionFailure, ConverterRegistry};
use super::{ConfigurationError, ParamSyntax};

/// One parameter set after parsing
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedSet {
    pub spec: ParameterSpec,
    pub arguments: TypedArguments,
}

/// Parser for literal parameter declarations
#[derive(Clone, Debug)]
pub struct ParameterParser<'a> {
    syntax: &'a ParamSyntax,
    registry: &'a ConverterRegistry,
}

impl<'a> ParameterParser<'a> {
    pub fn new(syntax: &'a ParamSyntax, registry: &'a ConverterRegistry) -> Self {
        Self { syntax, registry }
    }

    /// Parse every literal set, or fail with the first configuration error.
    ///
    /// No partial list is returned: one bad set invalidates the whole
    /// declaration.
    pub fn parse<S: AsRef<str>>(
        &self,
        literals: &[S],
        types: &[ParamType],
    ) -> Result<Vec<ParsedSet>, ConfigurationError> {
        self.syntax.validate()?;

        if literals.is_empty() {
            return Err(ConfigurationError::NoParameters);
        }

        for (position, ty) in types.iter().enumerate() {
            if let ParamType::Custom(name) = ty {
                if !self.registry.contains(name) {
                    return Err(ConfigurationError::MissingConverter {
                        type_name: name.clone(),
                        position,
                    });
                }
            }
        }

        literals
            .iter()
            .enumerate()
            .map(|(set, literal)| self.parse_set(set, literal.as_ref(), types))
            .collect()
    }

    /// Split a literal into its tokens without converting them
    pub fn tokenize(&self, literal: &str, arity: usize) -> Vec<String> {
        if arity == 0 && literal.trim().is_empty() {
            return Vec::new();
        }
        self.syntax.split(literal)
    }

    fn parse_set(
        &self,
        set: usize,
        literal: &str,
        types: &[ParamType],
    ) -> Result<ParsedSet, ConfigurationError> {
        let tokens = self.tokenize(literal, types.len());

        if tokens.len() != types.len() {
            return Err(ConfigurationError::ArityMismatch {
                set,
                expected: types.len(),
                actual: tokens.len(),
            });
        }

        let values = tokens
            .iter()
            .zip(types)
            .enumerate()
            .map(|(position, (token, ty))| {
                convert_token(token, ty, self.registry).map_err(|failure| match failure {
                    ConversionFailure::Invalid(reason) => ConfigurationError::Conversion {
                        set,
                        position,
                        token: token.clone(),
                        target: ty.name().to_string(),
                        reason,
                    },
                    ConversionFailure::MissingConverter => ConfigurationError::MissingConverter {
                        type_name: ty.name().to_string(),
                        position,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParsedSet {
            spec: ParameterSpec::new(literal, tokens),
            arguments: TypedArguments::new(values),
        })
    }
}

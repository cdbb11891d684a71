//! Parameter literal parsing
//!
//! Turns declared literal parameter sets into typed arguments.
//!
//! ## Pipeline
//!
//! 1. [`ParamSyntax`] splits each literal into tokens
//! 2. [`convert_token`] converts each token by its declared [`ParamType`](crate::models::ParamType)
//! 3. [`ParameterParser`] checks arity and collects one typed argument list per set
//!
//! Every problem found here is a [`ConfigurationError`] and is raised before
//! any invocation runs.

mod convert;
mod error;
mod parser;
mod syntax;

pub(crate) use convert::panic_message;
pub use convert::{convert_token, ConversionFailure, ConverterRegistry, ParamConverter};
pub use error::ConfigurationError;
pub use parser::{ParameterParser, ParsedSet};
pub use syntax::ParamSyntax;

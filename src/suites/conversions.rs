//! Conversion suite
//!
//! Enum, char and string parameters, escaped delimiters, a per-method
//! delimiter override and a custom converter.

use crate::executor::{ParameterizedMethod, TestClass};
use crate::models::{check, check_eq, ParamType, TestSignal};
use crate::params::ParamSyntax;

const DIRECTIONS: [&str; 4] = ["North", "East", "South", "West"];

#[derive(Clone, Debug, Default)]
pub struct ConversionsTest;

/// Parse `250ms` or `2s` into milliseconds
pub fn parse_millis(token: &str) -> Result<serde_json::Value, String> {
    let (number, scale) = if let Some(ms) = token.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(secs) = token.strip_suffix('s') {
        (secs, 1000)
    } else {
        return Err(format!("missing unit in {token:?}, expected ms or s"));
    };

    number
        .trim()
        .parse::<u64>()
        .map(|n| serde_json::Value::from(n * scale))
        .map_err(|e| e.to_string())
}

fn turn_right(direction: &str) -> Option<&'static str> {
    let position = DIRECTIONS.iter().position(|d| *d == direction)?;
    Some(DIRECTIONS[(position + 1) % DIRECTIONS.len()])
}

impl ConversionsTest {
    pub const NAME: &'static str = "ConversionsTest";

    pub fn class() -> TestClass<Self> {
        // literals below are comma separated
        TestClass::with_default(Self::NAME)
            .syntax(ParamSyntax::default())
            .converter("Millis", parse_millis)
            .method(
                ParameterizedMethod::new("turns_right")
                    .param(ParamType::enumeration("Direction", &DIRECTIONS))
                    .param(ParamType::enumeration("Direction", &DIRECTIONS))
                    .parameters(&["North, East", "West, North"])
                    .body(|_: &mut Self, args| {
                        check_eq(turn_right(args.variant(0)?), Some(args.variant(1)?))
                    }),
            )
            .method(
                ParameterizedMethod::new("initials")
                    .param(ParamType::Str)
                    .param(ParamType::Char)
                    .parameters(&["Ada Lovelace, A", "Grace Hopper, G"])
                    .body(|_: &mut Self, args| {
                        check_eq(args.str(0)?.chars().next(), Some(args.get::<char>(1)?))
                    }),
            )
            .method(
                ParameterizedMethod::new("counts_escaped_items")
                    .param(ParamType::Str)
                    .param(ParamType::U32)
                    .parameters(&["a\\,b\\,c, 3", "single, 1"])
                    .body(|_: &mut Self, args| {
                        let items = args.str(0)?.split(',').count() as u32;
                        check_eq(items, args.get::<u32>(1)?)
                    }),
            )
            .method(
                ParameterizedMethod::new("uppercases_piped")
                    .param(ParamType::Str)
                    .param(ParamType::Str)
                    .syntax(ParamSyntax::new("|"))
                    .parameters(&["hello, world | HELLO, WORLD"])
                    .body(|_: &mut Self, args| {
                        check_eq(args.str(0)?.to_uppercase().as_str(), args.str(1)?)
                    }),
            )
            .method(
                ParameterizedMethod::new("timeouts")
                    .param(ParamType::custom("Millis"))
                    .param(ParamType::U64)
                    .parameters(&["250ms, 250", "2s, 2000"])
                    .body(|_: &mut Self, args| {
                        let millis = args
                            .get::<serde_json::Value>(0)?
                            .as_u64()
                            .ok_or_else(|| TestSignal::error("Millis was not a number"))?;
                        check(
                            millis == args.get::<u64>(1)?,
                            format!("converted to {millis}ms"),
                        )
                    }),
            )
    }
}

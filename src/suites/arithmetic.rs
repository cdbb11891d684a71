//! Calculator suite
//!
//! Multi-parameter integer and float sets, an assumption guarding division
//! by zero, and a stateful instance that must start fresh every time.

use crate::executor::{ParameterizedMethod, TestClass};
use crate::models::{assume_that, check, check_eq, ParamType, TestOutcome};
use crate::params::ParamSyntax;

#[derive(Clone, Debug, Default)]
pub struct CalculatorTest {
    memory: i64,
}

impl CalculatorTest {
    pub const NAME: &'static str = "CalculatorTest";

    fn adds(&mut self, a: i32, b: i32, expected: i32) -> TestOutcome {
        check_eq(a + b, expected)
    }

    fn divides(&mut self, dividend: i64, divisor: i64, expected: i64) -> TestOutcome {
        assume_that(divisor != 0, "division by zero is undefined")?;
        check_eq(dividend / divisor, expected)
    }

    fn averages(&mut self, a: f64, b: f64, expected: f64) -> TestOutcome {
        let mean = (a + b) / 2.0;
        check(
            (mean - expected).abs() < 1e-9,
            format!("mean of {a} and {b} was {mean}, expected {expected}"),
        )
    }

    fn accumulates(&mut self, value: i64) -> TestOutcome {
        self.memory += value;
        check_eq(self.memory, value)
    }

    pub fn class() -> TestClass<Self> {
        // literals below are comma separated
        TestClass::with_default(Self::NAME)
            .syntax(ParamSyntax::default())
            .method(
                ParameterizedMethod::new("adds")
                    .param(ParamType::I32)
                    .param(ParamType::I32)
                    .param(ParamType::I32)
                    .parameters(&["1, 2, 3", "-4, 4, 0", "100, 23, 123"])
                    .body(|test: &mut Self, args| {
                        test.adds(args.i32(0)?, args.i32(1)?, args.i32(2)?)
                    }),
            )
            .method(
                ParameterizedMethod::new("divides")
                    .param(ParamType::I64)
                    .param(ParamType::I64)
                    .param(ParamType::I64)
                    .parameters(&["6, 3, 2", "7, 2, 3", "1, 0, 0"])
                    .body(|test: &mut Self, args| {
                        test.divides(args.i64(0)?, args.i64(1)?, args.i64(2)?)
                    }),
            )
            .method(
                ParameterizedMethod::new("averages")
                    .param(ParamType::F64)
                    .param(ParamType::F64)
                    .param(ParamType::F64)
                    .parameters(&["1.5, 2.5, 2.0", "-1, 1, 0"])
                    .body(|test: &mut Self, args| {
                        test.averages(args.f64(0)?, args.f64(1)?, args.f64(2)?)
                    }),
            )
            .method(
                ParameterizedMethod::new("accumulates")
                    .param(ParamType::I64)
                    .parameters(&["5", "7", "-3"])
                    .body(|test: &mut Self, args| test.accumulates(args.i64(0)?)),
            )
    }
}

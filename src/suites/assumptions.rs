//! Assumptions with parameters
//!
//! One boolean parameter, two sets. The `false` set fails its assumption and
//! is reported as skipped while the method as a whole still passes.

use crate::executor::{ParameterizedMethod, TestClass};
use crate::models::{assume_true, ParamType, TestOutcome};

#[derive(Clone, Debug, Default)]
pub struct AssumptionsWithParamsTest;

impl AssumptionsWithParamsTest {
    pub const NAME: &'static str = "AssumptionsWithParamsTest";

    pub fn assume_once_works_and_once_ignores(&mut self, value: bool) -> TestOutcome {
        assume_true(value)
    }

    pub fn class() -> TestClass<Self> {
        TestClass::with_default(Self::NAME).method(
            ParameterizedMethod::new("assume_once_works_and_once_ignores")
                .param(ParamType::Bool)
                .parameters(&["true", "false"])
                .body(|test: &mut Self, args| {
                    test.assume_once_works_and_once_ignores(args.bool(0)?)
                }),
        )
    }
}

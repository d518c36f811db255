use std::fmt;

use tracing::trace_span;

use crate::context::{Args, Context};
use crate::error::{EvalError, ShapeError};
use crate::expr::{Expr, Function};
use crate::limits::Limits;
use crate::shape;

/// A validated function: the unit of execution.
///
/// Every shape constraint (variable ranges, call and recursion arities, fold and generator
/// function arities, non-empty operand lists) is checked once when the program is built, so
/// running it can only fail on the top-level argument count or on an opt-in [`Limits`] bound.
///
/// Programs hold no mutable state: they can be run any number of times, from any number of
/// threads, and every run starts from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    function: Function,
}

impl Program {
    pub fn new(body: Expr, arity: usize) -> Result<Self, ShapeError> {
        Self::from_function(Function::new(body, arity))
    }

    pub fn from_function(function: Function) -> Result<Self, ShapeError> {
        shape::check(&function)?;
        Ok(Self { function })
    }

    pub fn arity(&self) -> usize {
        self.function.arity()
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn into_function(self) -> Function {
        self.function
    }

    /// Run with exactly `arity` arguments and no resource limits.
    pub fn run(&self, args: &[f64]) -> Result<f64, EvalError> {
        self.run_with(args, &Limits::default())
    }

    pub fn run_with(&self, args: &[f64], limits: &Limits) -> Result<f64, EvalError> {
        if args.len() != self.arity() {
            return Err(EvalError::ArgumentCount {
                expected: self.arity(),
                found: args.len(),
            });
        }
        let _span = trace_span!("run", arity = self.arity()).entered();
        Context::root(&self.function, Args::from_slice(args), limits).evaluate()
    }
}

impl TryFrom<Function> for Program {
    type Error = ShapeError;

    fn try_from(function: Function) -> Result<Self, Self::Error> {
        Self::from_function(function)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.function, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::*;
    use crate::NodeKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn programs_are_shareable() {
        assert_send_sync::<Program>();
    }

    #[test]
    fn wrong_argument_count_fails_before_evaluation() {
        // evaluating this body would exceed the depth limit, the count check comes first
        let program = Program::new(recurse([var(0)]), 1).unwrap();
        let limits = Limits::unbounded().with_max_depth(1);

        assert_eq!(
            program.run_with(&[1.0, 2.0], &limits),
            Err(EvalError::ArgumentCount {
                expected: 1,
                found: 2,
            })
        );
        assert_eq!(
            program.run(&[]),
            Err(EvalError::ArgumentCount {
                expected: 1,
                found: 0,
            })
        );
        assert_eq!(
            program.run_with(&[1.0], &limits),
            Err(EvalError::DepthLimit { limit: 1 })
        );
    }

    #[test]
    fn shape_errors_surface_from_new() {
        let err = Program::new(call(function(var(0), 1), [value(1), value(2)]), 0).unwrap_err();
        assert_eq!(
            err,
            ShapeError::ArityMismatch {
                node: NodeKind::Call,
                expected: 1,
                found: 2,
            }
        );
        assert!(Program::try_from(function(var(1), 1)).is_err());
    }

    #[test]
    fn repeated_runs_are_independent() {
        // a generator in the body starts over on every run
        let body = sum(range(function(var(0), 1), value(0), var(0)));
        let program = Program::new(body, 1).unwrap();

        assert_eq!(program.run(&[4.0]), Ok(6.0));
        assert_eq!(program.run(&[4.0]), Ok(6.0));
        assert_eq!(program.run(&[5.0]), Ok(10.0));
        assert_eq!(program.run(&[4.0]), Ok(6.0));
    }

    #[test]
    fn generator_reused_inside_one_run_restarts() {
        // the same generator description is drained by two separate sums
        let gen = range(function(var(0), 1), value(1), value(4));
        let body = add([sum(gen.clone()), sum(gen)]);
        assert_eq!(Program::new(body, 0).unwrap().run(&[]), Ok(12.0));
    }

    #[test]
    fn sum_inside_a_recursive_function_gets_a_cursor_per_invocation() {
        // f(n) = sum(0..n) + (n > 0 ? f(n - 1) : 0)
        let body = add([
            sum(range(function(var(0), 1), value(0), var(0))),
            if_(lt(value(0), var(0)), recurse([add([var(0), value(-1)])])),
        ]);
        let program = Program::new(call(function(body, 1), [var(0)]), 1).unwrap();
        // 0 + 0 + 1 + 3 + 6 + 10
        assert_eq!(program.run(&[5.0]), Ok(20.0));
    }
}

use smallvec::SmallVec;
use tracing::trace_span;

use crate::error::EvalError;
use crate::expr::Function;
use crate::limits::Limits;

/// Argument values for one invocation. Most functions take one or two arguments.
pub(crate) type Args = SmallVec<[f64; 4]>;

/// The bound arguments of one active invocation, plus the function being executed so that
/// `Recurse` can invoke it again.
///
/// Contexts only exist for validated programs, so every `Variable` index evaluated against
/// one is in bounds and every invocation passes the right number of arguments.
#[derive(Debug)]
pub(crate) struct Context<'p> {
    args: Args,
    function: &'p Function,
    depth: usize,
    limits: &'p Limits,
}

impl<'p> Context<'p> {
    /// The context of a top-level run, at depth zero.
    pub(crate) fn root(function: &'p Function, args: Args, limits: &'p Limits) -> Self {
        Self {
            args,
            function,
            depth: 0,
            limits,
        }
    }

    pub(crate) fn arg(&self, idx: usize) -> f64 {
        self.args[idx]
    }

    pub(crate) fn limits(&self) -> &'p Limits {
        self.limits
    }

    /// Evaluate the bound function's body under this context.
    pub(crate) fn evaluate(&self) -> Result<f64, EvalError> {
        self.function.body().eval(self)
    }

    /// Invoke `function` with freshly bound `args`, one level deeper than this context.
    pub(crate) fn invoke(&self, function: &'p Function, args: Args) -> Result<f64, EvalError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        let _span = trace_span!("invoke", depth, arity = function.arity()).entered();

        Context {
            args,
            function,
            depth,
            limits: self.limits,
        }
        .evaluate()
    }

    /// Invoke the function currently executing.
    pub(crate) fn recurse(&self, args: Args) -> Result<f64, EvalError> {
        self.invoke(self.function, args)
    }
}

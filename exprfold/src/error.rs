//! Construction and evaluation errors

use thiserror::Error;

use crate::expr::{NodeKind, Role};

/// Result type for operations that can fail either while building or running a program
pub type Result<T> = std::result::Result<T, Error>;

/// A tree that cannot be turned into a [`crate::Program`].
///
/// All of these are detected by [`crate::Program::new`], before anything is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A `Variable` refers past the arguments of its enclosing function.
    #[error("variable {index} is out of range for a function of arity {arity}")]
    VariableOutOfRange { index: usize, arity: usize },

    /// A node passes the wrong number of arguments to a function, or invokes a
    /// function whose arity does not fit the node.
    #[error("{node} expects {expected} argument(s), found {found}")]
    ArityMismatch {
        node: NodeKind,
        expected: usize,
        found: usize,
    },

    #[error("{node} needs at least one operand")]
    NoOperands { node: NodeKind },

    /// A child slot holds a node of the wrong role.
    #[error("expected {expected} node, found {found} node")]
    RoleMismatch { expected: Role, found: Role },
}

/// A failure while running an already validated program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The top-level argument array does not match the program's arity.
    #[error("program expects {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("call depth limit of {limit} exceeded")]
    DepthLimit { limit: usize },

    /// A single fold or generator ran for more iterations than allowed.
    #[error("iteration limit of {limit} exceeded")]
    StepLimit { limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ShapeError::ArityMismatch {
            node: NodeKind::ReduceRange,
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "reduce_range expects 2 argument(s), found 1");

        let err: Error = EvalError::DepthLimit { limit: 8 }.into();
        assert_eq!(err.to_string(), "call depth limit of 8 exceeded");
    }
}

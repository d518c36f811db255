//! Composable numeric expression trees.
//!
//! An [`Expr`] tree is built once, wrapped in a [`Function`] with a declared arity and
//! validated into a [`Program`]. Running a program binds a fresh argument array and
//! evaluates the body; `Call` and `Recurse` nodes start nested invocations, `ReduceRange`
//! folds over a half-open integer range and `Sum` drains a [`Generator`].
//!
//! ```rust
//! use exprfold::dsl::*;
//! use exprfold::Program;
//!
//! // fib(x) = if x <= 1 { x } else { fib(x - 1) + fib(x - 2) }
//! let fib = function(
//!     if_else(
//!         lteq(var(0), value(1)),
//!         var(0),
//!         add([
//!             recurse([add([var(0), value(-1)])]),
//!             recurse([add([var(0), value(-2)])]),
//!         ]),
//!     ),
//!     1,
//! );
//!
//! let program = Program::new(call(fib, [var(0)]), 1).unwrap();
//! assert_eq!(program.run(&[10.0]), Ok(55.0));
//! ```
//!
//! Structural passes (validation, rendering, metrics) go through [`Collapsible`], which
//! walks the tree with an explicit stack; evaluation is plain recursive descent and is
//! bounded by the host stack unless [`Limits`] says otherwise.

mod context;
pub mod dsl;
mod error;
mod eval;
mod expr;
pub mod frame;
mod generator;
mod limits;
mod program;
mod recursive;
mod render;
mod shape;

pub use error::{Error, EvalError, Result, ShapeError};
pub use expr::{Comparison, Expr, Function, Generator, Node, NodeKind, Role};
pub use frame::{MappableFrame, NodeFrame, PartiallyApplied};
pub use limits::Limits;
pub use program::Program;
pub use recursive::Collapsible;

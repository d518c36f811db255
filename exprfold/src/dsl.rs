//! Free functions for writing trees compactly.
//!
//! ```rust
//! use exprfold::dsl::*;
//! use exprfold::Program;
//!
//! // sum of 1..=n via a half-open fold over [1, n + 1)
//! let add2 = function(add([var(0), var(1)]), 2);
//! let body = reduce_range(add2, value(1), add([value(1), var(0)]));
//!
//! assert_eq!(Program::new(body, 1).unwrap().run(&[100.0]), Ok(5050.0));
//! ```
//!
//! Each role has its own type, so putting a function where an expression belongs does not
//! compile:
//!
//! ```compile_fail
//! use exprfold::dsl::*;
//!
//! let f = function(var(0), 1);
//! let body = add([var(0), f]);
//! ```
//!
//! ```compile_fail
//! use exprfold::dsl::*;
//!
//! // a sum drains a generator, not a function
//! let body = sum(function(var(0), 1));
//! ```

use crate::expr::{Comparison, Expr, Function, Generator};

pub fn value(v: impl Into<f64>) -> Expr {
    Expr::Value(v.into())
}

pub fn var(index: usize) -> Expr {
    Expr::Variable(index)
}

pub fn add(terms: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Add(terms.into_iter().collect())
}

pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Mul(factors.into_iter().collect())
}

pub fn neg(x: Expr) -> Expr {
    Expr::Neg(Box::new(x))
}

pub fn inv(x: Expr) -> Expr {
    Expr::Inv(Box::new(x))
}

fn compare(op: Comparison, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Compare(op, Box::new(lhs), Box::new(rhs))
}

pub fn lt(lhs: Expr, rhs: Expr) -> Expr {
    compare(Comparison::Lt, lhs, rhs)
}

pub fn lteq(lhs: Expr, rhs: Expr) -> Expr {
    compare(Comparison::Lteq, lhs, rhs)
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    compare(Comparison::Eq, lhs, rhs)
}

/// `if cond { then } else { 0 }`
pub fn if_(cond: Expr, then: Expr) -> Expr {
    if_else(cond, then, value(0))
}

pub fn if_else(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
    Expr::If(Box::new(cond), Box::new(then), Box::new(otherwise))
}

pub fn function(body: Expr, arity: usize) -> Function {
    Function::new(body, arity)
}

pub fn call(func: Function, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Call(func, args.into_iter().collect())
}

pub fn recurse(args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Recurse(args.into_iter().collect())
}

/// Fold over `[start, end)` starting from an accumulator of zero.
pub fn reduce_range(func: Function, start: Expr, end: Expr) -> Expr {
    reduce_range_from(func, start, end, value(0))
}

pub fn reduce_range_from(func: Function, start: Expr, end: Expr, accum: Expr) -> Expr {
    Expr::ReduceRange {
        func,
        start: Box::new(start),
        end: Box::new(end),
        accum: Box::new(accum),
    }
}

pub fn sum(gen: Generator) -> Expr {
    Expr::Sum(gen)
}

/// `func(x)` for `x` in `start, start + 1, ...` until `x == end`.
pub fn range(func: Function, start: Expr, end: Expr) -> Generator {
    range_by(func, start, end, value(1))
}

pub fn range_by(func: Function, start: Expr, end: Expr, step: Expr) -> Generator {
    Generator::Range {
        func,
        start: Box::new(start),
        end: Box::new(end),
        step: Box::new(step),
    }
}

pub fn compose(gen: Generator, func: Function) -> Generator {
    Generator::Compose(Box::new(gen), func)
}

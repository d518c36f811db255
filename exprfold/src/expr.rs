use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node that produces a single `f64` when evaluated against the arguments of the
/// function currently executing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    Value(f64),
    /// positional argument of the enclosing function
    Variable(usize),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Neg(Box<Expr>),
    /// `1 / x`, with IEEE semantics for zero
    Inv(Box<Expr>),
    /// evaluates to `1.0` if the comparison holds, `0.0` otherwise
    Compare(Comparison, Box<Expr>, Box<Expr>),
    /// condition, then-branch, else-branch. Only the selected branch is evaluated.
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
    /// invoke the function currently executing with new arguments
    Recurse(Vec<Expr>),
    /// `accum = func(i, accum)` for each `i` in `[trunc(start), trunc(end))`
    ReduceRange {
        func: Function,
        start: Box<Expr>,
        end: Box<Expr>,
        accum: Box<Expr>,
    },
    /// drains a fresh instance of the generator, summing every value it yields
    Sum(Generator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Comparison {
    Lt,
    Lteq,
    Eq,
}

impl Comparison {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Lteq => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
        }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Comparison::Lt => "lt",
            Comparison::Lteq => "lteq",
            Comparison::Eq => "eq",
        }
    }
}

/// An expression body paired with the number of arguments it is invoked with.
///
/// A function is never evaluated to a number itself: `Call`, `ReduceRange` and generators
/// invoke it, binding a fresh argument array each time. Inside the body, `Variable(i)`
/// refers to those arguments and `Recurse` invokes this function again.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Function {
    body: Box<Expr>,
    arity: usize,
}

impl Function {
    pub fn new(body: Expr, arity: usize) -> Self {
        Self {
            body: Box::new(body),
            arity,
        }
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Describes a lazily produced sequence of values.
///
/// A generator is only a description; `Sum` creates a new cursor over it every time it is
/// evaluated, so no iteration state survives between evaluations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Generator {
    /// Yields `func(cursor)` for `cursor = start, start + step, ...` and stops once the
    /// cursor is exactly equal to `end`. A step that never lands on `end` does not stop.
    Range {
        func: Function,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Box<Expr>,
    },
    /// Yields `func(x)` for every `x` produced by the inner generator.
    Compose(Box<Generator>, Function),
}

/// The three kinds of node a tree is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Expression,
    Function,
    Generator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Expression => "expression",
            Role::Function => "function",
            Role::Generator => "generator",
        })
    }
}

/// Node kinds that carry a shape constraint, named in [`crate::ShapeError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Add,
    Mul,
    Call,
    Recurse,
    ReduceRange,
    Range,
    Compose,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Add => "add",
            NodeKind::Mul => "mul",
            NodeKind::Call => "call",
            NodeKind::Recurse => "recurse",
            NodeKind::ReduceRange => "reduce_range",
            NodeKind::Range => "range",
            NodeKind::Compose => "compose",
        })
    }
}

/// A borrowed view of any node in a tree, tagged with its role.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Expr(&'a Expr),
    Function(&'a Function),
    Generator(&'a Generator),
}

impl<'a> Node<'a> {
    pub fn role(&self) -> Role {
        match self {
            Node::Expr(_) => Role::Expression,
            Node::Function(_) => Role::Function,
            Node::Generator(_) => Role::Generator,
        }
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}

impl<'a> From<&'a Function> for Node<'a> {
    fn from(function: &'a Function) -> Self {
        Node::Function(function)
    }
}

impl<'a> From<&'a Generator> for Node<'a> {
    fn from(generator: &'a Generator) -> Self {
        Node::Generator(generator)
    }
}

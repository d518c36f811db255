//! Construction-time validation.
//!
//! A single bottom-up pass over the tree works out, for every subtree, which arguments it
//! reads and with how many arguments it recurses. Those demands are settled at the nearest
//! enclosing function, whose arity is only known once its body has been collapsed.

use smallvec::SmallVec;
use tracing::debug;

use crate::error::ShapeError;
use crate::expr::{Function, Node, NodeKind, Role};
use crate::frame::NodeFrame;
use crate::recursive::Collapsible;

/// What a subtree needs from the function it is evaluated in.
#[derive(Debug, Default)]
struct Demand {
    /// highest `Variable` index read
    max_variable: Option<usize>,
    /// distinct argument counts passed to `Recurse`
    recursions: SmallVec<[usize; 2]>,
}

impl Demand {
    fn variable(index: usize) -> Self {
        Self {
            max_variable: Some(index),
            ..Self::default()
        }
    }

    fn merge(mut self, other: Demand) -> Self {
        self.max_variable = self.max_variable.max(other.max_variable);
        for arity in other.recursions {
            self.add_recursion(arity);
        }
        self
    }

    fn add_recursion(&mut self, arity: usize) {
        if !self.recursions.contains(&arity) {
            self.recursions.push(arity);
        }
    }

    /// Settle this demand against the arity of the function whose body produced it.
    fn settle(self, arity: usize) -> Result<(), ShapeError> {
        if let Some(index) = self.max_variable.filter(|&index| index >= arity) {
            return Err(ShapeError::VariableOutOfRange { index, arity });
        }
        if let Some(&found) = self.recursions.iter().find(|&&found| found != arity) {
            return Err(ShapeError::ArityMismatch {
                node: NodeKind::Recurse,
                expected: arity,
                found,
            });
        }
        Ok(())
    }
}

/// A collapsed, valid subtree.
#[derive(Debug)]
enum Checked {
    Expr(Demand),
    /// a function is self-contained: its demands were settled against its own arity
    Function { arity: usize },
    Generator(Demand),
}

impl Checked {
    fn role(&self) -> Role {
        match self {
            Checked::Expr(_) => Role::Expression,
            Checked::Function { .. } => Role::Function,
            Checked::Generator(_) => Role::Generator,
        }
    }

    fn mismatch(&self, expected: Role) -> ShapeError {
        ShapeError::RoleMismatch {
            expected,
            found: self.role(),
        }
    }

    fn expr(self) -> Result<Demand, ShapeError> {
        match self {
            Checked::Expr(demand) => Ok(demand),
            other => Err(other.mismatch(Role::Expression)),
        }
    }

    fn generator(self) -> Result<Demand, ShapeError> {
        match self {
            Checked::Generator(demand) => Ok(demand),
            other => Err(other.mismatch(Role::Generator)),
        }
    }

    /// Checks that this is a function taking exactly `expected` arguments.
    fn function(self, node: NodeKind, expected: usize) -> Result<(), ShapeError> {
        match self {
            Checked::Function { arity } if arity == expected => Ok(()),
            Checked::Function { arity } => Err(ShapeError::ArityMismatch {
                node,
                expected,
                found: arity,
            }),
            other => Err(other.mismatch(Role::Function)),
        }
    }

    fn arity(&self) -> Result<usize, ShapeError> {
        match self {
            Checked::Function { arity } => Ok(*arity),
            other => Err(other.mismatch(Role::Function)),
        }
    }
}

fn exprs(children: Vec<Checked>) -> Result<Demand, ShapeError> {
    children
        .into_iter()
        .try_fold(Demand::default(), |acc, child| Ok(acc.merge(child.expr()?)))
}

fn operands(node: NodeKind, children: Vec<Checked>) -> Result<Demand, ShapeError> {
    if children.is_empty() {
        return Err(ShapeError::NoOperands { node });
    }
    exprs(children)
}

fn check_layer(frame: NodeFrame<Checked>) -> Result<Checked, ShapeError> {
    let checked = match frame {
        NodeFrame::Value(_) => Checked::Expr(Demand::default()),
        NodeFrame::Variable(index) => Checked::Expr(Demand::variable(index)),
        NodeFrame::Add(xs) => Checked::Expr(operands(NodeKind::Add, xs)?),
        NodeFrame::Mul(xs) => Checked::Expr(operands(NodeKind::Mul, xs)?),
        NodeFrame::Neg(x) | NodeFrame::Inv(x) => Checked::Expr(x.expr()?),
        NodeFrame::Compare(_, a, b) => Checked::Expr(a.expr()?.merge(b.expr()?)),
        NodeFrame::If(c, t, e) => Checked::Expr(c.expr()?.merge(t.expr()?).merge(e.expr()?)),
        NodeFrame::Call { func, args } => {
            let arity = func.arity()?;
            if arity != args.len() {
                return Err(ShapeError::ArityMismatch {
                    node: NodeKind::Call,
                    expected: arity,
                    found: args.len(),
                });
            }
            Checked::Expr(exprs(args)?)
        }
        NodeFrame::Recurse(args) => {
            let found = args.len();
            let mut demand = exprs(args)?;
            demand.add_recursion(found);
            Checked::Expr(demand)
        }
        NodeFrame::ReduceRange {
            func,
            start,
            end,
            accum,
        } => {
            func.function(NodeKind::ReduceRange, 2)?;
            Checked::Expr(start.expr()?.merge(end.expr()?).merge(accum.expr()?))
        }
        NodeFrame::Sum(gen) => Checked::Expr(gen.generator()?),
        NodeFrame::Function { arity, body } => {
            body.expr()?.settle(arity)?;
            Checked::Function { arity }
        }
        NodeFrame::Range {
            func,
            start,
            end,
            step,
        } => {
            func.function(NodeKind::Range, 1)?;
            Checked::Generator(start.expr()?.merge(end.expr()?).merge(step.expr()?))
        }
        NodeFrame::Compose { gen, func } => {
            func.function(NodeKind::Compose, 1)?;
            Checked::Generator(gen.generator()?)
        }
    };
    Ok(checked)
}

/// Validate a whole function tree, including every function nested inside it.
pub(crate) fn check(function: &Function) -> Result<(), ShapeError> {
    let checked = Node::Function(function).try_collapse_frames(check_layer)?;
    checked.arity()?;
    debug!(
        arity = function.arity(),
        nodes = function.node_count(),
        depth = function.body().depth(),
        "validated program"
    );
    Ok(())
}

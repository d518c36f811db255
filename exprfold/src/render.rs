//! S-expression rendering, e.g. `(call (fn/2 (add (var 0) (var 1))) 1 2)`.

use std::fmt;

use crate::expr::{Expr, Function, Generator, Node};
use crate::frame::NodeFrame;
use crate::recursive::Collapsible;

fn list(head: &str, items: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("({head}");
    for item in items {
        out.push(' ');
        out.push_str(&item);
    }
    out.push(')');
    out
}

fn render_layer(frame: NodeFrame<String>) -> String {
    match frame {
        NodeFrame::Value(v) => format!("{v}"),
        NodeFrame::Variable(i) => format!("(var {i})"),
        NodeFrame::Add(xs) => list("add", xs),
        NodeFrame::Mul(xs) => list("mul", xs),
        NodeFrame::Neg(x) => list("neg", [x]),
        NodeFrame::Inv(x) => list("inv", [x]),
        NodeFrame::Compare(op, a, b) => list(op.keyword(), [a, b]),
        NodeFrame::If(c, t, e) => list("if", [c, t, e]),
        NodeFrame::Call { func, args } => list("call", std::iter::once(func).chain(args)),
        NodeFrame::Recurse(args) => list("recurse", args),
        NodeFrame::ReduceRange {
            func,
            start,
            end,
            accum,
        } => list("reduce_range", [func, start, end, accum]),
        NodeFrame::Sum(gen) => list("sum", [gen]),
        NodeFrame::Function { arity, body } => list(&format!("fn/{arity}"), [body]),
        NodeFrame::Range {
            func,
            start,
            end,
            step,
        } => list("range", [func, start, end, step]),
        NodeFrame::Compose { gen, func } => list("compose", [gen, func]),
    }
}

fn render(node: Node<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&node.collapse_frames(render_layer))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(Node::Expr(self), f)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(Node::Function(self), f)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(Node::Generator(self), f)
    }
}

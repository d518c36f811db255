use crate::expr::{Expr, Function, Generator, Node};
use crate::frame::{
    expand_and_collapse, try_expand_and_collapse, MappableFrame, NodeFrame, PartiallyApplied,
};

/// A tree that can be taken apart one layer at a time and folded bottom-up.
///
/// ```rust
/// use exprfold::dsl::*;
/// use exprfold::{Collapsible, Node, NodeFrame};
///
/// let expr = add([var(0), mul([value(2), value(3)])]);
///
/// let literals = Node::Expr(&expr).collapse_frames(|frame| match frame {
///     NodeFrame::Value(_) => 1usize,
///     NodeFrame::Add(xs) | NodeFrame::Mul(xs) => xs.into_iter().sum(),
///     _ => 0,
/// });
///
/// assert_eq!(literals, 2);
/// ```
pub trait Collapsible
where
    Self: Sized,
{
    type FrameToken: MappableFrame;

    /// Peel off the top layer, leaving the children in place of `Self` values.
    fn into_frame(self) -> <Self::FrameToken as MappableFrame>::Frame<Self>;

    /// Fold the whole tree into an `Out`, one layer at a time.
    fn collapse_frames<Out>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Out,
    ) -> Out {
        expand_and_collapse::<Self::FrameToken, Self, Out>(self, Self::into_frame, collapse_frame)
    }

    /// Fold the whole tree, bailing out on the first layer that returns `Err`.
    fn try_collapse_frames<Out, E>(
        self,
        collapse_frame: impl FnMut(<Self::FrameToken as MappableFrame>::Frame<Out>) -> Result<Out, E>,
    ) -> Result<Out, E> {
        try_expand_and_collapse::<Self::FrameToken, Self, Out, E>(
            self,
            |node| Ok(Self::into_frame(node)),
            collapse_frame,
        )
    }
}

impl<'a> Collapsible for Node<'a> {
    type FrameToken = NodeFrame<PartiallyApplied>;

    fn into_frame(self) -> NodeFrame<Self> {
        match self {
            Node::Expr(expr) => expr_frame(expr),
            Node::Function(function) => NodeFrame::Function {
                arity: function.arity(),
                body: Node::Expr(function.body()),
            },
            Node::Generator(Generator::Range {
                func,
                start,
                end,
                step,
            }) => NodeFrame::Range {
                func: Node::Function(func),
                start: Node::Expr(start),
                end: Node::Expr(end),
                step: Node::Expr(step),
            },
            Node::Generator(Generator::Compose(gen, func)) => NodeFrame::Compose {
                gen: Node::Generator(gen),
                func: Node::Function(func),
            },
        }
    }
}

fn expr_frame(expr: &Expr) -> NodeFrame<Node<'_>> {
    fn children(xs: &[Expr]) -> Vec<Node<'_>> {
        xs.iter().map(Node::Expr).collect()
    }

    match expr {
        Expr::Value(v) => NodeFrame::Value(*v),
        Expr::Variable(i) => NodeFrame::Variable(*i),
        Expr::Add(xs) => NodeFrame::Add(children(xs)),
        Expr::Mul(xs) => NodeFrame::Mul(children(xs)),
        Expr::Neg(x) => NodeFrame::Neg(Node::Expr(x)),
        Expr::Inv(x) => NodeFrame::Inv(Node::Expr(x)),
        Expr::Compare(op, a, b) => NodeFrame::Compare(*op, Node::Expr(a), Node::Expr(b)),
        Expr::If(c, t, e) => NodeFrame::If(Node::Expr(c), Node::Expr(t), Node::Expr(e)),
        Expr::Call(func, args) => NodeFrame::Call {
            func: Node::Function(func),
            args: children(args),
        },
        Expr::Recurse(args) => NodeFrame::Recurse(children(args)),
        Expr::ReduceRange {
            func,
            start,
            end,
            accum,
        } => NodeFrame::ReduceRange {
            func: Node::Function(func),
            start: Node::Expr(start),
            end: Node::Expr(end),
            accum: Node::Expr(accum),
        },
        Expr::Sum(gen) => NodeFrame::Sum(Node::Generator(gen)),
    }
}

impl Expr {
    /// Number of nodes in this tree, counting functions and generators.
    pub fn node_count(&self) -> usize {
        Node::Expr(self).collapse_frames(|frame| {
            let mut count = 1;
            NodeFrame::<PartiallyApplied>::map_frame(frame, |child| count += child);
            count
        })
    }

    /// Length of the longest root-to-leaf path, a lone leaf having depth 1.
    pub fn depth(&self) -> usize {
        Node::Expr(self).collapse_frames(|frame| {
            let mut deepest = 0;
            NodeFrame::<PartiallyApplied>::map_frame(frame, |child| deepest = deepest.max(child));
            deepest + 1
        })
    }
}

impl Function {
    pub fn node_count(&self) -> usize {
        1 + self.body().node_count()
    }
}

//! Single layers of an expression tree, and the stack machines that fold them.

use crate::expr::Comparison;

/// A single 'frame' containing values that can be mapped over via `map_frame`.
///
/// Implemented for a marker token rather than the frame itself, because rust does not
/// allow implementing a trait for a partially applied type: we write the instance for
/// `NodeFrame<PartiallyApplied>` and use `Frame<X> = NodeFrame<X>`.
pub trait MappableFrame {
    /// the frame type that is mapped over by `map_frame`
    type Frame<X>;

    /// Apply some function `f` to each element inside a frame, in a stable order
    fn map_frame<A, B>(input: Self::Frame<A>, f: impl FnMut(A) -> B) -> Self::Frame<B>;
}

/// An uninhabited type used to define [`MappableFrame`] instances for partially-applied types.
#[derive(Clone, Debug)]
pub enum PartiallyApplied {}

/// One layer of a tree, with each child (expression, function or generator) replaced by `A`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeFrame<A> {
    Value(f64),
    Variable(usize),
    Add(Vec<A>),
    Mul(Vec<A>),
    Neg(A),
    Inv(A),
    Compare(Comparison, A, A),
    If(A, A, A),
    Call { func: A, args: Vec<A> },
    Recurse(Vec<A>),
    ReduceRange { func: A, start: A, end: A, accum: A },
    Sum(A),
    Function { arity: usize, body: A },
    Range { func: A, start: A, end: A, step: A },
    Compose { gen: A, func: A },
}

impl MappableFrame for NodeFrame<PartiallyApplied> {
    type Frame<X> = NodeFrame<X>;

    #[inline(always)]
    fn map_frame<A, B>(input: Self::Frame<A>, mut f: impl FnMut(A) -> B) -> Self::Frame<B> {
        match input {
            NodeFrame::Value(v) => NodeFrame::Value(v),
            NodeFrame::Variable(i) => NodeFrame::Variable(i),
            NodeFrame::Add(xs) => NodeFrame::Add(xs.into_iter().map(f).collect()),
            NodeFrame::Mul(xs) => NodeFrame::Mul(xs.into_iter().map(f).collect()),
            NodeFrame::Neg(x) => NodeFrame::Neg(f(x)),
            NodeFrame::Inv(x) => NodeFrame::Inv(f(x)),
            NodeFrame::Compare(op, a, b) => NodeFrame::Compare(op, f(a), f(b)),
            NodeFrame::If(c, t, e) => NodeFrame::If(f(c), f(t), f(e)),
            NodeFrame::Call { func, args } => NodeFrame::Call {
                func: f(func),
                args: args.into_iter().map(f).collect(),
            },
            NodeFrame::Recurse(args) => NodeFrame::Recurse(args.into_iter().map(f).collect()),
            NodeFrame::ReduceRange {
                func,
                start,
                end,
                accum,
            } => NodeFrame::ReduceRange {
                func: f(func),
                start: f(start),
                end: f(end),
                accum: f(accum),
            },
            NodeFrame::Sum(gen) => NodeFrame::Sum(f(gen)),
            NodeFrame::Function { arity, body } => NodeFrame::Function {
                arity,
                body: f(body),
            },
            NodeFrame::Range {
                func,
                start,
                end,
                step,
            } => NodeFrame::Range {
                func: f(func),
                start: f(start),
                end: f(end),
                step: f(step),
            },
            NodeFrame::Compose { gen, func } => NodeFrame::Compose {
                gen: f(gen),
                func: f(func),
            },
        }
    }
}

/// Unfold `seed` into a tree of frames with `expand_frame`, then fold it back into a
/// single `Out` with `collapse_frame`, children before parents.
///
/// The traversal keeps its own stack, so tree depth is bounded by heap, not call stack.
pub fn expand_and_collapse<F: MappableFrame, Seed, Out>(
    seed: Seed,
    mut expand_frame: impl FnMut(Seed) -> F::Frame<Seed>,
    mut collapse_frame: impl FnMut(F::Frame<Out>) -> Out,
) -> Out {
    let res: Result<Out, std::convert::Infallible> = try_expand_and_collapse::<F, _, _, _>(
        seed,
        |seed| Ok(expand_frame(seed)),
        |frame| Ok(collapse_frame(frame)),
    );
    match res {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// [`expand_and_collapse`] for fallible passes. Stops at the first `Err` from either side.
pub fn try_expand_and_collapse<F: MappableFrame, Seed, Out, E>(
    seed: Seed,
    mut expand_frame: impl FnMut(Seed) -> Result<F::Frame<Seed>, E>,
    mut collapse_frame: impl FnMut(F::Frame<Out>) -> Result<Out, E>,
) -> Result<Out, E> {
    enum Task<Seed, Pending> {
        Expand { slot: usize, seed: Seed },
        Collapse { slot: usize, frame: Pending },
    }

    // one result slot per node, addressed by index; the root owns slot 0
    let mut results: Vec<Option<Out>> = vec![None];
    let mut tasks = vec![Task::Expand { slot: 0, seed }];

    while let Some(task) = tasks.pop() {
        match task {
            Task::Expand { slot, seed } => {
                let frame = expand_frame(seed)?;
                let mut children = Vec::new();
                let frame = F::map_frame(frame, |seed| {
                    let child = results.len();
                    results.push(None);
                    children.push(Task::Expand { slot: child, seed });
                    child
                });

                // children sit above their parent, so they are all collapsed first
                tasks.push(Task::Collapse { slot, frame });
                tasks.extend(children);
            }
            Task::Collapse { slot, frame } => {
                let frame = F::map_frame(frame, |child| results[child].take().unwrap());
                results[slot] = Some(collapse_frame(frame)?);
            }
        }
    }
    Ok(results[0].take().unwrap())
}

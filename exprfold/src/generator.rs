//! Cursors over generators, and the `Sum` consumer that drains them.
//!
//! A [`Generator`] in the tree is immutable. Every evaluation of a `Sum` builds a new
//! [`Cursor`] for it, so iteration state never leaks between evaluations or invocations.

use smallvec::smallvec;
use tracing::trace;

use crate::context::Context;
use crate::error::EvalError;
use crate::expr::{Expr, Function, Generator};

/// Where a running range is: the next raw value and the bounds it was started with.
#[derive(Debug, Clone, Copy)]
struct Position {
    cursor: f64,
    end: f64,
    step: f64,
}

#[derive(Debug)]
pub(crate) struct RangeCursor<'p, 'c> {
    func: &'p Function,
    start: &'p Expr,
    end: &'p Expr,
    step: &'p Expr,
    ctx: &'c Context<'p>,
    /// `None` until first accessed, by either `is_done` or `next_value`
    position: Option<Position>,
}

impl<'p, 'c> RangeCursor<'p, 'c> {
    fn position(&mut self) -> Result<&mut Position, EvalError> {
        let position = match self.position.take() {
            Some(position) => position,
            None => Position {
                cursor: self.start.eval(self.ctx)?,
                end: self.end.eval(self.ctx)?,
                step: self.step.eval(self.ctx)?,
            },
        };
        Ok(self.position.insert(position))
    }

    fn is_done(&mut self) -> Result<bool, EvalError> {
        let position = self.position()?;
        Ok(position.cursor == position.end)
    }

    fn next_value(&mut self) -> Result<f64, EvalError> {
        let position = self.position()?;
        let current = position.cursor;
        position.cursor += position.step;
        self.ctx.invoke(self.func, smallvec![current])
    }
}

/// The iteration state of one generator instance.
#[derive(Debug)]
pub(crate) enum Cursor<'p, 'c> {
    Range(RangeCursor<'p, 'c>),
    Map {
        inner: Box<Cursor<'p, 'c>>,
        func: &'p Function,
        ctx: &'c Context<'p>,
    },
}

impl<'p, 'c> Cursor<'p, 'c> {
    pub(crate) fn new(gen: &'p Generator, ctx: &'c Context<'p>) -> Self {
        match gen {
            Generator::Range {
                func,
                start,
                end,
                step,
            } => Cursor::Range(RangeCursor {
                func,
                start,
                end,
                step,
                ctx,
                position: None,
            }),
            Generator::Compose(inner, func) => Cursor::Map {
                inner: Box::new(Cursor::new(inner, ctx)),
                func,
                ctx,
            },
        }
    }

    /// True once the underlying range cursor equals its end. Never advances the cursor.
    pub(crate) fn is_done(&mut self) -> Result<bool, EvalError> {
        match self {
            Cursor::Range(range) => range.is_done(),
            Cursor::Map { inner, .. } => inner.is_done(),
        }
    }

    /// Produce the current value and advance. Callers check `is_done` first; a cursor past
    /// its end keeps stepping.
    pub(crate) fn next_value(&mut self) -> Result<f64, EvalError> {
        match self {
            Cursor::Range(range) => range.next_value(),
            Cursor::Map { inner, func, ctx } => {
                let x = inner.next_value()?;
                ctx.invoke(*func, smallvec![x])
            }
        }
    }
}

impl<'p, 'c> Iterator for Cursor<'p, 'c> {
    type Item = Result<f64, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.is_done() {
            Ok(true) => None,
            Ok(false) => Some(self.next_value()),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Drain a fresh cursor over `gen`, summing everything it yields.
pub(crate) fn sum<'p>(gen: &'p Generator, ctx: &Context<'p>) -> Result<f64, EvalError> {
    let limits = ctx.limits();
    let mut produced = 0;
    let total = Cursor::new(gen, ctx).try_fold(0.0, |total, value| {
        limits.check_steps(produced)?;
        produced += 1;
        Ok::<_, EvalError>(total + value?)
    })?;
    trace!(produced, total, "generator drained");
    Ok(total)
}

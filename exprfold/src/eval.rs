use smallvec::smallvec;

use crate::context::{Args, Context};
use crate::error::EvalError;
use crate::expr::{Expr, Function};
use crate::generator;

#[inline(always)]
fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn eval_args<'p>(args: &'p [Expr], ctx: &Context<'p>) -> Result<Args, EvalError> {
    args.iter().map(|arg| arg.eval(ctx)).collect()
}

impl Expr {
    /// Recursive-descent evaluation. Children are evaluated left to right; `If` only
    /// evaluates the branch it selects.
    pub(crate) fn eval<'p>(&'p self, ctx: &Context<'p>) -> Result<f64, EvalError> {
        match self {
            Expr::Value(v) => Ok(*v),
            Expr::Variable(idx) => Ok(ctx.arg(*idx)),
            Expr::Add(xs) => xs.iter().try_fold(0.0, |acc, x| Ok(acc + x.eval(ctx)?)),
            Expr::Mul(xs) => xs.iter().try_fold(1.0, |acc, x| Ok(acc * x.eval(ctx)?)),
            Expr::Neg(x) => Ok(-x.eval(ctx)?),
            Expr::Inv(x) => Ok(1.0 / x.eval(ctx)?),
            Expr::Compare(op, a, b) => {
                let a = a.eval(ctx)?;
                let b = b.eval(ctx)?;
                Ok(truth(op.holds(a, b)))
            }
            // NaN is not zero, so a NaN condition takes the first branch
            Expr::If(cond, then, otherwise) => {
                if cond.eval(ctx)? != 0.0 {
                    then.eval(ctx)
                } else {
                    otherwise.eval(ctx)
                }
            }
            Expr::Call(func, args) => ctx.invoke(func, eval_args(args, ctx)?),
            Expr::Recurse(args) => ctx.recurse(eval_args(args, ctx)?),
            Expr::ReduceRange {
                func,
                start,
                end,
                accum,
            } => reduce_range(func, start, end, accum, ctx),
            Expr::Sum(gen) => generator::sum(gen, ctx),
        }
    }
}

/// Half-open fold: `accum = func(i, accum)` for `i` in `[trunc(start), trunc(end))`.
fn reduce_range<'p>(
    func: &'p Function,
    start: &'p Expr,
    end: &'p Expr,
    accum: &'p Expr,
    ctx: &Context<'p>,
) -> Result<f64, EvalError> {
    let mut accum = accum.eval(ctx)?;
    let start = start.eval(ctx)?;
    let end = end.eval(ctx)?;
    if start.is_nan() || end.is_nan() {
        return Ok(accum);
    }

    // indices are integers so the walk advances past 2^53.
    // `as` truncates toward zero and saturates at the i64 bounds.
    let limits = ctx.limits();
    for (taken, i) in (start as i64..end as i64).enumerate() {
        limits.check_steps(taken as u64)?;
        accum = ctx.invoke(func, smallvec![i as f64, accum])?;
    }
    Ok(accum)
}

#[cfg(test)]
mod tests {
    use crate::dsl::*;
    use crate::{EvalError, Expr, Limits, Program};

    fn run(body: Expr, args: &[f64]) -> f64 {
        Program::new(body, args.len())
            .expect("valid program")
            .run(args)
            .expect("evaluates")
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run(add([value(1), value(2), value(3)]), &[]), 6.0);
        assert_eq!(run(mul([var(0), var(1)]), &[3.0, 4.0]), 12.0);
        assert_eq!(run(neg(var(0)), &[2.5]), -2.5);
        assert_eq!(run(inv(value(4)), &[]), 0.25);
        assert_eq!(run(add([var(0)]), &[7.0]), 7.0);
    }

    #[test]
    fn inverse_of_zero_is_infinite() {
        assert_eq!(run(inv(value(0)), &[]), f64::INFINITY);
        assert_eq!(run(inv(neg(value(0))), &[]), f64::NEG_INFINITY);
        assert!(run(mul([inv(value(0)), value(0)]), &[]).is_nan());
    }

    #[test]
    fn comparisons() {
        let cases = [
            (lt(var(0), var(1)), [1.0, 2.0], 1.0),
            (lt(var(0), var(1)), [2.0, 2.0], 0.0),
            (lteq(var(0), var(1)), [2.0, 2.0], 1.0),
            (lteq(var(0), var(1)), [3.0, 2.0], 0.0),
            (eq(var(0), var(1)), [2.0, 2.0], 1.0),
            (eq(var(0), var(1)), [f64::NAN, f64::NAN], 0.0),
        ];
        for (expr, args, expected) in cases {
            assert_eq!(run(expr, &args), expected);
        }
    }

    #[test]
    fn if_without_else_is_zero() {
        let expr = if_(lt(var(0), value(0)), value(42));
        assert_eq!(run(expr.clone(), &[-1.0]), 42.0);
        assert_eq!(run(expr, &[1.0]), 0.0);
    }

    #[test]
    fn nan_condition_takes_first_branch() {
        let expr = if_else(mul([inv(value(0)), value(0)]), value(1), value(2));
        assert_eq!(run(expr, &[]), 1.0);
    }

    #[test]
    fn only_the_selected_branch_runs() {
        // the untaken branch recurses forever; with a depth limit it would fail if evaluated
        let body = if_else(value(1), value(5), recurse(Vec::<Expr>::new()));
        let program = Program::new(body, 0).unwrap();
        let limits = Limits::unbounded().with_max_depth(4);
        assert_eq!(program.run_with(&[], &limits), Ok(5.0));
    }

    #[test]
    fn call_binds_fresh_arguments() {
        // f(a, b) = a - b, called with swapped outer arguments
        let f = function(add([var(0), neg(var(1))]), 2);
        assert_eq!(run(call(f, [var(1), var(0)]), &[10.0, 3.0]), -7.0);
    }

    #[test]
    fn nested_calls_see_their_own_arguments() {
        let double = function(mul([value(2), var(0)]), 1);
        let square = function(mul([var(0), var(0)]), 1);
        let expr = call(square, [call(double, [var(0)])]);
        assert_eq!(run(expr, &[3.0]), 36.0);
    }

    #[test]
    fn top_level_recursion() {
        // factorial without an explicit function node: the program recurses into itself
        let body = if_else(
            lteq(var(0), value(1)),
            value(1),
            mul([var(0), recurse([add([var(0), value(-1)])])]),
        );
        assert_eq!(run(body, &[5.0]), 120.0);
    }

    #[test]
    fn reduce_range_is_half_open() {
        let add2 = function(add([var(0), var(1)]), 2);
        let sum_to_n = reduce_range(add2.clone(), value(1), add([value(1), var(0)]));
        assert_eq!(run(sum_to_n, &[100.0]), 5050.0);
        // bounds are truncated toward zero: [1, 3) even though end is 3.9
        assert_eq!(run(reduce_range(add2.clone(), value(1.5), value(3.9)), &[]), 3.0);
        // empty and inverted ranges leave the initial accumulator
        let empty = reduce_range_from(add2.clone(), value(4), value(4), value(9));
        assert_eq!(run(empty, &[]), 9.0);
        let inverted = reduce_range_from(add2, value(5), value(1), value(9));
        assert_eq!(run(inverted, &[]), 9.0);
    }

    #[test]
    fn negative_bounds_truncate_toward_zero() {
        let add2 = function(add([var(0), var(1)]), 2);
        // [-2, 0): -2 + -1, where flooring would give [-3, 0)
        assert_eq!(run(reduce_range(add2.clone(), value(-2.5), value(0.5)), &[]), -3.0);
        // [-1, 0)
        assert_eq!(run(reduce_range(add2, value(-1.9), value(-0.1)), &[]), -1.0);
    }

    #[test]
    fn nan_bounds_leave_the_accumulator() {
        let add2 = function(add([var(0), var(1)]), 2);
        let nan = mul([inv(value(0)), value(0)]);
        let body = reduce_range_from(add2, nan, value(5), value(7));
        assert_eq!(run(body, &[]), 7.0);
    }

    #[test]
    fn large_indices_still_advance() {
        // counts iterations over [2^53, 2^53 + 2), where adding 1.0 to an f64 index is lost
        let count = function(add([var(1), value(1)]), 2);
        let start = 9_007_199_254_740_992.0;
        let body = reduce_range(count, value(start), add([value(start), value(2)]));
        let program = Program::new(body, 0).unwrap();
        let limits = Limits::unbounded().with_max_steps(1_000);
        assert_eq!(program.run_with(&[], &limits), Ok(2.0));
    }

    #[test]
    fn reduce_range_passes_index_then_accumulator() {
        // accum = accum * 10 + i over [1, 4) gives 123
        let digits = function(add([mul([var(1), value(10)]), var(0)]), 2);
        assert_eq!(run(reduce_range(digits, value(1), value(4)), &[]), 123.0);
    }

    #[test]
    fn depth_limit() {
        let body = if_else(
            lteq(var(0), value(0)),
            value(0),
            recurse([add([var(0), value(-1)])]),
        );
        let program = Program::new(body, 1).unwrap();
        let limits = Limits::unbounded().with_max_depth(10);

        assert_eq!(program.run_with(&[10.0], &limits), Ok(0.0));
        assert_eq!(
            program.run_with(&[11.0], &limits),
            Err(EvalError::DepthLimit { limit: 10 })
        );
    }

    #[test]
    fn step_limit_applies_to_folds() {
        let add2 = function(add([var(0), var(1)]), 2);
        let program = Program::new(reduce_range(add2, value(0), var(0)), 1).unwrap();
        let limits = Limits::unbounded().with_max_steps(100);

        assert_eq!(program.run_with(&[100.0], &limits), Ok(4950.0));
        assert_eq!(
            program.run_with(&[101.0], &limits),
            Err(EvalError::StepLimit { limit: 100 })
        );
    }
}

use exprfold::dsl::*;
use exprfold::{Comparison, Expr};
use proptest::prelude::*;

/// Number of arguments bound when evaluating generated trees.
pub const ARGS: usize = 3;

/// Simple naive representation of the arithmetic subset of the expression language,
/// evaluated with plain recursion as a reference.
#[derive(Debug, Clone)]
pub enum Arith {
    Literal(i8),
    Var(usize),
    Add(Vec<Arith>),
    Mul(Vec<Arith>),
    Neg(Box<Arith>),
    Inv(Box<Arith>),
    Compare(Comparison, Box<Arith>, Box<Arith>),
    If(Box<Arith>, Box<Arith>, Box<Arith>),
}

impl Arith {
    pub fn to_expr(&self) -> Expr {
        match self {
            Arith::Literal(x) => value(*x),
            Arith::Var(i) => var(*i),
            Arith::Add(xs) => add(xs.iter().map(Arith::to_expr)),
            Arith::Mul(xs) => mul(xs.iter().map(Arith::to_expr)),
            Arith::Neg(x) => neg(x.to_expr()),
            Arith::Inv(x) => inv(x.to_expr()),
            Arith::Compare(op, a, b) => {
                Expr::Compare(*op, Box::new(a.to_expr()), Box::new(b.to_expr()))
            }
            Arith::If(c, t, e) => if_else(c.to_expr(), t.to_expr(), e.to_expr()),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Arith::Literal(_) | Arith::Var(_) => 1,
            Arith::Add(xs) | Arith::Mul(xs) => 1 + xs.iter().map(Arith::size).sum::<usize>(),
            Arith::Neg(x) | Arith::Inv(x) => 1 + x.size(),
            Arith::Compare(_, a, b) => 1 + a.size() + b.size(),
            Arith::If(c, t, e) => 1 + c.size() + t.size() + e.size(),
        }
    }
}

pub fn naive_eval(expr: &Arith, args: &[f64]) -> f64 {
    match expr {
        Arith::Literal(x) => *x as f64,
        Arith::Var(i) => args[*i],
        Arith::Add(xs) => xs.iter().fold(0.0, |acc, x| acc + naive_eval(x, args)),
        Arith::Mul(xs) => xs.iter().fold(1.0, |acc, x| acc * naive_eval(x, args)),
        Arith::Neg(x) => -naive_eval(x, args),
        Arith::Inv(x) => 1.0 / naive_eval(x, args),
        Arith::Compare(op, a, b) => {
            if op.holds(naive_eval(a, args), naive_eval(b, args)) {
                1.0
            } else {
                0.0
            }
        }
        Arith::If(c, t, e) => {
            if naive_eval(c, args) != 0.0 {
                naive_eval(t, args)
            } else {
                naive_eval(e, args)
            }
        }
    }
}

pub fn arb_comparison() -> impl Strategy<Value = Comparison> {
    prop_oneof![
        Just(Comparison::Lt),
        Just(Comparison::Lteq),
        Just(Comparison::Eq),
    ]
}

pub fn arb_arith() -> impl Strategy<Value = Arith> {
    let leaf = prop_oneof![
        any::<i8>().prop_map(Arith::Literal),
        (0..ARGS).prop_map(Arith::Var),
    ];
    leaf.prop_recursive(
        8,   // 8 levels deep
        256, // Shoot for maximum size of 256 nodes
        4,   // We put up to 4 items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(Arith::Add),
                prop::collection::vec(inner.clone(), 1..4).prop_map(Arith::Mul),
                inner.clone().prop_map(|x| Arith::Neg(Box::new(x))),
                inner.clone().prop_map(|x| Arith::Inv(Box::new(x))),
                (arb_comparison(), inner.clone(), inner.clone())
                    .prop_map(|(op, a, b)| Arith::Compare(op, Box::new(a), Box::new(b))),
                (inner.clone(), inner.clone(), inner)
                    .prop_map(|(c, t, e)| Arith::If(Box::new(c), Box::new(t), Box::new(e))),
            ]
        },
    )
}

pub fn arb_args() -> impl Strategy<Value = [f64; ARGS]> {
    prop::array::uniform3(-100i32..100).prop_map(|xs| xs.map(f64::from))
}

#[cfg(test)]
fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// generate a bunch of expression trees and evaluate them
#[cfg(test)]
proptest! {
    #[test]
    fn evaluator_matches_naive(expr in arb_arith(), args in arb_args()) {
        use exprfold::Program;

        let expected = naive_eval(&expr, &args);
        let program = Program::new(expr.to_expr(), ARGS).unwrap();
        let actual = program.run(&args).unwrap();
        prop_assert!(same(expected, actual), "naive {} vs evaluated {}", expected, actual);
    }

    #[test]
    fn calls_rebind_arguments(expr in arb_arith(), args in arb_args()) {
        use exprfold::Program;

        // call the tree as a function with the arguments rotated, then compare against
        // evaluating it directly on the rotated array
        let rotated = [args[1], args[2], args[0]];
        let body = call(function(expr.to_expr(), ARGS), [var(1), var(2), var(0)]);
        let actual = Program::new(body, ARGS).unwrap().run(&args).unwrap();
        let expected = naive_eval(&expr, &rotated);
        prop_assert!(same(expected, actual), "naive {} vs evaluated {}", expected, actual);
    }

    #[test]
    fn node_count_matches_reference(expr in arb_arith()) {
        prop_assert_eq!(expr.to_expr().node_count(), expr.size());
    }

    #[test]
    fn out_of_range_variable_is_rejected(expr in arb_arith()) {
        use exprfold::{Program, ShapeError};

        let body = add([expr.to_expr(), var(ARGS)]);
        prop_assert_eq!(
            Program::new(body, ARGS).unwrap_err(),
            ShapeError::VariableOutOfRange { index: ARGS, arity: ARGS }
        );
    }

    #[test]
    fn sums_match_closed_form(n in 1u32..300) {
        use crate::programs::{sequence_sum_generator, sequence_sum_reduce};

        let n = f64::from(n);
        let expected = n * (n + 1.0) / 2.0;
        prop_assert_eq!(sequence_sum_reduce().run(&[n]), Ok(expected));
        prop_assert_eq!(sequence_sum_generator().run(&[n]), Ok(expected));
    }
}

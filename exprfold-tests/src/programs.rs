//! Small programs built from the evaluator's nodes, used as fixtures by tests and benchmarks.

use exprfold::dsl::*;
use exprfold::{Function, Generator, Program};

/// f(a, b) = a + b
pub fn add2() -> Function {
    function(add([var(0), var(1)]), 2)
}

/// f(a, b) = a * b
pub fn mul2() -> Function {
    function(mul([var(0), var(1)]), 2)
}

pub fn identity() -> Function {
    function(var(0), 1)
}

/// 1 + 2 + ... + n as a half-open fold over [1, n + 1)
pub fn sequence_sum_reduce() -> Program {
    let f = function(reduce_range(add2(), value(1), add([value(1), var(0)])), 1);
    Program::new(call(f, [var(0)]), 1).expect("well-formed fixture")
}

/// 1 + 2 + ... + n by draining a generator over [1, n + 1)
pub fn sequence_sum_generator() -> Program {
    let range = range(identity(), value(1), add([value(1), var(0)]));
    Program::new(sum(range), 1).expect("well-formed fixture")
}

/// fib(x) = x for x <= 1, fib(x - 1) + fib(x - 2) otherwise
pub fn fib_recursive() -> Program {
    let f = function(
        if_else(
            lteq(var(0), value(1)),
            var(0),
            add([
                recurse([add([var(0), value(-1)])]),
                recurse([add([var(0), value(-2)])]),
            ]),
        ),
        1,
    );
    Program::new(call(f, [var(0)]), 1).expect("well-formed fixture")
}

/// n! as a fold over [1, n + 1) starting from 1
pub fn factorial() -> Function {
    function(
        reduce_range_from(mul2(), value(1), add([value(1), var(0)]), value(1)),
        1,
    )
}

/// 1/0!, 1/1!, 1/2!, ... for indices in [0, n)
pub fn reciprocal_factorials() -> Generator {
    let indices = range(identity(), value(0), var(0));
    compose(compose(indices, factorial()), function(inv(var(0)), 1))
}

/// sum of 1/k! for k in [0, n), approaching e as n grows
pub fn e_approx() -> Program {
    Program::new(sum(reciprocal_factorials()), 1).expect("well-formed fixture")
}

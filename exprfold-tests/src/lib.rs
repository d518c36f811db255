pub mod arith;
pub mod programs;

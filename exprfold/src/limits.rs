#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Optional resource bounds for a single [`crate::Program::run_with`] call.
///
/// The default is unbounded: recursion is limited only by the host stack, and a range whose
/// step never lands exactly on its end runs forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Limits {
    /// maximum number of nested `Call`/`Recurse` invocations active at once
    pub max_depth: Option<usize>,
    /// maximum number of iterations of any single `ReduceRange` or generator
    pub max_steps: Option<u64>,
}

impl Limits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), EvalError> {
        match self.max_depth {
            Some(limit) if depth > limit => Err(EvalError::DepthLimit { limit }),
            _ => Ok(()),
        }
    }

    /// `taken` is the number of iterations already completed
    pub(crate) fn check_steps(&self, taken: u64) -> Result<(), EvalError> {
        match self.max_steps {
            Some(limit) if taken >= limit => Err(EvalError::StepLimit { limit }),
            _ => Ok(()),
        }
    }
}

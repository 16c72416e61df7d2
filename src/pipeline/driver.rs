//! Interactive driving of a single machine.
//!
//! The machine runs until it suspends on input; a [`Driver`] looks at the
//! outputs so far and answers with the next inputs; the loop repeats until
//! the machine halts. Robots, games and other agents built on top of a
//! machine are all instances of this loop.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::vm::{ExecState, VM};

/// Input policy for an interactive machine.
pub trait Driver {
    /// Computes the inputs for a suspended machine from its undrained
    /// outputs, oldest first. An empty answer means the driver has nothing
    /// left to give.
    fn respond(&mut self, outputs: &[i64]) -> Vec<i64>;
}

impl<F> Driver for F
where
    F: FnMut(&[i64]) -> Vec<i64>,
{
    fn respond(&mut self, outputs: &[i64]) -> Vec<i64> {
        self(outputs)
    }
}

/// Runs `vm` to HALT, asking `driver` for input on every suspension.
///
/// Returns the number of times the driver was consulted. Outputs are left
/// undrained so the driver sees the whole history.
///
/// # Errors
///
/// - [`VMError::Deadlock`] if the driver answers with no input
/// - [`VMError::RoundLimit`] if the machine suspends more than `max_rounds` times
/// - [`VMError::StepBudgetExhausted`] if a single run exceeds the machine's step budget
/// - any fault raised by the machine
pub fn drive<D: Driver + ?Sized>(
    vm: &mut VM,
    driver: &mut D,
    max_rounds: usize,
) -> Result<usize, VMError> {
    let budget = vm.limits().max_steps;
    let mut rounds = 0;

    loop {
        match vm.run_bounded(budget)? {
            ExecState::Halted => return Ok(rounds),
            ExecState::Running => return Err(VMError::StepBudgetExhausted { budget }),
            ExecState::Suspended => {}
        }

        if rounds == max_rounds {
            return Err(VMError::RoundLimit { rounds });
        }
        let inputs = driver.respond(vm.outputs());
        if inputs.is_empty() {
            return Err(VMError::Deadlock { rounds });
        }
        vm.feed(inputs);
        rounds += 1;
    }
}

/// Finds the most recent `width`-wide output record matching `predicate`.
///
/// Records are aligned to the start of `outputs`; a trailing partial record
/// is ignored.
pub fn last_record<P>(outputs: &[i64], width: usize, predicate: P) -> Option<&[i64]>
where
    P: Fn(&[i64]) -> bool,
{
    if width == 0 {
        return None;
    }
    outputs
        .chunks_exact(width)
        .rev()
        .find(|record| predicate(record))
}

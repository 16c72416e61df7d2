use crate::debug;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::program::Program;
use crate::virtual_machine::vm::{ExecState, Limits, VM};

/// Default bound on full rounds around a ring.
pub const DEFAULT_MAX_ROUNDS: usize = 1_000_000;

/// Cyclic pipeline of machines running the same program.
///
/// Every stage is seeded with its phase setting; stage 0 also receives the
/// initial signal. Stages run in order, each until it suspends or halts, and
/// everything a stage emitted is forwarded, in order, to the next stage (the
/// last stage feeds stage 0). Rounds repeat until every stage has halted.
#[derive(Clone, Debug)]
pub struct Ring {
    limits: Limits,
    max_rounds: usize,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Runs the ring until all stages halt and returns the last value the
    /// last stage emitted.
    ///
    /// Each `run` of a stage is bounded by `limits.max_steps`.
    pub fn run(&self, program: &Program, phases: &[i64], signal: i64) -> Result<i64, VMError> {
        if phases.is_empty() {
            return Err(VMError::EmptyPipeline);
        }

        let mut stages: Vec<VM> = phases
            .iter()
            .map(|&phase| {
                let mut vm = VM::with_limits(program, self.limits.clone());
                vm.push_input(phase);
                vm
            })
            .collect();
        let last_stage = stages.len() - 1;

        let mut carry = vec![signal];
        let mut result = None;
        let mut rounds = 0;

        loop {
            if rounds == self.max_rounds {
                return Err(VMError::RoundLimit { rounds });
            }
            rounds += 1;

            let mut halted = 0;
            let mut progress = false;
            for (index, vm) in stages.iter_mut().enumerate() {
                vm.feed(carry.drain(..));
                match vm.run_bounded(self.limits.max_steps)? {
                    ExecState::Halted => halted += 1,
                    ExecState::Suspended => {}
                    ExecState::Running => {
                        return Err(VMError::StepBudgetExhausted {
                            budget: self.limits.max_steps,
                        });
                    }
                }

                carry = vm.drain_outputs();
                progress |= !carry.is_empty();
                if index == last_stage
                    && let Some(&value) = carry.last()
                {
                    result = Some(value);
                }
            }

            if halted == stages.len() {
                debug!("ring of {} stages halted after {} rounds", stages.len(), rounds);
                return result.ok_or(VMError::NoOutput { stage: last_stage });
            }
            if !progress {
                return Err(VMError::Deadlock { rounds });
            }
        }
    }
}

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::program::Program;
use crate::virtual_machine::vm::{Limits, run_to_halt};

/// Linear pipeline of machines running the same program.
///
/// Stage `i` receives its phase setting followed by the signal emitted by
/// stage `i - 1` (the initial signal for stage 0), and runs to HALT before
/// the next stage starts. The last stage's final output is the result.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    limits: Limits,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Runs one stage per phase setting and returns the final signal.
    pub fn run(&self, program: &Program, phases: &[i64], signal: i64) -> Result<i64, VMError> {
        if phases.is_empty() {
            return Err(VMError::EmptyPipeline);
        }

        let mut signal = signal;
        for (stage, &phase) in phases.iter().enumerate() {
            let outputs = run_to_halt(program, &[phase, signal], self.limits.clone())?;
            signal = *outputs.last().ok_or(VMError::NoOutput { stage })?;
        }
        Ok(signal)
    }
}

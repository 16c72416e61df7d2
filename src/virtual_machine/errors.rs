use intcode_derive::Error;

/// Errors raised while loading, executing or composing machines.
///
/// Faults raised by the engine are terminal: a machine that returned one of
/// them keeps returning it. Input starvation is never an error; it is the
/// [`ExecState::Suspended`](super::vm::ExecState::Suspended) state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    /// Opcode not present in the instruction table.
    #[error("invalid instruction {opcode} at offset {offset}")]
    InvalidInstruction { opcode: i64, offset: usize },
    /// Parameter mode digit other than 0, 1 or 2.
    #[error("invalid parameter mode {mode} for operand {operand} at offset {offset}")]
    InvalidMode {
        mode: i64,
        operand: usize,
        offset: usize,
    },
    /// An operand resolved to a negative memory address.
    #[error("negative address {address} at offset {offset}")]
    NegativeAddress { address: i64, offset: usize },
    /// A write operand was encoded in immediate mode.
    #[error("immediate-mode write through operand {operand} at offset {offset}")]
    ImmediateWrite { operand: usize, offset: usize },
    /// A jump resolved to a negative instruction pointer.
    #[error("invalid jump target {target} at offset {offset}")]
    InvalidJumpTarget { target: i64, offset: usize },
    /// Address or instruction pointer arithmetic left the addressable range.
    #[error("address overflow at offset {offset}")]
    AddressOverflow { offset: usize },
    /// Integer arithmetic overflowed 64 bits.
    #[error("arithmetic overflow in {instruction} at offset {offset}")]
    ArithmeticOverflow {
        instruction: &'static str,
        offset: usize,
    },
    /// Program text contained something other than a signed integer.
    #[error("invalid integer '{token}' at position {index}")]
    ParseError { token: String, index: usize },
    /// Program text contained no words.
    #[error("empty program")]
    EmptyProgram,
    /// Program file could not be read.
    #[error("io error: {reason}")]
    IoError { reason: String },
    /// A machine expected to run to completion asked for more input.
    #[error("machine suspended waiting for input at offset {offset}")]
    UnexpectedSuspend { offset: usize },
    /// A bounded run used its whole step budget without halting.
    #[error("step budget of {budget} exhausted")]
    StepBudgetExhausted { budget: u64 },
    /// A driver stopped supplying input while machines were still waiting.
    #[error("deadlock after {rounds} rounds: machines wait for input nobody provides")]
    Deadlock { rounds: usize },
    /// An interactive driver exceeded its round limit.
    #[error("round limit of {rounds} exceeded")]
    RoundLimit { rounds: usize },
    /// A pipeline stage produced no output to forward.
    #[error("stage {stage} produced no output")]
    NoOutput { stage: usize },
    /// A pipeline was built without any stages.
    #[error("pipeline has no stages")]
    EmptyPipeline,
}

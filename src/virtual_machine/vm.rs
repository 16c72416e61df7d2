//! Core virtual machine implementation.
//!
//! The VM is a stored-program machine over a growable array of `i64` words.
//! Each step decodes the word at the instruction pointer, resolves operands
//! through their parameter modes, applies the instruction and advances (or
//! redirects) the instruction pointer.
//!
//! INPUT on an empty queue does not fail: the machine returns
//! [`ExecState::Suspended`] without any side effect, and retries the same
//! instruction on the next `run`/`step` once input was fed.

mod memory;
mod profile;
mod registers;

pub use profile::{DEFAULT_DENSE_WORDS, DEFAULT_STEP_LIMIT, Limits, StepCategory, StepProfile};

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::operand::{InstructionWord, ParameterMode};
use crate::virtual_machine::program::Program;
use crate::{debug, warn};
use memory::Memory;
use registers::Registers;
use std::collections::VecDeque;

/// Execution state reported by [`VM::run`] and [`VM::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    /// More instructions can execute.
    Running,
    /// Blocked on INPUT with an empty queue; feed input and run again.
    Suspended,
    /// Executed HALT. Terminal.
    Halted,
}

/// What the instruction pointer does after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    /// Skip past the instruction and its operands.
    Next,
    /// Continue at an absolute address.
    Jump(usize),
    /// Leave the pointer on this instruction and yield.
    Suspend,
    /// Stop for good.
    Halt,
}

macro_rules! exec_vm {
    // Entry point
    (
        vm = $vm:ident,
        word = $word:ident,
        instr = $instr:ident,
        { $( $variant:ident => $handler:ident ( $( $field:ident : $kind:ident ),* $(,)? ) ),* $(,)? }
    ) => {{
        match $instr {
            $(
                Instruction::$variant => {
                    let instr_name = $instr.mnemonic();
                    $( let $field = exec_vm!(@read $vm, $word, $kind)?; )*
                    $vm.$handler(instr_name, $( $field ),*)
                }
            ),*
        }
    }};

    // Resolve a read operand to its value
    (@read $vm:ident, $word:ident, Read) => {{
        $vm.read_operand(&$word)
    }};

    // Resolve a write operand to its target address
    (@read $vm:ident, $word:ident, Write) => {{
        $vm.write_target(&$word)
    }};
}

/// Intcode virtual machine.
///
/// Owns its memory and both I/O queues. Drivers move values between
/// machines with [`feed`](Self::feed) and [`drain_outputs`](Self::drain_outputs);
/// machines never share memory.
pub struct VM {
    /// Program memory.
    memory: Memory,
    /// Instruction pointer and relative base.
    registers: Registers,
    /// Operand cursor for the instruction being executed. Committed to the
    /// instruction pointer only when the instruction completes.
    cursor: usize,
    /// Pending input, consumed front first.
    inputs: VecDeque<i64>,
    /// Every value emitted and not yet drained, oldest first.
    outputs: Vec<i64>,
    /// Total values ever drained, so output indices stay stable for drivers.
    drained: usize,
    state: ExecState,
    /// Terminal fault, replayed by every later call.
    fault: Option<VMError>,
    profile: StepProfile,
    limits: Limits,
    trace: bool,
}

impl VM {
    /// Creates a machine with a fresh copy of `program` and default limits.
    pub fn new(program: &Program) -> Self {
        Self::with_limits(program, Limits::default())
    }

    /// Creates a machine with a fresh copy of `program`.
    pub fn with_limits(program: &Program, limits: Limits) -> Self {
        Self {
            memory: Memory::new(program.words(), limits.dense_words),
            registers: Registers::new(),
            cursor: 0,
            inputs: VecDeque::new(),
            outputs: Vec::new(),
            drained: 0,
            state: ExecState::Running,
            fault: None,
            profile: StepProfile::new(),
            limits,
            trace: false,
        }
    }

    /// Logs every executed instruction at debug level when enabled.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Appends one value to the input queue.
    pub fn push_input(&mut self, value: i64) {
        self.inputs.push_back(value);
    }

    /// Appends values to the input queue, in order.
    pub fn feed<I: IntoIterator<Item = i64>>(&mut self, values: I) {
        self.inputs.extend(values);
    }

    /// Number of queued, unconsumed inputs.
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Undrained outputs, oldest first.
    pub fn outputs(&self) -> &[i64] {
        &self.outputs
    }

    /// Removes and returns all undrained outputs.
    pub fn drain_outputs(&mut self) -> Vec<i64> {
        self.drained += self.outputs.len();
        std::mem::take(&mut self.outputs)
    }

    /// Removes and returns the oldest undrained output.
    pub fn take_output(&mut self) -> Option<i64> {
        if self.outputs.is_empty() {
            return None;
        }
        self.drained += 1;
        Some(self.outputs.remove(0))
    }

    /// The `n` most recent undrained outputs, oldest first (fewer if not
    /// that many exist). Does not drain.
    pub fn last_outputs(&self, n: usize) -> &[i64] {
        &self.outputs[self.outputs.len().saturating_sub(n)..]
    }

    /// Total outputs ever emitted, drained or not.
    pub fn output_count(&self) -> usize {
        self.drained + self.outputs.len()
    }

    /// Reads a memory word. Unwritten addresses read as zero.
    pub fn peek(&self, address: usize) -> i64 {
        self.memory.read(address)
    }

    /// Writes a memory word, growing memory as needed.
    pub fn poke(&mut self, address: usize, value: i64) {
        self.memory.write(address, value);
    }

    /// The contiguous part of memory, program image first.
    pub fn dump(&self) -> &[i64] {
        self.memory.dense()
    }

    /// One past the highest materialized address.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// The terminal fault, if one occurred.
    pub fn fault(&self) -> Option<&VMError> {
        self.fault.as_ref()
    }

    pub fn ip(&self) -> usize {
        self.registers.ip
    }

    pub fn relative_base(&self) -> i64 {
        self.registers.relative_base
    }

    /// Number of completed instructions.
    pub fn steps(&self) -> u64 {
        self.profile.total()
    }

    pub fn profile(&self) -> &StepProfile {
        &self.profile
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Runs until the machine suspends or halts.
    ///
    /// Never returns [`ExecState::Running`]. Unbounded: a program that loops
    /// without input or HALT never returns; use [`run_bounded`](Self::run_bounded)
    /// to impose a budget.
    pub fn run(&mut self) -> Result<ExecState, VMError> {
        loop {
            match self.step()? {
                ExecState::Running => continue,
                state => return Ok(state),
            }
        }
    }

    /// Runs at most `max_steps` instructions.
    ///
    /// Returns [`ExecState::Running`] if the budget ran out first.
    pub fn run_bounded(&mut self, max_steps: u64) -> Result<ExecState, VMError> {
        for _ in 0..max_steps {
            match self.step()? {
                ExecState::Running => continue,
                state => return Ok(state),
            }
        }
        Ok(self.state)
    }

    /// Executes a single instruction.
    ///
    /// A halted machine stays halted; a faulted machine returns its fault.
    pub fn step(&mut self) -> Result<ExecState, VMError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.state == ExecState::Halted {
            return Ok(ExecState::Halted);
        }

        match self.exec_next() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(err) => {
                warn!("machine fault: {}", err);
                self.fault = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Decodes and executes the instruction at the instruction pointer.
    fn exec_next(&mut self) -> Result<ExecState, VMError> {
        let offset = self.registers.ip;
        let raw = self.memory[offset];
        let word = InstructionWord::split(raw);
        let instr = Instruction::try_from(word.opcode).map_err(|_| VMError::InvalidInstruction {
            opcode: word.opcode,
            offset,
        })?;

        self.cursor = offset
            .checked_add(1)
            .ok_or(VMError::AddressOverflow { offset })?;

        if self.trace {
            debug!(
                "{:>6}: {:<4} {:?} rb={}",
                offset,
                instr.mnemonic(),
                self.operand_words(instr),
                self.registers.relative_base
            );
        }

        let flow = self.exec(instr, word)?;
        match flow {
            Flow::Next => {
                self.registers.ip = self.cursor;
                self.profile.add(instr.category());
                Ok(ExecState::Running)
            }
            Flow::Jump(target) => {
                self.registers.ip = target;
                self.profile.add(instr.category());
                Ok(ExecState::Running)
            }
            Flow::Suspend => Ok(ExecState::Suspended),
            Flow::Halt => {
                self.profile.add(instr.category());
                Ok(ExecState::Halted)
            }
        }
    }

    /// Raw operand words of `instr` at the instruction pointer, for tracing.
    fn operand_words(&self, instr: Instruction) -> Vec<i64> {
        (1..=instr.arity())
            .map(|k| self.memory[self.registers.ip.saturating_add(k)])
            .collect()
    }

    /// Executes a single decoded instruction.
    fn exec(&mut self, instruction: Instruction, word: InstructionWord) -> Result<Flow, VMError> {
        exec_vm! {
            vm = self,
            word = word,
            instr = instruction,
            {
                Add => op_add(a: Read, b: Read, dst: Write),
                Multiply => op_mul(a: Read, b: Read, dst: Write),
                Input => op_input(dst: Write),
                Output => op_output(a: Read),
                JumpIfTrue => op_jump_if_true(cond: Read, target: Read),
                JumpIfFalse => op_jump_if_false(cond: Read, target: Read),
                LessThan => op_less_than(a: Read, b: Read, dst: Write),
                Equals => op_equals(a: Read, b: Read, dst: Write),
                AdjustBase => op_adjust_base(a: Read),
                Halt => op_halt(),
            }
        }
    }

    /// Index of the operand under the cursor, 0-based.
    fn operand_index(&self) -> usize {
        self.cursor - self.registers.ip - 1
    }

    /// Takes the raw word under the cursor and advances the cursor.
    fn next_raw(&mut self) -> Result<i64, VMError> {
        let raw = self.memory[self.cursor];
        self.cursor = self
            .cursor
            .checked_add(1)
            .ok_or(VMError::AddressOverflow {
                offset: self.registers.ip,
            })?;
        Ok(raw)
    }

    /// Resolves the operand under the cursor to a value.
    fn read_operand(&mut self, word: &InstructionWord) -> Result<i64, VMError> {
        let offset = self.registers.ip;
        let mode = word.mode(self.operand_index(), offset)?;
        let raw = self.next_raw()?;
        match mode {
            ParameterMode::Position => Ok(self.memory[Memory::address(raw, offset)?]),
            ParameterMode::Immediate => Ok(raw),
            ParameterMode::Relative => {
                let address = self.registers.relative(raw)?;
                Ok(self.memory[Memory::address(address, offset)?])
            }
        }
    }

    /// Resolves the operand under the cursor to a write address.
    fn write_target(&mut self, word: &InstructionWord) -> Result<usize, VMError> {
        let offset = self.registers.ip;
        let operand = self.operand_index();
        let mode = word.mode(operand, offset)?;
        let raw = self.next_raw()?;
        match mode {
            ParameterMode::Position => Memory::address(raw, offset),
            ParameterMode::Immediate => Err(VMError::ImmediateWrite { operand, offset }),
            ParameterMode::Relative => {
                let address = self.registers.relative(raw)?;
                Memory::address(address, offset)
            }
        }
    }

    /// Converts a jump target to an instruction pointer.
    fn jump_target(&self, target: i64) -> Result<usize, VMError> {
        usize::try_from(target).map_err(|_| VMError::InvalidJumpTarget {
            target,
            offset: self.registers.ip,
        })
    }

    fn op_add(&mut self, instr: &'static str, a: i64, b: i64, dst: usize) -> Result<Flow, VMError> {
        let sum = a.checked_add(b).ok_or(VMError::ArithmeticOverflow {
            instruction: instr,
            offset: self.registers.ip,
        })?;
        self.memory.write(dst, sum);
        Ok(Flow::Next)
    }

    fn op_mul(&mut self, instr: &'static str, a: i64, b: i64, dst: usize) -> Result<Flow, VMError> {
        let product = a.checked_mul(b).ok_or(VMError::ArithmeticOverflow {
            instruction: instr,
            offset: self.registers.ip,
        })?;
        self.memory.write(dst, product);
        Ok(Flow::Next)
    }

    fn op_input(&mut self, _instr: &'static str, dst: usize) -> Result<Flow, VMError> {
        match self.inputs.pop_front() {
            Some(value) => {
                self.memory.write(dst, value);
                Ok(Flow::Next)
            }
            None => Ok(Flow::Suspend),
        }
    }

    fn op_output(&mut self, _instr: &'static str, a: i64) -> Result<Flow, VMError> {
        self.outputs.push(a);
        Ok(Flow::Next)
    }

    fn op_jump_if_true(
        &mut self,
        _instr: &'static str,
        cond: i64,
        target: i64,
    ) -> Result<Flow, VMError> {
        if cond != 0 {
            return Ok(Flow::Jump(self.jump_target(target)?));
        }
        Ok(Flow::Next)
    }

    fn op_jump_if_false(
        &mut self,
        _instr: &'static str,
        cond: i64,
        target: i64,
    ) -> Result<Flow, VMError> {
        if cond == 0 {
            return Ok(Flow::Jump(self.jump_target(target)?));
        }
        Ok(Flow::Next)
    }

    fn op_less_than(
        &mut self,
        _instr: &'static str,
        a: i64,
        b: i64,
        dst: usize,
    ) -> Result<Flow, VMError> {
        self.memory.write(dst, i64::from(a < b));
        Ok(Flow::Next)
    }

    fn op_equals(
        &mut self,
        _instr: &'static str,
        a: i64,
        b: i64,
        dst: usize,
    ) -> Result<Flow, VMError> {
        self.memory.write(dst, i64::from(a == b));
        Ok(Flow::Next)
    }

    fn op_adjust_base(&mut self, instr: &'static str, a: i64) -> Result<Flow, VMError> {
        self.registers.adjust_base(a, instr)?;
        Ok(Flow::Next)
    }

    fn op_halt(&mut self, _instr: &'static str) -> Result<Flow, VMError> {
        Ok(Flow::Halt)
    }
}

/// Runs a fresh machine on `program` with all `inputs` supplied up front and
/// returns its outputs.
///
/// The machine must halt within `limits.max_steps` steps. Asking for more
/// input than supplied is a driver error ([`VMError::UnexpectedSuspend`]).
pub fn run_to_halt(program: &Program, inputs: &[i64], limits: Limits) -> Result<Vec<i64>, VMError> {
    let budget = limits.max_steps;
    let mut vm = VM::with_limits(program, limits);
    vm.feed(inputs.iter().copied());
    match vm.run_bounded(budget)? {
        ExecState::Halted => Ok(vm.drain_outputs()),
        ExecState::Suspended => Err(VMError::UnexpectedSuspend { offset: vm.ip() }),
        ExecState::Running => Err(VMError::StepBudgetExhausted { budget }),
    }
}

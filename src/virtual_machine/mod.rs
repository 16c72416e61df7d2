//! Intcode stored-program virtual machine.
//!
//! The machine executes a program of signed integers that is both its code
//! and its initial data, and talks to the outside world through an input
//! queue and an output queue.
//!
//! # Architecture
//!
//! - **Memory**: growable, zero-filled array of `i64` words addressed from 0
//! - **Registers**: instruction pointer and relative base, both starting at 0
//! - **Instruction format**: `opcode = word mod 100`, one mode digit per operand above it
//! - **Addressing modes**: position, immediate and relative
//! - **Execution model**: run until HALT, or suspend when INPUT finds the queue
//!   empty and resume on the next run once input was fed
//!
//! # Modules
//!
//! - [`disasm`]: Static program listing
//! - [`errors`]: Fault and driver error types
//! - [`isa`]: Instruction set definition and opcode mappings
//! - [`operand`]: Parameter modes and instruction-word decoding
//! - [`program`]: Program text parsing
//! - [`vm`]: Core virtual machine implementation

pub mod disasm;
pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod operand;
pub mod program;
pub mod vm;

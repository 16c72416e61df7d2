use crate::virtual_machine::errors::VMError;

/// The machine's two registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct Registers {
    /// Address of the next instruction word.
    pub(super) ip: usize,
    /// Base added to relative-mode operands. Only ARB changes it.
    pub(super) relative_base: i64,
}

impl Registers {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the relative base.
    ///
    /// Returns [`VMError::ArithmeticOverflow`] if the base leaves the `i64` range.
    pub(super) fn adjust_base(&mut self, delta: i64, instr: &'static str) -> Result<(), VMError> {
        self.relative_base =
            self.relative_base
                .checked_add(delta)
                .ok_or(VMError::ArithmeticOverflow {
                    instruction: instr,
                    offset: self.ip,
                })?;
        Ok(())
    }

    /// Effective address (possibly negative) of a relative-mode raw word.
    pub(super) fn relative(&self, raw: i64) -> Result<i64, VMError> {
        self.relative_base
            .checked_add(raw)
            .ok_or(VMError::AddressOverflow { offset: self.ip })
    }
}

use crate::virtual_machine::errors::VMError;
use std::collections::HashMap;
use std::ops::Index;

static ZERO: i64 = 0;

/// Word-addressed machine memory, conceptually infinite and zero-filled.
///
/// Layout: `[dense region][sparse region]`
/// - **Dense region**: a vector holding the program image and every address
///   below `dense_limit`; it grows on demand and zero-fills gaps.
/// - **Sparse region**: a map holding written addresses at or above
///   `dense_limit`, so far-away writes do not allocate the gap.
///
/// Unwritten addresses read as zero in both regions.
pub(super) struct Memory {
    dense: Vec<i64>,
    sparse: HashMap<usize, i64>,
    dense_limit: usize,
}

impl Memory {
    /// Creates memory holding `image` at address 0.
    pub(super) fn new(image: &[i64], dense_limit: usize) -> Self {
        Self {
            dense_limit: dense_limit.max(image.len()),
            dense: image.to_vec(),
            sparse: HashMap::new(),
        }
    }

    /// Converts a resolved address to an index.
    ///
    /// Returns [`VMError::NegativeAddress`] for negative addresses; they are
    /// never wrapped.
    pub(super) fn address(address: i64, offset: usize) -> Result<usize, VMError> {
        usize::try_from(address).map_err(|_| VMError::NegativeAddress { address, offset })
    }

    pub(super) fn read(&self, address: usize) -> i64 {
        if address < self.dense_limit {
            self.dense.get(address).copied().unwrap_or(0)
        } else {
            self.sparse.get(&address).copied().unwrap_or(0)
        }
    }

    pub(super) fn write(&mut self, address: usize, value: i64) {
        if address < self.dense_limit {
            if address >= self.dense.len() {
                self.dense.resize(address + 1, 0);
            }
            self.dense[address] = value;
        } else {
            self.sparse.insert(address, value);
        }
    }

    /// One past the highest materialized address.
    pub(super) fn len(&self) -> usize {
        let sparse_end = self.sparse.keys().max().map_or(0, |&a| a + 1);
        self.dense.len().max(sparse_end)
    }

    /// The dense region as a slice.
    pub(super) fn dense(&self) -> &[i64] {
        &self.dense
    }
}

/// Reads a word; unwritten addresses yield zero.
impl Index<usize> for Memory {
    type Output = i64;

    fn index(&self, address: usize) -> &Self::Output {
        if address < self.dense_limit {
            self.dense.get(address).unwrap_or(&ZERO)
        } else {
            self.sparse.get(&address).unwrap_or(&ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_program_image() {
        let memory = Memory::new(&[1, 2, 3], 16);
        assert_eq!(memory.read(0), 1);
        assert_eq!(memory.read(2), 3);
        assert_eq!(memory[1], 2);
    }

    #[test]
    fn reads_past_end_are_zero_without_growing() {
        let memory = Memory::new(&[7], 16);
        assert_eq!(memory.read(10), 0);
        assert_eq!(memory.read(1_000_000), 0);
        assert_eq!(memory[5], 0);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn write_grows_and_zero_fills() {
        let mut memory = Memory::new(&[7], 16);
        memory.write(5, 42);
        assert_eq!(memory.dense(), &[7, 0, 0, 0, 0, 42]);
        assert_eq!(memory.len(), 6);
    }

    #[test]
    fn far_writes_go_sparse() {
        let mut memory = Memory::new(&[7, 8], 4);
        memory.write(1_000_000_000, -3);
        assert_eq!(memory.read(1_000_000_000), -3);
        assert_eq!(memory[1_000_000_000], -3);
        assert_eq!(memory.dense(), &[7, 8]);
        assert_eq!(memory.len(), 1_000_000_001);
    }

    #[test]
    fn dense_limit_covers_program() {
        let memory = Memory::new(&[1, 2, 3, 4, 5, 6], 2);
        assert_eq!(memory.dense_limit, 6);
        assert_eq!(memory.read(5), 6);
    }

    #[test]
    fn negative_address_is_a_fault() {
        assert_eq!(Memory::address(3, 0).unwrap(), 3);
        assert_eq!(
            Memory::address(-1, 9).unwrap_err(),
            VMError::NegativeAddress {
                address: -1,
                offset: 9,
            }
        );
    }
}

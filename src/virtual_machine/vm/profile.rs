/// Number of step categories tracked by [`StepProfile`].
const STEP_CATEGORY_COUNT: usize = 6;

/// Default step budget for bounded runs.
pub const DEFAULT_STEP_LIMIT: u64 = 100_000_000;

/// Default number of words kept in the dense part of memory.
pub const DEFAULT_DENSE_WORDS: usize = 1 << 20;

/// Categories of executed instructions, for profiling.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum StepCategory {
    /// ADD, MUL.
    Arithmetic = 0,
    /// LT, EQ.
    Compare = 1,
    /// JNZ, JZ.
    Jump = 2,
    /// IN, OUT.
    Io = 3,
    /// ARB.
    Base = 4,
    /// HALT.
    Control = 5,
}

impl StepCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StepCategory::Arithmetic => "Arithmetic",
            StepCategory::Compare => "Compare",
            StepCategory::Jump => "Jump",
            StepCategory::Io => "I/O",
            StepCategory::Base => "Relative Base",
            StepCategory::Control => "Control",
        }
    }

    /// All categories in discriminant order.
    const ALL: [StepCategory; STEP_CATEGORY_COUNT] = [
        StepCategory::Arithmetic,
        StepCategory::Compare,
        StepCategory::Jump,
        StepCategory::Io,
        StepCategory::Base,
        StepCategory::Control,
    ];
}

/// Executed-instruction counts per [`StepCategory`].
///
/// Suspended INPUT attempts are not counted; an instruction is counted once,
/// when it completes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepProfile {
    counts: [u64; STEP_CATEGORY_COUNT],
}

impl StepProfile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add(&mut self, category: StepCategory) {
        let slot = &mut self.counts[category as usize];
        *slot = slot.saturating_add(1);
    }

    /// Count for a single category.
    pub fn get(&self, category: StepCategory) -> u64 {
        self.counts[category as usize]
    }

    /// Total executed instructions.
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, &v| acc.saturating_add(v))
    }

    /// Iterates over all categories and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (StepCategory, u64)> {
        StepCategory::ALL.into_iter().zip(self.counts)
    }
}

/// Resource limits for a machine.
///
/// `run()` itself is unbounded; `max_steps` only applies to the bounded
/// helpers ([`VM::run_bounded`](super::VM::run_bounded) with the default
/// budget, [`run_to_halt`](super::run_to_halt)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Step budget used by bounded helpers.
    pub max_steps: u64,
    /// Addresses below this bound (or below the program length, whichever is
    /// larger) live in a contiguous vector; higher ones in a sparse map.
    pub dense_words: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_STEP_LIMIT,
            dense_words: DEFAULT_DENSE_WORDS,
        }
    }
}

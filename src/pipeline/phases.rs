//! Phase-setting search.

use crate::pipeline::{Chain, Ring};
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::program::Program;
use std::ops::RangeInclusive;

/// How the stages of a pipeline are wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Each stage runs once, to completion, in order.
    Chain,
    /// The last stage feeds the first until every stage halts.
    Ring,
}

/// Best result found by [`max_signal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Best {
    pub signal: i64,
    pub phases: Vec<i64>,
}

/// Every ordering of `values`, generated with Heap's algorithm.
///
/// The input order comes first. Duplicated values produce duplicated
/// permutations.
pub fn permutations(values: &[i64]) -> Vec<Vec<i64>> {
    let mut items = values.to_vec();
    let mut counters = vec![0usize; items.len()];
    let mut result = vec![items.clone()];

    let mut i = 1;
    while i < items.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            result.push(items.clone());
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    result
}

/// Tries every permutation of `phases` as the stage settings of a pipeline
/// with initial signal 0 and returns the largest final signal.
///
/// The first permutation reaching the maximum wins ties.
pub fn max_signal(
    program: &Program,
    phases: RangeInclusive<i64>,
    topology: Topology,
) -> Result<Best, VMError> {
    let settings: Vec<i64> = phases.collect();
    if settings.is_empty() {
        return Err(VMError::EmptyPipeline);
    }

    let chain = Chain::new();
    let ring = Ring::new();
    let mut best: Option<Best> = None;

    for candidate in permutations(&settings) {
        let signal = match topology {
            Topology::Chain => chain.run(program, &candidate, 0)?,
            Topology::Ring => ring.run(program, &candidate, 0)?,
        };
        if best.as_ref().is_none_or(|b| signal > b.signal) {
            best = Some(Best {
                signal,
                phases: candidate,
            });
        }
    }
    best.ok_or(VMError::EmptyPipeline)
}

//! Feedback composition of several machines.
//!
//! Machines never share memory. A driver moves values from one machine's
//! output queue into another's input queue and decides when each machine
//! runs; suspension on input is what lets several machines interleave on a
//! single thread.
//!
//! # Modules
//!
//! - [`chain`]: Linear pipeline, each stage run to completion in turn
//! - [`ring`]: Cyclic pipeline, stages stepped round-robin until all halt
//! - [`driver`]: Single machine driven by an external input policy
//! - [`phases`]: Search over phase-setting permutations

pub mod chain;
pub mod driver;
pub mod phases;
pub mod ring;

pub use chain::Chain;
pub use driver::{Driver, drive, last_record};
pub use phases::{Best, Topology, max_signal, permutations};
pub use ring::Ring;

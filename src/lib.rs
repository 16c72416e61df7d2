//! Intcode virtual machine library.
//!
//! Provides the stored-program machine, its instruction set, and drivers that
//! compose several machines into linear or cyclic pipelines.

pub mod pipeline;
pub mod utils;
pub mod virtual_machine;

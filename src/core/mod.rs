// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 0.3.0
//
// This file is the module declaration for the core types of the harness,
// located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod error;
pub mod power;
pub mod types;

// Re-export the most commonly used items
pub use error::HarnessError;
pub use power::next_power_of_two;
pub use types::{
    Args, Batch, BatchResult, Difficulty, DifficultySampling, Environment, HarnessConfig,
    RunTarget, WorkerSettings,
};

// Changelog:
// - v0.3.0 (2026-10-12): Replaced hashing primitives with harness types.
//   - Added error taxonomy and power-of-two rounding.

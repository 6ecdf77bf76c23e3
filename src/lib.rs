// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 0.3.0
//
// This file serves as the main library entry point for the harness, located
// at the root of the source tree. It exports all public modules and types
// that the binary and the integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: api, benchmark, core, repo, utils

pub mod api;
pub mod benchmark;
pub mod core;
pub mod repo;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::benchmark::runner::BenchmarkRunner;
pub use crate::core::error::HarnessError;
pub use crate::core::types::{Args, HarnessConfig};

pub type Result<T> = std::result::Result<T, HarnessError>;

// Changelog:
// - v0.3.0 (2026-10-12): Reworked into the nonce batch harness.
//   - Result now carries the typed HarnessError instead of a boxed error.
//   - Added api and repo modules for the metadata service and git checkout.

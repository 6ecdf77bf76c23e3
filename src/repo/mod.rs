// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/repo/mod.rs
// Version: 0.3.0
//
// Module declaration for algorithm repository handling.
//
// Tree Location:
// - src/repo/mod.rs (repo module entry point)
// - Submodules: checkout

pub mod checkout;

pub use checkout::{BranchCheckout, GitCheckout, SkipCheckout};

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/mod.rs
// Version: 0.3.0
//
// This file is the module declaration for the batch benchmarking loop:
// nonce scheduling, difficulty sampling, worker invocation, row recording
// and the runner that ties them together.
//
// Tree Location:
// - src/benchmark/mod.rs (benchmark module entry point)
// - Submodules: difficulty, recorder, runner, scheduler, worker

pub mod difficulty;
pub mod recorder;
pub mod runner;
pub mod scheduler;
pub mod worker;

pub use difficulty::DifficultySource;
pub use recorder::{LogRow, ResultRecorder};
pub use runner::{BenchmarkRunner, TargetSummary};
pub use scheduler::{BatchPlan, NonceScheduler, RunState, RunStatus};
pub use worker::{Worker, WorkerInvoker, WorkerOutcome};

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/worker.rs
// Version: 0.3.0
//
// This file runs the external worker for one batch. Process execution and
// output decoding form a single fallible step whose outcome is tagged as
// completed, non-zero exit or malformed output, so the caller has to decide
// what a failed batch means instead of tripping over a bad payload.
//
// Tree Location:
// - src/benchmark/worker.rs (worker process invocation)
// - Depends on: tokio, serde_json, chrono, core/types

use crate::Result;
use crate::core::error::HarnessError;
use crate::core::types::{Batch, BatchResult};
use log::debug;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::path::PathBuf;
use tokio::process::Command;

const LOG_TARGET: &str = "algo_bench::worker";

/// Subcommand the worker exposes for batch computation
pub const COMPUTE_BATCH: &str = "compute_batch";

/// Result of one worker invocation
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutcome {
    /// Exit status 0 and a well-formed payload
    Completed(BatchResult),
    /// The worker exited unsuccessfully; `code` is `None` when killed by a signal
    NonZeroExit { code: Option<i32>, output: BatchResult },
    /// Exit status 0 but stdout is not the expected JSON object
    MalformedOutput { reason: String, output: BatchResult },
}

impl WorkerOutcome {
    /// Measurements to record. Failed batches report zero solutions.
    pub fn result(&self) -> &BatchResult {
        match self {
            WorkerOutcome::Completed(output)
            | WorkerOutcome::NonZeroExit { output, .. }
            | WorkerOutcome::MalformedOutput { output, .. } => output,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WorkerOutcome::Completed(_))
    }

    pub fn failure_reason(&self) -> Option<String> {
        match self {
            WorkerOutcome::Completed(_) => None,
            WorkerOutcome::NonZeroExit { code: Some(code), .. } => {
                Some(format!("worker exited with status {}", code))
            }
            WorkerOutcome::NonZeroExit { code: None, .. } => {
                Some("worker terminated by signal".to_string())
            }
            WorkerOutcome::MalformedOutput { reason, .. } => {
                Some(format!("malformed worker output: {}", reason))
            }
        }
    }
}

/// Executes one batch of work
#[allow(async_fn_in_trait)]
pub trait Worker {
    /// Fail fast before any pair is started if the worker cannot run
    fn check_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn compute_batch(&self, batch: &Batch) -> Result<WorkerOutcome>;
}

#[derive(Debug, Deserialize)]
struct ComputeBatchOutput {
    /// Only the length matters; element types are not checked
    solution_nonces: Vec<IgnoredAny>,
}

/// Decode the worker's stdout into the number of solutions found
pub fn parse_solution_count(stdout: &str) -> std::result::Result<u64, String> {
    let output: ComputeBatchOutput =
        serde_json::from_str(stdout.trim()).map_err(|e| e.to_string())?;
    Ok(output.solution_nonces.len() as u64)
}

/// Classify a finished process into an outcome
pub fn classify(
    nonce_count: u64,
    exit_code: Option<i32>,
    success: bool,
    stdout: String,
    stderr: String,
    start_ms: i64,
    end_ms: i64,
) -> WorkerOutcome {
    if !success {
        let output = BatchResult::new(nonce_count, 0, stdout, stderr, start_ms, end_ms);
        return WorkerOutcome::NonZeroExit {
            code: exit_code,
            output,
        };
    }
    match parse_solution_count(&stdout) {
        Ok(solutions) => WorkerOutcome::Completed(BatchResult::new(
            nonce_count,
            solutions,
            stdout,
            stderr,
            start_ms,
            end_ms,
        )),
        Err(reason) => WorkerOutcome::MalformedOutput {
            reason,
            output: BatchResult::new(nonce_count, 0, stdout, stderr, start_ms, end_ms),
        },
    }
}

/// Runs the worker executable as a subprocess
#[derive(Debug, Clone)]
pub struct WorkerInvoker {
    worker_path: PathBuf,
    rand_hash: String,
}

impl WorkerInvoker {
    pub fn new(worker_path: PathBuf, rand_hash: String) -> Self {
        Self {
            worker_path,
            rand_hash,
        }
    }

    /// Positional arguments for one batch, after the executable
    pub fn command_args(&self, batch: &Batch) -> Result<Vec<String>> {
        let settings = serde_json::to_string(&batch.settings)?;
        Ok(vec![
            COMPUTE_BATCH.to_string(),
            settings,
            self.rand_hash.clone(),
            batch.nonce_start.to_string(),
            batch.nonce_count.to_string(),
            batch.worker_parallelism.to_string(),
            batch.artifact_path.to_string_lossy().into_owned(),
            "--workers".to_string(),
            batch.nonce_count.to_string(),
        ])
    }
}

impl Worker for WorkerInvoker {
    fn check_ready(&self) -> Result<()> {
        if !self.worker_path.is_file() {
            return Err(HarnessError::WorkerNotFound {
                path: self.worker_path.clone(),
            });
        }
        Ok(())
    }

    async fn compute_batch(&self, batch: &Batch) -> Result<WorkerOutcome> {
        let args = self.command_args(batch)?;
        debug!(target: LOG_TARGET,
            "Running {:?} for nonces {}..{} ({} lanes)",
            self.worker_path,
            batch.nonce_start,
            batch.nonce_start + batch.nonce_count,
            batch.worker_parallelism
        );

        let start_ms = chrono::Utc::now().timestamp_millis();
        let output = Command::new(&self.worker_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| HarnessError::WorkerSpawn {
                path: self.worker_path.clone(),
                source: e,
            })?;
        let end_ms = chrono::Utc::now().timestamp_millis();

        Ok(classify(
            batch.nonce_count,
            output.status.code(),
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            start_ms,
            end_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Difficulty, RunTarget, WorkerSettings};

    fn sample_batch() -> Batch {
        let target = RunTarget::parse("knapsack/dynamic").unwrap();
        Batch {
            nonce_start: 9,
            nonce_count: 3,
            worker_parallelism: 4,
            settings: WorkerSettings::new(&target, Difficulty(vec![50, 10])),
            artifact_path: PathBuf::from("algos/knapsack/dynamic.wasm"),
        }
    }

    #[test]
    fn test_command_args_layout() {
        let invoker = WorkerInvoker::new(PathBuf::from("tig-worker"), "seed".to_string());
        let args = invoker.command_args(&sample_batch()).unwrap();
        assert_eq!(args.len(), 9);
        assert_eq!(args[0], "compute_batch");
        let settings: serde_json::Value = serde_json::from_str(&args[1]).unwrap();
        assert_eq!(settings["challenge_id"], "c003");
        assert_eq!(settings["algorithm_id"], "dynamic");
        assert_eq!(args[2], "seed");
        assert_eq!(args[3], "9");
        assert_eq!(args[4], "3");
        assert_eq!(args[5], "4");
        assert_eq!(args[6], "algos/knapsack/dynamic.wasm");
        assert_eq!(args[7], "--workers");
        assert_eq!(args[8], "3");
    }

    #[test]
    fn test_missing_worker_is_not_ready() {
        let invoker = WorkerInvoker::new(PathBuf::from("/nonexistent/tig-worker"), String::new());
        assert!(matches!(
            invoker.check_ready(),
            Err(HarnessError::WorkerNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_solution_count() {
        assert_eq!(parse_solution_count(r#"{"solution_nonces":[1,4,7]}"#), Ok(3));
        assert_eq!(
            parse_solution_count("{\"merkle_root\":\"ab\",\"solution_nonces\":[]}\n"),
            Ok(0)
        );
        assert!(parse_solution_count("").is_err());
        assert!(parse_solution_count("not json").is_err());
        assert!(parse_solution_count(r#"{"nonces":[1]}"#).is_err());
        assert!(parse_solution_count(r#"[1,2,3]"#).is_err());
        assert!(parse_solution_count(r#"{"solution_nonces":7}"#).is_err());
    }

    #[test]
    fn test_parse_solution_count_ignores_element_type() {
        assert_eq!(parse_solution_count(r#"{"solution_nonces":["a","b"]}"#), Ok(2));
        assert_eq!(
            parse_solution_count(r#"{"solution_nonces":[1,{"nonce":2},null]}"#),
            Ok(3)
        );
    }

    #[test]
    fn test_classify_completed() {
        let outcome = classify(
            4,
            Some(0),
            true,
            r#"{"solution_nonces":[2,3,5]}"#.to_string(),
            String::new(),
            100,
            160,
        );
        assert!(outcome.is_completed());
        assert_eq!(outcome.result().solutions_count, 3);
        assert_eq!(outcome.result().invalid_count, 1);
        assert_eq!(outcome.failure_reason(), None);
    }

    #[test]
    fn test_classify_non_zero_exit_ignores_stdout() {
        let outcome = classify(
            4,
            Some(2),
            false,
            r#"{"solution_nonces":[2,3,5]}"#.to_string(),
            "panicked".to_string(),
            0,
            1,
        );
        assert!(matches!(outcome, WorkerOutcome::NonZeroExit { code: Some(2), .. }));
        assert_eq!(outcome.result().solutions_count, 0);
        assert_eq!(outcome.result().invalid_count, 4);
        assert_eq!(outcome.result().raw_stderr, "panicked");
        assert!(outcome.failure_reason().unwrap().contains("status 2"));
    }

    #[test]
    fn test_classify_malformed_output() {
        let outcome = classify(2, Some(0), true, "oops".to_string(), String::new(), 0, 1);
        assert!(matches!(outcome, WorkerOutcome::MalformedOutput { .. }));
        assert_eq!(outcome.result().invalid_count, 2);
        assert_eq!(outcome.result().raw_stdout, "oops");
    }
}

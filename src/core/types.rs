// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 0.3.0
//
// This file defines core data structures for the harness, located in the
// core subdirectory. It includes the command-line arguments, the resolved
// harness configuration, run targets, difficulty vectors and the per-batch
// request/result types exchanged with the worker.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde, num_cpus

use crate::core::error::HarnessError;
use crate::core::power::MAX_ROUNDABLE;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Challenge names understood by the worker, with their numeric codes.
pub const KNOWN_CHALLENGES: &[(&str, &str)] = &[
    ("satisfiability", "c001"),
    ("vehicle_routing", "c002"),
    ("knapsack", "c003"),
    ("vector_search", "c004"),
];

/// Look up the numeric code for a challenge name
pub fn challenge_code(challenge: &str) -> Option<&'static str> {
    KNOWN_CHALLENGES
        .iter()
        .find(|(name, _)| *name == challenge)
        .map(|(_, code)| *code)
}

/// How often a difficulty vector is drawn from the qualifying set
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultySampling {
    /// One draw per challenge/algorithm pair, reused for every batch
    PerTarget,
    /// A fresh draw before every batch
    PerBatch,
}

/// Command-line arguments for the benchmark harness
#[derive(Parser, Debug, Clone)]
#[command(
    name = "algo-bench",
    version,
    about = "Benchmark challenge algorithms through the external worker",
    long_about = "Runs every configured challenge/algorithm pair through the worker in\n\
                  nonce batches until the nonce range is exhausted or the time budget\n\
                  expires, appending one ';'-separated row per batch to the log file.\n\n\
                  Example:\n\
                    algo-bench --challenges [knapsack/dynamic,vector_search/invector_hybrid] --num-workers 16"
)]
pub struct Args {
    /// Path to the measurement log (created with a header row if missing)
    #[arg(long, default_value = "tig_dataset_algorithms_benchmark.csv", value_name = "PATH")]
    pub log_file: PathBuf,

    /// VM flavour label written into every row
    #[arg(long, default_value = "n1-cpu-small", value_name = "LABEL")]
    pub vm_flavour: String,

    /// Number of GPUs (descriptive only)
    #[arg(long, default_value = "0", value_name = "COUNT")]
    pub num_gpus: u32,

    /// Number of CPUs (descriptive only, 0 = auto-detect)
    #[arg(long, default_value = "0", value_name = "COUNT")]
    pub num_cpus: usize,

    /// First nonce of every run
    #[arg(long, default_value = "1", value_name = "NONCE")]
    pub start_nonce: u64,

    /// Total nonces requested per challenge/algorithm pair
    #[arg(long, default_value = "23040", value_name = "COUNT")]
    pub num_nonces: u64,

    /// Nonces handed to the worker per batch
    #[arg(long, default_value = "16", value_name = "COUNT")]
    pub num_workers: u64,

    /// Bracketed list of challenge/algorithm pairs
    #[arg(long, default_value = "[vector_search/invector_hybrid]", value_name = "LIST")]
    pub challenges: String,

    /// Wall-clock budget per pair, in minutes
    #[arg(long, default_value = "240", value_name = "MINUTES")]
    pub time_budget_mins: u64,

    /// Checkout of the algorithm repository
    #[arg(long, default_value = "../tig-monorepo", value_name = "PATH")]
    pub repo_path: PathBuf,

    /// Worker executable (default: <repo>/target/release/tig-worker)
    #[arg(long, value_name = "PATH")]
    pub worker_path: Option<PathBuf>,

    /// Base URL of the metadata service
    #[arg(long, default_value = "https://mainnet-api.tig.foundation", value_name = "URL")]
    pub api_url: String,

    /// Seed string passed to the worker
    #[arg(long, default_value = "random_string", value_name = "STRING")]
    pub rand_hash: String,

    /// Seed for difficulty sampling (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Draw one difficulty per pair or one per batch
    #[arg(long, value_enum, default_value = "per-target")]
    pub difficulty_sampling: DifficultySampling,

    /// Do not run git checkout/pull before each pair
    #[arg(long, default_value = "false")]
    pub skip_checkout: bool,

    /// Stop the harness after the first failed batch (the row is still written)
    #[arg(long, default_value = "false")]
    pub abort_on_worker_failure: bool,

    /// Log level for console and file output
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,

    /// Directory for the harness log file
    #[arg(long, default_value = "logs", value_name = "DIR")]
    pub log_dir: PathBuf,

    /// log4rs YAML configuration, overrides --log-level and --log-dir
    #[arg(long, value_name = "PATH")]
    pub log_config: Option<PathBuf>,
}

impl Args {
    /// Validate argument combinations that clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.num_nonces == 0 {
            return Err("--num-nonces must be greater than zero".to_string());
        }
        if self.num_workers == 0 {
            return Err("--num-workers must be greater than zero".to_string());
        }
        if self.num_workers > MAX_ROUNDABLE {
            return Err(format!("--num-workers must not exceed {}", MAX_ROUNDABLE));
        }
        if self.time_budget_mins == 0 {
            return Err("--time-budget-mins must be greater than zero".to_string());
        }
        if self.time_budget_mins.checked_mul(60).is_none() {
            return Err("--time-budget-mins is too large".to_string());
        }
        if self.start_nonce.checked_add(self.num_nonces).is_none() {
            return Err("--start-nonce + --num-nonces overflows a 64-bit nonce".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("--api-url must start with http:// or https://".to_string());
        }
        RunTarget::parse_list(&self.challenges).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Resolve defaults and build the harness configuration
    pub fn into_config(self) -> Result<HarnessConfig, HarnessError> {
        let targets = RunTarget::parse_list(&self.challenges)?;
        let num_cpus = if self.num_cpus == 0 {
            num_cpus::get()
        } else {
            self.num_cpus
        };
        let worker_path = self
            .worker_path
            .unwrap_or_else(|| self.repo_path.join("target").join("release").join("tig-worker"));

        Ok(HarnessConfig {
            log_file: self.log_file,
            environment: Environment {
                vm_flavour: self.vm_flavour,
                num_gpus: self.num_gpus,
                num_cpus,
            },
            start_nonce: self.start_nonce,
            num_nonces: self.num_nonces,
            parallelism_unit: self.num_workers,
            targets,
            time_budget: Duration::from_secs(self.time_budget_mins.saturating_mul(60)),
            repo_path: self.repo_path,
            worker_path,
            api_url: self.api_url.trim_end_matches('/').to_string(),
            rand_hash: self.rand_hash,
            seed: self.seed,
            sampling: self.difficulty_sampling,
            skip_checkout: self.skip_checkout,
            abort_on_worker_failure: self.abort_on_worker_failure,
        })
    }
}

/// Descriptive host information copied into every log row
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub vm_flavour: String,
    pub num_gpus: u32,
    pub num_cpus: usize,
}

/// Fully resolved harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub log_file: PathBuf,
    pub environment: Environment,
    pub start_nonce: u64,
    pub num_nonces: u64,
    pub parallelism_unit: u64,
    pub targets: Vec<RunTarget>,
    pub time_budget: Duration,
    pub repo_path: PathBuf,
    pub worker_path: PathBuf,
    pub api_url: String,
    pub rand_hash: String,
    pub seed: Option<u64>,
    pub sampling: DifficultySampling,
    pub skip_checkout: bool,
    pub abort_on_worker_failure: bool,
}

impl HarnessConfig {
    /// Compiled algorithm artifact for a target inside the repository checkout
    pub fn artifact_path(&self, target: &RunTarget) -> PathBuf {
        artifact_path(&self.repo_path, target)
    }
}

pub fn artifact_path(repo_path: &Path, target: &RunTarget) -> PathBuf {
    repo_path
        .join("tig-algorithms")
        .join("wasm")
        .join(&target.challenge)
        .join(format!("{}.wasm", target.algorithm))
}

/// One challenge/algorithm pair under benchmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    /// Challenge name, e.g. `knapsack`
    pub challenge: String,
    /// Algorithm name, doubles as the worker's algorithm id
    pub algorithm: String,
    /// Numeric challenge code, e.g. `c003`
    pub challenge_id: String,
}

impl RunTarget {
    /// Parse a single `challenge/algorithm` pair
    pub fn parse(pair: &str) -> Result<Self, HarnessError> {
        let (challenge, algorithm) = pair.split_once('/').ok_or_else(|| {
            HarnessError::setup(format!("'{}' is not in challenge/algorithm form", pair))
        })?;
        if algorithm.is_empty() || algorithm.contains('/') {
            return Err(HarnessError::setup(format!(
                "'{}' does not name exactly one algorithm",
                pair
            )));
        }
        let challenge_id = challenge_code(challenge).ok_or_else(|| {
            HarnessError::setup(format!("Unknown challenge '{}' in '{}'", challenge, pair))
        })?;
        Ok(Self {
            challenge: challenge.to_string(),
            algorithm: algorithm.to_string(),
            challenge_id: challenge_id.to_string(),
        })
    }

    /// Parse `[a/x, b/y]`; brackets are optional and whitespace is ignored
    pub fn parse_list(list: &str) -> Result<Vec<Self>, HarnessError> {
        let compact: String = list.chars().filter(|c| !c.is_whitespace()).collect();
        let inner = compact.trim_start_matches('[').trim_end_matches(']');
        let targets = inner
            .split(',')
            .filter(|pair| !pair.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if targets.is_empty() {
            return Err(HarnessError::setup("No challenge/algorithm pairs configured"));
        }
        Ok(targets)
    }

    /// Branch in the algorithm repository holding this pair
    pub fn branch_name(&self) -> String {
        format!("{}/{}", self.challenge, self.algorithm)
    }
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.challenge, self.algorithm, self.challenge_id)
    }
}

/// Difficulty parameters for generated instances of a challenge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(pub Vec<i64>);

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// Settings payload serialized as the worker's second argument
#[derive(Debug, Clone, Serialize)]
pub struct WorkerSettings {
    pub challenge_id: String,
    pub difficulty: Difficulty,
    pub algorithm_id: String,
    pub player_id: String,
    pub block_id: String,
}

impl WorkerSettings {
    pub fn new(target: &RunTarget, difficulty: Difficulty) -> Self {
        Self {
            challenge_id: target.challenge_id.clone(),
            difficulty,
            algorithm_id: target.algorithm.clone(),
            player_id: String::new(),
            block_id: String::new(),
        }
    }
}

/// One contiguous nonce range handed to the worker
#[derive(Debug, Clone)]
pub struct Batch {
    pub nonce_start: u64,
    pub nonce_count: u64,
    /// Power of two >= `nonce_count`
    pub worker_parallelism: u64,
    pub settings: WorkerSettings,
    /// Compiled algorithm the worker loads
    pub artifact_path: PathBuf,
}

/// Measurements for a completed batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub solutions_count: u64,
    pub invalid_count: u64,
    pub raw_stdout: String,
    pub raw_stderr: String,
    /// Milliseconds since the Unix epoch
    pub start_ms: i64,
    pub end_ms: i64,
}

impl BatchResult {
    pub fn new(
        nonce_count: u64,
        solutions_count: u64,
        raw_stdout: String,
        raw_stderr: String,
        start_ms: i64,
        end_ms: i64,
    ) -> Self {
        Self {
            solutions_count,
            invalid_count: nonce_count.saturating_sub(solutions_count),
            raw_stdout,
            raw_stderr,
            start_ms,
            end_ms,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_brackets_and_spaces() {
        let targets =
            RunTarget::parse_list("[vector_search/invector_hybrid, knapsack/dynamic]").unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].challenge, "vector_search");
        assert_eq!(targets[0].algorithm, "invector_hybrid");
        assert_eq!(targets[0].challenge_id, "c004");
        assert_eq!(targets[1].challenge_id, "c003");
        assert_eq!(targets[1].branch_name(), "knapsack/dynamic");
    }

    #[test]
    fn test_parse_list_rejects_unknown_challenge() {
        let err = RunTarget::parse_list("[chess/minimax]").unwrap_err();
        assert!(err.to_string().contains("Unknown challenge 'chess'"));
    }

    #[test]
    fn test_parse_list_rejects_missing_algorithm() {
        assert!(RunTarget::parse_list("[knapsack]").is_err());
        assert!(RunTarget::parse_list("[knapsack/]").is_err());
        assert!(RunTarget::parse_list("[]").is_err());
    }

    #[test]
    fn test_difficulty_display_and_json() {
        let difficulty = Difficulty(vec![50, 300]);
        assert_eq!(difficulty.to_string(), "[50, 300]");
        assert_eq!(serde_json::to_string(&difficulty).unwrap(), "[50,300]");
    }

    #[test]
    fn test_settings_payload_fields() {
        let target = RunTarget::parse("satisfiability/sat_global").unwrap();
        let settings = WorkerSettings::new(&target, Difficulty(vec![5000, 415]));
        let json: serde_json::Value = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["challenge_id"], "c001");
        assert_eq!(json["algorithm_id"], "sat_global");
        assert_eq!(json["difficulty"], serde_json::json!([5000, 415]));
        assert_eq!(json["player_id"], "");
        assert_eq!(json["block_id"], "");
    }

    #[test]
    fn test_invalid_count_never_negative() {
        let result = BatchResult::new(4, 3, String::new(), String::new(), 10, 25);
        assert_eq!(result.invalid_count, 1);
        assert_eq!(result.duration_ms(), 15);

        let over = BatchResult::new(2, 5, String::new(), String::new(), 0, 0);
        assert_eq!(over.invalid_count, 0);
    }

    #[test]
    fn test_args_defaults_resolve() {
        let args = Args::parse_from(["algo-bench"]);
        assert!(args.validate().is_ok());
        let config = args.into_config().unwrap();
        assert_eq!(config.start_nonce, 1);
        assert_eq!(config.num_nonces, 23040);
        assert_eq!(config.parallelism_unit, 16);
        assert_eq!(config.time_budget, Duration::from_secs(4 * 60 * 60));
        assert_eq!(config.sampling, DifficultySampling::PerTarget);
        assert!(config.environment.num_cpus > 0);
        assert!(config.worker_path.ends_with("target/release/tig-worker"));
        let artifact = config.artifact_path(&config.targets[0]);
        assert!(artifact.ends_with("tig-algorithms/wasm/vector_search/invector_hybrid.wasm"));
    }

    #[test]
    fn test_args_validate_rejects_zero_workers() {
        let args = Args::parse_from(["algo-bench", "--num-workers", "0"]);
        assert!(args.validate().unwrap_err().contains("--num-workers"));
    }

    #[test]
    fn test_args_validate_bounds_batch_size() {
        let largest = (1u64 << 63).to_string();
        let args = Args::parse_from([
            "algo-bench",
            "--num-workers",
            largest.as_str(),
            "--start-nonce",
            "0",
            "--num-nonces",
            largest.as_str(),
        ]);
        assert!(args.validate().is_ok());

        let too_large = ((1u64 << 63) + 1).to_string();
        let args = Args::parse_from([
            "algo-bench",
            "--num-workers",
            too_large.as_str(),
            "--num-nonces",
            too_large.as_str(),
        ]);
        assert!(args.validate().unwrap_err().contains("--num-workers"));
    }

    #[test]
    fn test_args_validate_rejects_overflowing_budget() {
        let huge = u64::MAX.to_string();
        let args = Args::parse_from(["algo-bench", "--time-budget-mins", huge.as_str()]);
        assert!(args.validate().unwrap_err().contains("--time-budget-mins"));

        let config = args.into_config().unwrap();
        assert_eq!(config.time_budget, Duration::from_secs(u64::MAX));
    }
}

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/runner.rs
// Version: 0.3.0
//
// This file implements the benchmark execution engine. For every configured
// challenge/algorithm pair it checks out the algorithm branch, fetches the
// qualifying difficulties, then feeds nonce batches to the worker until the
// nonce range is exhausted or the pair's time budget has run out, recording
// one log row per executed batch.
//
// Tree Location:
// - src/benchmark/runner.rs (run orchestration)
// - Depends on: benchmark/{scheduler,difficulty,worker,recorder}, api, repo

use crate::Result;
use crate::api::MetadataSource;
use crate::benchmark::difficulty::DifficultySource;
use crate::benchmark::recorder::{LogRow, ResultRecorder};
use crate::benchmark::scheduler::{NonceScheduler, RunState, RunStatus};
use crate::benchmark::worker::{Worker, WorkerOutcome};
use crate::core::error::HarnessError;
use crate::core::types::{Batch, DifficultySampling, HarnessConfig, RunTarget, WorkerSettings};
use crate::repo::BranchCheckout;
use crate::utils::clock::Clock;
use crate::utils::format::FormatUtils;
use log::{debug, info, warn};
use rand::Rng;
use std::time::Duration;

const LOG_TARGET: &str = "algo_bench::runner";

const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What happened to one challenge/algorithm pair
#[derive(Debug, Clone)]
pub struct TargetSummary {
    pub target: RunTarget,
    pub status: RunStatus,
    pub final_state: RunState,
    pub batches: u64,
    pub failed_batches: u64,
    pub nonces_computed: u64,
    pub solutions: u64,
    pub elapsed: Duration,
}

impl TargetSummary {
    fn new(target: RunTarget, state: RunState) -> Self {
        Self {
            target,
            status: RunStatus::Active,
            final_state: state,
            batches: 0,
            failed_batches: 0,
            nonces_computed: 0,
            solutions: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, batch: &Batch, outcome: &WorkerOutcome) {
        self.batches += 1;
        self.nonces_computed += batch.nonce_count;
        self.solutions += outcome.result().solutions_count;
        if !outcome.is_completed() {
            self.failed_batches += 1;
        }
    }

    /// Fraction of computed nonces that produced a solution
    pub fn solution_rate(&self) -> f64 {
        if self.nonces_computed == 0 {
            0.0
        } else {
            self.solutions as f64 / self.nonces_computed as f64
        }
    }

    /// Nonces per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.nonces_computed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives every configured pair through the worker
pub struct BenchmarkRunner<W, M, K, C, R>
where
    W: Worker,
    M: MetadataSource,
    K: BranchCheckout,
    C: Clock,
    R: Rng,
{
    config: HarnessConfig,
    worker: W,
    metadata: M,
    checkout: K,
    clock: C,
    difficulties: DifficultySource<R>,
    recorder: ResultRecorder,
}

impl<W, M, K, C, R> BenchmarkRunner<W, M, K, C, R>
where
    W: Worker,
    M: MetadataSource,
    K: BranchCheckout,
    C: Clock,
    R: Rng,
{
    pub fn new(
        config: HarnessConfig,
        worker: W,
        metadata: M,
        checkout: K,
        clock: C,
        difficulties: DifficultySource<R>,
    ) -> Self {
        let recorder = ResultRecorder::new(config.log_file.clone());
        Self {
            config,
            worker,
            metadata,
            checkout,
            clock,
            difficulties,
            recorder,
        }
    }

    /// Run all pairs in configured order. The first error aborts the run.
    pub async fn run(&mut self) -> Result<Vec<TargetSummary>> {
        self.worker.check_ready()?;
        self.recorder.ensure_header().await?;

        let targets = self.config.targets.clone();
        let mut summaries = Vec::with_capacity(targets.len());
        for target in &targets {
            let summary = self.run_target(target).await?;
            info!(target: LOG_TARGET,
                "Finished {} ({:?}): {} batches, {} nonces, {} solutions ({:.2}%), {} failed, {} in {}",
                target,
                summary.status,
                summary.batches,
                FormatUtils::format_number(summary.nonces_computed),
                FormatUtils::format_number(summary.solutions),
                summary.solution_rate() * 100.0,
                summary.failed_batches,
                FormatUtils::format_rate(summary.throughput()),
                FormatUtils::format_duration(summary.elapsed)
            );
            summaries.push(summary);
        }

        info!(target: LOG_TARGET,
            "All {} pairs complete. Results logged to {:?}",
            summaries.len(),
            self.recorder.path()
        );
        Ok(summaries)
    }

    /// Prepare and run one pair until it is exhausted or timed out
    pub async fn run_target(&mut self, target: &RunTarget) -> Result<TargetSummary> {
        self.checkout.checkout(&target.branch_name()).await?;

        let qualifying = self
            .metadata
            .qualifying_difficulties(&target.challenge_id)
            .await?;
        self.difficulties.load(&target.challenge_id, qualifying)?;

        let artifact_path = self.config.artifact_path(target);
        if !artifact_path.is_file() {
            return Err(HarnessError::ArtifactNotFound {
                path: artifact_path,
            });
        }

        info!(target: LOG_TARGET,
            "Testing algorithm {} for challenge {} ({} qualifying difficulties)",
            target.algorithm,
            target.challenge,
            self.difficulties.len(&target.challenge_id)
        );

        let fixed_difficulty = match self.config.sampling {
            DifficultySampling::PerTarget => Some(self.difficulties.sample(&target.challenge_id)?),
            DifficultySampling::PerBatch => None,
        };
        if let Some(difficulty) = &fixed_difficulty {
            info!(target: LOG_TARGET, "Difficulty for this run: {}", difficulty);
        }

        let scheduler = NonceScheduler::new(
            self.config.start_nonce,
            self.config.num_nonces,
            self.config.parallelism_unit,
            self.config.time_budget,
        );
        let mut state = scheduler.begin(self.clock.now());
        let mut summary = TargetSummary::new(target.clone(), state);

        let status = loop {
            let status = scheduler.status(&state, self.clock.now());
            if status.is_terminal() {
                break status;
            }
            let Some(plan) = scheduler.next_batch(&state) else {
                break RunStatus::Exhausted;
            };

            let difficulty = match &fixed_difficulty {
                Some(difficulty) => difficulty.clone(),
                None => self.difficulties.sample(&target.challenge_id)?,
            };
            let batch = Batch {
                nonce_start: plan.nonce_start,
                nonce_count: plan.nonce_count,
                worker_parallelism: plan.worker_parallelism,
                settings: WorkerSettings::new(target, difficulty),
                artifact_path: artifact_path.clone(),
            };

            let timestamp = chrono::Local::now().format(ROW_TIMESTAMP_FORMAT).to_string();
            let outcome = self.worker.compute_batch(&batch).await?;
            let row = LogRow::new(
                timestamp,
                &self.config.environment,
                target,
                &batch,
                outcome.result(),
            );
            self.recorder.append(&row).await?;

            state = scheduler.complete(state, &plan);
            summary.record(&batch, &outcome);
            debug!(target: LOG_TARGET,
                "Batch at nonce {} done: {} solutions, {} remaining",
                batch.nonce_start,
                outcome.result().solutions_count,
                state.remaining_nonces
            );

            if let Some(reason) = outcome.failure_reason() {
                warn!(target: LOG_TARGET,
                    "Batch at nonce {} of {} failed: {}",
                    batch.nonce_start, target, reason
                );
                if self.config.abort_on_worker_failure {
                    return Err(HarnessError::WorkerInvocationFailed {
                        nonce: batch.nonce_start,
                        reason,
                    });
                }
            }
        };

        if status == RunStatus::TimedOut {
            info!(target: LOG_TARGET,
                "Time budget of {} spent on {} with {} nonces left",
                FormatUtils::format_duration(scheduler.time_budget()),
                target,
                state.remaining_nonces
            );
        }

        summary.status = status;
        summary.final_state = state;
        summary.elapsed = self.clock.now().saturating_duration_since(state.run_start);
        Ok(summary)
    }
}


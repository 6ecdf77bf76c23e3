// Algo Bench - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 0.3.0
//
// Entry point: parse arguments, set up logging, run every configured pair.

use algo_bench::{
    Args, HarnessConfig,
    api::MetadataClient,
    benchmark::{BenchmarkRunner, DifficultySource, RunStatus, TargetSummary, WorkerInvoker},
    repo::{BranchCheckout, GitCheckout, SkipCheckout},
    utils::{clock::SystemClock, logging::init_logging},
};
use anyhow::Context;
use clap::Parser;
use log::{error, info};

const LOG_TARGET: &str = "algo_bench::main";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(args.log_level, &args.log_dir, args.log_config.as_deref())
        .context("failed to initialise logging")?;

    let config = args.into_config()?;
    info!(target: LOG_TARGET, "🧪 Benchmarking {} pair(s)", config.targets.len());
    info!(target: LOG_TARGET, "🔧 Worker: {:?}", config.worker_path);
    info!(target: LOG_TARGET,
        "🎯 Nonces {}..{} in batches of {}",
        config.start_nonce,
        config.start_nonce + config.num_nonces,
        config.parallelism_unit
    );
    info!(target: LOG_TARGET,
        "⏱️ Budget per pair: {}m, difficulty sampling: {:?}",
        config.time_budget.as_secs() / 60,
        config.sampling
    );

    let result = if config.skip_checkout {
        run(config, SkipCheckout).await
    } else {
        let checkout = GitCheckout::new(config.repo_path.clone());
        run(config, checkout).await
    };

    match result {
        Ok(summaries) => {
            let timed_out = summaries
                .iter()
                .filter(|s| s.status == RunStatus::TimedOut)
                .count();
            info!(target: LOG_TARGET,
                "📊 Benchmark complete: {} pair(s), {} stopped by the time budget",
                summaries.len(),
                timed_out
            );
            Ok(())
        }
        Err(e) => {
            error!(target: LOG_TARGET, "❌ {}", e);
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run<K: BranchCheckout>(
    config: HarnessConfig,
    checkout: K,
) -> algo_bench::Result<Vec<TargetSummary>> {
    let worker = WorkerInvoker::new(config.worker_path.clone(), config.rand_hash.clone());
    let metadata = MetadataClient::new(config.api_url.clone())?;
    let difficulties = DifficultySource::from_seed(config.seed);

    let mut runner =
        BenchmarkRunner::new(config, worker, metadata, checkout, SystemClock, difficulties);
    runner.run().await
}

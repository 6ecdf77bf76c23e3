// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/repo/checkout.rs
// Version: 0.3.0
//
// This file switches the algorithm repository to the branch of the pair
// being benchmarked and pulls the latest commits, so the worker builds
// against the right algorithm sources.
//
// Tree Location:
// - src/repo/checkout.rs (git branch checkout)
// - Depends on: tokio

use crate::Result;
use crate::core::error::HarnessError;
use log::{debug, info};
use std::path::PathBuf;
use tokio::process::Command;

const LOG_TARGET: &str = "algo_bench::checkout";

/// Makes a branch of the algorithm repository current
#[allow(async_fn_in_trait)]
pub trait BranchCheckout {
    async fn checkout(&self, branch: &str) -> Result<()>;
}

/// `git checkout <branch> && git pull` inside the repository
#[derive(Debug, Clone)]
pub struct GitCheckout {
    repo_path: PathBuf,
}

impl GitCheckout {
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    async fn git(&self, branch: &str, args: &[&str]) -> Result<()> {
        debug!(target: LOG_TARGET, "git {} in {:?}", args.join(" "), self.repo_path);
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|e| HarnessError::Checkout {
                branch: branch.to_string(),
                output: format!("could not run git: {}", e),
            })?;

        if !output.status.success() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(HarnessError::Checkout {
                branch: branch.to_string(),
                output: text.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl BranchCheckout for GitCheckout {
    async fn checkout(&self, branch: &str) -> Result<()> {
        self.git(branch, &["checkout", branch]).await?;
        self.git(branch, &["pull"]).await?;
        info!(target: LOG_TARGET, "Checked out {} in {:?}", branch, self.repo_path);
        Ok(())
    }
}

/// Leaves the repository as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipCheckout;

impl BranchCheckout for SkipCheckout {
    async fn checkout(&self, branch: &str) -> Result<()> {
        debug!(target: LOG_TARGET, "Skipping checkout of {}", branch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_checkout_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let checkout = GitCheckout::new(dir.path().to_path_buf());
        match checkout.checkout("knapsack/dynamic").await {
            Err(HarnessError::Checkout { branch, .. }) => assert_eq!(branch, "knapsack/dynamic"),
            other => panic!("expected checkout failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_skip_checkout_is_noop() {
        assert!(SkipCheckout.checkout("anything").await.is_ok());
    }
}

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/error.rs
// Version: 0.3.0
//
// This file defines the error taxonomy for the harness. Every variant is
// fatal: the harness has no retry policy, the binary prints the diagnostic
// and exits.
//
// Tree Location:
// - src/core/error.rs (harness error types)
// - Depends on: thiserror

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Setup failed: {message}")]
    SetupFailure { message: String },

    #[error("Worker executable not found at {path:?}")]
    WorkerNotFound { path: PathBuf },

    #[error("Algorithm artifact not found at {path:?}")]
    ArtifactNotFound { path: PathBuf },

    #[error("Metadata fetch from {url} failed: {message}")]
    MetadataFetch { url: String, message: String },

    #[error("No qualifying difficulties published for challenge {challenge_id}")]
    DifficultyUnavailable { challenge_id: String },

    #[error("Checkout of branch {branch} failed: {output}")]
    Checkout { branch: String, output: String },

    #[error("Failed to start worker {path:?}")]
    WorkerSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker failed on batch at nonce {nonce}: {reason}")]
    WorkerInvocationFailed { nonce: u64, reason: String },

    #[error("Failed to serialize worker settings")]
    Settings {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO operation failed on log file {path:?}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn setup(message: impl Into<String>) -> Self {
        HarnessError::SetupFailure {
            message: message.into(),
        }
    }

    pub fn metadata(url: impl Into<String>, message: impl Into<String>) -> Self {
        HarnessError::MetadataFetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

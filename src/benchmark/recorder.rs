// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/recorder.rs
// Version: 0.3.0
//
// This file appends measurement rows to the ';'-separated benchmark log.
// Each row is written with its own open/write/flush/close cycle so that a
// crash after batch k leaves rows 1..k on disk.
//
// Tree Location:
// - src/benchmark/recorder.rs (measurement log writer)
// - Depends on: tokio, core/types

use crate::Result;
use crate::core::error::HarnessError;
use crate::core::types::{Batch, BatchResult, Environment, RunTarget};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

const LOG_TARGET: &str = "algo_bench::recorder";

pub const DELIMITER: char = ';';

/// Column names, in row order. Never reorder or insert into this list.
pub const HEADER: [&str; 17] = [
    "Timestamp",
    "VM_Flavour",
    "Num_GPUs",
    "Num_CPUs",
    "Branch_Name",
    "Challenge_ID",
    "Challenge_Name",
    "Difficulty",
    "Algorithm_ID",
    "Start_Time",
    "End_Time",
    "Duration",
    "Nonce",
    "Solutions_Count",
    "Invalid_Count",
    "Output_Stdout",
    "Output_Stderr",
];

/// One measurement row
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub timestamp: String,
    pub vm_flavour: String,
    pub num_gpus: u32,
    pub num_cpus: usize,
    pub branch_name: String,
    pub challenge_id: String,
    pub challenge_name: String,
    pub difficulty: String,
    pub algorithm_id: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub duration_ms: i64,
    pub nonce: u64,
    pub solutions_count: u64,
    pub invalid_count: u64,
    pub stdout: String,
    pub stderr: String,
}

impl LogRow {
    pub fn new(
        timestamp: String,
        environment: &Environment,
        target: &RunTarget,
        batch: &Batch,
        result: &BatchResult,
    ) -> Self {
        Self {
            timestamp,
            vm_flavour: environment.vm_flavour.clone(),
            num_gpus: environment.num_gpus,
            num_cpus: environment.num_cpus,
            branch_name: target.branch_name(),
            challenge_id: target.challenge_id.clone(),
            challenge_name: target.challenge.clone(),
            difficulty: batch.settings.difficulty.to_string(),
            algorithm_id: target.algorithm.clone(),
            start_ms: result.start_ms,
            end_ms: result.end_ms,
            duration_ms: result.duration_ms(),
            nonce: batch.nonce_start,
            solutions_count: result.solutions_count,
            invalid_count: result.invalid_count,
            stdout: result.raw_stdout.trim_end().to_string(),
            stderr: result.raw_stderr.trim_end().to_string(),
        }
    }

    /// Field values in `HEADER` order
    pub fn fields(&self) -> [String; 17] {
        [
            self.timestamp.clone(),
            self.vm_flavour.clone(),
            self.num_gpus.to_string(),
            self.num_cpus.to_string(),
            self.branch_name.clone(),
            self.challenge_id.clone(),
            self.challenge_name.clone(),
            self.difficulty.clone(),
            self.algorithm_id.clone(),
            self.start_ms.to_string(),
            self.end_ms.to_string(),
            self.duration_ms.to_string(),
            self.nonce.to_string(),
            self.solutions_count.to_string(),
            self.invalid_count.to_string(),
            self.stdout.clone(),
            self.stderr.clone(),
        ]
    }

    /// Encoded line, including the trailing newline
    pub fn to_line(&self) -> String {
        encode_line(self.fields().iter().map(String::as_str))
    }
}

/// Quote a field if it holds the delimiter, a quote or a line break
pub fn encode_field(field: &str) -> String {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn encode_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let delimiter = DELIMITER.to_string();
    let mut line = fields
        .into_iter()
        .map(encode_field)
        .collect::<Vec<_>>()
        .join(delimiter.as_str());
    line.push_str("\r\n");
    line
}

/// Append-only writer for the benchmark log
#[derive(Debug, Clone)]
pub struct ResultRecorder {
    path: PathBuf,
}

impl ResultRecorder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HarnessError {
        HarnessError::Log {
            path: self.path.clone(),
            source,
        }
    }

    /// Create the log with its header row. An existing file is left untouched.
    pub async fn ensure_header(&self) -> Result<bool> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;
        let mut file = match file {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(target: LOG_TARGET, "Appending to existing log {:?}", self.path);
                return Ok(false);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        file.write_all(encode_line(HEADER).as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        info!(target: LOG_TARGET, "Created benchmark log {:?}", self.path);
        Ok(true)
    }

    /// Append one row and close the file again. The log must already exist,
    /// so a file removed mid-run is an error rather than a headerless log.
    pub async fn append(&self, row: &LogRow) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        file.write_all(row.to_line().as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        debug!(target: LOG_TARGET, "Recorded row for nonce {}", row.nonce);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Difficulty, WorkerSettings};

    #[test]
    fn test_encode_plain_field_untouched() {
        assert_eq!(encode_field("knapsack"), "knapsack");
        assert_eq!(encode_field("[50, 300]"), "[50, 300]");
    }

    #[test]
    fn test_encode_quotes_special_fields() {
        assert_eq!(encode_field("a;b"), "\"a;b\"");
        assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(encode_field("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn test_header_line() {
        let line = encode_line(HEADER);
        assert!(line.starts_with("Timestamp;VM_Flavour;Num_GPUs;Num_CPUs;Branch_Name;"));
        assert!(line.ends_with("Output_Stdout;Output_Stderr\r\n"));
        assert_eq!(line.trim_end().split(';').count(), 17);
    }

    fn sample_row(nonce: u64) -> LogRow {
        let target = RunTarget::parse("knapsack/dynamic").unwrap();
        let environment = Environment {
            vm_flavour: "n1-cpu-small".to_string(),
            num_gpus: 0,
            num_cpus: 4,
        };
        let batch = Batch {
            nonce_start: nonce,
            nonce_count: 4,
            worker_parallelism: 4,
            settings: WorkerSettings::new(&target, Difficulty(vec![50, 10])),
            artifact_path: PathBuf::from("dynamic.wasm"),
        };
        let result = BatchResult::new(4, 1, "{}".to_string(), String::new(), 0, 5);
        LogRow::new("2024-01-01 00:00:00".to_string(), &environment, &target, &batch, &result)
    }

    #[tokio::test]
    async fn test_append_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ResultRecorder::new(dir.path().join("bench.csv"));
        assert!(recorder.ensure_header().await.unwrap());
        assert!(!recorder.ensure_header().await.unwrap());
        recorder.append(&sample_row(1)).await.unwrap();
        recorder.append(&sample_row(5)).await.unwrap();

        let content = std::fs::read_to_string(recorder.path()).unwrap();
        let lines: Vec<&str> = content.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Timestamp;"));
        assert_eq!(lines[1].split(';').nth(12), Some("1"));
        assert_eq!(lines[2].split(';').nth(12), Some("5"));
    }

    #[tokio::test]
    async fn test_append_to_removed_log_fails() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ResultRecorder::new(dir.path().join("bench.csv"));
        recorder.ensure_header().await.unwrap();
        std::fs::remove_file(recorder.path()).unwrap();

        let err = recorder.append(&sample_row(1)).await.unwrap_err();
        assert!(matches!(err, HarnessError::Log { .. }));
        assert!(!recorder.path().exists());
    }
}

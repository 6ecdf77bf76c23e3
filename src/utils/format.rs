// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 0.3.0
//
// This file provides utility functions for formatting run statistics in
// progress and summary log lines.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

/// Utility functions for formatting harness statistics
pub struct FormatUtils;

impl FormatUtils {
    /// Format a nonce throughput in appropriate units (n/s, Kn/s, Mn/s)
    pub fn format_rate(nonces_per_sec: f64) -> String {
        if nonces_per_sec >= 1_000_000.0 {
            format!("{:.2} Mn/s", nonces_per_sec / 1_000_000.0)
        } else if nonces_per_sec >= 1_000.0 {
            format!("{:.2} Kn/s", nonces_per_sec / 1_000.0)
        } else {
            format!("{:.2} n/s", nonces_per_sec)
        }
    }

    /// Format an elapsed duration as `1h 02m 03s`, dropping leading zero units
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            format!("{}h {:02}m {:02}s", h, m, s)
        } else if m > 0 {
            format!("{}m {:02}s", m, s)
        } else {
            format!("{}s", s)
        }
    }

    /// Format large numbers with suffixes (K, M, B)
    pub fn format_number(num: u64) -> String {
        if num >= 1_000_000_000 {
            format!("{:.1}B", num as f64 / 1_000_000_000.0)
        } else if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }
}

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/power.rs
// Version: 0.3.0
//
// Power-of-two rounding for the worker's per-batch parallelism argument.

/// Largest input whose power-of-two rounding fits in a `u64`
pub const MAX_ROUNDABLE: u64 = 1 << 63;

/// Smallest power of two that is >= `n`. Zero rounds up to 1.
///
/// Inputs above `MAX_ROUNDABLE` have no `u64` answer and saturate to it;
/// argument validation keeps batch sizes below that bound.
pub fn next_power_of_two(n: u64) -> u64 {
    n.max(1).checked_next_power_of_two().unwrap_or(MAX_ROUNDABLE)
}

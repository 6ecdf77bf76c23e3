// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/difficulty.rs
// Version: 0.3.0
//
// This file holds the qualifying difficulty sets fetched from the metadata
// service and draws difficulty vectors from them uniformly at random. The
// random source is injected so runs can be replayed with a fixed seed.
//
// Tree Location:
// - src/benchmark/difficulty.rs (difficulty sampling)
// - Depends on: rand, core/types

use crate::Result;
use crate::core::error::HarnessError;
use crate::core::types::Difficulty;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const LOG_TARGET: &str = "algo_bench::difficulty";

pub struct DifficultySource<R: Rng> {
    rng: R,
    qualifying: HashMap<String, Vec<Difficulty>>,
}

impl DifficultySource<StdRng> {
    /// Seeded from `seed`, or from OS entropy when absent
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> DifficultySource<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            qualifying: HashMap::new(),
        }
    }

    /// Replace the qualifying set for a challenge. An empty set is refused.
    pub fn load(&mut self, challenge_id: &str, difficulties: Vec<Difficulty>) -> Result<()> {
        if difficulties.is_empty() {
            self.qualifying.remove(challenge_id);
            return Err(HarnessError::DifficultyUnavailable {
                challenge_id: challenge_id.to_string(),
            });
        }
        debug!(target: LOG_TARGET,
            "Loaded {} qualifying difficulties for {}",
            difficulties.len(), challenge_id
        );
        self.qualifying.insert(challenge_id.to_string(), difficulties);
        Ok(())
    }

    /// Number of qualifying difficulties held for a challenge
    pub fn len(&self, challenge_id: &str) -> usize {
        self.qualifying.get(challenge_id).map_or(0, Vec::len)
    }

    /// Draw one difficulty for `challenge_id` uniformly at random
    pub fn sample(&mut self, challenge_id: &str) -> Result<Difficulty> {
        self.qualifying
            .get(challenge_id)
            .and_then(|set| set.choose(&mut self.rng))
            .cloned()
            .ok_or_else(|| HarnessError::DifficultyUnavailable {
                challenge_id: challenge_id.to_string(),
            })
    }
}

// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/api/client.rs
// Version: 0.3.0
//
// This file implements the read-only client for the metadata service. It
// resolves the current block and returns the qualifying difficulties a
// challenge has published for that block. Any non-200 response is fatal.
//
// Tree Location:
// - src/api/client.rs (metadata service client)
// - Depends on: reqwest, serde, core/types, utils/user_agent

use crate::Result;
use crate::core::error::HarnessError;
use crate::core::types::Difficulty;
use crate::utils::user_agent::user_agent;
use log::{debug, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const LOG_TARGET: &str = "algo_bench::api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub block: BlockInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockInfo {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengesResponse {
    pub challenges: Vec<ChallengeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeInfo {
    pub id: String,
    #[serde(default)]
    pub block_data: Option<ChallengeBlockData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChallengeBlockData {
    #[serde(default)]
    pub qualifier_difficulties: Vec<Difficulty>,
}

impl ChallengesResponse {
    /// Qualifying difficulties for `challenge_id`; `None` if the challenge is absent
    pub fn qualifying(&self, challenge_id: &str) -> Option<Vec<Difficulty>> {
        self.challenges
            .iter()
            .find(|c| c.id == challenge_id)
            .map(|c| {
                c.block_data
                    .as_ref()
                    .map(|data| data.qualifier_difficulties.clone())
                    .unwrap_or_default()
            })
    }
}

/// Supplies the qualifying difficulty set for a challenge
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    async fn qualifying_difficulties(&self, challenge_id: &str) -> Result<Vec<Difficulty>>;
}

#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| HarnessError::metadata(&base_url, e.to_string()))?;
        Ok(Self { http, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(target: LOG_TARGET, "GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HarnessError::metadata(url, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(HarnessError::metadata(
                url,
                format!("unexpected status code {}", status.as_u16()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HarnessError::metadata(url, format!("invalid response body: {}", e)))
    }

    pub async fn current_block_id(&self) -> Result<String> {
        let url = format!("{}/get-block", self.base_url);
        let block: BlockResponse = self.get_json(&url).await?;
        Ok(block.block.id)
    }

    pub async fn challenges(&self, block_id: &str) -> Result<ChallengesResponse> {
        let url = format!("{}/get-challenges?block_id={}", self.base_url, block_id);
        self.get_json(&url).await
    }
}

impl MetadataSource for MetadataClient {
    async fn qualifying_difficulties(&self, challenge_id: &str) -> Result<Vec<Difficulty>> {
        let block_id = self.current_block_id().await?;
        info!(target: LOG_TARGET, "Current block: {}", block_id);

        let challenges = self.challenges(&block_id).await?;
        challenges.qualifying(challenge_id).ok_or_else(|| {
            HarnessError::metadata(
                &self.base_url,
                format!("challenge {} not found in block {}", challenge_id, block_id),
            )
        })
    }
}

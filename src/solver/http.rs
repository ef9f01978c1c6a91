use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{MenuSolver, SolverError, SolverRequest, SolverResponse};
use crate::config::SolverConfig;

/// Talks to the optimization backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSolver {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct BackendFailure {
    error: String,
}

impl HttpSolver {
    pub fn new(config: &SolverConfig) -> Result<Self, SolverError> {
        // Optimization runs block for a while, so the timeout comes from
        // config instead of reqwest's default.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MenuSolver for HttpSolver {
    async fn optimize(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        let url = format!("{}/optimize", self.base_url);
        info!(
            days = request.days,
            cost = request.cost,
            %url,
            "requesting menu optimization"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            // The backend reports failures as {"error": msg}.
            let message = response
                .json::<BackendFailure>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "サーバーエラーが発生しました".to_string());
            return Err(SolverError::Backend { message });
        }

        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<SolverResponse>(&body)
            .map_err(|e| SolverError::MalformedResponse(e.to_string()))?;

        debug!(
            days = parsed.plan.days.len(),
            total_cost = parsed.plan.total_cost,
            "solver returned a plan"
        );
        Ok(parsed)
    }
}

// Backend client for the aggregate dashboard endpoint
use crate::application::summary_service::SummaryRepository;
use crate::domain::summary::MainDashboard;
use crate::infrastructure::http_source::endpoint_url;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub const MAIN_DASHBOARD_PATH: &str = "/api/v1/dashboard/main";

#[derive(Debug, Clone)]
pub struct HttpSummaryRepository {
    client: reqwest::Client,
    url: String,
}

impl HttpSummaryRepository {
    pub fn new(client: reqwest::Client, base: &str) -> Self {
        Self {
            client,
            url: endpoint_url(base, MAIN_DASHBOARD_PATH),
        }
    }
}

#[async_trait]
impl SummaryRepository for HttpSummaryRepository {
    async fn fetch_main_dashboard(&self) -> Result<MainDashboard> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to dashboard backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dashboard backend returned {}: {}", status, body);
        }

        response
            .json::<MainDashboard>()
            .await
            .context("Failed to parse dashboard response")
    }
}

// Summary service - Use case for the landing-page aggregate dashboard
use crate::domain::summary::MainDashboard;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SummaryRepository: Send + Sync {
    /// Fetch the precomputed plant-wide counts and rates
    async fn fetch_main_dashboard(&self) -> anyhow::Result<MainDashboard>;
}

/// Fetched once per view load; this is not polled.
#[derive(Clone)]
pub struct SummaryService {
    repository: Arc<dyn SummaryRepository>,
}

impl SummaryService {
    pub fn new(repository: Arc<dyn SummaryRepository>) -> Self {
        Self { repository }
    }

    pub async fn main_dashboard(&self) -> anyhow::Result<MainDashboard> {
        let mut dashboard = self.repository.fetch_main_dashboard().await?;

        if dashboard.check_delay() {
            tracing::warn!(
                "Reported delay {}h differs from per-process rows ({}h)",
                dashboard.total_delay_hours,
                dashboard.computed_delay_hours()
            );
        }

        Ok(dashboard)
    }
}

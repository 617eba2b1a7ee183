// Application state for HTTP handlers
use crate::application::confidence::ConfidenceThreshold;
use crate::application::monitor::MonitorRegistry;
use crate::application::summary_service::SummaryService;

#[derive(Clone)]
pub struct AppState {
    pub monitors: MonitorRegistry,
    pub summary_service: SummaryService,
    pub body_confidence: ConfidenceThreshold,
}

// Route table for the view layer
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_body_confidence, get_monitor, health_check, list_monitors, main_summary, monitor_events,
    refresh_monitor, reset_monitor, set_body_confidence,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/monitors", get(list_monitors))
        .route("/monitors/:name", get(get_monitor))
        .route("/monitors/:name/events", get(monitor_events))
        .route("/monitors/:name/refresh", post(refresh_monitor))
        .route("/monitors/:name/reset", post(reset_monitor))
        .route(
            "/settings/body-confidence",
            get(get_body_confidence).put(set_body_confidence),
        )
        .route("/summary", get(main_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::confidence::ConfidenceThreshold;
    use crate::application::monitor::{Monitor, MonitorRegistry};
    use crate::application::poller::Poller;
    use crate::application::reducers::body_assembly::{BODY_ASSEMBLY_MONITOR, BodyAssemblyReducer};
    use crate::application::reducers::welding_image::WeldingImageReducer;
    use crate::application::snapshot_source::{FetchError, SnapshotSource};
    use crate::application::summary_service::{SummaryRepository, SummaryService};
    use crate::domain::inspection::{BatchInspection, WeldingDetection};
    use crate::domain::summary::MainDashboard;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::time::Duration;

    struct DefectEveryTime;

    #[async_trait]
    impl SnapshotSource<WeldingDetection> for DefectEveryTime {
        async fn fetch(&self) -> Result<WeldingDetection, FetchError> {
            serde_json::from_value(json!({
                "status": "DEFECT",
                "defects": [{ "class": "crack", "confidence": 0.7, "bbox": [] }],
                "original_image_url": "/static/w.jpg"
            }))
            .map_err(|e| FetchError::Decode(e.to_string()))
        }
    }

    /// Reports the threshold it would have sent as the door's source.
    struct EchoConfidence(ConfidenceThreshold);

    #[async_trait]
    impl SnapshotSource<BatchInspection> for EchoConfidence {
        async fn fetch(&self) -> Result<BatchInspection, FetchError> {
            serde_json::from_value(json!({
                "results": { "door": { "pass_fail": "PASS", "source": self.0.get().to_string() } }
            }))
            .map_err(|e| FetchError::Decode(e.to_string()))
        }
    }

    struct NoBackend;

    #[async_trait]
    impl SummaryRepository for NoBackend {
        async fn fetch_main_dashboard(&self) -> anyhow::Result<MainDashboard> {
            anyhow::bail!("connection refused")
        }
    }

    async fn serve() -> String {
        let welding: Arc<dyn Monitor> = Arc::new(Poller::new(
            "welding-image",
            DefectEveryTime,
            WeldingImageReducer::new("http://vision:8000", 50),
            Duration::from_secs(1),
        ));
        let body_confidence = ConfidenceThreshold::new(0.25).unwrap();
        let body: Arc<dyn Monitor> = Arc::new(Poller::new(
            BODY_ASSEMBLY_MONITOR,
            EchoConfidence(body_confidence.clone()),
            BodyAssemblyReducer::new("http://vision:8000", 50),
            Duration::from_secs(1),
        ));
        let state = Arc::new(AppState {
            monitors: MonitorRegistry::new(vec![welding, body]),
            summary_service: SummaryService::new(Arc::new(NoBackend)),
            body_confidence,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_refresh_then_read_then_reset() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let names: Vec<String> = client
            .get(format!("{}/monitors", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(names, vec!["welding-image", "body-assembly"]);

        let refreshed: Value = client
            .post(format!("{}/monitors/welding-image/refresh", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(refreshed["outcome"], "applied");
        assert_eq!(refreshed["state"]["view"]["records"][0]["id"], "IMG-00001");

        let current: Value = client
            .get(format!("{}/monitors/welding-image", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(current["view"]["defective"], 1);
        assert_eq!(current["latest"]["status"], "DEFECT");

        let reset: Value = client
            .post(format!("{}/monitors/welding-image/reset", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reset["view"]["total"], 0);
        assert_eq!(reset["view"]["yield_rate"], 100.0);
        assert_eq!(reset["latest"], Value::Null);
    }

    #[tokio::test]
    async fn test_confidence_change_polls_with_new_value() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let updated: Value = client
            .put(format!("{}/settings/body-confidence", base))
            .json(&json!({ "conf": 0.4 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(updated["conf"], 0.4);

        let current: Value = client
            .get(format!("{}/monitors/body-assembly", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(current["latest"]["results"]["door"]["source"], "0.4");

        let rejected = client
            .put(format!("{}/settings/body-confidence", base))
            .json(&json!({ "conf": 1.5 }))
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(rejected, reqwest::StatusCode::UNPROCESSABLE_ENTITY);

        let setting: Value = client
            .get(format!("{}/settings/body-confidence", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(setting["conf"], 0.4);
    }

    #[tokio::test]
    async fn test_unknown_monitor_is_404() {
        let base = serve().await;
        let status = reqwest::get(format!("{}/monitors/paint", base))
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_backend_failure_is_502() {
        let base = serve().await;
        let status = reqwest::get(format!("{}/summary", base))
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_health() {
        let base = serve().await;
        let body = reqwest::get(format!("{}/healthz", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }
}

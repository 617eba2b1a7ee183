// Welding image reducer - labelled result log with yield rate
use crate::application::reducer::SnapshotReducer;
use crate::application::reducers::public_url;
use crate::domain::history::RollingHistory;
use crate::domain::inspection::{WeldingDefect, WeldingDetection, WeldingStatus};
use crate::domain::projection::{confidence_pct, pass_rate, top_by_score};
use crate::domain::sequence::SequenceCursor;
use serde::Serialize;

const RECORD_PREFIX: &str = "IMG";
// Shown for good welds, which carry no detection to take a confidence from.
const NO_DEFECT_CONFIDENCE_PCT: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgement {
    Good,
    Defective,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeldingRecord {
    pub id: String,
    pub time: String,
    pub judgement: Judgement,
    pub defect_type: String,
    pub confidence_pct: f64,
    pub original_url: Option<String>,
    pub result_url: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestDefect {
    pub class_name: String,
    pub confidence_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeldingView {
    pub total: usize,
    pub good: usize,
    pub defective: usize,
    pub yield_rate: f64,
    pub latest_defect: Option<LatestDefect>,
    pub main_image: Option<String>,
    pub records: Vec<WeldingRecord>,
}

#[derive(Debug, Clone)]
pub struct WeldingImageReducer {
    api_base: String,
    log: RollingHistory<WeldingRecord>,
    cursor: SequenceCursor,
}

/// Most confident defect of a DEFECT verdict; NORMAL verdicts have none.
fn top_defect(detection: &WeldingDetection) -> Option<&WeldingDefect> {
    if detection.status != WeldingStatus::Defect {
        return None;
    }
    top_by_score(detection.defects.iter(), |d| d.confidence)
}

impl WeldingImageReducer {
    pub fn new(api_base: impl Into<String>, log_capacity: usize) -> Self {
        Self {
            api_base: api_base.into(),
            log: RollingHistory::new(log_capacity),
            cursor: SequenceCursor::new(RECORD_PREFIX),
        }
    }

    #[cfg(test)]
    pub fn log(&self) -> &RollingHistory<WeldingRecord> {
        &self.log
    }
}

impl SnapshotReducer for WeldingImageReducer {
    type Snapshot = WeldingDetection;
    type View = WeldingView;

    fn apply(&mut self, snapshot: &WeldingDetection, received_at: &str) {
        let top = top_defect(snapshot);
        let judgement = match snapshot.status {
            WeldingStatus::Defect => Judgement::Defective,
            WeldingStatus::Normal => Judgement::Good,
        };

        let record = WeldingRecord {
            id: self.cursor.next_id(),
            time: received_at.to_string(),
            judgement,
            defect_type: top
                .map(|d| d.class_name.clone())
                .unwrap_or_else(|| "-".to_string()),
            confidence_pct: top
                .map(|d| confidence_pct(d.confidence))
                .unwrap_or(NO_DEFECT_CONFIDENCE_PCT),
            original_url: public_url(&self.api_base, snapshot.original_image_url.as_deref()),
            result_url: public_url(&self.api_base, snapshot.result_image_url.as_deref()),
            source: snapshot.source.clone(),
        };
        self.log.push(record);
    }

    fn reset(&mut self) {
        self.log.clear();
        self.cursor.reset();
    }

    fn project(&self, latest: Option<&WeldingDetection>) -> WeldingView {
        let total = self.log.len();
        let defective = self
            .log
            .iter()
            .filter(|r| r.judgement == Judgement::Defective)
            .count();
        let good = total - defective;

        let latest_defect = latest.and_then(top_defect).map(|d| LatestDefect {
            class_name: d.class_name.clone(),
            confidence_pct: confidence_pct(d.confidence),
        });

        let main_image = latest.and_then(|d| {
            public_url(&self.api_base, d.result_image_url.as_deref())
                .or_else(|| public_url(&self.api_base, d.original_image_url.as_deref()))
        });

        WeldingView {
            total,
            good,
            defective,
            yield_rate: pass_rate(good, total),
            latest_defect,
            main_image,
            records: self.log.iter_newest_first().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    fn defect() -> WeldingDetection {
        serde_json::from_value(json!({
            "status": "DEFECT",
            "defects": [
                { "class": "crack", "confidence": 0.61, "bbox": [] },
                { "class": "porosity", "confidence": 0.88, "bbox": [] },
                { "class": "spatter", "confidence": 0.88, "bbox": [] }
            ],
            "original_image_url": "/static/welding/1.jpg",
            "result_image_url": "/static/welding/1_result.jpg",
            "source": "1.jpg"
        }))
        .unwrap()
    }

    fn normal() -> WeldingDetection {
        serde_json::from_value(json!({
            "status": "NORMAL",
            "defects": [],
            "original_image_url": "/static/welding/2.jpg",
            "result_image_url": null
        }))
        .unwrap()
    }

    #[test]
    fn test_records_get_sequential_ids() {
        let mut reducer = WeldingImageReducer::new(BASE, 50);
        reducer.apply(&defect(), "11:00:00");
        reducer.apply(&normal(), "11:00:05");
        reducer.apply(&normal(), "11:00:10");

        let ids: Vec<&str> = reducer.log().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["IMG-00001", "IMG-00002", "IMG-00003"]);

        reducer.reset();
        reducer.apply(&normal(), "11:00:15");
        assert_eq!(reducer.log().latest().unwrap().id, "IMG-00001");
        assert_eq!(reducer.log().len(), 1);
    }

    #[test]
    fn test_defect_record_uses_first_top_defect() {
        let mut reducer = WeldingImageReducer::new(BASE, 50);
        reducer.apply(&defect(), "11:00:00");

        let record = reducer.log().latest().unwrap();
        assert_eq!(record.judgement, Judgement::Defective);
        assert_eq!(record.defect_type, "porosity");
        assert_eq!(record.confidence_pct, 88.0);
        assert_eq!(
            record.result_url.as_deref(),
            Some("http://localhost:8000/static/welding/1_result.jpg")
        );
    }

    #[test]
    fn test_good_record_defaults() {
        let mut reducer = WeldingImageReducer::new(BASE, 50);
        reducer.apply(&normal(), "11:00:00");

        let record = reducer.log().latest().unwrap();
        assert_eq!(record.judgement, Judgement::Good);
        assert_eq!(record.defect_type, "-");
        assert_eq!(record.confidence_pct, 99.0);
        assert_eq!(record.result_url, None);
    }

    #[test]
    fn test_projection_counts_and_rate() {
        let mut reducer = WeldingImageReducer::new(BASE, 50);
        let empty = reducer.project(None);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.yield_rate, 100.0);
        assert_eq!(empty.main_image, None);

        reducer.apply(&defect(), "11:00:00");
        reducer.apply(&normal(), "11:00:05");
        reducer.apply(&normal(), "11:00:10");
        reducer.apply(&normal(), "11:00:15");
        let latest = normal();

        let view = reducer.project(Some(&latest));
        assert_eq!((view.total, view.good, view.defective), (4, 3, 1));
        assert_eq!(view.yield_rate, 75.0);
        assert_eq!(view.latest_defect, None);
        assert_eq!(view.records[0].id, "IMG-00004");
        assert_eq!(
            view.main_image.as_deref(),
            Some("http://localhost:8000/static/welding/2.jpg")
        );
    }

    #[test]
    fn test_latest_defect_projection() {
        let mut reducer = WeldingImageReducer::new(BASE, 50);
        let latest = defect();
        reducer.apply(&latest, "11:00:00");

        let view = reducer.project(Some(&latest));
        let top = view.latest_defect.unwrap();
        assert_eq!(top.class_name, "porosity");
        assert_eq!(top.confidence_pct, 88.0);
        assert_eq!(
            view.main_image.as_deref(),
            Some("http://localhost:8000/static/welding/1_result.jpg")
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let mut reducer = WeldingImageReducer::new(BASE, 2);
        for _ in 0..3 {
            reducer.apply(&normal(), "11:00:00");
        }
        let view = reducer.project(None);
        assert_eq!(view.total, 2);
        let ids: Vec<&str> = view.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["IMG-00003", "IMG-00002"]);
    }
}

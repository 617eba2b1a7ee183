// Inspection payloads returned by the plant's prediction endpoints
use super::numeric::{
    lenient_f64, lenient_f64_seq, lenient_flag, lenient_i64, lenient_u64, number_or_zero,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Defect classes reported by the press image classifier.
pub const PRESS_DEFECT_TYPES: [&str; 6] = [
    "Scratches",
    "Pitted Surface",
    "Rolled-in Scale",
    "Inclusion",
    "Crazing",
    "Patches",
];

/// Position of the model service's sample feeder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceInfo {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub index_next: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
}

// Press: image classification

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectClassification {
    #[serde(default)]
    pub predicted_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default)]
    pub all_scores: BTreeMap<String, Value>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sequence: Option<SequenceInfo>,
}

impl DefectClassification {
    pub fn score(&self, category: &str) -> f64 {
        number_or_zero(self.all_scores.get(category))
    }
}

// Press: vibration anomaly detection

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationReading {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reconstruction_error: f64,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_anomaly: bool,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub threshold: f64,
    #[serde(default)]
    pub sensor_values: BTreeMap<String, Value>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl VibrationReading {
    pub fn sensor(&self, channel: &str) -> f64 {
        number_or_zero(self.sensor_values.get(channel))
    }
}

// Body assembly: batch PASS/FAIL per part

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKey {
    Door,
    Bumper,
    Headlamp,
    Taillamp,
    Radiator,
}

impl PartKey {
    pub const ALL: [PartKey; 5] = [
        PartKey::Door,
        PartKey::Bumper,
        PartKey::Headlamp,
        PartKey::Taillamp,
        PartKey::Radiator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartKey::Door => "door",
            PartKey::Bumper => "bumper",
            PartKey::Headlamp => "headlamp",
            PartKey::Taillamp => "taillamp",
            PartKey::Radiator => "radiator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartKey::Door => "Door",
            PartKey::Bumper => "Bumper",
            PartKey::Headlamp => "Headlamp",
            PartKey::Taillamp => "Tail lamp",
            PartKey::Radiator => "Radiator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PassFail {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub cls: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub conf: f64,
    #[serde(default, deserialize_with = "lenient_f64_seq")]
    pub bbox: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartResult {
    #[serde(default)]
    pub pass_fail: Option<PassFail>,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub original_image_url: Option<String>,
    #[serde(default)]
    pub result_image_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sequence: Option<SequenceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInspection {
    #[serde(default)]
    pub results: BTreeMap<String, Option<PartResult>>,
}

impl BatchInspection {
    pub fn part(&self, key: PartKey) -> Option<&PartResult> {
        self.results.get(key.as_str()).and_then(Option::as_ref)
    }
}

// Welding: defect detection

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeldingStatus {
    Normal,
    Defect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeldingDefect {
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_f64_seq")]
    pub bbox: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeldingDetection {
    pub status: WeldingStatus,
    #[serde(default)]
    pub defects: Vec<WeldingDefect>,
    #[serde(default)]
    pub original_image_url: Option<String>,
    #[serde(default)]
    pub result_image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sequence: Option<SequenceInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_classification_defaults_to_zero() {
        let data: DefectClassification = serde_json::from_value(json!({
            "predicted_class": "Crazing",
            "all_scores": { "Crazing": 0.8, "Patches": "n/a" }
        }))
        .unwrap();

        assert_eq!(data.confidence, 0.0);
        assert_eq!(data.score("Crazing"), 0.8);
        assert_eq!(data.score("Patches"), 0.0);
        assert_eq!(data.score("Inclusion"), 0.0);
    }

    #[test]
    fn test_vibration_reading_with_numeric_flag() {
        let data: VibrationReading = serde_json::from_value(json!({
            "reconstruction_error": 0.031,
            "is_anomaly": 1,
            "threshold": 0.02,
            "sensor_values": { "sensor_0": 0.5, "sensor_2": null }
        }))
        .unwrap();

        assert!(data.is_anomaly);
        assert_eq!(data.sensor("sensor_0"), 0.5);
        assert_eq!(data.sensor("sensor_1"), 0.0);
        assert_eq!(data.sensor("sensor_2"), 0.0);
    }

    #[test]
    fn test_batch_inspection_tolerates_null_parts() {
        let data: BatchInspection = serde_json::from_value(json!({
            "results": {
                "door": { "part": "door", "pass_fail": "FAIL", "detections": [
                    { "cls": 0, "name": "dent", "conf": 0.91, "bbox": [1.0, 2.0, 3.0, 4.0] }
                ]},
                "bumper": null,
                "radiator": { "error": "model not loaded" }
            }
        }))
        .unwrap();

        let door = data.part(PartKey::Door).unwrap();
        assert_eq!(door.pass_fail, Some(PassFail::Fail));
        assert_eq!(door.detections.len(), 1);
        assert!(data.part(PartKey::Bumper).is_none());
        assert!(data.part(PartKey::Headlamp).is_none());
        assert_eq!(
            data.part(PartKey::Radiator).and_then(|r| r.error.as_deref()),
            Some("model not loaded")
        );
    }

    #[test]
    fn test_batch_inspection_tolerates_mistyped_numbers() {
        let data: BatchInspection = serde_json::from_value(json!({
            "results": {
                "door": {
                    "pass_fail": "FAIL",
                    "detections": [
                        { "cls": 1.0, "name": "dent", "conf": "high", "bbox": [1, null, 3, 4] },
                        { "cls": null, "name": "scratch", "conf": 0.4, "bbox": null }
                    ],
                    "sequence": { "index_next": "12", "count": 40 }
                }
            }
        }))
        .unwrap();

        let door = data.part(PartKey::Door).unwrap();
        assert_eq!(door.detections[0].cls, 1);
        assert_eq!(door.detections[0].conf, 0.0);
        assert_eq!(door.detections[0].bbox, vec![1.0, 0.0, 3.0, 4.0]);
        assert_eq!(door.detections[1].cls, 0);
        assert!(door.detections[1].bbox.is_empty());

        let sequence = door.sequence.as_ref().unwrap();
        assert_eq!(sequence.index_next, 0);
        assert_eq!(sequence.count, 40);
    }

    #[test]
    fn test_welding_detection_tolerates_mistyped_numbers() {
        let data: WeldingDetection = serde_json::from_value(json!({
            "status": "DEFECT",
            "defects": [{ "class": "crack", "confidence": null, "bbox": [0, "1", 2, 3] }],
            "sequence": { "index_next": "3" }
        }))
        .unwrap();

        assert_eq!(data.defects[0].confidence, 0.0);
        assert_eq!(data.defects[0].bbox, vec![0.0, 0.0, 2.0, 3.0]);
        assert_eq!(data.sequence.map(|s| (s.index_next, s.count)), Some((0, 0)));
    }

    #[test]
    fn test_welding_detection() {
        let data: WeldingDetection = serde_json::from_value(json!({
            "status": "DEFECT",
            "defects": [{ "class": "porosity", "confidence": 0.72, "bbox": [0, 0, 10, 10] }],
            "original_image_url": "/static/a.jpg",
            "result_image_url": null
        }))
        .unwrap();

        assert_eq!(data.status, WeldingStatus::Defect);
        assert_eq!(data.defects[0].class_name, "porosity");
        assert!(data.result_image_url.is_none());
    }
}

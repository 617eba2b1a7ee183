// Main dashboard aggregate domain model
use super::numeric::{lenient_f64, lenient_i64};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainDashboard {
    #[serde(default)]
    pub anomaly_data: Vec<ProcessIssues>,
    #[serde(default)]
    pub warning_data: Vec<ProcessIssues>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_anomalies: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_warnings: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_delay_hours: f64,
    #[serde(default)]
    pub original_deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub overall_efficiency: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub production_efficiency: f64,
    #[serde(default)]
    pub history_data: Vec<DelayHistory>,
    #[serde(default)]
    pub process_stats: Vec<ProcessStat>,
    /// Set when `total_delay_hours` disagrees with the per-process rows
    #[serde(skip_deserializing)]
    pub delay_mismatch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessIssues {
    pub process: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub count: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_delay_per_issue: f64,
}

// The backend emits Korean keys for the chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayHistory {
    #[serde(rename = "날짜")]
    pub date: String,
    #[serde(rename = "지연시간", default, deserialize_with = "lenient_f64")]
    pub delay_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStat {
    pub name: String,
    #[serde(rename = "정상", default, deserialize_with = "lenient_i64")]
    pub normal: i64,
    #[serde(rename = "경고", default, deserialize_with = "lenient_i64")]
    pub warning: i64,
    #[serde(rename = "이상", default, deserialize_with = "lenient_i64")]
    pub anomaly: i64,
}

/// Rounding slack allowed between reported and computed delay hours.
pub const DELAY_TOLERANCE_HOURS: f64 = 0.05;

impl MainDashboard {
    /// Delay hours implied by the per-process issue rows.
    pub fn computed_delay_hours(&self) -> f64 {
        self.anomaly_data
            .iter()
            .chain(self.warning_data.iter())
            .map(|row| row.count as f64 * row.avg_delay_per_issue)
            .sum()
    }

    pub fn check_delay(&mut self) -> bool {
        let computed = self.computed_delay_hours();
        self.delay_mismatch = (computed - self.total_delay_hours).abs() > DELAY_TOLERANCE_HOURS;
        self.delay_mismatch
    }
}

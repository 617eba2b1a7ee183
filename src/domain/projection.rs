// View projection helpers - pure derivations shared by every dashboard
use serde::Serialize;

/// Pass rate in percent. An empty run counts as a clean run (100%).
pub fn pass_rate(passes: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    passes as f64 / total as f64 * 100.0
}

/// Model confidence (0..1) as a percentage with one decimal, clamped to 0..=100.
pub fn confidence_pct(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    ((confidence * 1000.0).round() / 10.0).clamp(0.0, 100.0)
}

/// Stable arg-max: on equal scores the first item wins. NaN never wins.
pub fn top_by_score<T, F>(items: impl IntoIterator<Item = T>, score: F) -> Option<T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let s = score(&item);
        let s = if s.is_nan() { f64::NEG_INFINITY } else { s };
        match &best {
            Some((_, current)) if s <= *current => {}
            _ => best = Some((item, s)),
        }
    }
    best.map(|(item, _)| item)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InspectionTally {
    pub total: usize,
    pub passes: usize,
    pub fails: usize,
    pub pass_rate: f64,
}

impl InspectionTally {
    pub fn new(passes: usize, fails: usize) -> Self {
        let total = passes + fails;
        Self {
            total,
            passes,
            fails,
            pass_rate: pass_rate(passes, total),
        }
    }
}

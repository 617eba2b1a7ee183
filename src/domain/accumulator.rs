// Accumulated distribution - running per-category sums across snapshots
use super::projection::{CategoryValue, top_by_score};

/// Running sum per category over a fixed, ordered category set.
///
/// The key set is fixed at construction. Sums only grow between resets:
/// missing, negative, or non-finite contributions add nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedDistribution {
    entries: Vec<(String, f64)>,
}

impl AccumulatedDistribution {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, f64)> = Vec::new();
        for category in categories {
            let category = category.into();
            if !entries.iter().any(|(name, _)| *name == category) {
                entries.push((category, 0.0));
            }
        }
        Self { entries }
    }

    /// Adds `lookup(category)` to every category's running sum.
    pub fn accumulate<F>(&mut self, mut lookup: F)
    where
        F: FnMut(&str) -> f64,
    {
        for (name, sum) in &mut self.entries {
            let add = lookup(name);
            if add.is_finite() && add > 0.0 {
                *sum += add;
            }
        }
    }

    pub fn reset(&mut self) {
        for (_, sum) in &mut self.entries {
            *sum = 0.0;
        }
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, sum)| *sum)
    }

    #[cfg(test)]
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn entries(&self) -> Vec<CategoryValue> {
        self.entries
            .iter()
            .map(|(name, sum)| CategoryValue {
                name: name.clone(),
                value: *sum,
            })
            .collect()
    }

    /// Category with the largest sum, `None` while everything is still zero.
    pub fn top(&self) -> Option<&str> {
        top_by_score(self.entries.iter(), |(_, sum)| *sum)
            .filter(|(_, sum)| *sum > 0.0)
            .map(|(name, _)| name.as_str())
    }
}

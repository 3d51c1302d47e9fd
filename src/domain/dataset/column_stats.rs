// ============================================================
// COLUMN STATISTICS
// ============================================================
// Median and quantile helpers used by imputation and binning

use serde::{Deserialize, Serialize};

/// Median of the values, `None` when there are none.
/// Even counts average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Quantile `q` of already sorted values, linear interpolation between
/// order statistics: h = (n - 1) * q.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let fraction = h - lower as f64;

    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Equal-frequency bins over an observed distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileBins {
    /// Strictly increasing bin edges
    pub edges: Vec<f64>,

    /// One label per bin, lowest bin first
    pub labels: Vec<String>,
}

impl QuantileBins {
    /// Build bins from the observed values using one quantile cut per label.
    ///
    /// Duplicate edges are collapsed, so fewer distinct values give fewer
    /// bins; the lowest labels are kept. Returns `None` for no values.
    pub fn from_values(values: &[f64], labels: &[String]) -> Option<Self> {
        if values.is_empty() || labels.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let bin_count = labels.len();
        let mut edges: Vec<f64> = Vec::with_capacity(bin_count + 1);
        for step in 0..=bin_count {
            let q = step as f64 / bin_count as f64;
            let edge = quantile_sorted(&sorted, q)?;
            if edges.last().map_or(true, |last| edge > *last) {
                edges.push(edge);
            }
        }

        let used = edges.len().saturating_sub(1).max(1);
        Some(Self {
            edges,
            labels: labels[..used].to_vec(),
        })
    }

    /// Label for a value. Bins are right-closed and the first bin also
    /// includes the lowest edge; values outside the edges get no label.
    pub fn label_for(&self, value: f64) -> Option<&str> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if value.is_nan() || value < first || value > last {
            return None;
        }

        if self.edges.len() == 1 {
            return self.labels.first().map(String::as_str);
        }

        let bin = self
            .edges
            .windows(2)
            .position(|pair| value <= pair[1])?;
        self.labels.get(bin).map(String::as_str)
    }

    /// Human-readable edge list for logs
    pub fn summary(&self) -> String {
        self.edges
            .iter()
            .map(|e| format!("{:.2}", e))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Young Adult", "Adult", "Middle-aged", "Senior"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [18.0, 30.0, 45.0, 70.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(18.0));
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(27.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(37.5));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(70.0));
    }

    #[test]
    fn test_bins_assign_boundaries_right_closed() {
        let ages = [20.0, 30.0, 40.0, 50.0, 60.0];
        let bins = QuantileBins::from_values(&ages, &labels()).unwrap();

        assert_eq!(bins.edges, vec![20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(bins.label_for(20.0), Some("Young Adult"));
        assert_eq!(bins.label_for(30.0), Some("Young Adult"));
        assert_eq!(bins.label_for(31.0), Some("Adult"));
        assert_eq!(bins.label_for(50.0), Some("Middle-aged"));
        assert_eq!(bins.label_for(60.0), Some("Senior"));
        assert_eq!(bins.label_for(61.0), None);
    }

    #[test]
    fn test_bins_collapse_duplicate_edges() {
        let ages = [30.0, 30.0, 30.0, 30.0, 50.0];
        let bins = QuantileBins::from_values(&ages, &labels()).unwrap();

        assert_eq!(bins.edges, vec![30.0, 50.0]);
        assert_eq!(bins.labels, vec!["Young Adult".to_string()]);
        assert_eq!(bins.label_for(30.0), Some("Young Adult"));
        assert_eq!(bins.label_for(50.0), Some("Young Adult"));
    }

    #[test]
    fn test_single_distinct_value_gets_first_label() {
        let bins = QuantileBins::from_values(&[42.0, 42.0], &labels()).unwrap();
        assert_eq!(bins.edges, vec![42.0]);
        assert_eq!(bins.label_for(42.0), Some("Young Adult"));
    }
}

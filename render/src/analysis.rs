//! View math for the silver price panel. The statistics themselves come
//! from the backend.

use crate::models::{HistogramData, SilverAnalysis};

impl SilverAnalysis {
    pub fn today_change_text(&self) -> String {
        format!("{:.2}%", self.today_change * 100.0)
    }

    pub fn percentile_text(&self) -> String {
        format!("{:.2}", self.percentile)
    }

    pub fn summary(&self) -> [String; 2] {
        [
            format!("Today's change: {}", self.today_change_text()),
            format!(
                "This change is greater than {}% of historical daily changes.",
                self.percentile_text()
            ),
        ]
    }

    pub fn chart(&self) -> HistogramChart {
        HistogramChart::from(&self.histogram_data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBar {
    /// Lower edge of the bin, four decimals.
    pub label: String,
    pub count: u64,
    /// `count / max_count`, in `[0, 1]`.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub bars: Vec<HistogramBar>,
    pub max_count: u64,
    /// Position of today's change along the edge range, in `[0, 1]`.
    pub marker: Option<f64>,
}

impl From<&HistogramData> for HistogramChart {
    fn from(data: &HistogramData) -> Self {
        let len = data.counts.len().min(data.bin_edges.len().saturating_sub(1));
        let max_count = data.counts[..len].iter().copied().max().unwrap_or(0);

        let bars = data.bin_edges[..len]
            .iter()
            .zip(&data.counts[..len])
            .map(|(edge, &count)| HistogramBar {
                label: format!("{edge:.4}"),
                count,
                height: if max_count == 0 { 0.0 } else { count as f64 / max_count as f64 },
            })
            .collect();

        Self { bars, max_count, marker: marker_position(&data.bin_edges, data.today_change) }
    }
}

fn marker_position(edges: &[f64], value: f64) -> Option<f64> {
    let (lo, hi) = (*edges.first()?, *edges.last()?);
    if !(lo.is_finite() && hi.is_finite() && hi > lo && value.is_finite()) {
        return None;
    }
    let ratio = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    ratio.is_finite().then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data(edges: &[f64], counts: &[u64], today: f64) -> HistogramData {
        HistogramData { bin_edges: edges.to_vec(), counts: counts.to_vec(), today_change: today }
    }

    #[test]
    fn bars_are_labelled_by_lower_edge() {
        let chart = HistogramChart::from(&data(&[-2.0, 0.0, 2.0], &[5, 10], 1.0));
        assert_eq!(
            chart.bars,
            vec![
                HistogramBar { label: "-2.0000".into(), count: 5, height: 0.5 },
                HistogramBar { label: "0.0000".into(), count: 10, height: 1.0 },
            ]
        );
        assert_eq!(chart.max_count, 10);
        assert_eq!(chart.marker, Some(0.75));
    }

    #[test]
    fn marker_is_clamped() {
        let chart = HistogramChart::from(&data(&[0.0, 1.0], &[1], 3.0));
        assert_eq!(chart.marker, Some(1.0));
    }

    #[test]
    fn degenerate_edges_have_no_marker_or_bars() {
        let chart = HistogramChart::from(&data(&[0.5], &[3, 4], 0.5));
        assert!(chart.bars.is_empty());
        assert_eq!(chart.marker, None);
    }

    #[test]
    fn mismatched_lengths_use_shorter() {
        let chart = HistogramChart::from(&data(&[0.0, 1.0, 2.0, 3.0], &[0, 0], 1.0));
        assert_eq!(chart.bars.len(), 2);
        assert!(chart.bars.iter().all(|b| b.height == 0.0));
    }

    #[test]
    fn summary_text() {
        let analysis = SilverAnalysis {
            today_change: 0.01234,
            percentile: 87.456,
            histogram_data: data(&[], &[], 0.0),
        };
        assert_eq!(
            analysis.summary(),
            [
                "Today's change: 1.23%".to_string(),
                "This change is greater than 87.46% of historical daily changes.".to_string(),
            ]
        );
    }
}

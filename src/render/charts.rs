//! Chart Data
//!
//! Extracts what the two analytics charts draw from cached state. The
//! drawing itself belongs to the host (canvas in the browser, text in the
//! terminal).

use serde::Serialize;
use std::f64::consts::PI;

use crate::api::dto::Summary;

/// Segment and bar colors
pub const PALETTE: [&str; 6] = [
    "#36A2EB", // Blue
    "#FF6384", // Red
    "#FFCE56", // Yellow
    "#4BC0C0", // Teal
    "#9966FF", // Purple
    "#FF9F40", // Orange
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    pub label: String,
    pub value: u64,
    pub color: &'static str,
}

/// File type distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: &'static str,
    pub segments: Vec<PieSegment>,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    /// Share of segment `idx` in `[0, 1]`; zero when the chart is empty
    pub fn fraction(&self, idx: usize) -> f64 {
        let total = self.total();
        match self.segments.get(idx) {
            Some(segment) if total > 0 => segment.value as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Start and end angle of each segment in radians, clockwise from 12 o'clock
    pub fn arcs(&self) -> Vec<(f64, f64)> {
        let mut start = -PI / 2.0;
        (0..self.segments.len())
            .map(|idx| {
                let end = start + self.fraction(idx) * 2.0 * PI;
                let arc = (start, end);
                start = end;
                arc
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

/// Horizontal bar chart of policies per cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub series_label: &'static str,
    pub color: &'static str,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Longest bar; the value axis starts at zero
    pub fn max(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

/// One segment per file type, in the order the server sent them
pub fn file_type_pie_chart(summary: &Summary) -> PieChart {
    let segments = summary
        .file_types
        .iter()
        .enumerate()
        .map(|(idx, (label, value))| PieSegment {
            label: label.to_string(),
            value,
            color: PALETTE[idx % PALETTE.len()],
        })
        .collect();

    PieChart {
        title: "File Type Distribution",
        segments,
    }
}

/// One bar per cluster, labelled `Cluster 1..n`, valued by cluster size
pub fn cluster_bar_chart(clusters: &[Vec<String>]) -> BarChart {
    let bars = clusters
        .iter()
        .enumerate()
        .map(|(idx, cluster)| Bar {
            label: format!("Cluster {}", idx + 1),
            value: cluster.len() as u64,
        })
        .collect();

    BarChart {
        title: "Policy Cluster Sizes",
        series_label: "Policies",
        color: PALETTE[0],
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::FileTypeCounts;

    fn summary(types: &[(&str, u64)]) -> Summary {
        Summary {
            total_files: types.iter().map(|(_, v)| v).sum(),
            total_policies: 0,
            file_types: types.iter().map(|(k, v)| (*k, *v)).collect::<FileTypeCounts>(),
        }
    }

    #[test]
    fn test_pie_segments_follow_key_order() {
        let chart = file_type_pie_chart(&summary(&[("pdf", 3), ("docx", 2)]));

        assert_eq!(chart.segments.len(), 2);
        assert_eq!(chart.segments[0].label, "pdf");
        assert_eq!(chart.segments[0].value, 3);
        assert_eq!(chart.segments[1].label, "docx");
        assert_eq!(chart.segments[1].value, 2);
        assert_eq!(chart.total(), 5);
        assert!((chart.fraction(0) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_pie_from_json_summary() {
        let summary: Summary =
            serde_json::from_str(r#"{"file_types": {"pdf": 3, "docx": 2}}"#).unwrap();
        let values: Vec<_> = file_type_pie_chart(&summary)
            .segments
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![3, 2]);
    }

    #[test]
    fn test_pie_colors_cycle() {
        let types: Vec<(String, u64)> = (0..8).map(|i| (format!("t{}", i), 1)).collect();
        let summary = Summary {
            file_types: FileTypeCounts(types),
            ..Summary::default()
        };
        let chart = file_type_pie_chart(&summary);
        assert_eq!(chart.segments[6].color, PALETTE[0]);
        assert_eq!(chart.segments[7].color, PALETTE[1]);
    }

    #[test]
    fn test_pie_arcs_cover_circle() {
        let chart = file_type_pie_chart(&summary(&[("a", 1), ("b", 1), ("c", 2)]));
        let arcs = chart.arcs();
        assert_eq!(arcs.len(), 3);
        assert!((arcs[0].0 + PI / 2.0).abs() < 1e-9);
        assert!((arcs[2].1 - arcs[0].0 - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pie() {
        let chart = file_type_pie_chart(&Summary::default());
        assert!(chart.segments.is_empty());
        assert_eq!(chart.fraction(0), 0.0);
    }

    #[test]
    fn test_cluster_bars() {
        let clusters = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ];
        let chart = cluster_bar_chart(&clusters);

        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].value, 2);
        assert_eq!(chart.bars[1].value, 1);
        assert_eq!(chart.bars[0].label, "Cluster 1");
        assert_eq!(chart.bars[1].label, "Cluster 2");
        assert_eq!(chart.max(), 2);
    }
}

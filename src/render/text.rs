//! Text Rendering
//!
//! Plain-text views of the dashboard for terminals and logs.

use std::fmt::Write;

use super::charts::{BarChart, PieChart};
use super::links::StorageLinks;
use crate::api::dto::Comment;
use crate::state::ViewState;

const BLOCK: char = '█';

/// Backend timestamps are naive ISO-8601; fall back to the raw text
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

/// Cut `s` to at most `max` characters, marking the cut with `...`
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Files table with each file's policies and any enrichment results
pub fn files_table(state: &ViewState, links: &StorageLinks) -> String {
    let mut out = String::new();

    if state.files.is_empty() {
        out.push_str("No files uploaded yet.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<6} {:<28} {:<44} {}",
        "ID", "Filename", "File", "Summary"
    );
    let _ = writeln!(out, "{}", "-".repeat(110));

    for file in &state.files {
        let link = links
            .file_link(file)
            .unwrap_or_else(|| "N/A".to_string());
        let summary = file.summary.as_deref().unwrap_or("");

        let _ = writeln!(
            out,
            "{:<6} {:<28} {:<44} {}",
            file.id,
            truncate(&file.filename, 28),
            truncate(&link, 44),
            truncate(summary, 60)
        );

        for policy in &file.policies {
            let _ = writeln!(out, "       - {}", policy);
            if let Some(results) = state.enrichment_for(policy) {
                for r in results {
                    let _ = writeln!(out, "           > {} <{}>: {}", r.name, r.url, r.snippet);
                }
            }
        }

        let comments = state.comments_for(file.id);
        if !comments.is_empty() {
            let _ = writeln!(out, "       Comments:");
            for line in comments_text(comments).lines() {
                let _ = writeln!(out, "         {}", line);
            }
        }
    }

    out
}

/// Totals, anomalies and cluster membership
pub fn analytics_text(state: &ViewState) -> String {
    let mut out = String::new();

    if let Some(summary) = &state.summary {
        let _ = writeln!(out, "Total Files: {}", summary.total_files);
        let _ = writeln!(out, "Total Policies: {}", summary.total_policies);
        let types = summary
            .file_types
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "File Types: {}", types);
    }

    let anomalies = state
        .anomalies
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Anomalous File IDs: {}", anomalies);

    let _ = writeln!(out, "Policy Clusters:");
    for (idx, cluster) in state.policy_clusters.iter().enumerate() {
        let _ = writeln!(out, "  {}.", idx + 1);
        for policy in cluster {
            let _ = writeln!(out, "     - {}", policy);
        }
    }

    out
}

/// Pie chart as one proportional bar per segment
pub fn pie_chart_text(chart: &PieChart, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);

    if chart.segments.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = chart.segments.iter().map(|s| s.label.len()).max().unwrap_or(0);
    for (idx, segment) in chart.segments.iter().enumerate() {
        let fraction = chart.fraction(idx);
        let filled = (fraction * width as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<lw$} {:<w$} {} ({:.1}%)",
            segment.label,
            BLOCK.to_string().repeat(filled),
            segment.value,
            fraction * 100.0,
            lw = label_width,
            w = width
        );
    }

    out
}

/// Horizontal bars scaled to the largest value
pub fn bar_chart_text(chart: &BarChart, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);

    if chart.bars.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let max = chart.max().max(1);
    let label_width = chart.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    for bar in &chart.bars {
        let filled = ((bar.value as f64 / max as f64) * width as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<lw$} | {} {}",
            bar.label,
            BLOCK.to_string().repeat(filled),
            bar.value,
            lw = label_width
        );
    }

    out
}

/// One line per comment, plus the referenced policy when present
pub fn comments_text(comments: &[Comment]) -> String {
    let mut out = String::new();

    if comments.is_empty() {
        out.push_str("No comments.\n");
        return out;
    }

    for c in comments {
        let when = c
            .timestamp
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default();
        let _ = writeln!(out, "{} ({}): {}", c.user, when, c.content);
        if let Some(policy) = c.policy_text.as_deref().filter(|p| !p.is_empty()) {
            let _ = writeln!(out, "  Policy: {}", policy);
        }
    }

    out
}

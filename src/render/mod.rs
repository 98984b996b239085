//! Rendering
//!
//! Toolkit-independent pieces of the dashboard's presentation: storage link
//! rewriting, chart data extraction and plain-text views.

pub mod charts;
pub mod links;
pub mod text;

pub use charts::{cluster_bar_chart, file_type_pie_chart, Bar, BarChart, PieChart, PieSegment, PALETTE};
pub use links::{display_url, StorageLinks};

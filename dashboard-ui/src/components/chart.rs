//! Chart Components
//!
//! File type pie and policy cluster bars drawn on HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use policy_dashboard::{cluster_bar_chart, file_type_pie_chart, BarChart, PieChart};

use crate::state::use_dashboard;

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400
const EMPTY: &str = "#6b7280"; // gray-500

/// Pie of the summary's file type counts
#[component]
pub fn FileTypePie() -> impl IntoView {
    let state = use_dashboard();
    let canvas_ref = create_node_ref::<html::Canvas>();
    let chart = create_memo(move |_| {
        state
            .view
            .with(|s| s.summary.as_ref().map(file_type_pie_chart))
    });

    create_effect(move |_| {
        let chart = chart.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_pie(&canvas, chart.as_ref());
        }
    });

    view! {
        <div class="relative">
            <canvas node_ref=canvas_ref width="400" height="300" class="w-full rounded-lg" />
            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {move || {
                    chart.get()
                        .map(|c| c.segments)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|segment| view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", segment.color)
                                />
                                <span class="text-sm text-gray-300">
                                    {format!("{} ({})", segment.label, segment.value)}
                                </span>
                            </div>
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
        </div>
    }
}

/// Horizontal bars of policies per cluster
#[component]
pub fn ClusterBars() -> impl IntoView {
    let state = use_dashboard();
    let canvas_ref = create_node_ref::<html::Canvas>();
    let chart = create_memo(move |_| state.view.with(|s| cluster_bar_chart(&s.policy_clusters)));

    create_effect(move |_| {
        let chart = chart.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &chart);
        }
    });

    view! {
        <canvas node_ref=canvas_ref width="500" height="300" class="w-full rounded-lg" />
    }
}

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn draw_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&EMPTY.into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text("No data", width / 2.0 - 28.0, height / 2.0);
}

fn draw_pie(canvas: &HtmlCanvasElement, chart: Option<&PieChart>) {
    let Some(ctx) = context(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    let chart = match chart {
        Some(chart) if chart.total() > 0 => chart,
        _ => return draw_empty(&ctx, width, height),
    };

    let cx = width / 2.0;
    let cy = height / 2.0;
    let radius = cx.min(cy) - 10.0;

    for (segment, (start, end)) in chart.segments.iter().zip(chart.arcs()) {
        ctx.set_fill_style(&segment.color.into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
    }
}

fn draw_bars(canvas: &HtmlCanvasElement, chart: &BarChart) {
    let Some(ctx) = context(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if chart.bars.is_empty() {
        return draw_empty(&ctx, width, height);
    }

    // Margins
    let margin_left = 90.0;
    let margin_right = 20.0;
    let margin_top = 30.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let max = chart.max().max(1) as f64;

    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    let _ = ctx.fill_text(chart.series_label, margin_left, 18.0);

    // Vertical grid lines (5 lines), value axis from zero
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    for i in 0..=5 {
        let x = margin_left + (i as f64 / 5.0) * chart_width;
        ctx.begin_path();
        ctx.move_to(x, margin_top);
        ctx.line_to(x, height - margin_bottom);
        ctx.stroke();

        let value = (i as f64 / 5.0) * max;
        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&format!("{:.0}", value), x - 4.0, height - 10.0);
    }

    let slot = chart_height / chart.bars.len() as f64;
    let bar_height = (slot * 0.7).max(1.0);

    for (idx, bar) in chart.bars.iter().enumerate() {
        let y = margin_top + idx as f64 * slot + (slot - bar_height) / 2.0;
        let bar_width = (bar.value as f64 / max) * chart_width;

        ctx.set_fill_style(&chart.color.into());
        ctx.fill_rect(margin_left, y, bar_width, bar_height);

        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&bar.label, 8.0, y + bar_height / 2.0 + 4.0);
    }
}

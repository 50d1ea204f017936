use chatbot_render::analysis::HistogramChart;
use leptos::prelude::*;

use crate::state::AppState;

const CHART_WIDTH: f64 = 100.0;
const CHART_HEIGHT: f64 = 60.0;

/// Silver price summary and histogram, shown once an analysis has loaded.
#[component]
pub fn SilverAnalysisPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    move || {
        state.analysis.get().map(|analysis| {
            let [change, percentile] = analysis.summary();
            let chart = analysis.chart();
            view! {
                <section class="analysis-container">
                    <h2>"Silver Price Analysis"</h2>
                    <p>{change}</p>
                    <p>{percentile}</p>
                    <Histogram chart=chart />
                </section>
            }
        })
    }
}

#[component]
fn Histogram(chart: HistogramChart) -> impl IntoView {
    if chart.bars.is_empty() {
        return view! { <p class="histogram-empty">"No histogram data"</p> }.into_any();
    }

    let slot = CHART_WIDTH / chart.bars.len() as f64;
    let bars = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let height = bar.height * CHART_HEIGHT;
            view! {
                <rect
                    class="histogram-bar"
                    x=format!("{:.3}", i as f64 * slot)
                    y=format!("{:.3}", CHART_HEIGHT - height)
                    width=format!("{:.3}", slot * 0.9)
                    height=format!("{height:.3}")
                    data-label=bar.label.clone()
                    data-count=bar.count.to_string()
                />
            }
        })
        .collect::<Vec<_>>();

    let marker = chart.marker.map(|pos| {
        let x = format!("{:.3}", pos * CHART_WIDTH);
        view! {
            <line
                class="histogram-marker"
                x1=x.clone()
                x2=x
                y1="0"
                y2=CHART_HEIGHT.to_string()
                stroke="red"
                stroke-width="0.5"
            />
        }
    });

    view! {
        <svg class="histogram" viewBox="0 0 100 60" preserveAspectRatio="none">
            {bars}
            {marker}
        </svg>
    }
    .into_any()
}

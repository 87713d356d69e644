//! Top-level widget wiring the table, the controls, the chart and the tooltip

use leptos::prelude::*;
use viz_charts::{ChartEvent, SeriesChart, SeriesChartConfig};
use viz_series::{aggregate, HoverPoint};
use viz_state::use_viz_state;

use crate::selectors::DimensionSelector;
use crate::summary_table::SummaryTable;
use crate::toolbar::Toolbar;
use crate::tooltip_panel::TooltipPanel;

#[component]
pub fn DataViz(
    #[prop(optional, into)] events: Signal<Vec<ChartEvent>>,
    #[prop(optional)] chart_config: Option<SeriesChartConfig>,
) -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;
    let derived = state.derived;
    let catalog = state.catalog.clone();

    let hovered: RwSignal<Option<Vec<HoverPoint>>> = RwSignal::new(None);
    let hover_groups = Memo::new(move |_| {
        let points = hovered.get()?;
        aggregate(&points, &catalog, params.stacked.get())
    });

    let series = Signal::derive(move || derived.with(|d| d.series.clone()));
    let colors = Signal::derive(move || derived.with(|d| d.colors.clone()));

    view! {
        <div class="data-viz">
            <div class="dv-table">
                <SummaryTable />
            </div>

            <div class="dv-controls">
                <Toolbar />
                <DimensionSelector />
            </div>

            <div class="dv-chart">
                <SeriesChart
                    series=series
                    keys=params.keys
                    colors=colors
                    graph_kind=params.graph_kind
                    stacked=params.stacked
                    representation=params.representation
                    granularity=params.granularity
                    events=events
                    on_hover=Callback::new(move |points| hovered.set(points))
                    config=chart_config.unwrap_or_default()
                />
                <TooltipPanel hover=hover_groups />
            </div>
        </div>
    }
}

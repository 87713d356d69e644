//! Application root: state wiring and the fetch/recompute loop

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use viz_components::DataViz;
use viz_core::{FrenchLabeler, Granularity, SeriesDuration, StatsResult};
use viz_state::{provide_viz_state, ViewParams, VizState};

use crate::demo::{demo_catalog, demo_presets};
use crate::fetch::StatsProvider;

#[component]
pub fn App() -> impl IntoView {
    let params = ViewParams::new(
        vec!["revenue".to_string(), "cost".to_string()],
        Granularity::Day,
        SeriesDuration::new(1, Granularity::Month),
    );
    let state = provide_viz_state(VizState::new(
        Arc::new(demo_catalog()),
        Arc::new(FrenchLabeler),
        params,
        demo_presets(),
    ));

    let provider = StatsProvider::default();

    // Re-fetch whenever a request parameter changes.
    {
        let state = state.clone();
        Effect::new(move |_| {
            let request = state.build_request();
            let provider = provider.clone();
            let data = state.data;
            data.set(StatsResult::pending());
            spawn_local(async move {
                data.set(provider.fetch(&request).await);
            });
        });
    }

    // Re-derive whenever the payload or a pipeline parameter changes.
    {
        let state = state.clone();
        Effect::new(move |_| state.recompute());
    }

    view! {
        <div class="app">
            <header class="app-header">
                <h1>"Statistiques"</h1>
            </header>
            <main class="app-main">
                <DataViz />
            </main>
        </div>
    }
}

//! Small glyph badges shared by the table and the tooltip

use leptos::prelude::*;
use viz_core::format::{format_share, format_variation, Trend};

/// Share of a period total, as a filled-circle glyph plus a percentage.
#[component]
pub fn ShareBadge(share: f64) -> impl IntoView {
    view! {
        <span class="share-badge" title="Part du total de la période">
            {format_share(share)}
        </span>
    }
}

/// Ratio against the previous period, colored by direction.
#[component]
pub fn TrendBadge(ratio: f64) -> impl IntoView {
    let trend = Trend::from_ratio(ratio);
    view! {
        <span class="trend-badge" style=format!("color: {}", trend.color())>
            {format_variation(ratio)}
        </span>
    }
}

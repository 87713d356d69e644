//! Summary table: one row per compared period, synchronized with the chart

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use leptos::prelude::*;
use viz_core::format::format_value;
use viz_core::{Granularity, ValueKind};
use viz_state::use_viz_state;

use crate::badges::{ShareBadge, TrendBadge};

/// Value of the native picker for a period start date. Hour granularity uses
/// a datetime-local input; everything else a plain date input.
pub fn date_input_value(date: DateTime<Utc>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hour => date.format("%Y-%m-%dT%H:%M").to_string(),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

/// Inverse of [`date_input_value`]; `None` when the picker value does not
/// parse (cleared input).
pub fn parse_date_input(value: &str, granularity: Granularity) -> Option<DateTime<Utc>> {
    let naive = match granularity {
        Granularity::Hour => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok()?,
        _ => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?,
    };
    Some(Utc.from_utc_datetime(&naive))
}

#[component]
pub fn SummaryTable() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;
    let derived = state.derived;
    let catalog = state.catalog.clone();

    let header_catalog = catalog.clone();
    let header = move || {
        let keys = params.keys.get();
        let with_total = params.stacked.get() && derived.with(|d| d.homogeneous.is_some());
        view! {
            <tr>
                <th class="st-actions">
                    <button
                        class="st-add"
                        title="Ajouter une période"
                        on:click=move |_| params.add_date()
                    >
                        "+"
                    </button>
                </th>
                <th class="st-serie">"Série"</th>
                {with_total.then(|| view! { <th class="st-total">"Total sur la période"</th> })}
                {keys
                    .iter()
                    .map(|key| {
                        let title = header_catalog
                            .get(key)
                            .map(|d| d.title.clone())
                            .unwrap_or_else(|| key.clone());
                        view! { <th class="st-dim">{title}</th> }
                    })
                    .collect_view()}
            </tr>
        }
    };

    let rows_catalog = catalog.clone();
    let rows = move || {
        let keys = params.keys.get();
        let dates = params.dates.get();
        let granularity = params.granularity.get();
        let duration = params.duration.get();
        let stacked = params.stacked.get();
        let d = derived.get();
        let with_total = stacked && d.homogeneous.is_some();

        dates
            .iter()
            .enumerate()
            .map(|(index, date)| {
                let summary = d.summaries.get(index);
                let input_kind = if granularity == Granularity::Hour {
                    "datetime-local"
                } else {
                    "date"
                };
                let picker_value = date_input_value(*date, granularity);

                let total_cell = with_total.then(|| {
                    let kind = d.homogeneous.unwrap_or(ValueKind::Decimal);
                    let total = summary.map(|s| s.total);
                    let variation = summary.and_then(|s| s.total_variation);
                    view! {
                        <td class="st-total">
                            <span class="st-value">{format_value(kind, total)}</span>
                            {variation.map(|ratio| view! { <TrendBadge ratio=ratio /> })}
                        </td>
                    }
                });

                let dim_cells = keys
                    .iter()
                    .enumerate()
                    .map(|(slot, key)| {
                        let dimension = rows_catalog.get(key);
                        let kind = dimension.map(|dim| dim.kind).unwrap_or_default();
                        let value = summary
                            .and_then(|s| s.dimensions.get(slot))
                            .and_then(|(_, v)| *v);
                        let alt = d
                            .reduction
                            .get(index)
                            .and_then(|record| record.get(key))
                            .and_then(|reduced| reduced.alt);
                        let variation = summary
                            .and_then(|s| s.variation.get(slot))
                            .copied()
                            .flatten();
                        let share = (stacked && with_total)
                            .then(|| {
                                let total = summary.map(|s| s.total).unwrap_or(0.0);
                                match value {
                                    Some(v) if total != 0.0 => Some(v / total),
                                    _ => None,
                                }
                            })
                            .flatten();
                        let swatch = d
                            .colors
                            .get(&format!("{index}.{key}"))
                            .cloned()
                            .unwrap_or_else(|| viz_core::colors::NEUTRAL.to_string());

                        view! {
                            <td class="st-dim">
                                <span
                                    class="st-swatch"
                                    style=format!("background-color: {swatch}")
                                ></span>
                                <span class="st-value">{format_value(kind, value)}</span>
                                {alt.map(|a| {
                                    view! {
                                        <span class="st-alt">
                                            {format!("(moy. {})", format_value(kind, Some(a)))}
                                        </span>
                                    }
                                })}
                                {share.map(|s| view! { <ShareBadge share=s /> })}
                                {variation.map(|ratio| view! { <TrendBadge ratio=ratio /> })}
                            </td>
                        }
                    })
                    .collect_view();

                view! {
                    <tr class="st-row">
                        <td class="st-actions">
                            <button
                                class="st-delete"
                                title="Supprimer la période"
                                on:click=move |_| params.delete_date(index)
                            >
                                "×"
                            </button>
                        </td>
                        <td class="st-serie">
                            <span class="date-chip">
                                <input
                                    type=input_kind
                                    prop:value=picker_value
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        if let Some(parsed) =
                                            parse_date_input(&value, params.granularity.get())
                                        {
                                            params.change_date(index, parsed);
                                        }
                                    }
                                />
                                <span class="date-chip-duration">
                                    {format!("{} {}", duration.amount, duration.unit_label())}
                                </span>
                            </span>
                        </td>
                        {total_cell}
                        {dim_cells}
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <table class="summary-table">
            <thead>{header}</thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

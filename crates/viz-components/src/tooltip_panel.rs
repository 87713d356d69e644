//! Custom tooltip panel fed by the chart's hover callback

use leptos::prelude::*;
use viz_core::format::{format_percent, format_value};
use viz_core::{Representation, ValueKind};
use viz_series::HoverGroup;
use viz_state::use_viz_state;

use crate::badges::{ShareBadge, TrendBadge};

#[component]
pub fn TooltipPanel(#[prop(into)] hover: Signal<Option<Vec<HoverGroup>>>) -> impl IntoView {
    let state = use_viz_state();
    let catalog = state.catalog.clone();
    let params = state.params;
    let derived = state.derived;

    let body = move || {
        let groups = hover.get()?;
        let representation = params.representation.get();
        let stacked = params.stacked.get();
        let homogeneous = derived.with(|d| d.homogeneous);

        let format_total = move |total: f64| match representation {
            Representation::Share => format_percent(total),
            Representation::Value => {
                format_value(homogeneous.unwrap_or(ValueKind::Decimal), Some(total))
            }
        };

        let rows = groups
            .iter()
            .map(|group| {
                let header = view! {
                    <tr class="tt-group">
                        <td class="tt-label" colspan="2">{group.label.clone()}</td>
                        <td class="tt-total">
                            {stacked.then(|| format_total(group.total))}
                        </td>
                        <td class="tt-variation">
                            {group.variation.map(|ratio| view! { <TrendBadge ratio=ratio /> })}
                        </td>
                    </tr>
                };

                let entries = group
                    .entries
                    .iter()
                    .map(|entry| {
                        let dimension = catalog.get(&entry.key);
                        let title = dimension
                            .map(|d| d.title.clone())
                            .unwrap_or_else(|| entry.key.clone());
                        let value = match representation {
                            Representation::Share => format_percent(entry.value),
                            Representation::Value => {
                                let kind = dimension.map(|d| d.kind).unwrap_or_default();
                                format_value(kind, Some(entry.value))
                            }
                        };
                        view! {
                            <tr class="tt-entry">
                                <td class="tt-swatch">
                                    <span
                                        class="st-swatch"
                                        style=format!("background-color: {}", entry.color)
                                    ></span>
                                </td>
                                <td class="tt-title">{title}</td>
                                <td class="tt-value">
                                    {value}
                                    {entry.share.map(|s| view! { <ShareBadge share=s /> })}
                                </td>
                                <td class="tt-variation">
                                    {entry
                                        .variation
                                        .map(|ratio| view! { <TrendBadge ratio=ratio /> })}
                                </td>
                            </tr>
                        }
                    })
                    .collect_view();

                view! {
                    {header}
                    {entries}
                }
            })
            .collect_view();

        Some(view! {
            <div class="tooltip-panel">
                <table class="tt-table">
                    <tbody>{rows}</tbody>
                </table>
            </div>
        })
    };

    view! { <div class="tooltip-anchor">{body}</div> }
}

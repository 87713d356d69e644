//! View controls: duration, granularity, representation, graph shape, presets

use leptos::prelude::*;
use viz_core::{Granularity, GraphKind, Representation};
use viz_state::use_viz_state;

/// Integer amount plus unit select; the amount never goes below 1.
#[component]
pub fn DurationField() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;

    view! {
        <span class="duration-field">
            <input
                type="number"
                min="1"
                class="duration-amount"
                prop:value=move || params.duration.get().amount.to_string()
                on:change=move |ev| {
                    if let Ok(amount) = event_target_value(&ev).parse::<u32>() {
                        params.set_duration_amount(amount);
                    }
                }
            />
            <select
                class="duration-unit"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if let Some(unit) =
                        Granularity::all().iter().find(|g| g.as_str() == value)
                    {
                        params.set_duration_unit(*unit);
                    }
                }
            >
                {move || {
                    let current = params.duration.get();
                    Granularity::all()
                        .iter()
                        .map(|unit| {
                            view! {
                                <option
                                    value=unit.as_str()
                                    selected=current.unit == *unit
                                >
                                    {if current.amount > 1 {
                                        unit.label_plural()
                                    } else {
                                        unit.label()
                                    }}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </span>
    }
}

#[component]
pub fn GranularityToggle() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;

    view! {
        <span class="toggle-group granularity">
            {Granularity::all()
                .iter()
                .map(|g| {
                    let g = *g;
                    view! {
                        <button
                            class=move || {
                                if params.granularity.get() == g {
                                    "toggle selected"
                                } else {
                                    "toggle"
                                }
                            }
                            on:click=move |_| params.set_granularity(g)
                        >
                            {g.label()}
                        </button>
                    }
                })
                .collect_view()}
        </span>
    }
}

#[component]
pub fn RepresentationToggle() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;

    view! {
        <span class="toggle-group representation">
            {Representation::all()
                .into_iter()
                .map(|mode| {
                    view! {
                        <button
                            class=move || {
                                if params.representation.get() == mode {
                                    "toggle selected"
                                } else {
                                    "toggle"
                                }
                            }
                            on:click=move |_| params.set_representation(mode)
                        >
                            {mode.label()}
                        </button>
                    }
                })
                .collect_view()}
        </span>
    }
}

#[component]
pub fn GraphKindToggle() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;

    view! {
        <span class="toggle-group graph-kind">
            {GraphKind::all()
                .into_iter()
                .map(|kind| {
                    view! {
                        <button
                            class=move || {
                                if params.graph_kind.get() == kind {
                                    "toggle selected"
                                } else {
                                    "toggle"
                                }
                            }
                            on:click=move |_| params.set_graph_kind(kind)
                        >
                            {kind.label()}
                        </button>
                    }
                })
                .collect_view()}
        </span>
    }
}

#[component]
pub fn StackToggle() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;

    view! {
        <label class="stack-toggle">
            <input
                type="checkbox"
                prop:checked=move || params.stacked.get()
                on:change=move |_| params.set_stacked(!params.stacked.get())
            />
            "Empiler"
        </label>
    }
}

/// Preset picker. A manually edited view shows the disabled placeholder.
#[component]
pub fn PresetSelect() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;
    let presets = state.presets.clone();

    let apply = {
        let state = state.clone();
        move |key: String| {
            if let Some(preset) = state.preset(&key) {
                params.apply_preset(&preset.clone());
            }
        }
    };

    view! {
        <select class="preset-select" on:change=move |ev| apply(event_target_value(&ev))>
            <option
                value=""
                disabled=true
                selected=move || params.preset.get().is_none()
            >
                "Configuration personnalisée"
            </option>
            {presets
                .iter()
                .map(|preset| {
                    let key = preset.key;
                    view! {
                        <option
                            value=key
                            selected=move || params.preset.get().as_deref() == Some(key)
                        >
                            {preset.title}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}

/// All view controls on one line.
#[component]
pub fn Toolbar() -> impl IntoView {
    view! {
        <div class="viz-toolbar">
            <PresetSelect />
            <DurationField />
            <GranularityToggle />
            <RepresentationToggle />
            <GraphKindToggle />
            <StackToggle />
        </div>
    }
}

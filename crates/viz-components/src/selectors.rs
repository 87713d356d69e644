//! Dimension selection widgets
//!
//! Small catalogs get a flat chip list; large ones a grouped table with a
//! text filter, a depth filter and pagination. [`DimensionSelector`] picks
//! the widget from the catalog size.

use leptos::prelude::*;
use viz_core::Catalog;
use viz_state::use_viz_state;

/// Above this many dimensions the chip list becomes unusable.
pub const CHIP_LIMIT: usize = 20;

/// Rows per page of the grouped table.
pub const PAGE_SIZE: usize = 10;

// ============================================================================
// GROUPING HELPERS
// ============================================================================

/// One selectable dimension inside a table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorCell {
    pub key: String,
    pub title: String,
}

/// One group row: a label plus one list of dimensions per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRow {
    pub label: String,
    pub cells: Vec<Vec<SelectorCell>>,
}

/// Distinct column labels, in first-seen catalog order.
pub fn selector_columns(catalog: &Catalog) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for dimension in catalog.iter() {
        if !columns.contains(&dimension.group.slot) {
            columns.push(dimension.group.slot.clone());
        }
    }
    columns
}

/// Deepest group level present in the catalog.
pub fn selector_max_depth(catalog: &Catalog) -> u8 {
    catalog.iter().map(|d| d.group.depth).max().unwrap_or(0)
}

/// Groups the catalog into table rows, keeping only dimensions whose title
/// matches `filter` (case-insensitive) at a depth up to `max_depth`. Rows
/// with no surviving dimension are dropped.
pub fn selector_rows(
    catalog: &Catalog,
    columns: &[String],
    filter: &str,
    max_depth: u8,
) -> Vec<SelectorRow> {
    let needle = filter.to_lowercase();
    let mut rows: Vec<SelectorRow> = Vec::new();

    for dimension in catalog.iter() {
        if dimension.group.depth > max_depth {
            continue;
        }
        if !needle.is_empty() && !dimension.title.to_lowercase().contains(&needle) {
            continue;
        }
        let Some(column) = columns.iter().position(|c| *c == dimension.group.slot) else {
            continue;
        };
        let row = match rows.iter().position(|r| r.label == dimension.group.label) {
            Some(index) => index,
            None => {
                rows.push(SelectorRow {
                    label: dimension.group.label.clone(),
                    cells: vec![Vec::new(); columns.len()],
                });
                rows.len() - 1
            }
        };
        rows[row].cells[column].push(SelectorCell {
            key: dimension.key.clone(),
            title: dimension.title.clone(),
        });
    }

    rows
}

// ============================================================================
// WIDGETS
// ============================================================================

/// Flat multi-select chip list, for small catalogs.
#[component]
pub fn DimensionChips() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;
    let catalog = state.catalog.clone();

    let chips = move || {
        catalog
            .iter()
            .map(|dimension| {
                let key = dimension.key.clone();
                let toggle_key = key.clone();
                let selected_key = key.clone();
                view! {
                    <button
                        class=move || {
                            if params.is_selected(&selected_key) {
                                "dim-chip selected"
                            } else {
                                "dim-chip"
                            }
                        }
                        on:click=move |_| params.toggle_key(&toggle_key)
                    >
                        {dimension.title.clone()}
                    </button>
                }
            })
            .collect_view()
    };

    view! { <div class="dim-chips">{chips}</div> }
}

/// Grouped, filterable, paginated selection table for large catalogs.
#[component]
pub fn DimensionTable() -> impl IntoView {
    let state = use_viz_state();
    let params = state.params;
    let catalog = state.catalog.clone();

    let filter = RwSignal::new(String::new());
    let depth = RwSignal::new(selector_max_depth(&catalog));
    let page = RwSignal::new(0usize);

    let columns = selector_columns(&catalog);
    let max_depth = selector_max_depth(&catalog);

    let rows_catalog = catalog.clone();
    let rows_columns = columns.clone();
    let visible_rows = move || {
        selector_rows(&rows_catalog, &rows_columns, &filter.get(), depth.get())
    };

    let page_count = {
        let visible_rows = visible_rows.clone();
        move || visible_rows().len().div_ceil(PAGE_SIZE).max(1)
    };

    let toggle_catalog = catalog.clone();
    let toggle_column = move |slot: String| {
        let keys: Vec<String> = toggle_catalog
            .iter()
            .filter(|d| d.group.slot == slot)
            .map(|d| d.key.clone())
            .collect();
        let all_selected = keys.iter().all(|k| params.is_selected(k));
        for key in keys {
            if all_selected || !params.is_selected(&key) {
                params.toggle_key(&key);
            }
        }
    };

    let header_columns = columns.clone();
    let table_body = {
        let visible_rows = visible_rows.clone();
        let page_count = page_count.clone();
        move || {
            let rows = visible_rows();
            let start = page.get().min(page_count() - 1) * PAGE_SIZE;
            rows.into_iter()
                .skip(start)
                .take(PAGE_SIZE)
                .map(|row| {
                    let cells = row
                        .cells
                        .into_iter()
                        .map(|cell| {
                            let chips = cell
                                .into_iter()
                                .map(|entry| {
                                    let toggle_key = entry.key.clone();
                                    let selected_key = entry.key;
                                    view! {
                                        <button
                                            class=move || {
                                                if params.is_selected(&selected_key) {
                                                    "dim-chip selected"
                                                } else {
                                                    "dim-chip"
                                                }
                                            }
                                            on:click=move |_| params.toggle_key(&toggle_key)
                                        >
                                            {entry.title}
                                        </button>
                                    }
                                })
                                .collect_view();
                            view! { <td class="dt-cell">{chips}</td> }
                        })
                        .collect_view();
                    view! {
                        <tr class="dt-row">
                            <td class="dt-group">{row.label}</td>
                            {cells}
                        </tr>
                    }
                })
                .collect_view()
        }
    };

    view! {
        <div class="dim-table">
            <div class="dt-filters">
                <input
                    type="text"
                    class="dt-search"
                    placeholder="Filtrer les séries"
                    prop:value=move || filter.get()
                    on:input=move |ev| {
                        filter.set(event_target_value(&ev));
                        page.set(0);
                    }
                />
                <select
                    class="dt-depth"
                    on:change=move |ev| {
                        if let Ok(level) = event_target_value(&ev).parse::<u8>() {
                            depth.set(level);
                            page.set(0);
                        }
                    }
                >
                    {(0..=max_depth)
                        .map(|level| {
                            view! {
                                <option
                                    value=level.to_string()
                                    selected=move || depth.get() == level
                                >
                                    {format!("Niveau {level}")}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <table class="dt-table">
                <thead>
                    <tr>
                        <th class="dt-group"></th>
                        {header_columns
                            .into_iter()
                            .map(|slot| {
                                let toggle_column = toggle_column.clone();
                                let label = slot.clone();
                                view! {
                                    <th class="dt-col">
                                        <button
                                            class="dt-col-toggle"
                                            title="Tout basculer"
                                            on:click=move |_| toggle_column(slot.clone())
                                        >
                                            {label}
                                        </button>
                                    </th>
                                }
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>{table_body}</tbody>
            </table>

            <div class="dt-pager">
                <button
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1))
                >
                    "Précédent"
                </button>
                <span class="dt-page">
                    {
                        let page_count = page_count.clone();
                        move || {
                            format!("{} / {}", page.get().min(page_count() - 1) + 1, page_count())
                        }
                    }
                </span>
                <button
                    on:click={
                        let page_count = page_count.clone();
                        move |_| page.update(|p| *p = (*p + 1).min(page_count() - 1))
                    }
                >
                    "Suivant"
                </button>
            </div>
        </div>
    }
}

/// Picks the chip list or the grouped table from the catalog size.
#[component]
pub fn DimensionSelector() -> impl IntoView {
    let state = use_viz_state();
    if state.catalog.len() <= CHIP_LIMIT {
        view! { <DimensionChips /> }.into_any()
    } else {
        view! { <DimensionTable /> }.into_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::{Dimension, Group};

    fn catalog() -> Catalog {
        Catalog::with_dimensions([
            Dimension::new("revenue", "Chiffre d'affaires")
                .group(Group::new("sales", "Ventes", "Montants", 0)),
            Dimension::new("cost", "Coûts").group(Group::new("sales", "Ventes", "Montants", 0)),
            Dimension::new("orders", "Commandes")
                .group(Group::new("sales", "Ventes", "Volumes", 0)),
            Dimension::new("visits", "Visites")
                .group(Group::new("traffic", "Trafic", "Volumes", 1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_columns_first_seen_order() {
        assert_eq!(selector_columns(&catalog()), vec!["Montants", "Volumes"]);
    }

    #[test]
    fn test_rows_grouped_by_label() {
        let catalog = catalog();
        let columns = selector_columns(&catalog);
        let rows = selector_rows(&catalog, &columns, "", 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Ventes");
        assert_eq!(rows[0].cells[0].len(), 2);
        assert_eq!(rows[0].cells[1].len(), 1);
        assert_eq!(rows[1].label, "Trafic");
    }

    #[test]
    fn test_text_filter_drops_empty_rows() {
        let catalog = catalog();
        let columns = selector_columns(&catalog);
        let rows = selector_rows(&catalog, &columns, "visites", 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Trafic");
    }

    #[test]
    fn test_depth_filter() {
        let catalog = catalog();
        let columns = selector_columns(&catalog);
        let rows = selector_rows(&catalog, &columns, "", 0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Ventes");
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(selector_max_depth(&catalog()), 1);
    }
}

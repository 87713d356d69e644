//! Multi-period series chart
//!
//! Draws one series per `(period, key)` pair: polylines or stacked areas in
//! line mode, grouped or stacked rects in bar mode. Hover is resolved per
//! time bucket and handed to the caller as the raw points under the cursor;
//! the chart itself never renders a tooltip.

use leptos::prelude::*;

use viz_core::colors::{ColorMap, BG_PANEL, GRID, NEUTRAL, TEXT_MUTED};
use viz_core::{format, Granularity, GraphKind, KeyPath, Representation};
use viz_series::{HoverPoint, SeriesKey, SeriesPoint};

use crate::{
    chartkit::{line_path, ribbon_path, BandScale, LinearScale},
    events::{group_events, ChartEvent, EventMarker},
    ChartDimensions, ChartMargin,
};

/// Series chart configuration
#[derive(Debug, Clone)]
pub struct SeriesChartConfig {
    pub width: f64,
    pub height: f64,
    pub show_grid: bool,
    pub y_ticks: usize,
    pub stroke_width: f64,
}

impl Default for SeriesChartConfig {
    fn default() -> Self {
        Self {
            width: 860.0,
            height: 340.0,
            show_grid: true,
            y_ticks: 5,
            stroke_width: 3.0,
        }
    }
}

#[derive(Clone)]
struct LineSeries {
    color: String,
    path: String,
    area: Option<String>,
}

#[derive(Clone)]
struct BarRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: String,
}

/// Everything one render pass needs, computed from the series in one go.
#[derive(Clone)]
struct ChartState {
    dims: ChartDimensions,
    labels: Vec<String>,
    x_scale: BandScale,
    y_scale: LinearScale,
    lines: Vec<LineSeries>,
    bars: Vec<BarRect>,
    hover: Vec<Vec<HoverPoint>>,
    event_groups: Vec<(String, Vec<ChartEvent>)>,
}

fn plotted_value(path: &KeyPath, values: &viz_core::Value, field: Representation) -> f64 {
    match field {
        Representation::Value => match path.resolve_cell(values) {
            Some((value, _)) => value,
            None => path.resolve(values),
        },
        Representation::Share => path
            .resolve_cell(values)
            .and_then(|(_, share)| share)
            .unwrap_or(0.0),
    }
}

#[allow(clippy::too_many_arguments)]
fn compute_state(
    points: &[SeriesPoint],
    keys: &[String],
    colors: &ColorMap,
    kind: GraphKind,
    stacked: bool,
    representation: Representation,
    granularity: Granularity,
    events: &[ChartEvent],
    config: &SeriesChartConfig,
) -> Option<ChartState> {
    let first = points.first()?;
    if keys.is_empty() {
        return None;
    }
    let periods = first.dimensions.len();
    if periods == 0 {
        return None;
    }

    let paths: Vec<(usize, KeyPath)> = keys
        .iter()
        .enumerate()
        .filter_map(|(i, key)| match KeyPath::parse(key) {
            Ok(path) => Some((i, path)),
            Err(error) => {
                tracing::warn!(key, %error, "skipping unplottable key");
                None
            }
        })
        .collect();
    if paths.is_empty() {
        return None;
    }

    // Rotated labels under the axis need room at hour/day/week granularity.
    let bottom = match granularity {
        Granularity::Hour | Granularity::Day | Granularity::Week => 90.0,
        _ => 50.0,
    };
    let dims = ChartDimensions::new(config.width, config.height)
        .with_margin(ChartMargin::new(12.0, 12.0, bottom, 55.0));

    let buckets = points.len();
    // values[period][plotted key][bucket]
    let values: Vec<Vec<Vec<f64>>> = (0..periods)
        .map(|period| {
            paths
                .iter()
                .map(|(_, path)| {
                    points
                        .iter()
                        .map(|point| {
                            point
                                .dimensions
                                .get(period)
                                .map(|record| plotted_value(path, &record.values, representation))
                                .unwrap_or(0.0)
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    // Stacking accumulates within a period, never across periods.
    let offsets: Vec<Vec<Vec<f64>>> = (0..periods)
        .map(|period| {
            let mut running = vec![0.0; buckets];
            values[period]
                .iter()
                .map(|series| {
                    let base = running.clone();
                    if stacked {
                        for (acc, value) in running.iter_mut().zip(series) {
                            *acc += value;
                        }
                    }
                    base
                })
                .collect()
        })
        .collect();

    let (y_min, y_max) = if representation == Representation::Share && !stacked {
        (0.0, 1.0)
    } else {
        let mut min = 0.0_f64;
        let mut max = f64::MIN;
        for period in 0..periods {
            for (series, base) in values[period].iter().zip(&offsets[period]) {
                for (value, offset) in series.iter().zip(base) {
                    min = min.min(offset + value);
                    max = max.max(offset + value);
                }
            }
        }
        if max <= min {
            (min, min + 1.0)
        } else {
            (min, max + (max - min) * 0.05)
        }
    };

    let y_scale = LinearScale::new()
        .domain(y_min, y_max)
        .range(dims.inner_height(), 0.0);
    let x_scale = BandScale::new(buckets)
        .range(0.0, dims.inner_width())
        .padding(0.2, 0.1);

    let color_of = |period: usize, key: &str| {
        colors
            .get(&format!("{period}.{key}"))
            .cloned()
            .unwrap_or_else(|| NEUTRAL.to_string())
    };

    let mut lines = Vec::new();
    let mut bars = Vec::new();
    match kind {
        GraphKind::Line => {
            for period in 0..periods {
                for ((key_index, _), (series, base)) in paths
                    .iter()
                    .zip(values[period].iter().zip(&offsets[period]))
                {
                    let top: Vec<(f64, f64)> = series
                        .iter()
                        .zip(base)
                        .enumerate()
                        .map(|(b, (value, offset))| {
                            (x_scale.scale_center(b), y_scale.scale(offset + value))
                        })
                        .collect();
                    let area = stacked.then(|| {
                        let bottom: Vec<(f64, f64)> = base
                            .iter()
                            .enumerate()
                            .map(|(b, offset)| (x_scale.scale_center(b), y_scale.scale(*offset)))
                            .collect();
                        ribbon_path(&top, &bottom)
                    });
                    lines.push(LineSeries {
                        color: color_of(period, &keys[*key_index]),
                        path: line_path(&top),
                        area,
                    });
                }
            }
        }
        GraphKind::Bar => {
            let groups = if stacked { periods } else { periods * paths.len() };
            let bar_width = (x_scale.bandwidth() / groups as f64).max(1.0);
            for period in 0..periods {
                for (slot, ((key_index, _), (series, base))) in paths
                    .iter()
                    .zip(values[period].iter().zip(&offsets[period]))
                    .enumerate()
                {
                    let group = if stacked {
                        period
                    } else {
                        period * paths.len() + slot
                    };
                    let color = color_of(period, &keys[*key_index]);
                    for (b, (value, offset)) in series.iter().zip(base).enumerate() {
                        let y0 = y_scale.scale(*offset);
                        let y1 = y_scale.scale(offset + value);
                        bars.push(BarRect {
                            x: x_scale.scale(b) + group as f64 * bar_width,
                            y: y0.min(y1),
                            width: bar_width,
                            height: (y0 - y1).abs(),
                            color: color.clone(),
                        });
                    }
                }
            }
        }
    }

    let hover: Vec<Vec<HoverPoint>> = points
        .iter()
        .enumerate()
        .map(|(b, point)| {
            (0..periods)
                .flat_map(|period| {
                    paths.iter().enumerate().map(move |(slot, (key_index, _))| {
                        (period, slot, *key_index)
                    })
                })
                .filter_map(|(period, slot, key_index)| {
                    let record = point.dimensions.get(period)?;
                    Some(HoverPoint {
                        series_key: SeriesKey::new(period, keys[key_index].clone(), representation),
                        value: values[period][slot][b],
                        color: color_of(period, &keys[key_index]),
                        period_label: record.label.clone(),
                    })
                })
                .collect()
        })
        .collect();

    Some(ChartState {
        dims,
        labels: points.iter().map(|p| p.label.clone()).collect(),
        x_scale,
        y_scale,
        lines,
        bars,
        hover,
        event_groups: group_events(events),
    })
}

/// Parameterizable time-series chart
#[component]
pub fn SeriesChart(
    #[prop(into)] series: Signal<Vec<SeriesPoint>>,
    #[prop(into)] keys: Signal<Vec<String>>,
    #[prop(into)] colors: Signal<ColorMap>,
    #[prop(into)] graph_kind: Signal<GraphKind>,
    #[prop(into)] stacked: Signal<bool>,
    #[prop(into)] representation: Signal<Representation>,
    #[prop(into)] granularity: Signal<Granularity>,
    #[prop(optional, into)] events: Signal<Vec<ChartEvent>>,
    #[prop(optional, into)] y_formatter: Option<Callback<f64, String>>,
    #[prop(optional, into)] on_hover: Option<Callback<Option<Vec<HoverPoint>>>>,
    #[prop(optional)] config: Option<SeriesChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let width = config.width;
    let height = config.height;
    let show_grid = config.show_grid;
    let y_ticks = config.y_ticks;
    let stroke_width = config.stroke_width;

    let state = move || {
        compute_state(
            &series.get(),
            &keys.get(),
            &colors.get(),
            graph_kind.get(),
            stacked.get(),
            representation.get(),
            granularity.get(),
            &events.get(),
            &config,
        )
    };

    let tick_label = move |tick: f64| match y_formatter {
        Some(formatter) => formatter.run(tick),
        None => match representation.get() {
            Representation::Share => format::format_percent(tick),
            Representation::Value => format::format_number(tick, 1),
        },
    };

    view! {
        <svg
            class="series-chart"
            viewBox=format!("0 0 {} {}", width, height)
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: auto;"
            on:mouseleave=move |_| {
                if let Some(callback) = on_hover {
                    callback.run(None);
                }
            }
        >
            <rect width=width height=height fill=BG_PANEL rx="4" />

            {move || {
                state().map(|state| {
                    let inner_h = state.dims.inner_height();
                    let ticks = state.y_scale.nice_ticks(y_ticks);
                    let kind = graph_kind.get();
                    view! {
                        <g transform=state.dims.inner_transform()>
                            // Grid and Y axis
                            {ticks
                                .into_iter()
                                .map(|tick| {
                                    let y = state.y_scale.scale(tick);
                                    let label = tick_label(tick);
                                    view! {
                                        <g transform=format!("translate(0, {y})")>
                                            {show_grid.then(|| view! {
                                                <line
                                                    x1="0"
                                                    x2=state.dims.inner_width()
                                                    stroke=GRID
                                                    stroke-width="1"
                                                />
                                            })}
                                            <text
                                                x="-8"
                                                dy="0.32em"
                                                text-anchor="end"
                                                fill=TEXT_MUTED
                                                font-size="10"
                                            >
                                                {label}
                                            </text>
                                        </g>
                                    }
                                })
                                .collect_view()}

                            // X labels, rotated
                            {state
                                .labels
                                .iter()
                                .enumerate()
                                .map(|(b, label)| {
                                    let x = state.x_scale.scale_center(b);
                                    view! {
                                        <g transform=format!(
                                            "translate({x}, {})",
                                            inner_h + 14.0
                                        )>
                                            <text
                                                text-anchor="end"
                                                fill=TEXT_MUTED
                                                font-size="10"
                                                transform="rotate(-35)"
                                            >
                                                {label.clone()}
                                            </text>
                                        </g>
                                    }
                                })
                                .collect_view()}

                            // Bars
                            {state
                                .bars
                                .iter()
                                .map(|bar| view! {
                                    <rect
                                        x=bar.x
                                        y=bar.y
                                        width=bar.width
                                        height=bar.height
                                        fill=bar.color.clone()
                                    />
                                })
                                .collect_view()}

                            // Lines and stacked areas
                            {state
                                .lines
                                .iter()
                                .map(|line| view! {
                                    <g>
                                        {line.area.clone().map(|area| view! {
                                            <path
                                                d=area
                                                fill=line.color.clone()
                                                fill-opacity="0.35"
                                                stroke="none"
                                            />
                                        })}
                                        <path
                                            d=line.path.clone()
                                            fill="none"
                                            stroke=line.color.clone()
                                            stroke-width=stroke_width
                                            stroke-linecap="round"
                                            stroke-linejoin="round"
                                        />
                                    </g>
                                })
                                .collect_view()}

                            // Event markers
                            {state
                                .event_groups
                                .iter()
                                .filter_map(|(bucket, events)| {
                                    let b = state.labels.iter().position(|l| l == bucket)?;
                                    Some(view! {
                                        <EventMarker
                                            x=state.x_scale.scale_center(b)
                                            height=inner_h
                                            events=events.clone()
                                            kind=kind
                                        />
                                    })
                                })
                                .collect_view()}

                            // Hover capture, one transparent rect per bucket
                            {state
                                .hover
                                .iter()
                                .enumerate()
                                .map(|(b, bucket_points)| {
                                    let bucket_points = bucket_points.clone();
                                    let x = state.x_scale.scale(b);
                                    let step = state.x_scale.step();
                                    view! {
                                        <rect
                                            x=x
                                            y="0"
                                            width=step
                                            height=inner_h
                                            fill="transparent"
                                            on:mouseenter=move |_| {
                                                if let Some(callback) = on_hover {
                                                    callback.run(Some(bucket_points.clone()));
                                                }
                                            }
                                        />
                                    }
                                })
                                .collect_view()}
                        </g>
                    }
                })
            }}
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::Value;
    use viz_series::SeriesRecord;

    fn point(label: &str, records: &[(&str, &[(&str, f64)])]) -> SeriesPoint {
        SeriesPoint {
            label: label.to_string(),
            dimensions: records
                .iter()
                .map(|(period_label, entries)| SeriesRecord {
                    label: period_label.to_string(),
                    values: Value::from_entries(
                        entries.iter().map(|(k, v)| (*k, Value::Number(*v))),
                    ),
                })
                .collect(),
        }
    }

    fn two_key_state(stacked: bool, kind: GraphKind) -> ChartState {
        let points = vec![
            point("b0", &[("p0", &[("a", 10.0), ("b", 20.0)])]),
            point("b1", &[("p0", &[("a", 30.0), ("b", 40.0)])]),
        ];
        compute_state(
            &points,
            &[String::from("a"), String::from("b")],
            &ColorMap::new(),
            kind,
            stacked,
            Representation::Value,
            Granularity::Month,
            &[],
            &SeriesChartConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_series_yields_no_state() {
        let state = compute_state(
            &[],
            &[String::from("a")],
            &ColorMap::new(),
            GraphKind::Line,
            false,
            Representation::Value,
            Granularity::Day,
            &[],
            &SeriesChartConfig::default(),
        );
        assert!(state.is_none());
    }

    #[test]
    fn test_line_mode_emits_one_series_per_key() {
        let state = two_key_state(false, GraphKind::Line);
        assert_eq!(state.lines.len(), 2);
        assert!(state.bars.is_empty());
        assert!(state.lines.iter().all(|l| l.area.is_none()));
    }

    #[test]
    fn test_stacked_lines_become_areas() {
        let state = two_key_state(true, GraphKind::Line);
        assert!(state.lines.iter().all(|l| l.area.is_some()));
        // stacked domain reaches the per-bucket sum
        let (_, max) = state.y_scale.domain_bounds();
        assert!(max >= 70.0);
    }

    #[test]
    fn test_bar_mode_emits_one_rect_per_bucket_and_key() {
        let state = two_key_state(false, GraphKind::Bar);
        assert_eq!(state.bars.len(), 4);
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_hover_points_carry_period_labels() {
        let state = two_key_state(false, GraphKind::Line);
        assert_eq!(state.hover.len(), 2);
        assert_eq!(state.hover[0].len(), 2);
        assert_eq!(state.hover[0][0].period_label, "p0");
        assert_eq!(state.hover[1][0].value, 30.0);
        assert_eq!(state.hover[0][1].series_key.data_key(), "dimensions[0].b.value");
    }

    #[test]
    fn test_share_mode_uses_unit_domain() {
        let points = vec![point("b0", &[("p0", &[("a", 1.0)])])];
        let state = compute_state(
            &points,
            &[String::from("a")],
            &ColorMap::new(),
            GraphKind::Line,
            false,
            Representation::Share,
            Granularity::Day,
            &[],
            &SeriesChartConfig::default(),
        )
        .unwrap();
        assert_eq!(state.y_scale.domain_bounds(), (0.0, 1.0));
    }
}

//! Annotation markers drawn over the chart
//!
//! Events are anchored to a time bucket by its label; every event sharing
//! a bucket is drawn on the same reference line.

use leptos::prelude::*;
use viz_core::{colors, GraphKind};

/// One annotation attached to a time bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEvent {
    /// Label of the bucket the event is anchored to; must match the series
    /// point label to be drawn.
    pub bucket_label: String,
    pub date_label: String,
    pub text: String,
    pub color: String,
}

/// Events regrouped by anchor bucket, in input order.
pub fn group_events(events: &[ChartEvent]) -> Vec<(String, Vec<ChartEvent>)> {
    let mut groups: Vec<(String, Vec<ChartEvent>)> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|(label, _)| *label == event.bucket_label) {
            Some((_, bucket)) => bucket.push(event.clone()),
            None => groups.push((event.bucket_label.clone(), vec![event.clone()])),
        }
    }
    groups
}

/// Reference marker for one bucket's events: a vertical line with rotated
/// labels in line mode, a plain glyph in bar mode.
#[component]
pub fn EventMarker(
    x: f64,
    height: f64,
    events: Vec<ChartEvent>,
    kind: GraphKind,
) -> impl IntoView {
    let color = events
        .first()
        .map(|event| event.color.clone())
        .unwrap_or_else(|| colors::NEUTRAL.to_string());
    let line_color = color.clone();

    view! {
        <g class="chart-event">
            {(kind == GraphKind::Line).then(|| view! {
                <line
                    x1=x
                    y1="0"
                    x2=x
                    y2=height
                    stroke=line_color.clone()
                    stroke-width="1"
                    stroke-dasharray="4,3"
                />
            })}

            <text
                x=x
                y="10"
                font-size="11"
                text-anchor="middle"
                fill=color.clone()
            >
                "\u{1f4ac}"
            </text>

            {events
                .into_iter()
                .enumerate()
                .map(|(i, event)| {
                    let dy = -4.0 - 12.0 * i as f64;
                    view! {
                        <text
                            font-size="10"
                            text-anchor="end"
                            fill=event.color.clone()
                            transform=format!("rotate(-90 {x} {height})")
                            x=x
                            y=height
                            dy=dy
                        >
                            {format!("{} - {}", event.text, event.date_label)}
                        </text>
                    }
                })
                .collect_view()}
        </g>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(bucket: &str, text: &str) -> ChartEvent {
        ChartEvent {
            bucket_label: bucket.to_string(),
            date_label: String::from("04/03/2024"),
            text: text.to_string(),
            color: String::from("#dc3912"),
        }
    }

    #[test]
    fn test_group_events_by_bucket() {
        let events = vec![event("a", "v1"), event("b", "v2"), event("a", "v3")];
        let groups = group_events(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "a");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1[0].text, "v2");
    }
}

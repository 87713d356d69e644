//! Demo dimension catalog and view presets

use chrono::{Datelike, TimeZone, Utc};
use viz_core::{
    Average, Catalog, Dimension, Granularity, Group, KeyPath, SeriesDuration, ValueKind,
    VirtualRule,
};
use viz_state::Preset;

/// Sales-style demo catalog: money dimensions in one group, activity
/// dimensions in another, plus a computed margin.
pub fn demo_catalog() -> Catalog {
    let amounts = Group::new("sales", "Ventes", "Montants", 0);
    let volumes = Group::new("sales", "Ventes", "Volumes", 0);
    let activity = Group::new("activity", "Activité", "Volumes", 1);

    Catalog::with_dimensions([
        Dimension::new("revenue", "Chiffre d'affaires")
            .kind(ValueKind::Currency)
            .group(amounts.clone()),
        Dimension::new("cost", "Coûts")
            .kind(ValueKind::Currency)
            .group(amounts.clone()),
        Dimension::new("margin", "Marge")
            .kind(ValueKind::Currency)
            .group(amounts.clone())
            .virtual_rule(VirtualRule::new(["revenue", "cost"], margin_of)),
        Dimension::new("basket", "Panier moyen")
            .kind(ValueKind::Currency)
            .group(amounts)
            .reducer(Average),
        Dimension::new("orders", "Commandes")
            .kind(ValueKind::Integer)
            .group(volumes)
            .alt_reducer(Average),
        Dimension::new("visits", "Visites")
            .kind(ValueKind::Integer)
            .group(activity.clone()),
        Dimension::new("signups", "Inscriptions")
            .kind(ValueKind::Integer)
            .group(activity),
    ])
    .unwrap_or_default()
}

fn margin_of(record: &viz_core::Value) -> f64 {
    let revenue = KeyPath::parse("revenue").map(|p| p.resolve(record)).unwrap_or(0.0);
    let cost = KeyPath::parse("cost").map(|p| p.resolve(record)).unwrap_or(0.0);
    revenue - cost
}

/// Ready-made views: this month against the previous one, and the last
/// twelve months year over year.
pub fn demo_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "month-vs-previous",
            "Mois en cours vs mois précédent",
            Granularity::Day,
            SeriesDuration::new(1, Granularity::Month),
            || {
                let now = Utc::now();
                let current = Utc
                    .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
                    .single()
                    .unwrap_or(now);
                let duration = SeriesDuration::new(1, Granularity::Month);
                vec![duration.subtract_from(current), current]
            },
        ),
        Preset::new(
            "year-over-year",
            "Douze derniers mois vs année précédente",
            Granularity::Month,
            SeriesDuration::new(1, Granularity::Year),
            || {
                let duration = SeriesDuration::new(1, Granularity::Year);
                let current = duration.subtract_from(Utc::now());
                vec![duration.subtract_from(current), current]
            },
        ),
        Preset::new(
            "last-week",
            "Sept derniers jours",
            Granularity::Day,
            SeriesDuration::new(7, Granularity::Day),
            || {
                let duration = SeriesDuration::new(7, Granularity::Day);
                vec![duration.subtract_from(Utc::now())]
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_virtual_margin() {
        let catalog = demo_catalog();
        let margin = catalog.get("margin").unwrap();
        assert!(margin.rule.is_some());
        assert_eq!(
            catalog.expand_keys(&["margin".to_string()]),
            vec!["revenue", "cost"]
        );
    }

    #[test]
    fn test_presets_produce_sorted_dates() {
        for preset in demo_presets() {
            let dates = (preset.dates)();
            assert!(!dates.is_empty());
            assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

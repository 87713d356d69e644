//! Time bucketing, series durations and period label formatting

use chrono::{DateTime, Datelike, Months, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// GRANULARITY
// ============================================================================

/// Time bucketing unit applied to a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Default for Granularity {
    fn default() -> Self {
        Self::Day
    }
}

impl Granularity {
    /// Wire name, as the data-source contract spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hour => "Heure",
            Self::Day => "Jour",
            Self::Week => "Semaine",
            Self::Month => "Mois",
            Self::Year => "An",
        }
    }

    pub fn label_plural(&self) -> &'static str {
        match self {
            Self::Hour => "Heures",
            Self::Day => "Jours",
            Self::Week => "Semaines",
            Self::Month => "Mois",
            Self::Year => "Ans",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Hour, Self::Day, Self::Week, Self::Month, Self::Year]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DURATION
// ============================================================================

/// Length of one series, e.g. "7 day". The wire format is
/// `"<amount> <unit>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDuration {
    pub amount: u32,
    pub unit: Granularity,
}

impl SeriesDuration {
    pub fn new(amount: u32, unit: Granularity) -> Self {
        Self {
            amount: amount.max(1),
            unit,
        }
    }

    /// Start date of the series immediately preceding one starting at `date`.
    pub fn subtract_from(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let amount = self.amount;
        match self.unit {
            Granularity::Hour => date - chrono::Duration::hours(amount as i64),
            Granularity::Day => date - chrono::Duration::days(amount as i64),
            Granularity::Week => date - chrono::Duration::weeks(amount as i64),
            Granularity::Month => date
                .checked_sub_months(Months::new(amount))
                .unwrap_or(date),
            Granularity::Year => date
                .checked_sub_months(Months::new(amount * 12))
                .unwrap_or(date),
        }
    }

    /// Unit label for selectors, pluralized above one.
    pub fn unit_label(&self) -> &'static str {
        if self.amount > 1 {
            self.unit.label_plural()
        } else {
            self.unit.label()
        }
    }
}

impl std::fmt::Display for SeriesDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

// ============================================================================
// PERIOD LABELS
// ============================================================================

/// Maps a raw bucket date to its display label for the active granularity.
/// The core only ever selects which granularity to pass; formatting rules
/// live behind this seam.
pub trait PeriodLabeler: Send + Sync {
    fn label(&self, date: DateTime<Utc>, granularity: Granularity) -> String;
}

/// Default French labeler.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchLabeler;

const WEEKDAYS_FR: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];

impl PeriodLabeler for FrenchLabeler {
    fn label(&self, date: DateTime<Utc>, granularity: Granularity) -> String {
        let weekday = WEEKDAYS_FR[date.weekday().num_days_from_monday() as usize];
        match granularity {
            Granularity::Hour => format!(
                "{} {:02}/{:02}/{}, {:02}:{:02}",
                weekday,
                date.day(),
                date.month(),
                date.year(),
                date.hour(),
                date.minute()
            ),
            Granularity::Day => {
                format!("{} {:02}/{:02}/{}", weekday, date.day(), date.month(), date.year())
            }
            Granularity::Week => {
                let iso = date.iso_week();
                format!("{}, semaine {:02}", iso.year(), iso.week())
            }
            Granularity::Month => format!("{:02}/{}", date.month(), date.year()),
            Granularity::Year => format!("{}", date.year()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_labels_per_granularity() {
        let labeler = FrenchLabeler;
        // 2024-03-04 is a Monday.
        let d = date(2024, 3, 4);
        assert_eq!(labeler.label(d, Granularity::Hour), "lun. 04/03/2024, 09:30");
        assert_eq!(labeler.label(d, Granularity::Day), "lun. 04/03/2024");
        assert_eq!(labeler.label(d, Granularity::Week), "2024, semaine 10");
        assert_eq!(labeler.label(d, Granularity::Month), "03/2024");
        assert_eq!(labeler.label(d, Granularity::Year), "2024");
    }

    #[test]
    fn test_duration_wire_format() {
        let duration = SeriesDuration::new(7, Granularity::Day);
        assert_eq!(duration.to_string(), "7 day");
    }

    #[test]
    fn test_subtract_from_calendar_units() {
        let duration = SeriesDuration::new(2, Granularity::Month);
        assert_eq!(duration.subtract_from(date(2024, 3, 4)), date(2024, 1, 4));

        let weeks = SeriesDuration::new(1, Granularity::Week);
        assert_eq!(weeks.subtract_from(date(2024, 3, 8)), date(2024, 3, 1));
    }

    #[test]
    fn test_zero_amount_clamped() {
        assert_eq!(SeriesDuration::new(0, Granularity::Day).amount, 1);
    }
}

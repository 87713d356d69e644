//! Localized display formatting for series values, shares and variations
//!
//! French-locale rendering (comma decimals, narrow no-break thousand
//! separators) to match the product surface; null values render as empty
//! strings rather than `NaN`.

use crate::catalog::ValueKind;

/// Narrow no-break space, the fr-FR thousands separator.
const THIN_SPACE: char = '\u{202f}';

/// Formats `value` with `decimals` fraction digits, comma decimal separator
/// and grouped thousands.
pub fn format_number(value: f64, decimals: usize) -> String {
    let rounded = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(THIN_SPACE);
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn format_currency(value: f64) -> String {
    format!("{}{}€", format_number(value, 2), THIN_SPACE)
}

/// Percent with one fraction digit, e.g. `0.123` → `"12,3 %"`.
pub fn format_percent(value: f64) -> String {
    format!("{}{}%", format_number(value * 100.0, 1), THIN_SPACE)
}

/// Renders a value according to its dimension kind; `None` renders empty.
pub fn format_value(kind: ValueKind, value: Option<f64>) -> String {
    let value = match value {
        Some(v) => v,
        None => return String::new(),
    };
    match kind {
        ValueKind::Currency => format_currency(value),
        ValueKind::Percent => format_percent(value),
        ValueKind::Integer => format_number(value.round(), 0),
        ValueKind::Decimal => format_number(value, 2),
    }
}

// ============================================================================
// SHARES
// ============================================================================

/// Quintile pie glyph for a share in `[0, 1]`.
pub fn share_glyph(share: f64) -> &'static str {
    if share < 1.0 / 8.0 {
        "⚪"
    } else if share < 3.0 / 8.0 {
        "◔"
    } else if share < 5.0 / 8.0 {
        "◑"
    } else if share < 7.0 / 8.0 {
        "◕"
    } else {
        "⚫"
    }
}

pub fn format_share(share: f64) -> String {
    format!("{} {}", share_glyph(share), format_percent(share))
}

// ============================================================================
// VARIATIONS
// ============================================================================

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// From a variation ratio (current / previous); 1.0 is flat.
    pub fn from_ratio(ratio: f64) -> Self {
        let delta = ratio - 1.0;
        if delta > 0.0 {
            Self::Up
        } else if delta < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Up => "⬈",
            Self::Down => "⬊",
            Self::Flat => "⬌",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => crate::colors::SUCCESS,
            Self::Down => crate::colors::ERROR,
            Self::Flat => crate::colors::NEUTRAL,
        }
    }
}

/// Renders a variation ratio as a signed relative change,
/// e.g. `1.5` → `"⬈ 50,0 %"`.
pub fn format_variation(ratio: f64) -> String {
    let delta = ratio - 1.0;
    format!("{} {}", Trend::from_ratio(ratio).glyph(), format_percent(delta.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_grouping_and_comma() {
        assert_eq!(format_number(1234567.5, 2), "1\u{202f}234\u{202f}567,50");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-1200.0, 2), "-1\u{202f}200,00");
    }

    #[test]
    fn test_format_value_kinds() {
        assert_eq!(
            format_value(ValueKind::Currency, Some(1234.5)),
            "1\u{202f}234,50\u{202f}€"
        );
        assert_eq!(format_value(ValueKind::Percent, Some(0.123)), "12,3\u{202f}%");
        assert_eq!(format_value(ValueKind::Integer, Some(41.6)), "42");
        assert_eq!(format_value(ValueKind::Decimal, None), "");
    }

    #[test]
    fn test_share_glyphs() {
        assert_eq!(share_glyph(0.05), "⚪");
        assert_eq!(share_glyph(0.25), "◔");
        assert_eq!(share_glyph(0.5), "◑");
        assert_eq!(share_glyph(0.8), "◕");
        assert_eq!(share_glyph(0.95), "⚫");
    }

    #[test]
    fn test_variation_direction() {
        assert_eq!(Trend::from_ratio(1.5), Trend::Up);
        assert_eq!(Trend::from_ratio(0.8), Trend::Down);
        assert_eq!(Trend::from_ratio(1.0), Trend::Flat);
        assert_eq!(format_variation(1.5), "⬈ 50,0\u{202f}%");
    }
}

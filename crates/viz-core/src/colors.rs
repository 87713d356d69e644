//! Palette and color assignment for plotted series
//!
//! Each selected dimension gets a base palette color; when several periods
//! are compared, older periods get progressively desaturated and lightened
//! variants of the same hue so the current period stays the most vivid.

use std::collections::HashMap;

// ============================================================================
// UI CONSTANTS
// ============================================================================

pub const SUCCESS: &str = "#22c55e";
pub const ERROR: &str = "#ef4444";
pub const NEUTRAL: &str = "#888888";
pub const BG_PANEL: &str = "#ffffff";
pub const BORDER: &str = "#e0e0e0";
pub const TEXT_PRIMARY: &str = "#212121";
pub const TEXT_MUTED: &str = "#757575";
pub const GRID: &str = "#eeeeee";

/// Base palette, cycled over dimension index.
pub const PALETTE: [&str; 12] = [
    "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#3B3EAC",
    "#0099C6", "#DD4477", "#66AA00", "#B82E2E", "#316395", "#994499",
];

// ============================================================================
// HEX / HSL CONVERSION
// ============================================================================

fn parse_hex(hex: &str) -> (f64, f64, f64) {
    let hex = hex.trim_start_matches('#');
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).unwrap_or("00"), 16).unwrap_or(0);
    (
        byte(0) as f64 / 255.0,
        byte(2) as f64 / 255.0,
        byte(4) as f64 / 255.0,
    )
}

fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

fn hue_component(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_component(p, q, h + 1.0 / 3.0),
            hue_component(p, q, h),
            hue_component(p, q, h - 1.0 / 3.0),
        )
    };
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

/// Desaturates by `desat` and lightens by `lighten`, both in HSL space.
pub fn fade(hex: &str, desat: f64, lighten: f64) -> String {
    let (r, g, b) = parse_hex(hex);
    let (h, s, l) = rgb_to_hsl(r, g, b);
    hsl_to_hex(h, (s - desat).clamp(0.0, 1.0), (l + lighten).clamp(0.0, 1.0))
}

// ============================================================================
// ASSIGNMENT
// ============================================================================

pub type ColorMap = HashMap<String, String>;

/// Assigns one color per `(period, key)` pair, keyed `"{period}.{key}"`.
///
/// Periods are indexed oldest first; the last period keeps the
/// full-strength palette entry and older ones fade toward gray. The total
/// fade span is capped so short comparisons still show a visible step and
/// long ones do not wash out entirely.
pub fn assign_colors(keys: &[String], periods: usize) -> ColorMap {
    let mut out = ColorMap::new();
    if periods == 0 {
        return out;
    }
    let span = (periods - 1) as f64;
    let (step_desat, step_lum) = if periods > 1 {
        ((0.3 * span).min(1.0) / span, (0.3 * span).min(0.6) / span)
    } else {
        (0.0, 0.0)
    };
    for (key_index, key) in keys.iter().enumerate() {
        let base = PALETTE[key_index % PALETTE.len()];
        for period in 0..periods {
            let t = span - period as f64;
            out.insert(
                format!("{period}.{key}"),
                fade(base, t * step_desat, t * step_lum),
            );
        }
    }
    out
}

// Type-effectiveness presentation: display tokens, goodness scores, color
// bands, and the grouped defensive chart for the Pokemon detail view.
//
// Multipliers arrive from the backend as the canonical set
// {0, ⅛, ¼, ½, 1, 2, 4, 8}; anything else (custom rulesets) falls back to
// log2-based scoring and plain decimal display.

use crate::derive::color::HslColor;
use crate::models::TypeEffectivenessEntry;

const EPSILON: f64 = 1e-9;

fn is(value: f64, target: f64) -> bool {
    (value - target).abs() < EPSILON
}

// ---------------------------------------------------------------------------
// Display tokens
// ---------------------------------------------------------------------------

/// Display token for a damage multiplier.
///
/// Fractions render as vulgar fractions; neutral (1×) renders empty because
/// the chart omits it visually; unrecognized values fall back to their
/// decimal form.
pub fn format_multiplier(value: f64) -> String {
    if is(value, 0.0) {
        "0".to_string()
    } else if is(value, 0.125) {
        "⅛".to_string()
    } else if is(value, 0.25) {
        "¼".to_string()
    } else if is(value, 0.5) {
        "½".to_string()
    } else if is(value, 1.0) {
        String::new()
    } else if is(value, 2.0) {
        "2".to_string()
    } else if is(value, 4.0) {
        "4".to_string()
    } else if is(value, 8.0) {
        "8".to_string()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Goodness score
// ---------------------------------------------------------------------------

/// Signed "goodness" of a multiplier from the defender's perspective:
/// +4 for immunity down to −3 for an 8× weakness, 0 for neutral.
///
/// Values outside the canonical set score as `-round(log2(value))`.
pub fn effectiveness_score(value: f64) -> i32 {
    if is(value, 0.0) {
        4
    } else if is(value, 0.125) {
        3
    } else if is(value, 0.25) {
        2
    } else if is(value, 0.5) {
        1
    } else if is(value, 1.0) {
        0
    } else if is(value, 2.0) {
        -1
    } else if is(value, 4.0) {
        -2
    } else if is(value, 8.0) {
        -3
    } else {
        -(value.log2().round() as i32)
    }
}

// ---------------------------------------------------------------------------
// Color bands
// ---------------------------------------------------------------------------

/// Background color band for a multiplier: greens for resistances, gray for
/// neutral, reds deepening with the weakness.
pub fn effectiveness_color(value: f64) -> HslColor {
    match effectiveness_score(value) {
        s if s >= 4 => HslColor::new(130.0, 60.0, 30.0),
        3 => HslColor::new(130.0, 55.0, 38.0),
        2 => HslColor::new(130.0, 50.0, 45.0),
        1 => HslColor::new(130.0, 45.0, 52.0),
        0 => HslColor::new(0.0, 0.0, 62.0),
        -1 => HslColor::new(25.0, 70.0, 52.0),
        -2 => HslColor::new(10.0, 72.0, 48.0),
        _ => HslColor::new(0.0, 75.0, 42.0),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Attacking types sharing one multiplier against a Pokemon.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivenessGroup {
    pub multiplier: f64,
    pub entries: Vec<TypeEffectivenessEntry>,
}

/// Group a Pokemon's defensive chart by multiplier.
///
/// Groups are ordered by descending multiplier (8× weaknesses first,
/// immunities last); types within a group sort alphabetically.
pub fn group_effectiveness(entries: &[TypeEffectivenessEntry]) -> Vec<EffectivenessGroup> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.multiplier
            .total_cmp(&a.multiplier)
            .then_with(|| a.attacking_type.cmp(&b.attacking_type))
    });

    let mut groups: Vec<EffectivenessGroup> = Vec::new();
    for entry in sorted {
        match groups.last_mut() {
            Some(group) if is(group.multiplier, entry.multiplier) => group.entries.push(entry),
            _ => groups.push(EffectivenessGroup {
                multiplier: entry.multiplier,
                entries: vec![entry],
            }),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

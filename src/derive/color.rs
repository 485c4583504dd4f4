// Stat-to-color mapping for the Pokemon browser's stat bars.
//
// Stats map onto a hue ramp at fixed saturation/lightness: red for weak
// stats through yellow and green into blue for the rare 150+ outliers. The
// ramp is piecewise linear so that the visually meaningful breakpoints
// (60, 100, 150) land on stable hues.

use std::fmt;

// ---------------------------------------------------------------------------
// Interpolation primitive
// ---------------------------------------------------------------------------

/// Linear interpolation between `a` and `b`; `t` outside [0, 1] extrapolates.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// HslColor
// ---------------------------------------------------------------------------

/// An HSL color, displayed in the CSS `hsl(h, s%, l%)` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslColor {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        HslColor {
            hue,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

// ---------------------------------------------------------------------------
// Stat ramp
// ---------------------------------------------------------------------------

const STAT_SATURATION: f64 = 72.0;
const STAT_LIGHTNESS: f64 = 50.0;

/// Map a base stat value onto the hue ramp.
///
/// Segments: 0→25 over [0, 60], 25→55 over (60, 100], 55→130 over
/// (100, 150]. Above 150 the ramp runs 130→240 with the fraction
/// `(value - 150) / 105` clamped at 1.5, so extreme stats keep
/// differentiating up to hue 295 and then saturate.
pub fn stat_color(value: u32) -> HslColor {
    let v = value as f64;
    let hue = if v <= 60.0 {
        lerp(0.0, 25.0, v / 60.0)
    } else if v <= 100.0 {
        lerp(25.0, 55.0, (v - 60.0) / 40.0)
    } else if v <= 150.0 {
        lerp(55.0, 130.0, (v - 100.0) / 50.0)
    } else {
        let t = ((v - 150.0) / 105.0).min(1.5);
        lerp(130.0, 240.0, t)
    };

    HslColor::new(hue, STAT_SATURATION, STAT_LIGHTNESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! HSL/RGB/hex conversion and tint ramps.

use std::collections::BTreeMap;

/// Ramp weights, lightest to darkest.
pub const RAMP_WEIGHTS: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

/// Lightness ceiling the light end of a ramp moves toward.
const RAMP_LIGHT_END: f64 = 97.0;
/// Lightness floor the dark end of a ramp moves toward.
const RAMP_DARK_END: f64 = 8.0;

/// Largest possible Euclidean distance between two RGB colors.
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7; // sqrt(3 * 255^2)

/// Normalize a hue into `[0, 360)`.
#[must_use]
pub fn normalize_hue(hue: f64) -> f64 {
    hue.rem_euclid(360.0)
}

/// Convert HSL (hue in degrees, saturation and lightness in percent) to RGB.
#[must_use]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = normalize_hue(h) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = to_channel(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert RGB to HSL (degrees, percent, percent).
#[must_use]
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s * 100.0, l * 100.0)
}

#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional).
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    match digits.len() {
        6 => Some((
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        )),
        3 => {
            let mut channels = digits.chars().map(|c| {
                c.to_digit(16)
                    .and_then(|d| u8::try_from(d * 17).ok())
            });
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        _ => None,
    }
}

#[must_use]
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let (r, g, b) = hsl_to_rgb(h, s, l);
    rgb_to_hex(r, g, b)
}

/// Euclidean distance in RGB space.
#[must_use]
pub fn rgb_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let dr = f64::from(a.0) - f64::from(b.0);
    let dg = f64::from(a.1) - f64::from(b.1);
    let db = f64::from(a.2) - f64::from(b.2);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Lightness at each ramp weight for a base lightness at 500.
fn ramp_lightness(weight: u16, base: f64) -> f64 {
    let factor = match weight {
        50 => 0.9,
        100 => 0.8,
        200 => 0.6,
        300 => 0.4,
        400 => 0.2,
        500 => 0.0,
        600 => -0.2,
        700 => -0.4,
        800 => -0.6,
        _ => -0.8,
    };
    if factor >= 0.0 {
        base + (RAMP_LIGHT_END - base).max(0.0) * factor
    } else {
        base - (base - RAMP_DARK_END).max(0.0) * -factor
    }
}

/// Build a 50..900 ramp whose 500 weight is exactly `hsl(h, s, l)`.
#[must_use]
pub fn tint_ramp(h: f64, s: f64, l: f64) -> BTreeMap<u16, String> {
    RAMP_WEIGHTS
        .iter()
        .map(|&w| (w, hsl_to_hex(h, s, ramp_lightness(w, l))))
        .collect()
}

//! Line graph color palettes.
//!
//! A palette is three `scale` colors. Graphs with one or two series use the
//! first colors directly; graphs with more series get a gradient through
//! the three colors, interpolated in CIE LCH so perceived lightness changes
//! evenly.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Type tag carried by every palette color.
pub const COLOR_TYPE_SCALE: &str = "scale";

/// Number of colors in a line palette.
pub const LINE_PALETTE_SIZE: usize = 3;

/// One color of a line palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineColor {
    #[serde(rename = "type")]
    pub color_type: Cow<'static, str>,
    pub hex: Cow<'static, str>,
    #[serde(default)]
    pub id: Cow<'static, str>,
    #[serde(default)]
    pub name: Cow<'static, str>,
    #[serde(default)]
    pub value: f64,
}

/// A named palette in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineColorScale {
    pub name: &'static str,
    pub id: &'static str,
    pub colors: &'static [LineColor; LINE_PALETTE_SIZE],
}

const fn scale_color(hex: &'static str, id: &'static str, name: &'static str) -> LineColor {
    LineColor {
        color_type: Cow::Borrowed(COLOR_TYPE_SCALE),
        hex: Cow::Borrowed(hex),
        id: Cow::Borrowed(id),
        name: Cow::Borrowed(name),
        value: 0.0,
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub static LINE_COLORS_A: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#31C0F6", "0", "Nineteen Eighty Four"),
    scale_color("#A500A5", "0", "Nineteen Eighty Four"),
    scale_color("#FF7E27", "0", "Nineteen Eighty Four"),
];

pub static LINE_COLORS_B: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#74D495", "1", "Atlantis"),
    scale_color("#3F3FBA", "1", "Atlantis"),
    scale_color("#EA5994", "1", "Atlantis"),
];

pub static LINE_COLORS_C: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#8F8AF4", "1", "Do Androids Dream of Electric Sheep?"),
    scale_color("#A51414", "1", "Do Androids Dream of Electric Sheep?"),
    scale_color("#F4CF31", "1", "Do Androids Dream of Electric Sheep?"),
];

pub static LINE_COLORS_D: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#FD7A5D", "1", "Delorean"),
    scale_color("#5F1CF2", "1", "Delorean"),
    scale_color("#4CE09A", "1", "Delorean"),
];

pub static LINE_COLORS_E: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#FDC44F", "1", "Cthulhu"),
    scale_color("#007C76", "1", "Cthulhu"),
    scale_color("#8983FF", "1", "Cthulhu"),
];

pub static LINE_COLORS_F: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#DA6FF1", "1", "Ectoplasm"),
    scale_color("#00717A", "1", "Ectoplasm"),
    scale_color("#ACFF76", "1", "Ectoplasm"),
];

pub static LINE_COLORS_G: [LineColor; LINE_PALETTE_SIZE] = [
    scale_color("#F6F6F8", "1", "T-Max 400 Film"),
    scale_color("#A4A8B6", "1", "T-Max 400 Film"),
    scale_color("#545667", "1", "T-Max 400 Film"),
];

/// Palette used whenever a supplied palette fails validation.
pub static DEFAULT_LINE_COLORS: &[LineColor; LINE_PALETTE_SIZE] = &LINE_COLORS_A;

/// Every palette, in picker order.
pub static LINE_COLOR_SCALES: [LineColorScale; 7] = [
    LineColorScale {
        name: "Nineteen Eighty Four",
        id: "0",
        colors: &LINE_COLORS_A,
    },
    LineColorScale {
        name: "Atlantis",
        id: "1",
        colors: &LINE_COLORS_B,
    },
    LineColorScale {
        name: "Do Androids Dream of Electric Sheep?",
        id: "1",
        colors: &LINE_COLORS_C,
    },
    LineColorScale {
        name: "Delorean",
        id: "1",
        colors: &LINE_COLORS_D,
    },
    LineColorScale {
        name: "Cthulhu",
        id: "1",
        colors: &LINE_COLORS_E,
    },
    LineColorScale {
        name: "Ectoplasm",
        id: "1",
        colors: &LINE_COLORS_F,
    },
    LineColorScale {
        name: "T-Max 400 Film",
        id: "1",
        colors: &LINE_COLORS_G,
    },
];

/// Look up a catalog palette by name.
pub fn find_line_color_scale(name: &str) -> Option<&'static LineColorScale> {
    LINE_COLOR_SCALES.iter().find(|s| s.name == name)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Return `colors` if it is a well-formed palette, else the default palette.
///
/// Well-formed means exactly three entries, all typed `scale`. This never
/// fails: a bad palette silently falls back.
pub fn validate_line_colors(colors: &[LineColor]) -> &[LineColor] {
    let well_formed = colors.len() == LINE_PALETTE_SIZE
        && colors.iter().all(|c| c.color_type == COLOR_TYPE_SCALE);

    if well_formed {
        colors
    } else {
        DEFAULT_LINE_COLORS
    }
}

/// Hex colors for a graph with `num_series` series.
///
/// One or two series take the first palette colors as-is. Three or more get
/// exactly `num_series` lowercase `#rrggbb` colors along an LCH gradient
/// through the palette.
pub fn get_line_colors_hexes(
    colors: &[LineColor],
    num_series: usize,
) -> Result<Vec<String>, CoreError> {
    if num_series == 0 {
        return Err(CoreError::Validation(
            "Number of series must be at least 1".to_string(),
        ));
    }

    let hexes: Vec<&str> = validate_line_colors(colors)
        .iter()
        .map(|c| c.hex.as_ref())
        .collect();

    if num_series <= 2 {
        return Ok(hexes[..num_series].iter().map(|h| h.to_string()).collect());
    }

    let stops = hexes
        .iter()
        .map(|h| Rgb::from_hex(h).map(Lch::from_rgb))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lch_gradient(&stops, num_series)
        .into_iter()
        .map(|c| c.to_hex())
        .collect())
}

/// Sample `count` colors evenly across piecewise-linear LCH segments.
fn lch_gradient(stops: &[Lch], count: usize) -> Vec<Rgb> {
    let segments = stops.len() - 1;
    (0..count)
        .map(|i| {
            let position = i as f64 * segments as f64 / (count - 1) as f64;
            let segment = (position.floor() as usize).min(segments - 1);
            let f = position - segment as f64;
            if f == 0.0 {
                stops[segment].to_rgb()
            } else {
                stops[segment].mix(&stops[segment + 1], f).to_rgb()
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color math (sRGB <-> CIE Lab D65 <-> LCH)
// ---------------------------------------------------------------------------

const XN: f64 = 0.950_470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_830;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// Below this chroma a color has no meaningful hue.
const ACHROMATIC_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

impl Rgb {
    fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || CoreError::Validation(format!("Invalid hex color '{hex}'"));
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(f64::from)
                .map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    fn to_hex(self) -> String {
        let byte = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Lch {
    l: f64,
    c: f64,
    /// Degrees in `[0, 360)`; `None` for achromatic colors.
    h: Option<f64>,
}

impl Lch {
    fn from_rgb(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r);
        let g = srgb_to_linear(rgb.g);
        let b = srgb_to_linear(rgb.b);

        let x = lab_f((0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / XN);
        let y = lab_f((0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / YN);
        let z = lab_f((0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / ZN);

        let l = 116.0 * y - 16.0;
        let a = 500.0 * (x - y);
        let bb = 200.0 * (y - z);

        let c = a.hypot(bb);
        let h = (c >= ACHROMATIC_EPSILON).then(|| bb.atan2(a).to_degrees().rem_euclid(360.0));
        Self { l, c, h }
    }

    fn to_rgb(self) -> Rgb {
        let h = self.h.unwrap_or(0.0).to_radians();
        let a = self.c * h.cos();
        let bb = self.c * h.sin();

        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - bb / 200.0;

        let x = XN * lab_f_inv(fx);
        let y = YN * lab_f_inv(fy);
        let z = ZN * lab_f_inv(fz);

        Rgb {
            r: linear_to_srgb(3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z),
            g: linear_to_srgb(-0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z),
            b: linear_to_srgb(0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z),
        }
    }

    /// Interpolate towards `other`, taking the shorter way round the hue circle.
    fn mix(&self, other: &Lch, f: f64) -> Lch {
        let h = match (self.h, other.h) {
            (Some(h0), Some(h1)) => {
                let mut dh = h1 - h0;
                if dh > 180.0 {
                    dh -= 360.0;
                } else if dh < -180.0 {
                    dh += 360.0;
                }
                Some((h0 + f * dh).rem_euclid(360.0))
            }
            (Some(h0), None) => Some(h0),
            (None, h1) => h1,
        };
        Lch {
            l: self.l + f * (other.l - self.l),
            c: self.c + f * (other.c - self.c),
            h,
        }
    }
}

fn srgb_to_linear(channel: f64) -> f64 {
    let c = channel / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    255.0 * v.clamp(0.0, 1.0)
}

fn lab_f(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

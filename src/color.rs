use std::collections::BTreeMap;
use std::fmt;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::CellValue;

/// Plain 8-bit sRGB colour shared by the HTML and PNG exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(160, 160, 160);
    /// Single-series marker colour.
    pub const DEFAULT: Rgb = Rgb(99, 110, 250);

    fn from_srgb(rgb: Srgb) -> Self {
        let rgb: Srgb<u8> = rgb.into_format();
        Rgb(rgb.red, rgb.green, rgb.blue)
    }
}

impl fmt::Display for Rgb {
    /// CSS notation, as understood by the chart runtime.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            Rgb::from_srgb(hsl.into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: categorical value → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map from distinct values, in the order given.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let values: Vec<&CellValue> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: numeric value → Rgb
// ---------------------------------------------------------------------------

/// Viridis stops, evenly spaced over [0, 1].
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Name of the matching scale in the chart runtime.
pub const COLORSCALE_NAME: &str = "Viridis";

/// Linear colour scale over `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return Rgb::GRAY;
        };
        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((v - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        viridis(t as f32)
    }
}

fn viridis(t: f32) -> Rgb {
    let segments = (VIRIDIS.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let local = pos - i as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = stop(VIRIDIS[i]).mix(stop(VIRIDIS[i + 1]), local);
    Rgb::from_srgb(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_are_distinct() {
        let colors = generate_palette(6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color_map_unknown_is_gray() {
        let values = [CellValue::String("a".into()), CellValue::String("b".into())];
        let map = ColorMap::new(values.iter());
        assert_ne!(map.color_for(&values[0]), map.color_for(&values[1]));
        assert_eq!(map.color_for(&CellValue::String("zzz".into())), Rgb::GRAY);
    }

    #[test]
    fn test_scale_endpoints_match_viridis() {
        let scale = ColorScale { min: 0.0, max: 10.0 };
        assert_eq!(scale.color_for(Some(0.0)), Rgb(68, 1, 84));
        assert_eq!(scale.color_for(Some(10.0)), Rgb(253, 231, 37));
        assert_eq!(scale.color_for(None), Rgb::GRAY);
    }

    #[test]
    fn test_css_notation() {
        assert_eq!(Rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
    }
}

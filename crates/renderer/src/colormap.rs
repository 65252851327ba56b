//! Linear colormaps built from lists of RGB triples.
//!
//! A colormap file is a JSON array of `[r, g, b]` triples in `0.0..=1.0`.
//! Each triple becomes a `#RRGGBB` string with every channel scaled by 255
//! and truncated.

use std::path::Path;

use crate::error::{RenderError, RenderResult};

const BUILTIN: [(&str, &str); 4] = [
    ("viridis", include_str!("../cmaps/viridis.json")),
    ("greys", include_str!("../cmaps/greys.json")),
    ("thermal", include_str!("../cmaps/thermal.json")),
    ("coolwarm", include_str!("../cmaps/coolwarm.json")),
];

/// Names of the colormaps that ship with the renderer.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    pub name: String,
    /// Colors as `#RRGGBB`
    pub hex_colors: Vec<String>,
    rgb: Vec<[u8; 3]>,
}

impl Colormap {
    /// Look `name` up in `cmap_dir` (as `<name>.json`) and then among the built-ins.
    pub fn load(name: &str, cmap_dir: Option<&Path>) -> RenderResult<Self> {
        if let Some(dir) = cmap_dir {
            let path = dir.join(format!("{}.json", name));
            if path.is_file() {
                let text = std::fs::read_to_string(&path)?;
                return Self::from_json(name, &text);
            }
        }

        BUILTIN
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| RenderError::ColormapNotFound(name.to_string()))
            .and_then(|(_, text)| Self::from_json(name, text))
    }

    pub fn from_json(name: &str, text: &str) -> RenderResult<Self> {
        let triples: Vec<[f64; 3]> = serde_json::from_str(text).map_err(|e| RenderError::InvalidColormap {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Self::from_triples(name, &triples)
    }

    pub fn from_triples(name: &str, triples: &[[f64; 3]]) -> RenderResult<Self> {
        if triples.is_empty() {
            return Err(RenderError::InvalidColormap {
                name: name.to_string(),
                message: "no colors".to_string(),
            });
        }

        let rgb: Vec<[u8; 3]> = triples.iter().map(|t| t.map(channel)).collect();
        let hex_colors = rgb
            .iter()
            .map(|[r, g, b]| format!("#{:02X}{:02X}{:02X}", r, g, b))
            .collect();

        Ok(Self {
            name: name.to_string(),
            hex_colors,
            rgb,
        })
    }

    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    /// Opaque color at `t` in `[0, 1]`, interpolating linearly between entries.
    pub fn color_at(&self, t: f64) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.rgb.len() - 1;
        if last == 0 {
            let [r, g, b] = self.rgb[0];
            return [r, g, b, 255];
        }

        let pos = t * last as f64;
        let lo = (pos.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let frac = pos - lo as f64;

        let mix = |i: usize| {
            let a = self.rgb[lo][i] as f64;
            let b = self.rgb[hi][i] as f64;
            (a + (b - a) * frac).round() as u8
        };
        [mix(0), mix(1), mix(2), 255]
    }
}

/// `int(255 * c)`, saturating at the ends.
fn channel(c: f64) -> u8 {
    (255.0 * c).clamp(0.0, 255.0) as u8
}

//! Stable entity colors.
//!
//! Rules, per series (entity id parsed from the series id):
//! 1. An explicit user color wins. Further series of the same entity (one per extra
//!    variable) get that color brightened by one step per repeat.
//! 2. Otherwise the [`ColorCache`] entry for the entity is reused.
//! 3. Otherwise a random color is generated and cached, so the entity keeps it for the
//!    lifetime of the cache.

use crate::models::Series;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// HSL lightness added per brightness step.
pub const BRIGHTNESS_STEP: f64 = 0.10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct Hsl {
    pub h_deg: f64, // 0..360
    pub s: f64,     // 0..1
    pub l: f64,     // 0..1
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let expand = |v: u8| v * 17;
                Some(Self::new(
                    expand(channel(0, 1)?),
                    expand(channel(1, 1)?),
                    expand(channel(2, 1)?),
                ))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance (sRGB weights, no gamma), 0..1.
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Same hue, lightness raised by `steps` brightness steps.
    pub fn brighter(&self, steps: u32) -> Self {
        if steps == 0 {
            return *self;
        }
        let mut hsl = rgb_to_hsl(*self);
        hsl.l = clamp01(hsl.l + BRIGHTNESS_STEP * steps as f64);
        hsl_to_rgb8(hsl)
    }
}

/// Brightened variant of a color string; strings that are not hex colors are returned as-is.
pub fn brighten_color(color: &str, steps: u32) -> String {
    match Rgb8::from_hex(color) {
        Some(rgb) => rgb.brighter(steps).to_hex(),
        None => {
            log::debug!("cannot brighten non-hex color {color:?}; reusing it");
            color.to_string()
        }
    }
}

/// Cache key: the entity when the series id parses, otherwise the raw id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Entity(i64),
    Unparsed(String),
}

impl ColorKey {
    pub fn for_series(series: &Series) -> Self {
        match series.entity_id() {
            Some(id) => ColorKey::Entity(id.entity),
            None => ColorKey::Unparsed(series.id.clone()),
        }
    }
}

/// Entity → color mapping kept for the lifetime of one chart session.
///
/// Writes are append-only: once a key has a color it keeps it until [`ColorCache::reset`].
#[derive(Debug, Clone)]
pub struct ColorCache {
    colors: HashMap<ColorKey, String>,
    rng: StdRng,
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCache {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic cache, for tests and reproducible previews.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            colors: HashMap::new(),
            rng,
        }
    }

    pub fn get(&self, key: &ColorKey) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Cached color for `key`, generating and storing a random one on first use.
    pub fn get_or_insert_random(&mut self, key: ColorKey) -> String {
        let rng = &mut self.rng;
        self.colors
            .entry(key)
            .or_insert_with(|| random_color(rng))
            .clone()
    }

    /// Forget every color; called when a new chart session starts.
    pub fn reset(&mut self) {
        self.colors.clear();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Uniform random `#rrggbb`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let v: u32 = rng.gen_range(0..=0x00FF_FFFF);
    format!("#{v:06x}")
}

/// Set `color` on every series. Returns the same slice for chaining.
pub fn assign_colors<'a>(
    series: &'a mut [Series],
    explicit: &HashMap<i64, String>,
    cache: &mut ColorCache,
) -> &'a mut [Series] {
    let mut repeats: HashMap<i64, u32> = HashMap::new();

    for s in series.iter_mut() {
        let key = ColorKey::for_series(s);
        let explicit_color = match &key {
            ColorKey::Entity(id) => explicit.get(id).map(|c| (*id, c)),
            ColorKey::Unparsed(_) => None,
        };

        let color = match explicit_color {
            Some((id, base)) => {
                let seen = repeats.entry(id).or_insert(0);
                let color = if *seen == 0 {
                    base.clone()
                } else {
                    brighten_color(base, *seen)
                };
                *seen += 1;
                color
            }
            None => cache.get_or_insert_random(key),
        };
        s.color = Some(color);
    }

    series
}

// ------------------------ HSL helpers ------------------------

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub fn rgb_to_hsl(rgb: Rgb8) -> Hsl {
    let (r, g, b) = (
        rgb.r as f64 / 255.0,
        rgb.g as f64 / 255.0,
        rgb.b as f64 / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta == 0.0 {
        return Hsl { h_deg: 0.0, s: 0.0, l };
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let h_deg = if hue < 0.0 { hue + 360.0 } else { hue };

    Hsl { h_deg, s, l }
}

// HSL -> RGB conversion (linear; sufficient for chart colors)
pub fn hsl_to_rgb8(hsl: Hsl) -> Rgb8 {
    let h = (hsl.h_deg % 360.0) / 360.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8 { r: v, g: v, b: v };
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
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

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb8 {
        r: (r * 255.0).round() as u8,
        g: (g * 255.0).round() as u8,
        b: (b * 255.0).round() as u8,
    }
}

//! Axis tick-label formatting: prefix, locale-grouped number, suffix.

use crate::config::AxisConfig;
use crate::domain::Extent;
use crate::text::estimate_text_width_px;
use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Decimal places used when the axis does not set `format`.
fn auto_precision(v: f64) -> usize {
    let a = v.abs();
    if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    }
}

/// Format one tick value for `axis`.
pub fn format_tick(value: f64, axis: &AxisConfig, locale_tag: &str) -> String {
    if !value.is_finite() {
        return format!("{}{}{}", axis.prefix, value, axis.suffix);
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let decimals = axis
        .format
        .map(|d| d as usize)
        .unwrap_or_else(|| auto_precision(value));

    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(locale),
        Err(_) => int_part.to_string(),
    };
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    let mut out = String::with_capacity(rounded.len() + axis.prefix.len() + axis.suffix.len() + 4);
    out.push_str(sign);
    out.push_str(&axis.prefix);
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    out.push_str(&axis.suffix);
    out
}

/// `count + 1` evenly spaced values from `extent.min` to `extent.max`.
pub fn tick_values(extent: Extent, count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![extent.min];
    }
    (0..=count)
        .map(|i| extent.min + (extent.max - extent.min) * (i as f64 / count as f64))
        .collect()
}

/// Width of the y-axis label gutter (in pixels) needed by the formatted ticks.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn label_area_width_px(
    extent: Extent,
    ticks: usize,
    axis: &AxisConfig,
    locale_tag: &str,
    font_px: f64,
) -> f64 {
    let max_px = tick_values(extent, ticks)
        .into_iter()
        .map(|v| estimate_text_width_px(&format_tick(v, axis, locale_tag), font_px))
        .fold(0.0, f64::max);
    // Room for tick marks plus the configured label distance.
    let with_padding = max_px + 18.0 + axis.label_distance.unwrap_or(0.0).max(0.0);
    with_padding.clamp(48.0, 140.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(prefix: &str, suffix: &str, format: Option<u32>) -> AxisConfig {
        AxisConfig {
            prefix: prefix.into(),
            suffix: suffix.into(),
            format,
            ..AxisConfig::default()
        }
    }

    #[test]
    fn groups_thousands_per_locale() {
        let a = axis("", "", Some(0));
        assert_eq!(format_tick(1234567.0, &a, "en"), "1,234,567");
        assert_eq!(format_tick(1234567.0, &a, "de"), "1.234.567");
    }

    #[test]
    fn applies_prefix_suffix_and_decimals() {
        assert_eq!(format_tick(-1500.27, &axis("$", "", Some(1)), "en"), "-$1,500.3");
        assert_eq!(format_tick(12.5, &axis("", "%", None), "en"), "12.5%");
        assert_eq!(format_tick(0.5, &axis("", "", None), "de"), "0,50");
        assert_eq!(format_tick(-0.001, &axis("", "", Some(0)), "en"), "0");
    }

    #[test]
    fn ticks_span_extent() {
        let t = tick_values(Extent::new(0.0, 100.0), 4);
        assert_eq!(t, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn label_gutter_is_clamped() {
        let a = axis("", "", Some(0));
        assert_eq!(label_area_width_px(Extent::new(0.0, 1.0), 2, &a, "en", 12.0), 48.0);
        let wide = axis("$", " per capita (constant 2015 US$)", Some(2));
        assert_eq!(label_area_width_px(Extent::new(0.0, 1e9), 4, &wide, "en", 12.0), 140.0);
    }
}

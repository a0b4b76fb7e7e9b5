//! Token mapping.
//!
//! Resolves raw IR values (colors, lengths, gradients, shadows) against the
//! design token table. Every lookup either hits a token or falls back to a raw
//! CSS literal, and both outcomes are counted.

use canopy_core::ir::{GradientKind, IrColor, IrGradient, IrShadow};
use canopy_core::tokens::{DesignTokens, TokenPath};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

/// Maximum distance in px for a length to snap to a token.
pub const LENGTH_TOLERANCE: f64 = 2.0;

/// Principal gradient directions, clockwise from "to top".
pub const DIRECTIONS: [&str; 8] = ["t", "tr", "r", "br", "b", "bl", "l", "tl"];

/// Counters of token hits and raw fallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    pub token_hits: usize,
    pub fallbacks: usize,
}

impl MappingStats {
    pub fn merge(&mut self, other: MappingStats) {
        self.token_hits += other.token_hits;
        self.fallbacks += other.fallbacks;
    }
}

/// A value resolved against the token table.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A token hit, with the token's own CSS value.
    Token { path: TokenPath, css: String },
    /// No token matched; the raw CSS literal.
    Raw(String),
}

impl TokenValue {
    /// The CSS value regardless of how it was resolved.
    pub fn css(&self) -> &str {
        match self {
            TokenValue::Token { css, .. } => css,
            TokenValue::Raw(css) => css,
        }
    }

    pub fn path(&self) -> Option<&TokenPath> {
        match self {
            TokenValue::Token { path, .. } => Some(path),
            TokenValue::Raw(_) => None,
        }
    }
}

/// A resolved gradient.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientValue {
    /// Two-stop linear gradient along a principal direction.
    Directional {
        direction: &'static str,
        from: TokenValue,
        to: TokenValue,
    },
    /// Any other gradient, as a CSS expression.
    Raw(String),
}

/// Four-sided box values collapsed to CSS shorthand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxShorthand {
    One(f64),
    Pair { vertical: f64, horizontal: f64 },
    Four([f64; 4]),
}

/// Collapse `[top, right, bottom, left]`.
pub fn collapse_box(values: [f64; 4]) -> BoxShorthand {
    let [top, right, bottom, left] = values;
    if top == right && right == bottom && bottom == left {
        BoxShorthand::One(top)
    } else if top == bottom && left == right {
        BoxShorthand::Pair { vertical: top, horizontal: right }
    } else {
        BoxShorthand::Four(values)
    }
}

/// Format a number without trailing zeros (`16`, `1.5`).
pub fn format_number(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// A px length literal.
pub fn px(v: f64) -> String {
    format!("{}px", format_number(v))
}

/// CSS for a shadow list.
pub fn shadow_css(shadows: &[IrShadow]) -> String {
    shadows
        .iter()
        .map(|s| {
            format!(
                "{}{} {} {} {} {}",
                if s.inset { "inset " } else { "" },
                px(s.x),
                px(s.y),
                px(s.blur),
                px(s.spread),
                s.color.to_css()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// CSS for a gradient, with stop colors already rendered.
pub fn gradient_css(gradient: &IrGradient, stop_colors: &[String]) -> String {
    let stops = gradient
        .stops
        .iter()
        .zip(stop_colors)
        .map(|(stop, color)| format!("{} {}%", color, format_number(stop.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ");
    match gradient.kind {
        GradientKind::Linear => {
            format!("linear-gradient({}deg, {})", format_number(gradient.angle.unwrap_or(180.0)), stops)
        }
        GradientKind::Radial => format!("radial-gradient(circle, {})", stops),
        GradientKind::Angular => format!("conic-gradient({})", stops),
    }
}

static SHADOW_PRESET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?[\d.]+)(?:px)?\s+(-?[\d.]+)(?:px)?\s+(-?[\d.]+)(?:px)?\s+(-?[\d.]+)(?:px)?\s+(.+?)\s*$")
        .expect("shadow preset pattern is valid")
});

static RGBA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([\d.]+)\s*)?\)$").expect("rgba pattern is valid")
});

/// Parse a single-layer CSS shadow such as `0 4px 6px -1px rgba(0, 0, 0, 0.1)`.
pub fn parse_shadow(css: &str) -> Option<IrShadow> {
    let caps = SHADOW_PRESET.captures(css)?;
    let num = |i: usize| caps[i].parse::<f64>().ok();
    Some(IrShadow {
        inset: false,
        x: num(1)?,
        y: num(2)?,
        blur: num(3)?,
        spread: num(4)?,
        color: parse_color(&caps[5])?,
    })
}

/// Parse a hex or `rgb()`/`rgba()` color literal.
pub fn parse_color(css: &str) -> Option<IrColor> {
    let css = css.trim();
    if css.starts_with('#') {
        return IrColor::from_hex(css);
    }
    let caps = RGBA.captures(css)?;
    let channel = |i: usize| caps[i].parse::<u8>().ok();
    let alpha = match caps.get(4) {
        Some(a) => a.as_str().parse::<f64>().ok()?,
        None => 1.0,
    };
    Some(IrColor::rgba(channel(1)?, channel(2)?, channel(3)?, alpha))
}

fn same_color(a: &IrColor, b: &IrColor) -> bool {
    a.r == b.r && a.g == b.g && a.b == b.b && (a.a - b.a).abs() < 0.005
}

fn same_shadow(a: &IrShadow, b: &IrShadow) -> bool {
    let close = |x: f64, y: f64| (x - y).abs() < 0.005;
    a.inset == b.inset
        && close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.blur, b.blur)
        && close(a.spread, b.spread)
        && same_color(&a.color, &b.color)
}

/// Resolves IR values against a shared token table.
#[derive(Debug, Clone)]
pub struct TokenMapper {
    tokens: Arc<DesignTokens>,
    stats: MappingStats,
}

impl TokenMapper {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self { tokens, stats: MappingStats::default() }
    }

    pub fn tokens(&self) -> &DesignTokens {
        &self.tokens
    }

    pub fn stats(&self) -> MappingStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MappingStats::default();
    }

    fn hit(&mut self, path: TokenPath, css: String) -> TokenValue {
        self.stats.token_hits += 1;
        TokenValue::Token { path, css }
    }

    fn raw(&mut self, css: String) -> TokenValue {
        self.stats.fallbacks += 1;
        TokenValue::Raw(css)
    }

    /// A color whose shared style is named like a color token resolves to
    /// that token; otherwise an exact, case-insensitive hex match.
    /// Translucent colors never match.
    pub fn map_color(&mut self, color: &IrColor) -> TokenValue {
        if color.is_opaque() {
            if let Some((path, css)) = color.token_ref.as_deref().and_then(|name| self.named_color(name)) {
                return self.hit(path, css);
            }
            let hex = color.to_hex();
            let found = self
                .tokens
                .color_entries()
                .find(|(_, value)| IrColor::from_hex(value).map(|c| c.to_hex()).as_deref() == Some(hex.as_str()))
                .map(|(path, value)| (path, value.to_lowercase()));
            if let Some((path, css)) = found {
                return self.hit(path, css);
            }
        }
        self.raw(color.to_css())
    }

    /// Color token whose group and shade spell `name`, e.g. `Blue/500` for
    /// `colors.blue.500` or `White` for `colors.white.DEFAULT`.
    fn named_color(&self, name: &str) -> Option<(TokenPath, String)> {
        let wanted = name_segments(name);
        if wanted.is_empty() {
            return None;
        }
        self.tokens
            .color_entries()
            .find(|(path, _)| {
                let segments: Vec<String> = path
                    .0
                    .iter()
                    .skip(1)
                    .filter(|s| s.as_str() != "DEFAULT")
                    .map(|s| s.to_lowercase())
                    .collect();
                segments == wanted
            })
            .map(|(path, value)| (path, value.to_lowercase()))
    }

    /// Nearest spacing step within [`LENGTH_TOLERANCE`].
    pub fn map_spacing(&mut self, value: f64) -> TokenValue {
        let found = nearest(&self.tokens.spacing, value);
        self.length(found, "spacing", value)
    }

    /// Nearest radius step within [`LENGTH_TOLERANCE`].
    pub fn map_radius(&mut self, value: f64) -> TokenValue {
        let found = nearest(&self.tokens.border_radius, value);
        self.length(found, "borderRadius", value)
    }

    fn length(&mut self, found: Option<(String, f64)>, table: &str, value: f64) -> TokenValue {
        match found {
            Some((key, token)) => self.hit(TokenPath::new([table.to_string(), key]), px(token)),
            None => self.raw(px(value)),
        }
    }

    /// Typography step with exactly this font size.
    pub fn map_font_size(&mut self, size: f64) -> TokenValue {
        let found = self
            .tokens
            .typography
            .iter()
            .find(|(_, t)| (t.font_size - size).abs() < 0.5)
            .map(|(key, t)| (key.clone(), t.font_size));
        match found {
            Some((key, token)) => self.hit(TokenPath::new(["typography".to_string(), key]), px(token)),
            None => self.raw(px(size)),
        }
    }

    /// A single drop shadow equal to a preset maps to that preset.
    pub fn map_shadow(&mut self, shadows: &[IrShadow]) -> TokenValue {
        if let [shadow] = shadows {
            let found = self
                .tokens
                .shadows
                .iter()
                .find(|(_, css)| parse_shadow(css).is_some_and(|preset| same_shadow(&preset, shadow)))
                .map(|(key, css)| (key.clone(), css.clone()));
            if let Some((key, css)) = found {
                return self.hit(TokenPath::new(["shadows".to_string(), key]), css);
            }
        }
        self.raw(shadow_css(shadows))
    }

    /// Two-stop linear gradients map to the nearest principal direction plus
    /// two colors; everything else is a raw expression.
    pub fn map_gradient(&mut self, gradient: &IrGradient) -> GradientValue {
        if let (GradientKind::Linear, Some(angle), [from, to]) =
            (gradient.kind, gradient.angle, gradient.stops.as_slice())
        {
            if let Some(direction) = principal_direction(angle) {
                self.stats.token_hits += 1;
                let from = self.map_color(&from.color);
                let to = self.map_color(&to.color);
                return GradientValue::Directional { direction, from, to };
            }
        }
        self.stats.fallbacks += 1;
        let colors: Vec<String> = gradient.stops.iter().map(|s| s.color.to_css()).collect();
        GradientValue::Raw(gradient_css(gradient, &colors))
    }
}

/// The principal direction `angle` rounds to. Non-finite angles are unresolved.
pub fn principal_direction(angle: f64) -> Option<&'static str> {
    if !angle.is_finite() {
        return None;
    }
    let bucket = (angle.rem_euclid(360.0) / 45.0).round() as usize;
    Some(DIRECTIONS[bucket % DIRECTIONS.len()])
}

/// Lowercase words of a style name, without a leading `color`/`colors`.
fn name_segments(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .skip_while(|s| s == "color" || s == "colors")
        .collect()
}

/// Nearest entry within tolerance; the earliest entry wins ties.
fn nearest(table: &indexmap::IndexMap<String, f64>, value: f64) -> Option<(String, f64)> {
    let mut best: Option<(&String, f64, f64)> = None;
    for (key, token) in table {
        let distance = (token - value).abs();
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((key, *token, distance));
        }
    }
    best.filter(|(_, _, d)| *d <= LENGTH_TOLERANCE)
        .map(|(key, token, _)| (key.clone(), token))
}

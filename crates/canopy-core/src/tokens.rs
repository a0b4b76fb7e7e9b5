//! Design token table.
//!
//! An immutable lookup table shared read-only by every style adapter during a
//! run. Its external JSON shape is:
//!
//! ```text
//! colors[group][shade] = "#rrggbb"
//! spacing / borderRadius / breakpoints = { name: px }
//! shadows = { name: "css shadow" }
//! typography[name] = { fontFamily, fontSize, fontWeight, lineHeight, letterSpacing }
//! ```
//!
//! Numeric entries accept plain numbers, `"12px"` or `"0.75rem"` (16px root).

use crate::errors::SourceError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A dotted path into the token table, e.g. `colors.blue.500`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPath(pub Vec<String>);

impl TokenPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TokenPath(segments.into_iter().map(Into::into).collect())
    }

    /// `colors.blue.500`
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }

    /// Last segment, the key within its table.
    pub fn key(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// JavaScript property access rooted at `root`, e.g. `theme.colors.blue[500]`.
    pub fn js_accessor(&self, root: &str) -> String {
        let mut out = root.to_string();
        for seg in &self.0 {
            if is_js_identifier(seg) {
                out.push('.');
                out.push_str(seg);
            } else if seg.chars().all(|c| c.is_ascii_digit()) {
                out.push_str(&format!("[{}]", seg));
            } else {
                out.push_str(&format!("['{}']", seg));
            }
        }
        out
    }

    /// CSS custom property reference, e.g. `var(--colors-blue-500)`.
    pub fn css_var(&self) -> String {
        let name: Vec<String> = self.0.iter().map(|s| s.replace('.', "_")).collect();
        format!("var(--{})", name.join("-"))
    }
}

fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A named text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    pub font_family: String,
    #[serde(deserialize_with = "px_value")]
    pub font_size: f64,
    pub font_weight: u16,
    #[serde(default, deserialize_with = "opt_px_value")]
    pub line_height: Option<f64>,
    #[serde(default, deserialize_with = "opt_px_value")]
    pub letter_spacing: Option<f64>,
}

/// The design token table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    #[serde(default)]
    pub colors: IndexMap<String, IndexMap<String, String>>,
    #[serde(default, deserialize_with = "px_map")]
    pub spacing: IndexMap<String, f64>,
    #[serde(default, deserialize_with = "px_map")]
    pub border_radius: IndexMap<String, f64>,
    #[serde(default)]
    pub shadows: IndexMap<String, String>,
    #[serde(default, deserialize_with = "px_map")]
    pub breakpoints: IndexMap<String, f64>,
    #[serde(default)]
    pub typography: IndexMap<String, TypographyToken>,
}

impl DesignTokens {
    /// An empty table: every value falls back to a literal.
    pub fn empty() -> Self {
        Self {
            colors: IndexMap::new(),
            spacing: IndexMap::new(),
            border_radius: IndexMap::new(),
            shadows: IndexMap::new(),
            breakpoints: IndexMap::new(),
            typography: IndexMap::new(),
        }
    }

    /// Parse a token table from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let tokens: DesignTokens = serde_json::from_str(json)?;
        tokens.validate()?;
        Ok(tokens)
    }

    pub fn validate(&self) -> Result<(), SourceError> {
        for (group, shades) in &self.colors {
            for (shade, value) in shades {
                if !value.starts_with('#') && !value.starts_with("rgb") {
                    return Err(SourceError::InvalidTokens(format!(
                        "color {}.{} is not a hex or rgb value: {}",
                        group, shade, value
                    )));
                }
            }
        }
        Ok(())
    }

    /// Iterate colors as `(path, value)`.
    pub fn color_entries(&self) -> impl Iterator<Item = (TokenPath, &str)> {
        self.colors.iter().flat_map(|(group, shades)| {
            shades.iter().map(move |(shade, value)| {
                (
                    TokenPath::new(["colors", group.as_str(), shade.as_str()]),
                    value.as_str(),
                )
            })
        })
    }
}

impl Default for DesignTokens {
    /// A Tailwind-like default scale.
    fn default() -> Self {
        let mut colors = IndexMap::new();
        colors.insert("white".to_string(), shades(&[("DEFAULT", "#ffffff")]));
        colors.insert("black".to_string(), shades(&[("DEFAULT", "#000000")]));
        colors.insert("gray".to_string(), palette(&[
            "#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af",
            "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827",
        ]));
        colors.insert("red".to_string(), palette(&[
            "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171",
            "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d",
        ]));
        colors.insert("green".to_string(), palette(&[
            "#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80",
            "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d",
        ]));
        colors.insert("blue".to_string(), palette(&[
            "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa",
            "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a",
        ]));

        let spacing = scale(&[
            ("0", 0.0), ("px", 1.0), ("0.5", 2.0), ("1", 4.0), ("1.5", 6.0),
            ("2", 8.0), ("2.5", 10.0), ("3", 12.0), ("3.5", 14.0), ("4", 16.0),
            ("5", 20.0), ("6", 24.0), ("7", 28.0), ("8", 32.0), ("9", 36.0),
            ("10", 40.0), ("11", 44.0), ("12", 48.0), ("14", 56.0), ("16", 64.0),
            ("20", 80.0), ("24", 96.0), ("28", 112.0), ("32", 128.0), ("36", 144.0),
            ("40", 160.0), ("44", 176.0), ("48", 192.0), ("52", 208.0), ("56", 224.0),
            ("60", 240.0), ("64", 256.0), ("72", 288.0), ("80", 320.0), ("96", 384.0),
        ]);

        let border_radius = scale(&[
            ("none", 0.0), ("sm", 2.0), ("DEFAULT", 4.0), ("md", 6.0), ("lg", 8.0),
            ("xl", 12.0), ("2xl", 16.0), ("3xl", 24.0), ("full", 9999.0),
        ]);

        let shadows = [
            ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
            ("DEFAULT", "0 1px 3px 0 rgba(0, 0, 0, 0.1)"),
            ("md", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
            ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
            ("xl", "0 20px 25px -5px rgba(0, 0, 0, 0.1)"),
            ("2xl", "0 25px 50px -12px rgba(0, 0, 0, 0.25)"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let breakpoints = scale(&[
            ("sm", 640.0), ("md", 768.0), ("lg", 1024.0), ("xl", 1280.0), ("2xl", 1536.0),
        ]);

        let typography = [
            ("xs", 12.0, 16.0),
            ("sm", 14.0, 20.0),
            ("base", 16.0, 24.0),
            ("lg", 18.0, 28.0),
            ("xl", 20.0, 28.0),
            ("2xl", 24.0, 32.0),
            ("3xl", 30.0, 36.0),
            ("4xl", 36.0, 40.0),
            ("5xl", 48.0, 48.0),
        ]
        .iter()
        .map(|(name, size, line)| {
            (
                name.to_string(),
                TypographyToken {
                    font_family: "Inter".to_string(),
                    font_size: *size,
                    font_weight: 400,
                    line_height: Some(*line),
                    letter_spacing: None,
                },
            )
        })
        .collect();

        Self {
            colors,
            spacing,
            border_radius,
            shadows,
            breakpoints,
            typography,
        }
    }
}

fn shades(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn palette(values: &[&str; 10]) -> IndexMap<String, String> {
    const SHADES: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];
    SHADES
        .iter()
        .zip(values.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn scale(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// A numeric token as written in JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLength {
    Number(f64),
    Text(String),
}

impl RawLength {
    fn to_px(&self) -> Option<f64> {
        match self {
            RawLength::Number(n) => Some(*n),
            RawLength::Text(s) => parse_length_px(s),
        }
    }
}

/// Parse `"12"`, `"12px"` or `"0.75rem"` into pixels.
pub fn parse_length_px(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some(rem) = s.strip_suffix("rem") {
        return rem.trim().parse::<f64>().ok().map(|v| v * 16.0);
    }
    s.strip_suffix("px").unwrap_or(s).trim().parse::<f64>().ok()
}

fn px_value<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = RawLength::deserialize(d)?;
    raw.to_px()
        .ok_or_else(|| serde::de::Error::custom("expected a number, px or rem length"))
}

fn opt_px_value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<RawLength>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => raw
            .to_px()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a number, px or rem length")),
    }
}

fn px_map<'de, D: Deserializer<'de>>(d: D) -> Result<IndexMap<String, f64>, D::Error> {
    let raw = IndexMap::<String, RawLength>::deserialize(d)?;
    raw.into_iter()
        .map(|(k, v)| match v.to_px() {
            Some(px) => Ok((k, px)),
            None => Err(serde::de::Error::custom(format!("invalid length for token '{}'", k))),
        })
        .collect()
}

//! Design token mapping and style generation.
//!
//! Given IR nodes and a design token table, this crate:
//! 1. Resolves colors, lengths, shadows and gradients to tokens or raw values
//! 2. Renders node style in one of four schemes behind [`StyleAdapter`]
//! 3. Optionally rewrites token hits as theme references

pub mod adapters;
pub mod css;
pub mod mapper;

pub use adapters::{
    CssModulesAdapter, EmotionAdapter, StyleAdapter, StyleCollector, StyleOutput, StyledComponentsAdapter,
    StyledDefinition, TailwindAdapter, Themeable, Themed,
};
pub use css::{tokens_stylesheet, TokenStyle};
pub use mapper::{MappingStats, TokenMapper, TokenValue};

use canopy_core::tokens::DesignTokens;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Styling scheme selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    Tailwind,
    CssModules,
    StyledComponents,
    Emotion,
}

impl Backend {
    pub const ALL: [Backend; 4] = [Backend::Tailwind, Backend::CssModules, Backend::StyledComponents, Backend::Emotion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Tailwind => "tailwind",
            Backend::CssModules => "css-modules",
            Backend::StyledComponents => "styled-components",
            Backend::Emotion => "emotion",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("unknown style backend '{}'", s))
    }
}

/// Build the adapter for a backend, wrapped in [`Themed`] when theming is on.
///
/// Tailwind already resolves tokens through its own config, so theming does
/// not change its output.
pub fn create_adapter(backend: Backend, themed: bool, tokens: Arc<DesignTokens>) -> Box<dyn StyleAdapter + Send> {
    match (backend, themed) {
        (Backend::Tailwind, themed) => {
            if themed {
                log::debug!("theming has no effect on the tailwind backend");
            }
            Box::new(TailwindAdapter::new(tokens))
        }
        (Backend::CssModules, false) => Box::new(CssModulesAdapter::new(tokens)),
        (Backend::CssModules, true) => Box::new(Themed::new(CssModulesAdapter::new(tokens))),
        (Backend::StyledComponents, false) => Box::new(StyledComponentsAdapter::new(tokens)),
        (Backend::StyledComponents, true) => Box::new(Themed::new(StyledComponentsAdapter::new(tokens))),
        (Backend::Emotion, false) => Box::new(EmotionAdapter::new(tokens)),
        (Backend::Emotion, true) => Box::new(Themed::new(EmotionAdapter::new(tokens))),
    }
}

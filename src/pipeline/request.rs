use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CoverError, CoverResult};
use crate::text::engine::FontAsset;

/// Cover layout, resolved once at the boundary.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Style {
    /// Three rotated cards over a tinted, blurred backdrop.
    #[serde(rename = "single_1")]
    #[value(name = "single_1")]
    Single1,
    /// Backdrop and foreground split along a diagonal.
    #[serde(rename = "single_2")]
    #[value(name = "single_2")]
    Single2,
    /// Nine posters in three rotated columns.
    #[serde(rename = "multi_1")]
    #[value(name = "multi_1")]
    Multi1,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Single1, Style::Single2, Style::Multi1];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single1 => "single_1",
            Self::Single2 => "single_2",
            Self::Multi1 => "multi_1",
        }
    }

    /// Whether the style renders from a single backdrop image.
    pub fn is_single(self) -> bool {
        matches!(self, Self::Single1 | Self::Single2)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| CoverError::validation(format!("unknown cover style '{s}'")))
    }
}

/// Per-invocation switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Poster wall: blurred first poster behind the columns instead of a flat gradient.
    pub blur: bool,
    /// Film grain on blurred backdrops. Off makes output a pure function of the inputs.
    pub grain: bool,
    /// Seed for every random choice made while composing.
    pub seed: u64,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            blur: false,
            grain: true,
            seed: 0,
        }
    }
}

/// Localized and Latin title pair. Blank strings count as absent; accessors return trimmed text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub localized: Option<String>,
    pub latin: Option<String>,
}

impl Title {
    pub fn new(localized: impl Into<String>, latin: impl Into<String>) -> Self {
        Self {
            localized: non_empty(localized.into()),
            latin: non_empty(latin.into()),
        }
    }

    pub fn localized(&self) -> Option<&str> {
        self.localized.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn latin(&self) -> Option<&str> {
        self.latin.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.localized().is_some() && self.latin().is_some()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Fonts for the two title scripts. Sizes are chosen by the composer.
#[derive(Clone, Debug)]
pub struct CoverFonts {
    pub localized: FontAsset,
    pub latin: FontAsset,
}

/// Encoded source images.
#[derive(Clone, Debug)]
pub enum CoverSources {
    /// One backdrop for the single-image styles.
    Single(Vec<u8>),
    /// Posters `1..=9` in slot order for the poster wall.
    Posters(Vec<Vec<u8>>),
}

impl CoverSources {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Posters(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(bytes) => bytes.is_empty(),
            Self::Posters(p) => p.is_empty(),
        }
    }
}

/// Everything one cover needs, already resolved to in-memory values.
#[derive(Clone, Debug)]
pub struct CoverRequest {
    pub style: Style,
    pub library_name: String,
    pub title: Title,
    pub fonts: CoverFonts,
    pub sources: CoverSources,
    pub options: StyleOptions,
}

impl CoverRequest {
    pub(crate) fn validate(&self) -> CoverResult<()> {
        match (&self.sources, self.style.is_single()) {
            (CoverSources::Single(bytes), true) if bytes.is_empty() => {
                Err(CoverError::input("source image is empty"))
            }
            (CoverSources::Single(_), true) | (CoverSources::Posters(_), false) => Ok(()),
            (CoverSources::Posters(_), true) => Err(CoverError::input(format!(
                "style {} expects one backdrop, got a poster set",
                self.style
            ))),
            (CoverSources::Single(_), false) => Err(CoverError::input(format!(
                "style {} expects nine posters, got a single image",
                self.style
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/request.rs"]
mod tests;

//! JSON job configuration for every tool.
//!
//! Each tool reads its own section; missing fields fall back to the tool's defaults, so an
//! empty object (`{}`) is a valid configuration for every tool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::adlinks::AdLinkRequest;
use crate::compose::card::Card;
use crate::foundation::error::{MediaError, MediaResult};
use crate::layout::grid::GridSpec;
use crate::rename::rules::RenameRules;
use crate::sampler::policy::DEFAULT_PAGE_SCALE;
use crate::tools::BatchThreading;
use crate::tools::cards::DeckSettings;
use crate::tools::storyboard::BoardSettings;

/// Grid-splitter options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Grid to cut every source into.
    #[serde(flatten)]
    pub grid: GridSpec,
    /// Worker controls.
    pub threading: BatchThreading,
}

/// Storyboard options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryboardConfig {
    /// Board name, sanitized before use.
    pub name: String,
    /// Sheet settings.
    #[serde(flatten)]
    pub board: BoardSettings,
    /// Per-seek budget for video posters, in milliseconds.
    pub op_timeout_ms: Option<u64>,
}

impl Default for StoryboardConfig {
    fn default() -> Self {
        Self {
            name: "Board_1".to_string(),
            board: BoardSettings::default(),
            op_timeout_ms: None,
        }
    }
}

/// Per-card overrides, matched to inputs by position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardOverride {
    /// Caption, one line per `\n`.
    pub text: String,
    /// Overrides the deck font size.
    pub font_size_override: Option<f32>,
    /// Caption anchor, percent of canvas height.
    pub text_y_percent: f64,
    /// Image shift; the deck's global offset when unset.
    pub img_y_percent: Option<f64>,
    /// Explicit output stem; otherwise derived from the text or the input name.
    pub filename: Option<String>,
}

impl Default for CardOverride {
    fn default() -> Self {
        let card = Card::default();
        Self {
            text: card.text,
            font_size_override: card.font_size_override,
            text_y_percent: card.text_y_percent,
            img_y_percent: None,
            filename: None,
        }
    }
}

impl CardOverride {
    /// Composition inputs for a deck whose global offset is `global_offset`.
    pub fn to_card(&self, global_offset: f64) -> Card {
        Card {
            text: self.text.clone(),
            font_size_override: self.font_size_override,
            text_y_percent: self.text_y_percent,
            img_y_percent: self.img_y_percent.unwrap_or(global_offset),
        }
    }
}

/// Card-composer options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardsConfig {
    /// Deck-wide settings.
    #[serde(flatten)]
    pub deck: DeckSettings,
    /// Regular caption face.
    pub font: Option<PathBuf>,
    /// Optional bold caption face.
    pub bold_font: Option<PathBuf>,
    /// Overrides for the first `cards.len()` inputs.
    pub cards: Vec<CardOverride>,
}

/// Video-stills options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StillsConfig {
    /// Per-seek budget in milliseconds.
    pub op_timeout_ms: Option<u64>,
    /// Worker controls; videos are independent.
    pub threading: BatchThreading,
}

/// PDF-to-images options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page render scale.
    pub scale: f64,
    /// Per-page budget in milliseconds.
    pub op_timeout_ms: Option<u64>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_PAGE_SCALE,
            op_timeout_ms: None,
        }
    }
}

/// Options of one tool.
pub trait ToolConfig: DeserializeOwned + Default {
    /// Reject values the tool cannot work with.
    fn validate(&self) -> MediaResult<()>;
}

impl ToolConfig for SplitConfig {
    fn validate(&self) -> MediaResult<()> {
        self.grid.validate()
    }
}

impl ToolConfig for StoryboardConfig {
    fn validate(&self) -> MediaResult<()> {
        if self.name.trim().is_empty() {
            return Err(MediaError::validation("storyboard name must not be empty"));
        }
        self.board.validate()
    }
}

impl ToolConfig for CardsConfig {
    fn validate(&self) -> MediaResult<()> {
        self.deck.validate()?;
        for (i, c) in self.cards.iter().enumerate() {
            c.to_card(self.deck.global_image_offset_percent)
                .validate()
                .map_err(|e| MediaError::validation(format!("cards[{i}]: {e}")))?;
        }
        Ok(())
    }
}

impl ToolConfig for StillsConfig {
    fn validate(&self) -> MediaResult<()> {
        validate_timeout(self.op_timeout_ms)
    }
}

impl ToolConfig for PdfConfig {
    fn validate(&self) -> MediaResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MediaError::validation(format!(
                "pdf scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        validate_timeout(self.op_timeout_ms)
    }
}

impl ToolConfig for RenameRules {
    fn validate(&self) -> MediaResult<()> {
        RenameRules::validate(self)
    }
}

impl ToolConfig for AdLinkRequest {
    fn validate(&self) -> MediaResult<()> {
        Ok(())
    }
}

fn validate_timeout(ms: Option<u64>) -> MediaResult<()> {
    if ms == Some(0) {
        return Err(MediaError::validation("op_timeout_ms must be > 0 when set"));
    }
    Ok(())
}

/// Convert an optional millisecond budget.
pub fn timeout_from_ms(ms: Option<u64>) -> Option<Duration> {
    ms.map(Duration::from_millis)
}

/// Parse and validate a tool configuration from JSON text.
pub fn parse_config<T: ToolConfig>(json: &str) -> MediaResult<T> {
    let cfg: T = serde_json::from_str(json)
        .map_err(|e| MediaError::validation(format!("parse config JSON: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load a tool configuration from `path`, or the defaults when no path is given.
pub fn load_config<T: ToolConfig>(path: Option<&Path>) -> MediaResult<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    parse_config(&json)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

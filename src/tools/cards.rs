use serde::{Deserialize, Serialize};

use crate::assets::decode::{AssetInput, MediaKind, decode_image, filter_inputs};
use crate::assets::preview::{PreviewHandle, PreviewRegistry};
use crate::assets::raster::RasterSource;
use crate::compose::card::{Card, CardRenderer, CardStyle};
use crate::encode::raster::OutputFormat;
use crate::export::naming::sanitize_filename;
use crate::export::packager::ExportEntry;
use crate::foundation::error::{MediaError, MediaResult};
use crate::render::frame::RenderedImage;
use crate::render::surface::SurfacePool;
use crate::render::text::{FontSet, TextLayoutEngine};
use crate::tools::{BatchSummary, failed};

/// Archive name for card exports.
pub const CARD_ARCHIVE: &str = "logos.zip";

/// Deck-wide settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckSettings {
    /// Style shared by every card.
    #[serde(flatten)]
    pub style: CardStyle,
    /// Image offset given to new cards, percent of canvas height.
    pub global_image_offset_percent: f64,
}

impl DeckSettings {
    /// Validate the style and the offset range.
    pub fn validate(&self) -> MediaResult<()> {
        self.style.validate()?;
        if !(-50.0..=50.0).contains(&self.global_image_offset_percent) {
            return Err(MediaError::validation(format!(
                "global_image_offset_percent must be within -50..=50, got {}",
                self.global_image_offset_percent
            )));
        }
        Ok(())
    }
}

/// One logo card.
#[derive(Debug)]
pub struct DeckCard {
    /// Stable id within the deck.
    pub id: u64,
    /// Composition inputs.
    pub card: Card,
    /// Output file stem, always sanitized.
    pub filename: String,
    raster: RasterSource,
    preview: PreviewHandle,
}

impl DeckCard {
    /// Preview handle of the source image.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Logo resizer working set: one card per source image.
pub struct CardDeck {
    settings: DeckSettings,
    fonts: Option<FontSet>,
    cards: Vec<DeckCard>,
    previews: PreviewRegistry,
    text: TextLayoutEngine,
    surfaces: SurfacePool,
    next_id: u64,
}

impl std::fmt::Debug for CardDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDeck")
            .field("settings", &self.settings)
            .field("fonts", &self.fonts.is_some())
            .field("cards", &self.cards)
            .finish_non_exhaustive()
    }
}

impl CardDeck {
    /// Empty deck. Captions can only be rendered when `fonts` is supplied.
    pub fn new(settings: DeckSettings, fonts: Option<FontSet>) -> MediaResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            fonts,
            cards: Vec::new(),
            previews: PreviewRegistry::new(),
            text: TextLayoutEngine::new(),
            surfaces: SurfacePool::default(),
            next_id: 1,
        })
    }

    /// Current settings.
    pub fn settings(&self) -> &DeckSettings {
        &self.settings
    }

    /// Cards in insertion order.
    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    /// Live preview handles held by this deck.
    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    /// Add one card per decodable image. Non-images are dropped silently.
    pub fn add(&mut self, inputs: Vec<AssetInput>) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for input in filter_inputs(inputs, MediaKind::Image) {
            let raster = match decode_image(&input.bytes) {
                Ok(r) => r,
                Err(e) => {
                    failed(&input.name, &e);
                    summary.failed += 1;
                    continue;
                }
            };
            let stem = input.name.split('.').next().unwrap_or_default();
            let id = self.next_id;
            self.next_id += 1;
            self.cards.push(DeckCard {
                id,
                card: Card {
                    img_y_percent: self.settings.global_image_offset_percent,
                    ..Card::default()
                },
                filename: sanitize_filename(stem),
                preview: self.previews.acquire(&raster),
                raster,
            });
            summary.processed += 1;
        }
        summary
    }

    fn card_mut(&mut self, id: u64) -> MediaResult<&mut DeckCard> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| MediaError::validation(format!("no card with id {id}")))
    }

    fn card(&self, id: u64) -> MediaResult<&DeckCard> {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| MediaError::validation(format!("no card with id {id}")))
    }

    /// Replace a card's caption. The filename follows the caption unless the caption
    /// sanitizes to nothing.
    pub fn set_text(&mut self, id: u64, text: &str) -> MediaResult<()> {
        let c = self.card_mut(id)?;
        c.card.text = text.to_string();
        let derived = sanitize_filename(text);
        if !derived.is_empty() {
            c.filename = derived;
        }
        Ok(())
    }

    /// Set the output stem explicitly.
    pub fn set_filename(&mut self, id: u64, name: &str) -> MediaResult<()> {
        self.card_mut(id)?.filename = sanitize_filename(name);
        Ok(())
    }

    /// Replace a card's composition inputs wholesale; the filename is left alone.
    pub fn set_card(&mut self, id: u64, card: Card) -> MediaResult<()> {
        card.validate()?;
        self.card_mut(id)?.card = card;
        Ok(())
    }

    /// Replace the deck settings. Cards keep their own offsets.
    pub fn set_settings(&mut self, settings: DeckSettings) -> MediaResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Set the global image offset and overwrite every card's offset with it.
    pub fn set_global_image_offset(&mut self, percent: f64) -> MediaResult<()> {
        let settings = DeckSettings {
            global_image_offset_percent: percent,
            ..self.settings
        };
        settings.validate()?;
        self.settings = settings;
        for c in &mut self.cards {
            c.card.img_y_percent = percent;
        }
        Ok(())
    }

    /// Remove card `id`, releasing its preview.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    /// Remove every card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    fn render_card(&mut self, index: usize) -> MediaResult<RenderedImage> {
        let c = &self.cards[index];
        CardRenderer {
            style: &self.settings.style,
            fonts: self.fonts.as_ref(),
            text: &mut self.text,
            pool: &mut self.surfaces,
        }
        .render(&c.raster, &c.card)
    }

    /// Render card `id` from scratch.
    pub fn render(&mut self, id: u64) -> MediaResult<RenderedImage> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| MediaError::validation(format!("no card with id {id}")))?;
        self.render_card(index)
    }

    /// `<filename>.png` for card `id`.
    pub fn download(&mut self, id: u64) -> MediaResult<ExportEntry> {
        let name = format!("{}.png", self.card(id)?.filename);
        let img = self.render(id)?;
        Ok(ExportEntry::new(name, OutputFormat::Png.encode(&img)?))
    }

    /// Render every card into `<filename>.png` entries. A card that fails to render is
    /// reported and left out; the others are still exported.
    #[tracing::instrument(skip(self), fields(cards = self.cards.len()))]
    pub fn export_all(&mut self) -> Vec<ExportEntry> {
        let mut out = Vec::with_capacity(self.cards.len());
        for index in 0..self.cards.len() {
            let encoded = self
                .render_card(index)
                .and_then(|img| OutputFormat::Png.encode(&img));
            let c = &self.cards[index];
            match encoded {
                Ok(bytes) => out.push(ExportEntry::new(format!("{}.png", c.filename), bytes)),
                Err(e) => {
                    failed(&c.filename, &e);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/cards.rs"]
mod tests;

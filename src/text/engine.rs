use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use image::GrayImage;

use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::Fnv1a64;
use crate::geometry::raster::surface_dims;

/// Font bytes at a point size. Cloning is cheap; the bytes are shared.
#[derive(Clone)]
pub struct FontAsset {
    bytes: Arc<Vec<u8>>,
    id: u64,
    size_px: f32,
}

impl fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontAsset")
            .field("id", &format_args!("{:016x}", self.id))
            .field("len", &self.bytes.len())
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl FontAsset {
    /// Wraps TrueType/OpenType bytes. Fails on empty input or a non-positive size.
    pub fn from_bytes(bytes: Vec<u8>, size_px: f32) -> CoverResult<Self> {
        if bytes.is_empty() {
            return Err(CoverError::text("font bytes are empty"));
        }
        validate_size(size_px)?;
        let mut h = Fnv1a64::new_default();
        h.write_u64(bytes.len() as u64);
        h.write_bytes(&bytes);
        Ok(Self {
            bytes: Arc::new(bytes),
            id: h.finish(),
            size_px,
        })
    }

    /// Reads a font file from disk.
    pub fn load(path: impl AsRef<std::path::Path>, size_px: f32) -> CoverResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CoverError::text(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(bytes, size_px)
    }

    /// Same font at another size.
    pub fn with_size(&self, size_px: f32) -> CoverResult<Self> {
        validate_size(size_px)?;
        Ok(Self {
            bytes: Arc::clone(&self.bytes),
            id: self.id,
            size_px,
        })
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

fn validate_size(size_px: f32) -> CoverResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(CoverError::text("font size must be finite and > 0"));
    }
    Ok(())
}

/// Layout box of a shaped string, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct CoverageBrush;

/// Glyph coverage of one string; the layout origin sits at `(pad, pad)`.
pub(crate) struct GlyphMask {
    pub(crate) coverage: GrayImage,
    pub(crate) pad: u32,
}

struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shapes text with `parley` and rasterizes glyphs with `vello_cpu`.
///
/// Registered fonts are cached by content hash, so reusing one renderer across draws
/// registers each font once.
pub struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<CoverageBrush>,
    fonts: HashMap<u64, RegisteredFont>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRenderer")
            .field("fonts", &self.fonts.len())
            .finish_non_exhaustive()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    fn register(&mut self, font: &FontAsset) -> CoverResult<String> {
        if let Some(reg) = self.fonts.get(&font.id()) {
            return Ok(reg.family.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CoverError::text("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CoverError::text("registered font family has no name"))?
            .to_string();
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
            0,
        );
        tracing::debug!(family = %family, id = font.id(), "registered font");
        self.fonts.insert(
            font.id(),
            RegisteredFont {
                family: family.clone(),
                data,
            },
        );
        Ok(family)
    }

    fn layout(&mut self, text: &str, font: &FontAsset) -> CoverResult<parley::Layout<CoverageBrush>> {
        let family = self.register(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px()));
        builder.push_default(parley::style::StyleProperty::Brush(CoverageBrush));

        let mut layout: parley::Layout<CoverageBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Width and height of `text` laid out on a single line. Empty text measures zero.
    pub fn measure(&mut self, text: &str, font: &FontAsset) -> CoverResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let layout = self.layout(text, font)?;
        Ok(TextExtent {
            width: layout.width(),
            height: layout.height(),
        })
    }

    /// Rasterizes `text` into a coverage mask, or `None` when nothing would be drawn.
    pub(crate) fn rasterize(&mut self, text: &str, font: &FontAsset) -> CoverResult<Option<GlyphMask>> {
        if text.is_empty() {
            return Ok(None);
        }
        let layout = self.layout(text, font)?;
        let (lw, lh) = (layout.width(), layout.height());
        if lw <= 0.0 || lh <= 0.0 {
            return Ok(None);
        }

        // Glyph ink may overhang the layout box (bearings, tall accents).
        let pad = (font.size_px() * 0.25).ceil() as u32 + 2;
        let width = lw.ceil() as u32 + 2 * pad;
        let height = lh.ceil() as u32 + 2 * pad;
        let (w, h) = surface_dims(width, height)?;
        let reg = self
            .fonts
            .get(&font.id())
            .ok_or_else(|| CoverError::text("font vanished from renderer cache"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&reg.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        let alpha: Vec<u8> = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();
        let coverage = GrayImage::from_raw(width, height, alpha)
            .ok_or_else(|| CoverError::text("glyph coverage buffer mismatch"))?;
        Ok(Some(GlyphMask { coverage, pad }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;

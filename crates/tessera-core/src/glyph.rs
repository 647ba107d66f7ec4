use std::cell::RefCell;

use ahash::AHashMap;
use image::RgbaImage;

use crate::color::Color;
use crate::error::GuiResult;
use crate::texture::Texture;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    /// Family name as understood by the rasterizer; empty selects its default.
    pub family: String,
    /// Pixel height.
    pub size: u32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("", 40)
    }
}

pub trait GlyphRasterizer {
    /// Draws one character on a transparent background. The image is as wide
    /// as the glyph's advance and `font.size` pixels high.
    fn rasterize(&self, ch: char, font: &Font, color: Color) -> GuiResult<RgbaImage>;

    /// Horizontal advance of `text` in pixels.
    fn measure(&self, text: &str, font: &Font) -> GuiResult<f32>;
}

type GlyphKey = (char, Color, Font);

/// Per-character textures, rasterised once per `(char, color, font)`.
pub struct CharBuilder {
    rasterizer: Box<dyn GlyphRasterizer>,
    cache: RefCell<AHashMap<GlyphKey, Texture>>,
}

impl CharBuilder {
    pub fn new(rasterizer: impl GlyphRasterizer + 'static) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            cache: RefCell::new(AHashMap::new()),
        }
    }

    pub fn rasterizer(&self) -> &dyn GlyphRasterizer {
        self.rasterizer.as_ref()
    }

    pub fn get_texture(&self, ch: char, color: Color, font: &Font) -> GuiResult<Texture> {
        let key = (ch, color, font.clone());
        if let Some(t) = self.cache.borrow().get(&key) {
            return Ok(t.clone());
        }
        let texture = Texture::new(self.rasterizer.rasterize(ch, font, color)?);
        self.cache.borrow_mut().insert(key, texture.clone());
        Ok(texture)
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Rasterizer producing solid boxes, one pixel wide per unit of `size / 2`.
/// Useful where no font files are available, such as headless tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxGlyphs;

impl GlyphRasterizer for BoxGlyphs {
    fn rasterize(&self, ch: char, font: &Font, color: Color) -> GuiResult<RgbaImage> {
        let w = (font.size / 2).max(1);
        let h = font.size.max(1);
        let fill = if ch.is_whitespace() {
            Color::TRANSPARENT
        } else {
            color
        };
        Ok(RgbaImage::from_pixel(w, h, fill.into()))
    }

    fn measure(&self, text: &str, font: &Font) -> GuiResult<f32> {
        Ok(text.chars().count() as f32 * (font.size / 2).max(1) as f32)
    }
}

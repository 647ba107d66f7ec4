//! Bordered, aligned single-line labels drawn into RGBA images.

use image::RgbaImage;
use tessera_core::{CharBuilder, Color, Font, GuiResult};

use crate::properties::{HorAlignment, TextProperties, VerAlignment};

/// Pixel boxes of a label, image rows counted from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelBoxes {
    /// Inside of the border, filled with the background colour.
    pub background: (u32, u32, u32, u32),
    /// Inside of border and margin, where text may go.
    pub text: (u32, u32, u32, u32),
}

impl LabelBoxes {
    pub fn compute(p: &TextProperties, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let px = |f: f32, total: f32| (f * total).round().clamp(0.0, total) as u32;
        let outer_x = p.border_x + p.margin_x;
        let outer_y = p.border_y + p.margin_y;
        let background = (
            px(p.border_x, w),
            px(p.border_y, h),
            px(1.0 - p.border_x, w),
            px(1.0 - p.border_y, h),
        );
        let mut text = (
            px(outer_x, w),
            px(outer_y, h),
            px(1.0 - outer_x, w),
            px(1.0 - outer_y, h),
        );
        text.2 = text.2.max(text.0);
        text.3 = text.3.max(text.1);
        Self { background, text }
    }

    pub fn text_width(&self) -> u32 {
        self.text.2 - self.text.0
    }
    pub fn text_height(&self) -> u32 {
        self.text.3 - self.text.1
    }
}

/// Where the text of a label ends up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    pub font_size: u32,
    pub x: i64,
    pub top: i64,
    pub width: f32,
}

pub struct TextBuilder<'a> {
    chars: &'a CharBuilder,
}

impl<'a> TextBuilder<'a> {
    pub fn new(chars: &'a CharBuilder) -> Self {
        Self { chars }
    }

    /// Scales `p.font` so `text` fills the text box as far as it fits in both
    /// directions, then aligns it. `None` for empty text or an empty box.
    pub fn place(
        &self,
        text: &str,
        p: &TextProperties,
        boxes: &LabelBoxes,
    ) -> GuiResult<Option<TextPlacement>> {
        let rasterizer = self.chars.rasterizer();
        let natural = rasterizer.measure(text, &p.font)?;
        let (tw, th) = (boxes.text_width() as f32, boxes.text_height() as f32);
        if natural <= 0.0 || p.font.size == 0 || tw <= 0.0 || th <= 0.0 {
            return Ok(None);
        }
        let factor = (tw / natural).min(th / p.font.size as f32);
        let font_size = ((p.font.size as f32 * factor).floor() as u32).max(1);
        let font = Font::new(p.font.family.clone(), font_size);
        let width = rasterizer.measure(text, &font)?;

        let (min_x, min_y, max_x, max_y) = boxes.text;
        let x = match p.hor_alignment {
            HorAlignment::Left => min_x as i64,
            HorAlignment::Middle => min_x as i64 + ((tw - width) / 2.0).round() as i64,
            HorAlignment::Right => max_x as i64 - width.round() as i64,
        };
        let top = match p.ver_alignment {
            VerAlignment::Up => min_y as i64,
            VerAlignment::Middle => min_y as i64 + ((th - font_size as f32) / 2.0).round() as i64,
            VerAlignment::Down => max_y as i64 - font_size as i64,
        };
        Ok(Some(TextPlacement {
            font_size,
            x,
            top,
            width,
        }))
    }

    pub fn create_image(
        &self,
        text: &str,
        p: &TextProperties,
        width: u32,
        height: u32,
    ) -> GuiResult<RgbaImage> {
        let mut image = RgbaImage::from_pixel(width, height, p.border_color.into());
        let boxes = LabelBoxes::compute(p, width, height);
        let (bx0, by0, bx1, by1) = boxes.background;
        for y in by0..by1 {
            for x in bx0..bx1 {
                image.put_pixel(x, y, p.background_color.into());
            }
        }

        let Some(placement) = self.place(text, p, &boxes)? else {
            return Ok(image);
        };
        let font = Font::new(p.font.family.clone(), placement.font_size);
        let mut pen_x = placement.x;
        for ch in text.chars() {
            let glyph = self.chars.get_texture(ch, p.text_color, &font)?;
            blit(&mut image, glyph.image(), pen_x, placement.top);
            pen_x += glyph.width() as i64;
        }
        Ok(image)
    }
}

fn blit(dst: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64) {
    for (sx, sy, px) in src.enumerate_pixels() {
        let (x, y) = (left + sx as i64, top + sy as i64);
        if x < 0 || y < 0 || x >= dst.width() as i64 || y >= dst.height() as i64 {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        let under = Color::from(dst.get_pixel(x, y).0);
        let out = Color::from(px.0).over(under);
        dst.put_pixel(x, y, out.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::BoxGlyphs;

    fn pixel(img: &RgbaImage, x: u32, y: u32) -> Color {
        Color::from(img.get_pixel(x, y).0)
    }

    #[test]
    fn test_button_boxes() {
        let p = TextProperties::simple_button(Color::WHITE, Color::GRAY);
        let b = LabelBoxes::compute(&p, 100, 50);
        assert_eq!(b.background, (10, 5, 90, 45));
        assert_eq!(b.text, (20, 10, 80, 40));
    }

    #[test]
    fn test_text_scales_to_fit_height() {
        let chars = CharBuilder::new(BoxGlyphs);
        let tb = TextBuilder::new(&chars);
        let p = TextProperties::text(Font::new("", 10), Color::BLACK, Color::WHITE);
        let b = LabelBoxes::compute(&p, 200, 20);
        // "ab" is 10 px wide at size 10; the height limits the scale to 2x.
        let placed = tb.place("ab", &p, &b).unwrap().unwrap();
        assert_eq!(placed.font_size, 20);
        assert_eq!(placed.x, 0);
        assert_eq!(placed.top, 0);
        assert_eq!(placed.width, 20.0);
    }

    #[test]
    fn test_alignment() {
        let chars = CharBuilder::new(BoxGlyphs);
        let tb = TextBuilder::new(&chars);
        let base = TextProperties::text(Font::new("", 10), Color::BLACK, Color::WHITE);
        let b = LabelBoxes::compute(&base, 100, 10);

        let mid = base
            .clone()
            .with_alignment(HorAlignment::Middle, VerAlignment::Middle);
        assert_eq!(tb.place("ab", &mid, &b).unwrap().unwrap().x, 45);

        let right = base.with_alignment(HorAlignment::Right, VerAlignment::Down);
        let placed = tb.place("ab", &right, &b).unwrap().unwrap();
        assert_eq!(placed.x, 90);
        assert_eq!(placed.top, 0);
    }

    #[test]
    fn test_create_image_layers() {
        let chars = CharBuilder::new(BoxGlyphs);
        let tb = TextBuilder::new(&chars);
        let p = TextProperties::button(Font::new("", 10), Color::WHITE, Color::RED, Color::BLUE);
        let img = tb.create_image("ab", &p, 100, 50).unwrap();
        assert_eq!(pixel(&img, 0, 0), Color::RED);
        assert_eq!(pixel(&img, 12, 7), Color::WHITE);
        assert_eq!(pixel(&img, 50, 25), Color::BLUE);
    }

    #[test]
    fn test_empty_text_draws_background_only() {
        let chars = CharBuilder::new(BoxGlyphs);
        let tb = TextBuilder::new(&chars);
        let p = TextProperties::text(Font::new("", 10), Color::BLACK, Color::GREEN);
        let img = tb.create_image("", &p, 8, 8).unwrap();
        assert!(img.pixels().all(|px| Color::from(px.0) == Color::GREEN));
        assert_eq!(chars.cached(), 0);
    }
}

use tessera_core::{Color, Rect, Renderer, Texture};

/// RGBA framebuffer addressed in normalized, y-up coordinates.
///
/// Pixel `(0, 0)` is the top-left corner, as in images. A pixel belongs to
/// a rectangle when its center does. Everything outside the canvas is
/// clipped.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

/// Pixel span `[x0, x1) × [y0, y1)` covered by a normalized rect, rows
/// counted from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    x0: u32,
    x1: u32,
    y0: u32,
    y1: u32,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT.to_rgba(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes, discarding the current contents when the size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::debug!("canvas resized to {width}x{height}");
        *self = Self::new(width, height);
    }

    /// Pixel at column `x`, row `y` from the top.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from(self.pixels[self.index(x, y)]))
    }

    /// Pixel under the normalized point `(x, y)`.
    pub fn pixel_at(&self, x: f32, y: f32) -> Option<Color> {
        if !(0.0..1.0).contains(&x) || !(y > 0.0 && y <= 1.0) {
            return None;
        }
        let px = (x * self.width as f32) as u32;
        let py = ((1.0 - y) * self.height as f32) as u32;
        self.pixel(px, py)
    }

    /// Row-major RGBA bytes, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn span(&self, rect: Rect) -> Option<Span> {
        if !rect.min_x.is_finite()
            || !rect.min_y.is_finite()
            || !rect.max_x.is_finite()
            || !rect.max_y.is_finite()
        {
            return None;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        let col = |v: f32| (v * w).round().clamp(0.0, w) as u32;
        let row = |v: f32| ((1.0 - v) * h).round().clamp(0.0, h) as u32;
        let span = Span {
            x0: col(rect.min_x),
            x1: col(rect.max_x),
            y0: row(rect.max_y),
            y1: row(rect.min_y),
        };
        (span.x0 < span.x1 && span.y0 < span.y1).then_some(span)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color.over(Color::from(self.pixels[i])).to_rgba();
    }
}

impl Renderer for PixelCanvas {
    fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_rgba());
    }

    fn fill(&mut self, color: Color, rect: Rect) {
        let Some(s) = self.span(rect) else {
            return;
        };
        for y in s.y0..s.y1 {
            for x in s.x0..s.x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn render_texture(&mut self, texture: &Texture, rect: Rect) {
        if rect.is_degenerate() {
            return;
        }
        let Some(s) = self.span(rect) else {
            return;
        };
        let (w, h) = (self.width as f32, self.height as f32);
        for y in s.y0..s.y1 {
            let ny = 1.0 - (y as f32 + 0.5) / h;
            let v = (ny - rect.min_y) / rect.height();
            for x in s.x0..s.x1 {
                let nx = (x as f32 + 0.5) / w;
                let u = (nx - rect.min_x) / rect.width();
                self.blend(x, y, texture.sample(u, v));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Component, ComponentState, GuiResult, WindowContext};

    #[test]
    fn test_clear_and_fill_quadrant() {
        let mut c = PixelCanvas::new(4, 4);
        c.clear(Color::BLACK);
        c.fill(Color::RED, Rect::new(0.5, 0.5, 1.0, 1.0));
        // top-right quadrant in image rows
        assert_eq!(c.pixel(3, 0), Some(Color::RED));
        assert_eq!(c.pixel(2, 1), Some(Color::RED));
        assert_eq!(c.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(c.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(c.pixel_at(0.9, 0.9), Some(Color::RED));
        assert_eq!(c.pixel_at(0.9, 0.1), Some(Color::BLACK));
    }

    #[test]
    fn test_offscreen_is_clipped() {
        let mut c = PixelCanvas::new(8, 8);
        c.clear(Color::BLACK);
        c.fill(Color::RED, Rect::new(1.5, 0.0, 3.0, 1.0));
        c.fill(Color::RED, Rect::new(-2.0, -2.0, -1.0, -1.0));
        c.fill(Color::RED, Rect::new(f32::NAN, 0.0, 1.0, 1.0));
        assert!(c.as_bytes().chunks(4).all(|p| p == [0, 0, 0, 255]));

        c.fill(Color::BLUE, Rect::new(-1.0, -1.0, 0.25, 2.0));
        assert_eq!(c.pixel(0, 0), Some(Color::BLUE));
        assert_eq!(c.pixel(1, 7), Some(Color::BLUE));
        assert_eq!(c.pixel(2, 7), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_blends() {
        let mut c = PixelCanvas::new(2, 2);
        c.clear(Color::BLACK);
        c.fill(Color::WHITE.with_alpha(128), Rect::UNIT);
        let p = c.pixel(0, 0).unwrap();
        assert_eq!(p.alpha(), 255);
        assert!((127..=129).contains(&p.red()));
    }

    #[test]
    fn test_texture_is_upright() {
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Color::RED.into());
        img.put_pixel(0, 1, Color::GREEN.into());
        let tex = Texture::new(img);

        let mut c = PixelCanvas::new(4, 4);
        c.clear(Color::BLACK);
        c.render_texture(&tex, Rect::new(0.0, 0.0, 0.5, 1.0));
        assert_eq!(c.pixel_at(0.25, 0.9), Some(Color::RED));
        assert_eq!(c.pixel_at(0.25, 0.1), Some(Color::GREEN));
        assert_eq!(c.pixel_at(0.75, 0.9), Some(Color::BLACK));
    }

    #[test]
    fn test_area_renderer_nests() {
        let mut c = PixelCanvas::new(10, 10);
        c.clear(Color::BLACK);
        {
            let r: &mut dyn Renderer = &mut c;
            let mut outer = r.area(Rect::new(0.0, 0.0, 0.5, 0.5));
            let o: &mut dyn Renderer = &mut outer;
            o.area(Rect::new(0.0, 0.0, 0.4, 0.4)).clear(Color::WHITE);
        }
        assert_eq!(c.pixel(0, 9), Some(Color::WHITE));
        assert_eq!(c.pixel(1, 8), Some(Color::WHITE));
        assert_eq!(c.pixel(2, 9), Some(Color::BLACK));
    }

    #[test]
    fn test_component_renders_into_canvas() {
        struct Half;
        impl Component for Half {
            fn render(&mut self, r: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
                r.clear(Color::GRAY);
                r.fill(Color::GREEN, Rect::new(0.0, 0.0, 1.0, 0.5));
                Ok(())
            }
        }
        let state = ComponentState::root(WindowContext::headless());
        let mut c = PixelCanvas::new(6, 6);
        Half.render(&mut c, &state).unwrap();
        let img = c.to_image();
        assert_eq!(img.dimensions(), (6, 6));
        assert_eq!(Color::from(img.get_pixel(0, 5).0), Color::GREEN);
        assert_eq!(Color::from(img.get_pixel(0, 0).0), Color::GRAY);
    }

    #[test]
    fn test_resize_keeps_same_size() {
        let mut c = PixelCanvas::new(2, 2);
        c.clear(Color::RED);
        c.resize(2, 2);
        assert_eq!(c.pixel(1, 1), Some(Color::RED));
        c.resize(3, 1);
        assert_eq!((c.width(), c.height()), (3, 1));
        assert_eq!(c.pixel(2, 0), Some(Color::TRANSPARENT));
    }
}

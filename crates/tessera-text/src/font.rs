use std::cell::RefCell;

use ab_glyph::{Font as _, FontArc, FontVec, PxScale, ScaleFont, point};
use ahash::AHashMap;
use fontdb::Database;
use image::RgbaImage;
use tessera_core::{Color, Font, GlyphRasterizer, GuiError, GuiResult};

/// Glyph rasterizer over system (or explicitly supplied) fonts.
///
/// Font families are resolved through `fontdb` the first time they are
/// used; an empty family name means the default sans-serif face.
pub struct FontRasterizer {
    db: Database,
    faces: RefCell<AHashMap<String, FontArc>>,
}

impl FontRasterizer {
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font database holds {} faces", db.len());
        Self {
            db,
            faces: RefCell::new(AHashMap::new()),
        }
    }

    /// Uses `data` as the default face instead of querying the system.
    pub fn from_font_data(data: Vec<u8>) -> GuiResult<Self> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| GuiError::Font(format!("invalid font data: {e}")))?;
        let mut faces = AHashMap::new();
        faces.insert(String::new(), font);
        Ok(Self {
            db: Database::new(),
            faces: RefCell::new(faces),
        })
    }

    fn face(&self, family: &str) -> GuiResult<FontArc> {
        if let Some(f) = self.faces.borrow().get(family) {
            return Ok(f.clone());
        }
        let families = if family.is_empty() {
            [fontdb::Family::SansSerif]
        } else {
            [fontdb::Family::Name(family)]
        };
        let query = fontdb::Query {
            families: &families,
            ..Default::default()
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| GuiError::Font(format!("no font found for family {family:?}")))?;
        let (source, index) = self
            .db
            .face_source(id)
            .ok_or_else(|| GuiError::Font("font face vanished from database".into()))?;
        let bytes = match source {
            fontdb::Source::Binary(data) => {
                let bytes: &[u8] = data.as_ref().as_ref();
                bytes.to_vec()
            }
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(path)?
            }
        };
        let font = FontVec::try_from_vec_and_index(bytes, index)
            .map(FontArc::new)
            .map_err(|e| GuiError::Font(format!("failed to parse font {family:?}: {e}")))?;
        self.faces
            .borrow_mut()
            .insert(family.to_string(), font.clone());
        Ok(font)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, ch: char, font: &Font, color: Color) -> GuiResult<RgbaImage> {
        let face = self.face(&font.family)?;
        let scale = PxScale::from(font.size.max(1) as f32);
        let scaled = face.as_scaled(scale);
        let id = scaled.glyph_id(ch);
        let w = scaled.h_advance(id).ceil().max(1.0) as u32;
        let h = font.size.max(1);
        let mut image = RgbaImage::from_pixel(w, h, Color::TRANSPARENT.into());

        let glyph = id.with_scale_and_position(scale, point(0.0, scaled.ascent()));
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bb = outlined.px_bounds();
            outlined.draw(|gx, gy, cov| {
                let x = bb.min.x as i64 + gx as i64;
                let y = bb.min.y as i64 + gy as i64;
                if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                    return;
                }
                let a = (color.alpha() as f32 * cov.clamp(0.0, 1.0)).round() as u8;
                image.put_pixel(x as u32, y as u32, color.with_alpha(a).into());
            });
        }
        Ok(image)
    }

    fn measure(&self, text: &str, font: &Font) -> GuiResult<f32> {
        let face = self.face(&font.family)?;
        let scaled = face.as_scaled(PxScale::from(font.size.max(1) as f32));
        // Glyph images are whole pixels wide, so advances are rounded up the
        // same way here.
        Ok(text
            .chars()
            .map(|c| scaled.h_advance(scaled.glyph_id(c)).ceil().max(1.0))
            .sum())
    }
}

//! Texture handles, loaders and the window-scoped asset cache.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use image::RgbaImage;

use crate::color::Color;
use crate::error::{GuiError, GuiResult};
use crate::geometry::Rect;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Pixel region of a source image, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRegion {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

/// Immutable handle to RGBA pixels. Cloning shares the pixels.
#[derive(Clone)]
pub struct Texture {
    image: Rc<RgbaImage>,
    region: PixelRegion,
    id: u64,
}

impl Texture {
    pub fn new(image: RgbaImage) -> Self {
        let region = PixelRegion {
            min_x: 0,
            min_y: 0,
            max_x: image.width(),
            max_y: image.height(),
        };
        Self {
            image: Rc::new(image),
            region,
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_region(image: Rc<RgbaImage>, region: PixelRegion) -> GuiResult<Self> {
        if region.min_x > region.max_x
            || region.min_y > region.max_y
            || region.max_x > image.width()
            || region.max_y > image.height()
        {
            return Err(GuiError::InvalidBounds(Rect::new(
                region.min_x as f32,
                region.min_y as f32,
                region.max_x as f32,
                region.max_y as f32,
            )));
        }
        Ok(Self {
            image,
            region,
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
    pub fn region(&self) -> PixelRegion {
        self.region
    }
    pub fn width(&self) -> u32 {
        self.region.max_x - self.region.min_x
    }
    pub fn height(&self) -> u32 {
        self.region.max_y - self.region.min_y
    }

    /// Nearest-neighbour lookup at normalized `(u, v)`, v pointing up.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 {
            return Color::TRANSPARENT;
        }
        let px = ((u * w as f32) as i64).clamp(0, w as i64 - 1) as u32;
        let py = (((1.0 - v) * h as f32) as i64).clamp(0, h as i64 - 1) as u32;
        let p = self
            .image
            .get_pixel(self.region.min_x + px, self.region.min_y + py);
        Color::from(p.0)
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Turns images into textures. Whether and how results are cached is up to
/// the implementation.
pub trait TextureLoader {
    fn load_image(&self, image: RgbaImage) -> Texture;

    fn load_region(&self, image: Rc<RgbaImage>, region: PixelRegion) -> GuiResult<Texture> {
        Texture::with_region(image, region)
    }

    fn load_path(&self, path: &Path) -> GuiResult<Texture>;
}

/// Decodes files with the `image` crate and remembers every path it loaded.
#[derive(Default)]
pub struct ImageTextureLoader {
    by_path: RefCell<AHashMap<PathBuf, Texture>>,
}

impl ImageTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_image(&self, image: RgbaImage) -> Texture {
        Texture::new(image)
    }

    fn load_path(&self, path: &Path) -> GuiResult<Texture> {
        if let Some(t) = self.by_path.borrow().get(path) {
            return Ok(t.clone());
        }
        log::debug!("loading texture {}", path.display());
        let image = image::open(path).map_err(|source| GuiError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Texture::new(image.to_rgba8());
        self.by_path
            .borrow_mut()
            .insert(path.to_path_buf(), texture.clone());
        Ok(texture)
    }
}

/// Named textures shared by every widget of one window, such as the
/// checkbox icon set.
#[derive(Default)]
pub struct AssetCache {
    entries: RefCell<AHashMap<String, Texture>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Texture> {
        self.entries.borrow().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, texture: Texture) {
        self.entries.borrow_mut().insert(name.into(), texture);
    }

    /// Returns the cached texture or runs `load` once and caches its result.
    /// A failing `load` caches nothing.
    pub fn get_or_load(
        &self,
        name: &str,
        load: impl FnOnce() -> GuiResult<Texture>,
    ) -> GuiResult<Texture> {
        if let Some(t) = self.get(name) {
            return Ok(t);
        }
        log::debug!("asset cache miss: {name}");
        let t = load()?;
        self.insert(name, t.clone());
        Ok(t)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

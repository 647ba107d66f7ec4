//! Icon sets shared through the window's asset cache.
//!
//! Each set can be built from image files or drawn procedurally. Either way
//! the textures are cached under fixed names, so every widget of a window
//! shares one copy.

use std::path::Path;

use image::RgbaImage;
use tessera_core::{Color, GuiResult, Texture, WindowContext};

const ICON_PX: u32 = 32;

fn cached(
    window: &WindowContext,
    name: &str,
    draw: impl FnOnce() -> RgbaImage,
) -> GuiResult<Texture> {
    window
        .assets()
        .get_or_load(name, || Ok(window.texture_loader().load_image(draw())))
}

fn cached_file(window: &WindowContext, name: &str, path: &Path) -> GuiResult<Texture> {
    window
        .assets()
        .get_or_load(name, || window.texture_loader().load_path(path))
}

fn framed(fill: Color, frame: Color) -> RgbaImage {
    RgbaImage::from_fn(ICON_PX, ICON_PX, |x, y| {
        let edge = x < 2 || y < 2 || x >= ICON_PX - 2 || y >= ICON_PX - 2;
        if edge { frame.into() } else { fill.into() }
    })
}

fn mark(img: &mut RgbaImage, color: Color, hit: impl Fn(u32, u32) -> bool) {
    for y in 0..ICON_PX {
        for x in 0..ICON_PX {
            if hit(x, y) {
                img.put_pixel(x, y, color.into());
            }
        }
    }
}

fn plus(x: u32, y: u32) -> bool {
    let mid = ICON_PX / 2;
    let (dx, dy) = (x.abs_diff(mid), y.abs_diff(mid));
    (dx <= 2 && dy <= 10) || (dy <= 2 && dx <= 10)
}

fn cross(x: u32, y: u32) -> bool {
    let inside = (6..ICON_PX - 6).contains(&x) && (6..ICON_PX - 6).contains(&y);
    inside && (x.abs_diff(y) <= 2 || (x + y).abs_diff(ICON_PX - 1) <= 2)
}

fn check(x: u32, y: u32) -> bool {
    (8..ICON_PX - 8).contains(&x) && (8..ICON_PX - 8).contains(&y)
}

#[derive(Clone, Debug)]
pub struct CheckboxIcons {
    pub base: Texture,
    pub hover: Texture,
    pub checked: Texture,
    pub checked_hover: Texture,
}

impl CheckboxIcons {
    pub fn procedural(window: &WindowContext) -> GuiResult<Self> {
        let dark = Color::from_rgb(40, 40, 40);
        let light = Color::from_rgb(200, 220, 255);
        let ticked = |fill: Color| {
            let mut img = framed(fill, dark);
            mark(&mut img, dark, check);
            img
        };
        Ok(Self {
            base: cached(window, "tessera/checkbox/base", || framed(Color::WHITE, dark))?,
            hover: cached(window, "tessera/checkbox/hover", || framed(light, dark))?,
            checked: cached(window, "tessera/checkbox/checked", || ticked(Color::WHITE))?,
            checked_hover: cached(window, "tessera/checkbox/checked_hover", || ticked(light))?,
        })
    }

    /// Loads `base.png`, `hover.png`, `checked.png` and `checked_hover.png`
    /// from `dir`. A missing file is an error.
    pub fn from_dir(window: &WindowContext, dir: &Path) -> GuiResult<Self> {
        let load = |name: &str| {
            cached_file(
                window,
                &format!("tessera/checkbox/{name}"),
                &dir.join(format!("{name}.png")),
            )
        };
        Ok(Self {
            base: load("base")?,
            hover: load("hover")?,
            checked: load("checked")?,
            checked_hover: load("checked_hover")?,
        })
    }
}

/// Add and delete buttons of editable lists.
#[derive(Clone, Debug)]
pub struct ListIcons {
    pub add: Texture,
    pub add_hover: Texture,
    pub delete: Texture,
    pub delete_hover: Texture,
}

impl ListIcons {
    pub fn procedural(window: &WindowContext) -> GuiResult<Self> {
        let drawn = |fill: Color, sign: Color, shape: fn(u32, u32) -> bool| {
            let mut img = framed(fill, sign);
            mark(&mut img, sign, shape);
            img
        };
        let green = Color::from_rgb(20, 140, 20);
        let red = Color::from_rgb(180, 20, 20);
        Ok(Self {
            add: cached(window, "tessera/list/add", || drawn(Color::WHITE, green, plus))?,
            add_hover: cached(window, "tessera/list/add_hover", || {
                drawn(Color::from_rgb(210, 255, 210), green, plus)
            })?,
            delete: cached(window, "tessera/list/delete", || drawn(Color::WHITE, red, cross))?,
            delete_hover: cached(window, "tessera/list/delete_hover", || {
                drawn(Color::from_rgb(255, 210, 210), red, cross)
            })?,
        })
    }
}

/// Entries of the file chooser.
#[derive(Clone, Debug)]
pub struct FileIcons {
    pub folder: Texture,
    pub file: Texture,
}

impl FileIcons {
    pub fn procedural(window: &WindowContext) -> GuiResult<Self> {
        Ok(Self {
            folder: cached(window, "tessera/files/folder", || {
                framed(Color::from_rgb(240, 200, 80), Color::from_rgb(160, 120, 20))
            })?,
            file: cached(window, "tessera/files/file", || {
                framed(Color::WHITE, Color::from_rgb(120, 120, 120))
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_shared_per_window() {
        let w = WindowContext::headless();
        let a = CheckboxIcons::procedural(&w).unwrap();
        let b = CheckboxIcons::procedural(&w).unwrap();
        assert_eq!(a.base, b.base);
        assert_eq!(a.checked_hover, b.checked_hover);
        assert_eq!(w.assets().len(), 4);

        let other = WindowContext::headless();
        let c = CheckboxIcons::procedural(&other).unwrap();
        assert_ne!(a.base, c.base);
    }

    #[test]
    fn test_missing_icon_files_are_fatal() {
        let w = WindowContext::headless();
        let err = CheckboxIcons::from_dir(&w, Path::new("/no/such/icons")).unwrap_err();
        assert!(matches!(err, tessera_core::GuiError::TextureLoad { .. }));
    }

    #[test]
    fn test_plus_and_cross_shapes() {
        assert!(plus(16, 16));
        assert!(!plus(2, 2));
        assert!(cross(10, 10));
        assert!(cross(10, 21));
        assert!(!cross(16, 6));
    }
}

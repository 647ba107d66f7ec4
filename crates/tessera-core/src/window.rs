//! Services a window offers to every component it hosts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::component::Component;
use crate::geometry::Vec2;
use crate::glyph::{BoxGlyphs, CharBuilder};
use crate::input::{KeyCode, WindowInput};
use crate::texture::{AssetCache, ImageTextureLoader, TextureLoader};

struct WindowShared {
    changed: Cell<bool>,
    mouse: Cell<Option<Vec2>>,
    last_mouse: Cell<Option<Vec2>>,
    input: RefCell<WindowInput>,
    size: Cell<(u32, u32)>,
    textures: Rc<dyn TextureLoader>,
    chars: Rc<CharBuilder>,
    assets: AssetCache,
    pending_main: RefCell<Option<Box<dyn Component>>>,
    stop_requested: Cell<bool>,
}

/// Cheap-clone handle to the window that hosts a component tree.
#[derive(Clone)]
pub struct WindowContext(Rc<WindowShared>);

impl WindowContext {
    pub fn new(textures: Rc<dyn TextureLoader>, chars: Rc<CharBuilder>) -> Self {
        Self(Rc::new(WindowShared {
            changed: Cell::new(true),
            mouse: Cell::new(None),
            last_mouse: Cell::new(None),
            input: RefCell::new(WindowInput::default()),
            size: Cell::new((800, 600)),
            textures,
            chars,
            assets: AssetCache::new(),
            pending_main: RefCell::new(None),
            stop_requested: Cell::new(false),
        }))
    }

    /// Context backed by [`ImageTextureLoader`] and [`BoxGlyphs`], for
    /// headless windows.
    pub fn headless() -> Self {
        Self::new(
            Rc::new(ImageTextureLoader::new()),
            Rc::new(CharBuilder::new(BoxGlyphs)),
        )
    }

    pub fn mark_change(&self) {
        self.0.changed.set(true);
    }
    pub fn has_changed(&self) -> bool {
        self.0.changed.get()
    }
    /// Clears the dirty flag, returning its previous value.
    pub fn take_change(&self) -> bool {
        self.0.changed.replace(false)
    }

    /// Mouse position in window space, `None` while outside the window.
    pub fn mouse(&self) -> Option<Vec2> {
        self.0.mouse.get()
    }
    pub fn mouse_x(&self) -> f32 {
        self.mouse().map_or(f32::NAN, |p| p.x)
    }
    pub fn mouse_y(&self) -> f32 {
        self.mouse().map_or(f32::NAN, |p| p.y)
    }
    pub fn set_mouse(&self, pos: Option<Vec2>) {
        self.0.mouse.set(pos);
    }

    /// Movement since the last [`WindowContext::end_update`]. Zero while the
    /// mouse is or was outside the window.
    pub fn mouse_delta(&self) -> Vec2 {
        match (self.0.mouse.get(), self.0.last_mouse.get()) {
            (Some(now), Some(then)) => Vec2::new(now.x - then.x, now.y - then.y),
            _ => Vec2::ZERO,
        }
    }
    pub fn mouse_dx(&self) -> f32 {
        self.mouse_delta().x
    }
    pub fn mouse_dy(&self) -> f32 {
        self.mouse_delta().y
    }
    pub fn end_update(&self) {
        self.0.last_mouse.set(self.0.mouse.get());
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.0.input.borrow().is_key_down(key)
    }
    pub fn with_input<R>(&self, f: impl FnOnce(&mut WindowInput) -> R) -> R {
        f(&mut self.0.input.borrow_mut())
    }

    pub fn size(&self) -> (u32, u32) {
        self.0.size.get()
    }
    pub fn set_size(&self, width: u32, height: u32) {
        self.0.size.set((width, height));
    }

    pub fn texture_loader(&self) -> &dyn TextureLoader {
        self.0.textures.as_ref()
    }
    pub fn char_builder(&self) -> &CharBuilder {
        &self.0.chars
    }
    pub fn assets(&self) -> &AssetCache {
        &self.0.assets
    }

    /// Requests a new main component. The window installs it once the event
    /// currently being dispatched has completed.
    pub fn set_main_component(&self, component: Box<dyn Component>) {
        if self.0.pending_main.replace(Some(component)).is_some() {
            log::debug!("pending main component replaced before it was installed");
        }
    }
    pub fn take_pending_main(&self) -> Option<Box<dyn Component>> {
        self.0.pending_main.borrow_mut().take()
    }

    pub fn stop_running(&self) {
        self.0.stop_requested.set(true);
    }
    pub fn stop_requested(&self) -> bool {
        self.0.stop_requested.get()
    }
    pub fn reset_stop(&self) {
        self.0.stop_requested.set(false);
    }

    pub fn ptr_eq(&self, other: &WindowContext) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

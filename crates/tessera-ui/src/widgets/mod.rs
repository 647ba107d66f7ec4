/// Implements `Component` for a widget that is a [`GuiMenu`](crate::GuiMenu)
/// in a field named `menu`, by forwarding every call to it.
macro_rules! menu_component {
    ($ty:ty) => {
        impl ::tessera_core::Component for $ty {
            fn init(
                &mut self,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::init(&mut self.menu, state)
            }
            fn update(
                &mut self,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::update(&mut self.menu, state)
            }
            fn render(
                &mut self,
                renderer: &mut dyn ::tessera_core::Renderer,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::render(&mut self.menu, renderer, state)
            }
            fn click(
                &mut self,
                x: f32,
                y: f32,
                button: ::tessera_core::MouseButton,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::click(&mut self.menu, x, y, button, state)
            }
            fn click_out(
                &mut self,
                button: ::tessera_core::MouseButton,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::click_out(&mut self.menu, button, state)
            }
            fn scroll(
                &mut self,
                amount: f32,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<bool> {
                ::tessera_core::Component::scroll(&mut self.menu, amount, state)
            }
            fn key_pressed(
                &mut self,
                key: ::tessera_core::KeyPress,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::key_pressed(&mut self.menu, key, state)
            }
            fn key_released(
                &mut self,
                key: ::tessera_core::KeyCode,
                state: &::tessera_core::ComponentState,
            ) -> ::tessera_core::GuiResult<()> {
                ::tessera_core::Component::key_released(&mut self.menu, key, state)
            }
            fn location_for_text(&self, text: &str) -> Option<::tessera_core::Vec2> {
                ::tessera_core::Component::location_for_text(&self.menu, text)
            }
        }
    };
}
pub(crate) use menu_component;

pub mod checkbox;
pub mod color;
pub mod decorators;
pub mod dynamic_text;
pub mod edit;
pub mod file_chooser;
pub mod icons;
pub mod image;
pub mod text;
pub mod text_array;
pub mod wrapper;

use std::rc::Rc;

use tessera_core::{Component, ComponentState, GuiResult, Signal, Texture, WindowContext};
use tessera_text::{TextBuilder, TextProperties};

/// Callback run by buttons. Receives the state of the button that fired.
pub type Action = Rc<dyn Fn(&ComponentState) -> GuiResult<()>>;

pub fn action(f: impl Fn(&ComponentState) -> GuiResult<()> + 'static) -> Action {
    Rc::new(f)
}

/// Produces the component to return to when a sub-menu closes.
pub type ComponentFactory = Rc<dyn Fn() -> Box<dyn Component>>;

/// Factory handing out clones of `c`. Menus are cheap to clone and clones
/// share their children, so this returns to the very same menu.
pub fn return_to<C: Component + Clone + 'static>(c: C) -> ComponentFactory {
    Rc::new(move || Box::new(c.clone()))
}

const MAX_LABEL_PX: f32 = 4096.0;

/// Pixel size the component currently covers in the window.
pub(crate) fn pixel_size(state: &ComponentState) -> (u32, u32) {
    let (w, h) = state.window().size();
    let r = state.window_rect();
    let px = |frac: f32, total: u32| {
        (frac.abs() * total as f32).round().clamp(1.0, MAX_LABEL_PX) as u32
    };
    (px(r.width(), w), px(r.height(), h))
}

/// Label texture, regenerated only when text, properties or pixel size
/// change.
#[derive(Default)]
pub(crate) struct LabelCache {
    key: Option<(String, TextProperties, (u32, u32))>,
    texture: Option<Texture>,
}

impl LabelCache {
    pub(crate) fn get(
        &mut self,
        text: &str,
        props: &TextProperties,
        state: &ComponentState,
    ) -> GuiResult<Texture> {
        let size = pixel_size(state);
        let fresh = matches!(&self.key, Some((t, p, s)) if t == text && p == props && *s == size);
        if let (true, Some(texture)) = (fresh, &self.texture) {
            return Ok(texture.clone());
        }
        let window = state.window();
        let image =
            TextBuilder::new(window.char_builder()).create_image(text, props, size.0, size.1)?;
        let texture = window.texture_loader().load_image(image);
        self.key = Some((text.to_string(), props.clone(), size));
        self.texture = Some(texture.clone());
        Ok(texture)
    }
}

/// Marks the window changed whenever a watched signal changes.
///
/// Subscribes at most once per window, so re-initialising a widget does not
/// stack subscribers. The subscription ends when the widget is dropped.
#[derive(Default)]
pub(crate) struct Repaint(Option<Watch>);

struct Watch {
    window: WindowContext,
    cancel: Box<dyn Fn()>,
}

impl Repaint {
    pub(crate) fn watch<T: 'static>(&mut self, signal: &Signal<T>, state: &ComponentState) {
        let window = state.window();
        if self.0.as_ref().is_some_and(|w| w.window.ptr_eq(window)) {
            return;
        }
        self.stop();
        let marker = window.clone();
        let id = signal.subscribe(move |_| marker.mark_change());
        let source = signal.clone();
        self.0 = Some(Watch {
            window: window.clone(),
            cancel: Box::new(move || {
                source.unsubscribe(id);
            }),
        });
    }

    fn stop(&mut self) {
        if let Some(watch) = self.0.take() {
            (watch.cancel)();
        }
    }
}

impl Drop for Repaint {
    fn drop(&mut self) {
        self.stop();
    }
}

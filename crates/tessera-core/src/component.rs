use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{GuiError, GuiResult};
use crate::geometry::Vec2;
use crate::input::{KeyCode, KeyPress, MouseButton};
use crate::render_api::Renderer;
use crate::state::ComponentState;

/// Identifies one child slot of a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubComponentId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
}

/// A widget. Coordinates handed to a component are in its own unit square,
/// y pointing up.
///
/// The `state` argument is supplied by whoever owns the component and is only
/// valid for the duration of the call.
pub trait Component {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        let _ = state;
        Ok(())
    }

    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        let _ = state;
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()>;

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        let _ = (x, y, button, state);
        Ok(())
    }

    /// A click landed outside this component.
    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        let _ = (button, state);
        Ok(())
    }

    /// Returns whether the scroll was consumed.
    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        let _ = (amount, state);
        Ok(false)
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        let _ = (key, state);
        Ok(())
    }

    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        let _ = (key, state);
        Ok(())
    }

    /// Inactive components are skipped by their container entirely.
    fn is_active(&self) -> bool {
        true
    }

    /// Local position of the first place this component shows `text`, used
    /// by test drivers to find and click on labelled widgets.
    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        let _ = text;
        None
    }
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        (**self).init(state)
    }
    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        (**self).update(state)
    }
    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        (**self).render(renderer, state)
    }
    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        (**self).click(x, y, button, state)
    }
    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        (**self).click_out(button, state)
    }
    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        (**self).scroll(amount, state)
    }
    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        (**self).key_pressed(key, state)
    }
    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        (**self).key_released(key, state)
    }
    fn is_active(&self) -> bool {
        (**self).is_active()
    }
    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        (**self).location_for_text(text)
    }
}

/// Shared components, e.g. a menu that is returned to after a sub-menu
/// closes. Dispatching into one that is already borrowed further up the
/// stack is an error rather than a panic.
impl<C: Component + ?Sized> Component for Rc<RefCell<C>> {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.init(state)
    }
    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.update(state)
    }
    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.render(renderer, state)
    }
    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        borrow(&**self)?.click(x, y, button, state)
    }
    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.click_out(button, state)
    }
    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        borrow(&**self)?.scroll(amount, state)
    }
    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.key_pressed(key, state)
    }
    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        borrow(&**self)?.key_released(key, state)
    }
    fn is_active(&self) -> bool {
        self.try_borrow().map_or(true, |c| c.is_active())
    }
    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.try_borrow().ok()?.location_for_text(text)
    }
}

fn borrow<C: ?Sized>(cell: &RefCell<C>) -> GuiResult<std::cell::RefMut<'_, C>> {
    cell.try_borrow_mut()
        .map_err(|_| GuiError::Reentrant(std::any::type_name::<C>().to_string()))
}

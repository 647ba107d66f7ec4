//! Wrappers that change when a component shows up or how it looks.

use tessera_core::{
    Component, ComponentState, Condition, GuiResult, KeyCode, KeyPress, MouseButton, Renderer,
    Vec2,
};

/// Shows `inner` only while `condition` holds. A hidden component is
/// inactive, so menus skip it for every event.
pub struct Conditional<C> {
    inner: C,
    condition: Condition,
}

impl<C: Component> Conditional<C> {
    pub fn new(inner: C, condition: Condition) -> Self {
        Self { inner, condition }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    fn shown(&self) -> bool {
        (self.condition)()
    }
}

impl<C: Component> Component for Conditional<C> {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.inner.init(state)
    }

    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.inner.update(state)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        if self.shown() {
            self.inner.render(renderer, state)?;
        }
        Ok(())
    }

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        if self.shown() {
            self.inner.click(x, y, button, state)?;
        }
        Ok(())
    }

    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        self.inner.click_out(button, state)
    }

    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        if self.shown() {
            self.inner.scroll(amount, state)
        } else {
            Ok(false)
        }
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        self.inner.key_pressed(key, state)
    }

    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        self.inner.key_released(key, state)
    }

    fn is_active(&self) -> bool {
        self.shown() && self.inner.is_active()
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        if self.shown() {
            self.inner.location_for_text(text)
        } else {
            None
        }
    }
}

/// Draws `active` in place of `inner` while `condition` holds, for example a
/// highlighted variant of the button for the currently selected option.
/// Events always go to `inner`.
pub struct Activatable<C, A> {
    inner: C,
    active: A,
    condition: Condition,
}

impl<C: Component, A: Component> Activatable<C, A> {
    pub fn new(inner: C, active: A, condition: Condition) -> Self {
        Self {
            inner,
            active,
            condition,
        }
    }
}

impl<C: Component, A: Component> Component for Activatable<C, A> {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.inner.init(state)?;
        self.active.init(state)
    }

    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.inner.update(state)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        if (self.condition)() {
            self.active.render(renderer, state)
        } else {
            self.inner.render(renderer, state)
        }
    }

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        self.inner.click(x, y, button, state)
    }

    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        self.inner.click_out(button, state)
    }

    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        self.inner.scroll(amount, state)
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        self.inner.key_pressed(key, state)
    }

    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        self.inner.key_released(key, state)
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.inner.location_for_text(text)
    }
}

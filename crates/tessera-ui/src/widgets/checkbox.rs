use tessera_core::{
    Component, ComponentState, GuiResult, MouseButton, Rect, Renderer, Signal, signal,
};

use super::Repaint;
use super::icons::CheckboxIcons;

/// Two-state toggle. The checked state lives in a [`Signal`] so the owner
/// can read and set it from outside.
pub struct Checkbox {
    checked: Signal<bool>,
    icons: Option<CheckboxIcons>,
    repaint: Repaint,
}

impl Checkbox {
    pub fn new(checked: bool) -> Self {
        Self::with_signal(signal(checked))
    }

    pub fn with_signal(checked: Signal<bool>) -> Self {
        Self {
            checked,
            icons: None,
            repaint: Repaint::default(),
        }
    }

    /// Uses `icons` instead of the window's procedural set.
    pub fn with_icons(mut self, icons: CheckboxIcons) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn checked(&self) -> Signal<bool> {
        self.checked.clone()
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }
}

impl Component for Checkbox {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        if self.icons.is_none() {
            self.icons = Some(CheckboxIcons::procedural(state.window())?);
        }
        self.repaint.watch(&self.checked, state);
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let Some(icons) = &self.icons else {
            return Ok(());
        };
        let texture = match (self.checked.get(), state.is_mouse_over()) {
            (false, false) => &icons.base,
            (false, true) => &icons.hover,
            (true, false) => &icons.checked,
            (true, true) => &icons.checked_hover,
        };
        renderer.render_texture(texture, Rect::UNIT);
        Ok(())
    }

    fn click(
        &mut self,
        _x: f32,
        _y: f32,
        _button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        self.checked.update(|c| *c = !*c);
        state.window().mark_change();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{DrawCommand, RecordingRenderer, Vec2, WindowContext};

    #[test]
    fn test_click_toggles_and_repaints() {
        let window = WindowContext::headless();
        let state = ComponentState::root(window.clone());
        let mut cb = Checkbox::new(false);
        cb.init(&state).unwrap();
        window.take_change();

        cb.click(0.5, 0.5, MouseButton::Right, &state).unwrap();
        assert!(cb.is_checked());
        assert!(window.take_change());

        cb.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
        assert!(!cb.is_checked());
    }

    #[test]
    fn test_external_set_marks_change() {
        let window = WindowContext::headless();
        let state = ComponentState::root(window.clone());
        let mut cb = Checkbox::new(false);
        cb.init(&state).unwrap();
        cb.init(&state).unwrap();
        window.take_change();
        cb.checked().set(true);
        assert!(window.take_change());
    }

    #[test]
    fn test_icon_follows_state_and_hover() {
        let window = WindowContext::headless();
        let state = ComponentState::root(window.clone());
        let mut cb = Checkbox::new(true);
        cb.init(&state).unwrap();
        let icons = CheckboxIcons::procedural(&window).unwrap();

        window.set_mouse(Some(Vec2::new(0.5, 0.5)));
        let mut rec = RecordingRenderer::new();
        cb.render(&mut rec, &state).unwrap();
        assert!(matches!(
            rec.commands.as_slice(),
            [DrawCommand::Texture { id, .. }] if *id == icons.checked_hover.id()
        ));
    }
}

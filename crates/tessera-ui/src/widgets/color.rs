use tessera_core::{Color, Component, ComponentState, GuiResult, Renderer};

/// Fills its area with one colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorComponent {
    color: Color,
}

impl ColorComponent {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color, state: &ComponentState) {
        if self.color != color {
            self.color = color;
            state.window().mark_change();
        }
    }
}

impl Component for ColorComponent {
    fn render(&mut self, renderer: &mut dyn Renderer, _state: &ComponentState) -> GuiResult<()> {
        renderer.clear(self.color);
        Ok(())
    }
}

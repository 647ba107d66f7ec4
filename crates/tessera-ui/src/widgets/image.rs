use tessera_core::{Component, ComponentState, GuiResult, MouseButton, Rect, Renderer, Texture};

use super::Action;

/// Draws a texture stretched over its whole area.
#[derive(Clone, Debug)]
pub struct ImageComponent {
    texture: Texture,
}

impl ImageComponent {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn set_texture(&mut self, texture: Texture, state: &ComponentState) {
        if self.texture != texture {
            self.texture = texture;
            state.window().mark_change();
        }
    }
}

impl Component for ImageComponent {
    fn render(&mut self, renderer: &mut dyn Renderer, _state: &ComponentState) -> GuiResult<()> {
        renderer.render_texture(&self.texture, Rect::UNIT);
        Ok(())
    }
}

/// Image that swaps to a hover texture under the mouse and runs an action
/// on left click.
#[derive(Clone)]
pub struct ImageButton {
    texture: Texture,
    hover: Texture,
    action: Action,
}

impl ImageButton {
    pub fn new(texture: Texture, hover: Texture, action: Action) -> Self {
        Self {
            texture,
            hover,
            action,
        }
    }
}

impl Component for ImageButton {
    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let texture = if state.is_mouse_over() {
            &self.hover
        } else {
            &self.texture
        };
        renderer.render_texture(texture, Rect::UNIT);
        Ok(())
    }

    fn click(
        &mut self,
        _x: f32,
        _y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        if button == MouseButton::Left {
            (self.action)(state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use image::RgbaImage;
    use tessera_core::{DrawCommand, RecordingRenderer, Vec2, WindowContext};

    use super::*;
    use crate::widgets::action;

    fn texture(w: u32) -> Texture {
        Texture::new(RgbaImage::new(w, 1))
    }

    #[test]
    fn test_hover_texture_under_mouse() {
        let window = WindowContext::headless();
        let state = ComponentState::root(window.clone());
        let (plain, hover) = (texture(1), texture(2));
        let mut b = ImageButton::new(plain.clone(), hover.clone(), action(|_| Ok(())));
        let mut rec = RecordingRenderer::new();

        window.set_mouse(None);
        b.render(&mut rec, &state).unwrap();
        window.set_mouse(Some(Vec2::new(0.5, 0.5)));
        b.render(&mut rec, &state).unwrap();

        let ids: Vec<u64> = rec
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![plain.id(), hover.id()]);
    }

    #[test]
    fn test_only_left_click_fires() {
        let state = ComponentState::root(WindowContext::headless());
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let mut b = ImageButton::new(
            texture(1),
            texture(1),
            action(move |_| {
                f.set(f.get() + 1);
                Ok(())
            }),
        );
        b.click(0.5, 0.5, MouseButton::Right, &state).unwrap();
        assert_eq!(fired.get(), 0);
        b.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
        assert_eq!(fired.get(), 1);
    }
}

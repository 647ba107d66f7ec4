//! Headless driver for window-level tests.
//!
//! ```rust
//! use tessera_core::*;
//! use tessera_platform::{GuiTestHelper, GuiWindow, WindowConfig};
//!
//! struct Blank;
//! impl Component for Blank {
//!     fn render(&mut self, _: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let window = GuiWindow::new(WindowConfig::default(), Box::new(Blank));
//! let mut helper = GuiTestHelper::open(window).unwrap();
//! helper.click(0.5, 0.5, MouseButton::Left).unwrap();
//! assert!(helper.component_with_text("Ok").is_none());
//! ```

use tessera_core::{GuiError, KeyCode, MouseButton, RecordingRenderer, Vec2};

use crate::window::GuiWindow;

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("no component shows {0:?}")]
    TextNotFound(String),

    #[error(transparent)]
    Gui(#[from] GuiError),
}

pub type TestResult<T> = Result<T, TestError>;

/// Owns an open window and a [`RecordingRenderer`] to render it into.
pub struct GuiTestHelper {
    window: GuiWindow,
    renderer: RecordingRenderer,
}

impl GuiTestHelper {
    pub fn open(mut window: GuiWindow) -> TestResult<Self> {
        window.open()?;
        Ok(Self {
            window,
            renderer: RecordingRenderer::new(),
        })
    }

    pub fn window(&mut self) -> &mut GuiWindow {
        &mut self.window
    }

    pub fn renderer(&mut self) -> &mut RecordingRenderer {
        &mut self.renderer
    }

    /// One update followed by a render (if anything changed).
    pub fn frame(&mut self) -> TestResult<bool> {
        self.window.update()?;
        Ok(self.window.render(&mut self.renderer)?)
    }

    pub fn move_mouse(&mut self, x: f32, y: f32) {
        self.window.mouse_moved(Some(Vec2::new(x, y)));
    }

    pub fn click(&mut self, x: f32, y: f32, button: MouseButton) -> TestResult<()> {
        self.move_mouse(x, y);
        self.window.mouse_button(button, true);
        let result = self.window.click(x, y, button);
        self.window.mouse_button(button, false);
        Ok(result?)
    }

    pub fn scroll(&mut self, amount: f32) -> TestResult<bool> {
        Ok(self.window.scroll(amount)?)
    }

    /// Presses and releases `key`.
    pub fn press(&mut self, key: KeyCode) -> TestResult<()> {
        self.window.key_pressed(key)?;
        Ok(self.window.key_released(key)?)
    }

    /// Types every character of `text`.
    pub fn type_text(&mut self, text: &str) -> TestResult<()> {
        for ch in text.chars() {
            self.window.key_typed(ch)?;
        }
        Ok(())
    }

    /// Window position of the first component showing `text`.
    pub fn component_with_text(&self, text: &str) -> Option<Vec2> {
        self.window.main_component().location_for_text(text)
    }

    pub fn assert_component_with_text(&self, text: &str) -> TestResult<Vec2> {
        self.component_with_text(text)
            .ok_or_else(|| TestError::TextNotFound(text.to_string()))
    }

    /// Left-clicks the first component showing `text`.
    pub fn click_text(&mut self, text: &str) -> TestResult<()> {
        let at = self.assert_component_with_text(text)?;
        log::trace!("clicking {text:?} at {at:?}");
        self.click(at.x, at.y, MouseButton::Left)
    }
}

use tessera_core::{KeyCode, MouseButton, WindowContext};

/// Hooks around every event a [`GuiWindow`](crate::GuiWindow) handles.
///
/// A `pre_*` hook returning `true` cancels the event: the main component
/// never sees it and the matching `post_*` hook is not called. Listeners run
/// in the order they were added.
#[allow(unused_variables)]
pub trait WindowListener {
    fn pre_update(&mut self, window: &WindowContext) -> bool {
        false
    }
    fn post_update(&mut self, window: &WindowContext) {}

    fn pre_render(&mut self, window: &WindowContext) -> bool {
        false
    }
    fn post_render(&mut self, window: &WindowContext) {}

    fn pre_click(&mut self, x: f32, y: f32, button: MouseButton, window: &WindowContext) -> bool {
        false
    }
    fn post_click(&mut self, x: f32, y: f32, button: MouseButton, window: &WindowContext) {}

    /// Returns the amount to scroll by; `0.0` cancels.
    fn pre_scroll(&mut self, amount: f32, window: &WindowContext) -> f32 {
        amount
    }
    fn post_scroll(&mut self, amount: f32, consumed: bool, window: &WindowContext) {}

    fn pre_key_pressed(&mut self, key: KeyCode, window: &WindowContext) -> bool {
        false
    }
    fn post_key_pressed(&mut self, key: KeyCode, window: &WindowContext) {}

    fn pre_key_typed(&mut self, ch: char, window: &WindowContext) -> bool {
        false
    }
    fn post_key_typed(&mut self, ch: char, window: &WindowContext) {}

    fn pre_key_released(&mut self, key: KeyCode, window: &WindowContext) -> bool {
        false
    }
    fn post_key_released(&mut self, key: KeyCode, window: &WindowContext) {}

    fn pre_run_loop(&mut self, window: &WindowContext) {}
    fn post_run_loop(&mut self, window: &WindowContext) {}

    fn pre_close(&mut self, window: &WindowContext) -> bool {
        false
    }
    fn post_close(&mut self, window: &WindowContext) {}
}

use crate::geometry::{Rect, Vec2};
use crate::input::KeyCode;
use crate::window::WindowContext;

/// What a component may ask about its surroundings during a dispatch.
///
/// A state is the window plus the rectangle the component currently
/// occupies in window space. Containers derive child states on every
/// dispatch with [`ComponentState::relative`], so a state always reflects
/// the container's current pan offset and the child's current bounds.
#[derive(Clone)]
pub struct ComponentState {
    window: WindowContext,
    rect: Rect,
}

impl ComponentState {
    pub fn root(window: WindowContext) -> Self {
        Self {
            window,
            rect: Rect::UNIT,
        }
    }

    /// State of a child occupying `local` (in this component's space).
    pub fn relative(&self, local: Rect) -> Self {
        Self {
            window: self.window.clone(),
            rect: self.rect.sub_rect(local),
        }
    }

    pub fn window(&self) -> &WindowContext {
        &self.window
    }

    /// This component's area in window space.
    pub fn window_rect(&self) -> Rect {
        self.rect
    }

    /// Local mouse position, `None` while the mouse is outside the window or
    /// this area has no extent.
    pub fn mouse(&self) -> Option<Vec2> {
        self.window
            .mouse()
            .and_then(|p| self.rect.to_local(p).ok())
    }
    pub fn mouse_x(&self) -> f32 {
        self.mouse().map_or(f32::NAN, |p| p.x)
    }
    pub fn mouse_y(&self) -> f32 {
        self.mouse().map_or(f32::NAN, |p| p.y)
    }

    pub fn is_mouse_over(&self) -> bool {
        self.mouse().is_some_and(|p| Rect::UNIT.contains(p))
    }

    /// Mouse movement since the last update, in local units.
    pub fn mouse_dx(&self) -> f32 {
        let w = self.rect.width();
        if w == 0.0 { 0.0 } else { self.window.mouse_dx() / w }
    }
    pub fn mouse_dy(&self) -> f32 {
        let h = self.rect.height();
        if h == 0.0 { 0.0 } else { self.window.mouse_dy() / h }
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.window.is_key_down(key)
    }

    /// Maps a local point to window space.
    pub fn to_window(&self, local: Vec2) -> Vec2 {
        self.rect.to_parent(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_relative_mouse() {
        let w = WindowContext::headless();
        w.set_mouse(Some(Vec2::new(0.3, 0.3)));
        let root = ComponentState::root(w.clone());
        let child = root.relative(Rect::new(0.2, 0.2, 0.4, 0.4));
        assert_abs_diff_eq!(child.mouse_x(), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(child.mouse_y(), 0.5, epsilon = 1e-6);
        assert!(child.is_mouse_over());

        let far = root.relative(Rect::new(0.6, 0.6, 0.8, 0.8));
        assert!(!far.is_mouse_over());
        assert!(far.mouse_x() < 0.0);
    }

    #[test]
    fn test_mouse_outside_window_is_nan() {
        let w = WindowContext::headless();
        let s = ComponentState::root(w).relative(Rect::new(0.0, 0.0, 0.5, 0.5));
        assert!(s.mouse_x().is_nan());
        assert!(s.mouse_y().is_nan());
        assert!(!s.is_mouse_over());
    }

    #[test]
    fn test_degenerate_rect_reports_nan() {
        let w = WindowContext::headless();
        w.set_mouse(Some(Vec2::new(0.5, 0.5)));
        let s = ComponentState::root(w).relative(Rect::new(0.5, 0.0, 0.5, 1.0));
        assert!(s.mouse_x().is_nan());
        assert_eq!(s.mouse_dx(), 0.0);
    }

    #[test]
    fn test_delta_scales_to_local() {
        let w = WindowContext::headless();
        w.set_mouse(Some(Vec2::new(0.1, 0.1)));
        w.end_update();
        w.set_mouse(Some(Vec2::new(0.2, 0.1)));
        let s = ComponentState::root(w).relative(Rect::new(0.0, 0.0, 0.5, 0.5));
        assert_abs_diff_eq!(s.mouse_dx(), 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(s.mouse_dy(), 0.0, epsilon = 1e-6);
    }
}

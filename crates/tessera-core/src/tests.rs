#[cfg(test)]
mod tests {
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        clicks: Vec<(f32, f32)>,
        renders: u32,
    }

    impl Component for Recorder {
        fn render(&mut self, r: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
            self.renders += 1;
            r.fill(Color::GREEN, Rect::new(0.0, 0.0, 0.5, 0.5));
            Ok(())
        }
        fn click(&mut self, x: f32, y: f32, _: MouseButton, _: &ComponentState) -> GuiResult<()> {
            self.clicks.push((x, y));
            Ok(())
        }
    }

    #[test]
    fn test_boxed_component_forwards() {
        let mut c: Box<dyn Component> = Box::new(Recorder::default());
        let state = ComponentState::root(WindowContext::headless());
        let mut rec = RecordingRenderer::new();
        c.render(&mut rec, &state).unwrap();
        c.click(0.1, 0.2, MouseButton::Left, &state).unwrap();
        assert_eq!(rec.commands.len(), 1);
        assert!(c.is_active());
    }

    #[test]
    fn test_shared_component_rejects_reentry() {
        let shared = Rc::new(RefCell::new(Recorder::default()));
        let mut handle = shared.clone();
        let state = ComponentState::root(WindowContext::headless());

        handle.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
        assert_eq!(shared.borrow().clicks, vec![(0.5, 0.5)]);

        let _held = shared.borrow_mut();
        let err = handle
            .click(0.5, 0.5, MouseButton::Left, &state)
            .unwrap_err();
        assert!(matches!(err, GuiError::Reentrant(_)));
    }

    #[test]
    fn test_child_render_through_area() {
        let mut recorder = Recorder::default();
        let state = ComponentState::root(WindowContext::headless());
        let child_rect = Rect::new(0.5, 0.5, 1.0, 1.0);
        let mut rec = RecordingRenderer::new();
        {
            let r: &mut dyn Renderer = &mut rec;
            let mut area = r.area(child_rect);
            recorder.render(&mut area, &state.relative(child_rect)).unwrap();
        }
        assert_eq!(
            rec.commands,
            vec![DrawCommand::Fill(
                Color::GREEN,
                Rect::new(0.5, 0.5, 0.75, 0.75)
            )]
        );
        assert_eq!(recorder.renders, 1);
    }

    #[test]
    fn test_pending_main_component() {
        let w = WindowContext::headless();
        assert!(w.take_pending_main().is_none());
        w.set_main_component(Box::new(Recorder::default()));
        assert!(w.take_pending_main().is_some());
        assert!(w.take_pending_main().is_none());
    }

    #[test]
    fn test_dirty_flag() {
        let w = WindowContext::headless();
        // a fresh window always renders its first frame
        assert!(w.take_change());
        assert!(!w.take_change());
        w.mark_change();
        assert!(w.has_changed());
        assert!(w.take_change());
    }

    #[test]
    fn test_color_blend() {
        let half = Color(255, 0, 0, 128);
        let out = half.over(Color::BLUE);
        assert_eq!(out.3, 255);
        assert!(out.0 > 120 && out.0 < 135);
        assert!(out.2 > 120 && out.2 < 135);
        assert_eq!(Color::from_hex("#102030"), Color(16, 32, 48, 255));
        assert_eq!(Color::from_hex("zz"), Color::BLACK);
    }
}

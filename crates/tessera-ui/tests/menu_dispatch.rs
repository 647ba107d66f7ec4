use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use approx::assert_relative_eq;
use tessera_core::*;
use tessera_ui::*;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Init,
    Click(f32, f32, MouseButton),
    ClickOut(MouseButton),
    Scroll(f32),
    Key(KeyPress),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct Recorder {
    log: Log,
    consume_scroll: bool,
}

impl Recorder {
    fn new() -> (Self, Log) {
        let log = Log::default();
        (
            Self {
                log: log.clone(),
                consume_scroll: false,
            },
            log,
        )
    }
}

impl Component for Recorder {
    fn init(&mut self, _: &ComponentState) -> GuiResult<()> {
        self.log.borrow_mut().push(Event::Init);
        Ok(())
    }
    fn render(&mut self, _: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
        Ok(())
    }
    fn click(&mut self, x: f32, y: f32, b: MouseButton, _: &ComponentState) -> GuiResult<()> {
        self.log.borrow_mut().push(Event::Click(x, y, b));
        Ok(())
    }
    fn click_out(&mut self, b: MouseButton, _: &ComponentState) -> GuiResult<()> {
        self.log.borrow_mut().push(Event::ClickOut(b));
        Ok(())
    }
    fn scroll(&mut self, amount: f32, _: &ComponentState) -> GuiResult<bool> {
        self.log.borrow_mut().push(Event::Scroll(amount));
        Ok(self.consume_scroll)
    }
    fn key_pressed(&mut self, key: KeyPress, _: &ComponentState) -> GuiResult<()> {
        self.log.borrow_mut().push(Event::Key(key));
        Ok(())
    }
}

/// Runs `on_click` when clicked, then optionally fails or panics.
struct Trigger {
    on_click: Box<dyn Fn() -> GuiResult<()>>,
}

impl Component for Trigger {
    fn render(&mut self, _: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
        Ok(())
    }
    fn click(&mut self, _: f32, _: f32, _: MouseButton, _: &ComponentState) -> GuiResult<()> {
        (self.on_click)()
    }
}

fn setup() -> (WindowContext, ComponentState) {
    let window = WindowContext::headless();
    let state = ComponentState::root(window.clone());
    (window, state)
}

fn clicks(log: &Log) -> Vec<Event> {
    log.borrow()
        .iter()
        .filter(|e| !matches!(e, Event::Init))
        .cloned()
        .collect()
}

#[test]
fn click_is_remapped_into_child_space() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let (recorder, log) = Recorder::new();
    menu.add_component(recorder, Rect::new(0.2, 0.2, 0.4, 0.4)).unwrap();
    menu.init(&state).unwrap();

    menu.click(0.3, 0.3, MouseButton::Left, &state).unwrap();
    menu.click(0.9, 0.9, MouseButton::Left, &state).unwrap();

    let events = clicks(&log);
    assert_eq!(events.len(), 2);
    let Event::Click(x, y, MouseButton::Left) = events[0] else {
        panic!("expected a click, got {:?}", events[0]);
    };
    assert_relative_eq!(x, 0.5, epsilon = 1e-5);
    assert_relative_eq!(y, 0.5, epsilon = 1e-5);
    assert_eq!(events[1], Event::ClickOut(MouseButton::Left));
}

#[test]
fn nested_menus_compose_remaps() {
    let (_, state) = setup();
    let inner = GuiMenu::default();
    let (recorder, log) = Recorder::new();
    inner.add_component(recorder, Rect::new(0.0, 0.0, 0.5, 0.5)).unwrap();
    let mut outer = GuiMenu::default();
    outer.add_component(inner, Rect::new(0.5, 0.5, 1.0, 1.0)).unwrap();
    outer.init(&state).unwrap();

    outer.click(0.6, 0.6, MouseButton::Right, &state).unwrap();
    let Event::Click(x, y, MouseButton::Right) = clicks(&log)[0] else {
        panic!("expected a click");
    };
    assert_relative_eq!(x, 0.4, epsilon = 1e-5);
    assert_relative_eq!(y, 0.4, epsilon = 1e-5);

    // a click outside the inner menu reaches the recorder as click_out
    outer.click(0.1, 0.1, MouseButton::Right, &state).unwrap();
    assert_eq!(clicks(&log)[1], Event::ClickOut(MouseButton::Right));
}

#[test]
fn every_active_child_gets_exactly_one_click_event() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let mut logs = Vec::new();
    for i in 0..5 {
        let (recorder, log) = Recorder::new();
        let x = i as f32 * 0.2;
        menu.add_component(recorder, Rect::new(x, 0.0, x + 0.2, 0.5)).unwrap();
        logs.push(log);
    }
    let (hidden, hidden_log) = Recorder::new();
    menu.add_conditional(hidden, Rect::UNIT, condition(|| false)).unwrap();
    menu.init(&state).unwrap();

    for (x, y) in [(0.1, 0.1), (0.5, 0.25), (0.6, 0.9), (0.4, 0.5)] {
        menu.click(x, y, MouseButton::Left, &state).unwrap();
    }
    for log in &logs {
        assert_eq!(clicks(log).len(), 4);
    }
    assert!(clicks(&hidden_log).is_empty());
    // (0.4, 0.5) lies on a shared edge, so both neighbours see a click
    assert!(matches!(clicks(&logs[1])[3], Event::Click(..)));
    assert!(matches!(clicks(&logs[2])[3], Event::Click(..)));
}

#[test]
fn mutations_during_click_apply_afterwards() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let handle = menu.handle();

    let (victim, victim_log) = Recorder::new();
    let victim_id = menu.add_component(victim, Rect::new(0.5, 0.5, 1.0, 1.0)).unwrap().id();
    let (bystander, bystander_log) = Recorder::new();
    menu.add_component(bystander, Rect::new(0.5, 0.0, 1.0, 0.5)).unwrap();

    let added_logs: Rc<RefCell<Vec<Log>>> = Rc::default();
    let added = added_logs.clone();
    let h = handle.clone();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                for _ in 0..2 {
                    let (p, log) = Recorder::new();
                    h.add_component(p, Rect::new(0.0, 0.5, 0.5, 1.0))?;
                    added.borrow_mut().push(log);
                }
                h.remove_component(victim_id)?;
                // removing twice in one dispatch is a misuse
                assert!(matches!(
                    h.remove_component(victim_id),
                    Err(GuiError::ComponentNotFound(_))
                ));
                Ok(())
            }),
        },
        Rect::new(0.0, 0.0, 0.5, 0.5),
    )
    .unwrap();
    menu.init(&state).unwrap();
    assert_eq!(menu.len(), 3);

    menu.click(0.25, 0.25, MouseButton::Left, &state).unwrap();

    assert_eq!(menu.len(), 3 - 1 + 2);
    assert!(!menu.is_iterating());
    assert!(menu.components().iter().all(|c| c.id() != victim_id));
    // the snapshot taken before the click still reached the victim once
    assert_eq!(clicks(&victim_log), vec![Event::ClickOut(MouseButton::Left)]);
    assert_eq!(clicks(&bystander_log), vec![Event::ClickOut(MouseButton::Left)]);
    for log in added_logs.borrow().iter() {
        assert_eq!(*log.borrow(), vec![Event::Init]);
    }
}

#[test]
fn add_then_remove_in_same_dispatch_cancels() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                if let Some(sub) = h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)? {
                    h.remove_component(sub.id())?;
                }
                Ok(())
            }),
        },
        Rect::UNIT,
    )
    .unwrap();
    menu.init(&state).unwrap();
    menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
    assert_eq!(menu.len(), 1);
}

#[test]
fn clear_runs_before_queued_adds() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    menu.add_component(ColorComponent::new(Color::BLUE), Rect::UNIT).unwrap();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)?;
                h.clear_components();
                Ok(())
            }),
        },
        Rect::UNIT,
    )
    .unwrap();
    menu.init(&state).unwrap();
    menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
    assert_eq!(menu.len(), 1);
}

#[test]
fn failing_child_still_flushes() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)?;
                Err(GuiError::Font("boom".into()))
            }),
        },
        Rect::UNIT,
    )
    .unwrap();
    menu.init(&state).unwrap();

    let err = menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap_err();
    assert!(matches!(err, GuiError::Font(_)));
    assert_eq!(menu.len(), 2);
    assert!(!menu.is_iterating());
}

#[test]
fn panicking_child_still_flushes() {
    let (_, state) = setup();
    let menu = GuiMenu::default();
    let h = menu.handle();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)?;
                panic!("widget bug");
            }),
        },
        Rect::UNIT,
    )
    .unwrap();
    let mut m = menu.clone();
    m.init(&state).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = m.click(0.5, 0.5, MouseButton::Left, &state);
    }));
    assert!(result.is_err());
    assert_eq!(menu.len(), 2);
    assert!(!menu.is_iterating());

    // the menu keeps working afterwards
    let mut m = menu.clone();
    m.click(0.5, 0.5, MouseButton::Right, &state).ok();
}

#[test]
fn scroll_pans_until_clamped() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    menu.add_component(ColorComponent::new(Color::RED), Rect::new(0.0, 0.0, 1.0, 2.0))
        .unwrap();
    menu.init(&state).unwrap();
    assert_eq!(menu.center_bounds().max_y, 1.0);

    assert!(menu.scroll(1.0, &state).unwrap());
    assert_eq!(menu.screen_center().y, 1.0);
    assert!(!menu.scroll(1.0, &state).unwrap());
    assert!(menu.scroll(-0.25, &state).unwrap());
    assert_relative_eq!(menu.screen_center().y, 0.5);
}

#[test]
fn child_under_mouse_gets_scroll_first() {
    let (window, state) = setup();
    let mut menu = GuiMenu::default();
    let (mut recorder, log) = Recorder::new();
    recorder.consume_scroll = true;
    menu.add_component(recorder, Rect::new(0.0, 0.0, 1.0, 2.0)).unwrap();
    menu.init(&state).unwrap();

    window.set_mouse(Some(Vec2::new(0.5, 0.5)));
    assert!(menu.scroll(1.0, &state).unwrap());
    assert_eq!(menu.screen_center().y, 0.0);
    assert_eq!(clicks(&log), vec![Event::Scroll(1.0)]);

    window.set_mouse(None);
    assert!(menu.scroll(1.0, &state).unwrap());
    assert_eq!(menu.screen_center().y, 1.0);
}

#[test]
fn fixed_menu_ignores_scroll_and_arrows() {
    let (window, state) = setup();
    let mut menu = GuiMenu::new(MenuConfig::default().fixed());
    menu.add_component(ColorComponent::new(Color::RED), Rect::new(0.0, 0.0, 1.0, 2.0))
        .unwrap();
    menu.init(&state).unwrap();
    window.with_input(|i| i.set_key_down(KeyCode::ArrowUp));

    assert!(!menu.scroll(1.0, &state).unwrap());
    menu.update(&state).unwrap();
    assert_eq!(menu.screen_center(), Vec2::ZERO);
}

#[test]
fn arrow_panning_stops_at_left_edge() {
    let (window, state) = setup();
    let mut menu = GuiMenu::default();
    menu.add_component(ColorComponent::new(Color::RED), Rect::new(-0.5, 0.0, 0.5, 1.0))
        .unwrap();
    menu.init(&state).unwrap();
    assert_eq!(menu.center_bounds(), Rect::new(-0.5, 0.0, 0.0, 0.0));

    window.with_input(|i| i.set_key_down(KeyCode::ArrowLeft));
    for _ in 0..200 {
        menu.update(&state).unwrap();
        assert!(menu.screen_center().x >= -0.5);
    }
    assert_eq!(menu.screen_center().x, -0.5);
}

#[test]
fn children_inside_unit_square_cannot_pan() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    menu.add_component(ColorComponent::new(Color::RED), Rect::new(0.1, 0.1, 0.9, 0.9))
        .unwrap();
    menu.init(&state).unwrap();
    assert_eq!(menu.center_bounds(), Rect::new(0.0, 0.0, 0.0, 0.0));
    assert!(!menu.scroll(-3.0, &state).unwrap());
}

#[test]
fn key_events_reach_every_active_child() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let (a, log_a) = Recorder::new();
    let (b, log_b) = Recorder::new();
    menu.add_component(a, Rect::new(0.0, 0.0, 0.1, 0.1)).unwrap();
    menu.add_component(b, Rect::new(5.0, 5.0, 6.0, 6.0)).unwrap();
    menu.init(&state).unwrap();
    menu.key_pressed(KeyPress::Char('q'), &state).unwrap();
    assert_eq!(clicks(&log_a), vec![Event::Key(KeyPress::Char('q'))]);
    assert_eq!(clicks(&log_b), vec![Event::Key(KeyPress::Char('q'))]);
}

#[test]
fn degenerate_child_click_is_an_error() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let (recorder, _) = Recorder::new();
    menu.add_component(recorder, Rect::new(0.5, 0.0, 0.5, 1.0)).unwrap();
    menu.init(&state).unwrap();
    let err = menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap_err();
    assert!(matches!(err, GuiError::DegenerateBounds(_)));
}

#[test]
fn swap_from_own_callback_is_deferred() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let slot: Rc<RefCell<Option<SubComponentRef>>> = Rc::default();
    let swaps = Rc::new(Cell::new(0));
    let (s, n) = (slot.clone(), swaps.clone());
    let sub = menu
        .add_component(
            Trigger {
                on_click: Box::new(move || {
                    n.set(n.get() + 1);
                    if let Some(me) = s.borrow().as_ref() {
                        me.set_component(Box::new(Recorder::new().0))?;
                    }
                    Ok(())
                }),
            },
            Rect::UNIT,
        )
        .unwrap();
    *slot.borrow_mut() = Some(sub.clone());
    menu.init(&state).unwrap();

    menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
    assert_eq!(swaps.get(), 1);
    assert_eq!(sub.lifecycle(), Lifecycle::Initialized);
    // the recorder now occupies the slot, so a second click does not re-run the trigger
    menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
    assert_eq!(swaps.get(), 1);
}

#[test]
fn swap_for_removed_slot_is_dropped() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    let slot: Rc<RefCell<Option<SubComponentRef>>> = Rc::default();
    let replacement: Rc<RefCell<Option<Log>>> = Rc::default();
    let (s, r) = (slot.clone(), replacement.clone());
    let sub = menu
        .add_component(
            Trigger {
                on_click: Box::new(move || {
                    if let Some(me) = s.borrow().as_ref() {
                        let (recorder, log) = Recorder::new();
                        *r.borrow_mut() = Some(log);
                        me.set_component(Box::new(recorder))?;
                        h.remove_component(me.id())?;
                    }
                    Ok(())
                }),
            },
            Rect::UNIT,
        )
        .unwrap();
    *slot.borrow_mut() = Some(sub);
    menu.init(&state).unwrap();

    menu.click(0.5, 0.5, MouseButton::Left, &state).unwrap();
    assert!(menu.is_empty());
    let log = replacement.borrow().clone().unwrap();
    assert!(log.borrow().is_empty());
}

/// Calls `hook` with the name of every event it receives.
struct Hooked {
    hook: Rc<dyn Fn(&str) -> GuiResult<()>>,
}

impl Component for Hooked {
    fn update(&mut self, _: &ComponentState) -> GuiResult<()> {
        (self.hook)("update")
    }
    fn render(&mut self, _: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
        (self.hook)("render")
    }
    fn scroll(&mut self, _: f32, _: &ComponentState) -> GuiResult<bool> {
        (self.hook)("scroll")?;
        Ok(false)
    }
    fn key_pressed(&mut self, _: KeyPress, _: &ComponentState) -> GuiResult<()> {
        (self.hook)("key_pressed")
    }
    fn key_released(&mut self, _: KeyCode, _: &ComponentState) -> GuiResult<()> {
        (self.hook)("key_released")
    }
}

/// A child adds a sibling when it receives `event`; the sibling must only
/// show up once `dispatch` has returned.
fn add_during(
    event: &'static str,
    dispatch: impl FnOnce(&mut GuiMenu, &ComponentState) -> GuiResult<()>,
) {
    let (window, state) = setup();
    window.set_mouse(Some(Vec2::new(0.5, 0.5)));
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    let hook = move |name: &str| -> GuiResult<()> {
        if name != event || f.get() {
            return Ok(());
        }
        f.set(true);
        let Some(m) = h.upgrade() else {
            return Ok(());
        };
        assert!(m.is_iterating());
        let before = m.len();
        h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)?;
        assert_eq!(m.len(), before, "{event} applied an add mid-dispatch");
        Ok(())
    };
    menu.add_component(Hooked { hook: Rc::new(hook) }, Rect::UNIT)
        .unwrap();
    menu.init(&state).unwrap();

    dispatch(&mut menu, &state).unwrap();
    assert!(fired.get(), "{event} never reached the child");
    assert!(!menu.is_iterating());
    assert_eq!(menu.len(), 2, "{event}");
}

#[test]
fn mutations_from_every_dispatch_are_deferred() {
    add_during("update", |m, s| m.update(s));
    add_during("render", |m, s| m.render(&mut RecordingRenderer::new(), s));
    add_during("scroll", |m, s| m.scroll(0.5, s).map(|_| ()));
    add_during("key_pressed", |m, s| m.key_pressed(KeyPress::Char('x'), s));
    add_during("key_released", |m, s| m.key_released(KeyCode::Enter, s));
}

#[test]
fn reentrant_dispatch_flushes_only_at_outermost_exit() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    let (bystander, bystander_log) = Recorder::new();
    menu.add_component(bystander, Rect::new(0.5, 0.5, 1.0, 1.0)).unwrap();

    let armed = Rc::new(Cell::new(true));
    let len_after_inner = Rc::new(Cell::new(0));
    let (a, seen, inner_state) = (armed.clone(), len_after_inner.clone(), state.clone());
    let gate = armed.clone();
    menu.add_conditional(
        Trigger {
            on_click: Box::new(move || {
                // still borrowed by the outer click, so keep it out of the inner update
                a.set(false);
                h.add_component(ColorComponent::new(Color::RED), Rect::UNIT)?;
                if let Some(mut m) = h.upgrade() {
                    m.update(&inner_state)?;
                    seen.set(m.len());
                }
                Ok(())
            }),
        },
        Rect::new(0.0, 0.0, 0.5, 0.5),
        condition(move || gate.get()),
    )
    .unwrap();
    menu.init(&state).unwrap();

    menu.click(0.25, 0.25, MouseButton::Left, &state).unwrap();
    assert_eq!(len_after_inner.get(), 2);
    assert_eq!(menu.len(), 3);
    assert!(!menu.is_iterating());
    assert_eq!(clicks(&bystander_log), vec![Event::ClickOut(MouseButton::Left)]);
}

/// Adds a sibling from its own `init`.
struct Spawner {
    menu: MenuHandle,
    sibling: Rc<RefCell<Option<Log>>>,
}

impl Component for Spawner {
    fn init(&mut self, _: &ComponentState) -> GuiResult<()> {
        if self.sibling.borrow().is_some() {
            return Ok(());
        }
        let (recorder, log) = Recorder::new();
        *self.sibling.borrow_mut() = Some(log);
        self.menu.add_component(recorder, Rect::new(0.0, 0.5, 0.5, 1.0))?;
        Ok(())
    }
    fn render(&mut self, _: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
        Ok(())
    }
}

#[test]
fn child_added_by_a_flush_can_add_siblings_from_init() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    let h = menu.handle();
    let sibling: Rc<RefCell<Option<Log>>> = Rc::default();
    let spawned = sibling.clone();
    menu.add_component(
        Trigger {
            on_click: Box::new(move || {
                h.add_component(
                    Spawner {
                        menu: h.clone(),
                        sibling: spawned.clone(),
                    },
                    Rect::new(0.5, 0.5, 1.0, 1.0),
                )?;
                Ok(())
            }),
        },
        Rect::new(0.0, 0.0, 0.5, 0.5),
    )
    .unwrap();
    menu.init(&state).unwrap();

    menu.click(0.25, 0.25, MouseButton::Left, &state).unwrap();
    assert_eq!(menu.len(), 3);
    assert!(!menu.is_iterating());
    let log = sibling.borrow().clone().unwrap();
    assert_eq!(*log.borrow(), vec![Event::Init]);
}

#[test]
fn render_culls_and_pans() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    menu.add_component(ColorComponent::new(Color::RED), Rect::new(0.2, 0.2, 0.4, 0.4))
        .unwrap();
    menu.add_component(ColorComponent::new(Color::BLUE), Rect::new(0.5, 0.0, 1.0, 2.0))
        .unwrap();
    menu.init(&state).unwrap();

    let mut rec = RecordingRenderer::new();
    menu.render(&mut rec, &state).unwrap();
    insta::assert_snapshot!(rec.dump(), @r"
    clear #000000ff
    fill #ff0000ff (0.200, 0.200)-(0.400, 0.400)
    fill #0000ffff (0.500, 0.000)-(1.000, 2.000)
    ");

    menu.set_screen_center(0.0, 0.5);
    rec.take();
    menu.render(&mut rec, &state).unwrap();
    insta::assert_snapshot!(rec.dump(), @r"
    clear #000000ff
    fill #0000ffff (0.500, -0.500)-(1.000, 1.500)
    ");
}

#[test]
fn location_for_text_follows_pan() {
    let (_, state) = setup();
    let mut menu = GuiMenu::default();
    menu.add_component(
        TextComponent::new("far", tessera_text::TextProperties::default()),
        Rect::new(0.0, 1.0, 0.5, 2.0),
    )
    .unwrap();
    menu.init(&state).unwrap();
    let before = menu.location_for_text("far").unwrap();
    assert_relative_eq!(before.y, 1.5);
    menu.set_screen_center(0.0, 1.0);
    let after = menu.location_for_text("far").unwrap();
    assert_relative_eq!(after.y, 0.5);
    assert!(menu.location_for_text("near").is_none());
}

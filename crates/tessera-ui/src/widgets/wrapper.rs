use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera_core::{
    Color, Component, ComponentState, GuiResult, KeyCode, KeyPress, MouseButton, Renderer, Vec2,
};

struct Slot {
    child: RefCell<Option<Box<dyn Component>>>,
    next: RefCell<Option<Option<Box<dyn Component>>>>,
    background: Cell<Option<Color>>,
    initialized: Cell<bool>,
}

/// Hosts at most one child over its whole area, optionally on a background
/// colour. Every event is forwarded to the child.
///
/// The child can be replaced through a [`WrapperHandle`] at any time. The
/// replacement takes effect at the start of the wrapper's next dispatch and
/// is initialised there if the wrapper already was.
pub struct WrapperComponent {
    slot: Rc<Slot>,
}

/// Replaces a [`WrapperComponent`]'s child from outside.
#[derive(Clone)]
pub struct WrapperHandle(Rc<Slot>);

impl WrapperHandle {
    pub fn set_component(&self, component: Option<Box<dyn Component>>) {
        *self.0.next.borrow_mut() = Some(component);
    }

    pub fn set_background(&self, background: Option<Color>) {
        self.0.background.set(background);
    }

    pub fn has_component(&self) -> bool {
        match &*self.0.next.borrow() {
            Some(next) => next.is_some(),
            None => self.0.child.borrow().is_some(),
        }
    }
}

impl WrapperComponent {
    pub fn new(child: Option<Box<dyn Component>>) -> Self {
        Self {
            slot: Rc::new(Slot {
                child: RefCell::new(child),
                next: RefCell::new(None),
                background: Cell::new(None),
                initialized: Cell::new(false),
            }),
        }
    }

    pub fn with_background(self, background: Color) -> Self {
        self.slot.background.set(Some(background));
        self
    }

    pub fn handle(&self) -> WrapperHandle {
        WrapperHandle(self.slot.clone())
    }

    /// Applies a queued replacement, then runs `f` on the child if there is
    /// one.
    fn forward<R: Default>(
        &mut self,
        state: &ComponentState,
        f: impl FnOnce(&mut dyn Component) -> GuiResult<R>,
    ) -> GuiResult<R> {
        let next = self.slot.next.borrow_mut().take();
        if let Some(next) = next {
            *self.slot.child.borrow_mut() = next;
            state.window().mark_change();
            if self.slot.initialized.get()
                && let Some(child) = self.slot.child.borrow_mut().as_mut()
            {
                child.init(state)?;
            }
        }
        match self.slot.child.borrow_mut().as_mut() {
            Some(child) => f(&mut **child),
            None => Ok(R::default()),
        }
    }
}

impl Component for WrapperComponent {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        // A replacement queued before the first init is initialised below
        // like the original child.
        let next = self.slot.next.borrow_mut().take();
        if let Some(next) = next {
            *self.slot.child.borrow_mut() = next;
        }
        self.slot.initialized.set(true);
        self.forward(state, |c| c.init(state))
    }

    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.forward(state, |c| c.update(state))
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        if let Some(bg) = self.slot.background.get() {
            renderer.clear(bg);
        }
        self.forward(state, |c| c.render(renderer, state))
    }

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        self.forward(state, |c| c.click(x, y, button, state))
    }

    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        self.forward(state, |c| c.click_out(button, state))
    }

    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        self.forward(state, |c| c.scroll(amount, state))
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        self.forward(state, |c| c.key_pressed(key, state))
    }

    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        self.forward(state, |c| c.key_released(key, state))
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.slot
            .child
            .try_borrow()
            .ok()?
            .as_ref()?
            .location_for_text(text)
    }
}

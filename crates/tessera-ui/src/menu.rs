//! # Menus
//!
//! A [`GuiMenu`] owns an ordered list of children, each placed by a [`Rect`]
//! in the menu's own normalized space. The list order is the z-order: the
//! first child containing a point is the one that gets scroll events there,
//! and later children are drawn on top of earlier ones.
//!
//! ## Panning
//!
//! Children may be placed outside `[0,1]×[0,1]`. The menu keeps a *screen
//! center*, the offset of the visible unit square inside its content, which
//! scrolling and the arrow keys move. The offset is clamped so that the
//! union of all children and the unit square can be revealed, and no more:
//!
//! ```text
//! min_center = min(0, min over children of min)
//! max_center = max(1, max over children of max) - 1
//! ```
//!
//! Parents never see the offset; a menu always occupies its unit square.
//!
//! ## Mutation during dispatch
//!
//! Every dispatch (`init`, `update`, `render`, `click`, `click_out`,
//! `scroll`, `key_pressed`, `key_released`) runs inside an iteration scope.
//! While any scope is open, `add_component`, `remove_component` and
//! `clear_components` are queued. When the outermost scope closes the queue
//! is applied: the clear first, then removals, then additions. The scope
//! also closes when a child returns an error or panics.
//!
//! ```rust
//! use tessera_core::*;
//! use tessera_ui::*;
//!
//! let menu = GuiMenu::with_populate(MenuConfig::default(), |menu, _| {
//!     menu.add_component(ColorComponent::new(Color::RED), Rect::new(0.1, 0.1, 0.4, 0.4))?;
//!     Ok(())
//! });
//! let mut main = menu.clone();
//! main.init(&ComponentState::root(WindowContext::headless())).unwrap();
//! assert_eq!(menu.len(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tessera_core::{
    Color, Component, ComponentState, Condition, GuiError, GuiResult, KeyCode, KeyPress,
    Lifecycle, MouseButton, Rect, Renderer, SubComponentId, Vec2,
};

static NEXT_SUB_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuConfig {
    pub background: Color,
    pub allow_scrolling: bool,
    pub allow_arrow_moving: bool,
    /// Multiplier on scroll amounts; one unit of scroll pans by `2 * speed`.
    pub scroll_speed: f32,
    /// Pan per update while an arrow key is held.
    pub arrow_step: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            allow_scrolling: true,
            allow_arrow_moving: true,
            scroll_speed: 1.0,
            arrow_step: 0.005,
        }
    }
}

impl MenuConfig {
    pub fn background(mut self, c: Color) -> Self {
        self.background = c;
        self
    }
    pub fn scrolling(mut self, allow: bool) -> Self {
        self.allow_scrolling = allow;
        self
    }
    pub fn arrow_moving(mut self, allow: bool) -> Self {
        self.allow_arrow_moving = allow;
        self
    }
    pub fn scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }
    /// A menu that never pans, the usual choice for fixed layouts.
    pub fn fixed(self) -> Self {
        self.scrolling(false).arrow_moving(false)
    }
}

/// A child slot: one component and where it sits in the menu.
pub struct SubComponent {
    id: SubComponentId,
    component: RefCell<Box<dyn Component>>,
    bounds: Cell<Rect>,
    condition: Option<Condition>,
    lifecycle: Cell<Lifecycle>,
    replacement: RefCell<Option<Box<dyn Component>>>,
}

impl SubComponent {
    pub fn new(component: impl Component + 'static, bounds: Rect) -> GuiResult<Self> {
        Self::boxed(Box::new(component), bounds)
    }

    pub fn boxed(component: Box<dyn Component>, bounds: Rect) -> GuiResult<Self> {
        bounds.validate()?;
        Ok(Self {
            id: SubComponentId(NEXT_SUB_ID.fetch_add(1, Ordering::Relaxed)),
            component: RefCell::new(component),
            bounds: Cell::new(bounds),
            condition: None,
            lifecycle: Cell::new(Lifecycle::Uninitialized),
            replacement: RefCell::new(None),
        })
    }

    /// The slot only takes part in dispatch while `condition` holds.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn id(&self) -> SubComponentId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub fn is_active(&self) -> bool {
        if let Some(cond) = &self.condition
            && !cond()
        {
            return false;
        }
        self.component
            .try_borrow()
            .map_or(true, |c| c.is_active())
    }

    fn borrow_for_swap(&self) -> GuiResult<std::cell::RefMut<'_, Box<dyn Component>>> {
        self.component
            .try_borrow_mut()
            .map_err(|_| GuiError::Reentrant(format!("sub-component {}", self.id.0)))
    }

    fn dispatch<R>(&self, f: impl FnOnce(&mut dyn Component) -> GuiResult<R>) -> GuiResult<R> {
        let mut c = self.borrow_for_swap()?;
        f(&mut **c)
    }

    fn init(&self, state: &ComponentState) -> GuiResult<()> {
        self.dispatch(|c| c.init(state))?;
        self.lifecycle.set(Lifecycle::Initialized);
        Ok(())
    }
}

/// Handle to a child slot that is (or was) part of a menu.
#[derive(Clone)]
pub struct SubComponentRef {
    slot: Rc<SubComponent>,
    menu: Weak<MenuInner>,
}

impl SubComponentRef {
    pub fn id(&self) -> SubComponentId {
        self.slot.id
    }

    pub fn bounds(&self) -> Rect {
        self.slot.bounds()
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_active()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle.get()
    }

    /// Moves the child. The menu's pan limits follow immediately.
    pub fn set_bounds(&self, bounds: Rect) -> GuiResult<()> {
        bounds.validate()?;
        self.slot.bounds.set(bounds);
        if let Some(menu) = self.menu.upgrade() {
            if menu.laid_out.get() {
                menu.recompute_center_bounds();
            }
            menu.mark_change();
        }
        Ok(())
    }

    /// Runs `f` on the component. Fails while the component is itself being
    /// dispatched to.
    pub fn with_component<R>(&self, f: impl FnOnce(&mut dyn Component) -> R) -> GuiResult<R> {
        self.slot.dispatch(|c| Ok(f(c)))
    }

    /// Replaces the component, initialising the new one if the menu already
    /// is. A component replacing itself from one of its own callbacks takes
    /// effect once the current dispatch has finished.
    pub fn set_component(&self, component: Box<dyn Component>) -> GuiResult<()> {
        *self.slot.replacement.borrow_mut() = Some(component);
        match self.menu.upgrade() {
            Some(menu) => {
                if self.slot.component.try_borrow_mut().is_err() || menu.depth.get() > 0 {
                    menu.pending.borrow_mut().swaps.push(self.slot.clone());
                    Ok(())
                } else {
                    let state = menu.last_state.borrow().clone();
                    match state {
                        Some(state) => {
                            let scope = menu.begin(&state);
                            let r = menu.apply_swap(&self.slot, Some(&state));
                            scope.finish(r)
                        }
                        None => menu.apply_swap(&self.slot, None),
                    }
                }
            }
            None => {
                let mut current = self.slot.borrow_for_swap()?;
                if let Some(new) = self.slot.replacement.borrow_mut().take() {
                    *current = new;
                    self.slot.lifecycle.set(Lifecycle::Uninitialized);
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for SubComponentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubComponentRef")
            .field("id", &self.slot.id)
            .field("bounds", &self.slot.bounds())
            .finish()
    }
}

#[derive(Default)]
struct Pending {
    clear: bool,
    removes: Vec<SubComponentId>,
    adds: Vec<Rc<SubComponent>>,
    swaps: Vec<Rc<SubComponent>>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        !self.clear && self.removes.is_empty() && self.adds.is_empty() && self.swaps.is_empty()
    }
}

type Populate = Box<dyn FnOnce(&GuiMenu, &ComponentState) -> GuiResult<()>>;

type Snapshot = SmallVec<[Rc<SubComponent>; 16]>;

struct MenuInner {
    config: Cell<MenuConfig>,
    children: RefCell<Vec<Rc<SubComponent>>>,
    depth: Cell<u32>,
    pending: RefCell<Pending>,
    center: Cell<Vec2>,
    min_center: Cell<Vec2>,
    max_center: Cell<Vec2>,
    lifecycle: Cell<Lifecycle>,
    laid_out: Cell<bool>,
    last_state: RefCell<Option<ComponentState>>,
    populate: RefCell<Option<Populate>>,
}

/// Closes an iteration scope. `finish` reports flush errors; dropping an
/// unfinished scope (a panic or an early `?`) still flushes and logs them.
#[must_use]
struct IterationScope<'a> {
    menu: &'a MenuInner,
    state: ComponentState,
    done: bool,
}

impl IterationScope<'_> {
    fn finish<T>(mut self, result: GuiResult<T>) -> GuiResult<T> {
        self.done = true;
        let flushed = self.menu.exit(&self.state);
        match (result, flushed) {
            (Ok(v), Ok(())) => Ok(v),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(flush_err)) => {
                log::warn!("menu flush failed after dispatch error: {flush_err}");
                Err(e)
            }
        }
    }
}

impl Drop for IterationScope<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(e) = self.menu.exit(&self.state) {
            log::warn!("menu flush failed while unwinding: {e}");
        }
    }
}

impl MenuInner {
    fn begin(&self, state: &ComponentState) -> IterationScope<'_> {
        self.depth.set(self.depth.get() + 1);
        *self.last_state.borrow_mut() = Some(state.clone());
        IterationScope {
            menu: self,
            state: state.clone(),
            done: false,
        }
    }

    fn exit(&self, state: &ComponentState) -> GuiResult<()> {
        let depth = self.depth.get().saturating_sub(1);
        self.depth.set(depth);
        if depth == 0 {
            self.flush(state)
        } else {
            Ok(())
        }
    }

    fn is_initialized(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Initialized
    }

    fn mark_change(&self) {
        if let Some(state) = self.last_state.borrow().as_ref() {
            state.window().mark_change();
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.children.borrow().iter().cloned().collect()
    }

    fn child_state(&self, state: &ComponentState, slot: &SubComponent) -> ComponentState {
        let c = self.center.get();
        state.relative(slot.bounds().translate(-c.x, -c.y))
    }

    fn structure_changed(&self) {
        if self.laid_out.get() {
            self.recompute_center_bounds();
        }
        self.mark_change();
    }

    fn recompute_center_bounds(&self) {
        let extent = self
            .children
            .borrow()
            .iter()
            .fold(Rect::UNIT, |acc, s| acc.union(&s.bounds()));
        let min = Vec2::new(extent.min_x.min(0.0), extent.min_y.min(0.0));
        let max = Vec2::new(extent.max_x.max(1.0) - 1.0, extent.max_y.max(1.0) - 1.0);
        self.min_center.set(min);
        self.max_center.set(max);
        let c = self.center.get();
        let clamped = Vec2::new(c.x.clamp(min.x, max.x), c.y.clamp(min.y, max.y));
        if clamped != c {
            log::debug!("pan offset re-clamped from {c:?} to {clamped:?}");
            self.center.set(clamped);
        }
    }

    /// Sets the pan offset, clamped. Returns whether it moved.
    fn pan_to(&self, x: f32, y: f32) -> bool {
        let (min, max) = (self.min_center.get(), self.max_center.get());
        let next = Vec2::new(x.max(min.x).min(max.x), y.max(min.y).min(max.y));
        let prev = self.center.replace(next);
        if prev != next {
            log::trace!("pan offset {prev:?} -> {next:?}");
            self.mark_change();
            true
        } else {
            false
        }
    }

    fn component_at(&self, p: Vec2) -> Option<Rc<SubComponent>> {
        self.snapshot()
            .into_iter()
            .find(|s| s.is_active() && s.bounds().contains(p))
    }

    fn apply_swap(&self, slot: &SubComponent, state: Option<&ComponentState>) -> GuiResult<()> {
        {
            let mut current = slot.borrow_for_swap()?;
            let Some(new) = slot.replacement.borrow_mut().take() else {
                return Ok(());
            };
            *current = new;
        }
        slot.lifecycle.set(Lifecycle::Uninitialized);
        self.mark_change();
        match state {
            Some(state) if self.is_initialized() => slot.init(&self.child_state(state, slot)),
            _ => Ok(()),
        }
    }

    fn flush(&self, state: &ComponentState) -> GuiResult<()> {
        let pending = self.pending.take();
        if pending.is_empty() {
            return Ok(());
        }
        log::debug!(
            "flushing menu mutations: clear={} removes={} adds={} swaps={}",
            pending.clear,
            pending.removes.len(),
            pending.adds.len(),
            pending.swaps.len()
        );

        if pending.clear {
            let had_children = !self.children.borrow().is_empty();
            self.children.borrow_mut().clear();
            if had_children {
                self.structure_changed();
            }
        }
        if !pending.removes.is_empty() {
            let removed = {
                let mut children = self.children.borrow_mut();
                let before = children.len();
                children.retain(|s| !pending.removes.contains(&s.id));
                before != children.len()
            };
            if removed {
                self.structure_changed();
            }
        }
        if !pending.adds.is_empty() {
            self.children
                .borrow_mut()
                .extend(pending.adds.iter().cloned());
            self.structure_changed();
        }

        let mut swaps = pending.swaps;
        swaps.retain(|slot| {
            let live = self.children.borrow().iter().any(|c| Rc::ptr_eq(c, slot));
            if !live {
                log::debug!("dropping swap for removed sub-component {}", slot.id.0);
                slot.replacement.borrow_mut().take();
            }
            live
        });

        if !self.is_initialized() {
            for slot in &swaps {
                self.apply_swap(slot, None)?;
            }
            return Ok(());
        }
        // Callbacks run from here may mutate the menu again; those changes
        // are queued and flushed when this scope closes.
        let scope = self.begin(state);
        let result = (|| -> GuiResult<()> {
            for slot in &pending.adds {
                slot.init(&self.child_state(state, slot))?;
            }
            for slot in &swaps {
                self.apply_swap(slot, Some(state))?;
            }
            Ok(())
        })();
        scope.finish(result)
    }

    fn add(self: &Rc<Self>, slot: SubComponent) -> GuiResult<SubComponentRef> {
        let slot = Rc::new(slot);
        let handle = SubComponentRef {
            slot: slot.clone(),
            menu: Rc::downgrade(self),
        };
        if self.depth.get() > 0 {
            self.pending.borrow_mut().adds.push(slot);
            return Ok(handle);
        }
        self.children.borrow_mut().push(slot.clone());
        self.structure_changed();
        if self.is_initialized() {
            let state = self.last_state.borrow().clone();
            if let Some(state) = state {
                let scope = self.begin(&state);
                let r = slot.init(&self.child_state(&state, &slot));
                scope.finish(r)?;
            }
        }
        Ok(handle)
    }

    fn remove(&self, id: SubComponentId) -> GuiResult<()> {
        if self.depth.get() > 0 {
            let mut pending = self.pending.borrow_mut();
            if let Some(i) = pending.adds.iter().position(|s| s.id == id) {
                pending.adds.remove(i);
                return Ok(());
            }
            let live = self.children.borrow().iter().any(|s| s.id == id);
            if !live || pending.removes.contains(&id) {
                return Err(GuiError::ComponentNotFound(id));
            }
            pending.removes.push(id);
            return Ok(());
        }
        let found = {
            let mut children = self.children.borrow_mut();
            match children.iter().position(|s| s.id == id) {
                Some(i) => {
                    children.remove(i);
                    true
                }
                None => false,
            }
        };
        if !found {
            return Err(GuiError::ComponentNotFound(id));
        }
        self.structure_changed();
        Ok(())
    }

    fn clear(&self) {
        if self.depth.get() > 0 {
            self.pending.borrow_mut().clear = true;
            return;
        }
        let had_children = !self.children.borrow().is_empty();
        self.children.borrow_mut().clear();
        if had_children {
            self.structure_changed();
        }
    }
}

/// Container of positioned child components. Clones share the same menu.
#[derive(Clone)]
pub struct GuiMenu {
    inner: Rc<MenuInner>,
}

impl Default for GuiMenu {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

impl GuiMenu {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            inner: Rc::new(MenuInner {
                config: Cell::new(config),
                children: RefCell::new(Vec::new()),
                depth: Cell::new(0),
                pending: RefCell::new(Pending::default()),
                center: Cell::new(Vec2::ZERO),
                min_center: Cell::new(Vec2::ZERO),
                max_center: Cell::new(Vec2::ZERO),
                lifecycle: Cell::new(Lifecycle::Uninitialized),
                laid_out: Cell::new(false),
                last_state: RefCell::new(None),
                populate: RefCell::new(None),
            }),
        }
    }

    /// A menu whose children are added by `populate` during its first
    /// `init`, when the window state is available.
    pub fn with_populate(
        config: MenuConfig,
        populate: impl FnOnce(&GuiMenu, &ComponentState) -> GuiResult<()> + 'static,
    ) -> Self {
        let menu = Self::new(config);
        *menu.inner.populate.borrow_mut() = Some(Box::new(populate));
        menu
    }

    /// Non-owning handle for callbacks stored inside this menu's children.
    pub fn handle(&self) -> MenuHandle {
        MenuHandle(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> MenuConfig {
        self.inner.config.get()
    }
    pub fn set_config(&self, config: MenuConfig) {
        self.inner.config.set(config);
        self.inner.mark_change();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    /// Whether a dispatch into this menu is currently running.
    pub fn is_iterating(&self) -> bool {
        self.inner.depth.get() > 0
    }

    pub fn add_component(
        &self,
        component: impl Component + 'static,
        bounds: Rect,
    ) -> GuiResult<SubComponentRef> {
        self.inner.add(SubComponent::new(component, bounds)?)
    }

    pub fn add_conditional(
        &self,
        component: impl Component + 'static,
        bounds: Rect,
        condition: Condition,
    ) -> GuiResult<SubComponentRef> {
        self.inner
            .add(SubComponent::new(component, bounds)?.with_condition(condition))
    }

    pub fn add_sub_component(&self, sub: SubComponent) -> GuiResult<SubComponentRef> {
        self.inner.add(sub)
    }

    /// Fails with [`GuiError::ComponentNotFound`] if `id` is not a child (or
    /// already queued for removal).
    pub fn remove_component(&self, id: SubComponentId) -> GuiResult<()> {
        self.inner.remove(id)
    }

    pub fn clear_components(&self) {
        self.inner.clear();
    }

    /// First active child containing `(x, y)`, given in content space (the
    /// pan offset already added).
    pub fn component_at(&self, x: f32, y: f32) -> Option<SubComponentRef> {
        self.inner
            .component_at(Vec2::new(x, y))
            .map(|slot| self.wrap(slot))
    }

    /// Current children in z-order. Queued mutations are not included.
    pub fn components(&self) -> Vec<SubComponentRef> {
        self.inner
            .snapshot()
            .into_iter()
            .map(|slot| self.wrap(slot))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.children.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn screen_center(&self) -> Vec2 {
        self.inner.center.get()
    }

    /// Pans to `(x, y)`, clamped to the current limits. Returns whether the
    /// offset changed.
    pub fn set_screen_center(&self, x: f32, y: f32) -> bool {
        self.inner.pan_to(x, y)
    }

    /// Pan limits as a rectangle of allowed screen centers.
    pub fn center_bounds(&self) -> Rect {
        let (min, max) = (self.inner.min_center.get(), self.inner.max_center.get());
        Rect::new(min.x, min.y, max.x, max.y)
    }

    fn wrap(&self, slot: Rc<SubComponent>) -> SubComponentRef {
        SubComponentRef {
            slot,
            menu: Rc::downgrade(&self.inner),
        }
    }

    fn first_init(&self, state: &ComponentState) -> GuiResult<()> {
        let populate = self.inner.populate.borrow_mut().take();
        if let Some(populate) = populate {
            populate(self, state)?;
        }
        for slot in self.inner.snapshot() {
            if slot.lifecycle.get() == Lifecycle::Uninitialized {
                slot.init(&self.inner.child_state(state, &slot))?;
            }
        }
        Ok(())
    }

    fn reinit(&self, state: &ComponentState) -> GuiResult<()> {
        for slot in self.inner.snapshot() {
            slot.init(&self.inner.child_state(state, &slot))?;
        }
        Ok(())
    }

    fn arrow_pan(&self, state: &ComponentState) {
        let step = self.config().arrow_step;
        let mut d = Vec2::ZERO;
        if state.is_key_down(KeyCode::ArrowLeft) {
            d.x -= step;
        }
        if state.is_key_down(KeyCode::ArrowRight) {
            d.x += step;
        }
        if state.is_key_down(KeyCode::ArrowUp) {
            d.y += step;
        }
        if state.is_key_down(KeyCode::ArrowDown) {
            d.y -= step;
        }
        if d != Vec2::ZERO {
            let c = self.screen_center();
            self.inner.pan_to(c.x + d.x, c.y + d.y);
        }
    }

    fn each_active(
        &self,
        state: &ComponentState,
        mut f: impl FnMut(&mut dyn Component, &ComponentState) -> GuiResult<()>,
    ) -> GuiResult<()> {
        for slot in self.inner.snapshot() {
            if slot.is_active() {
                let child = self.inner.child_state(state, &slot);
                slot.dispatch(|c| f(c, &child))?;
            }
        }
        Ok(())
    }
}

impl Component for GuiMenu {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        let first = !self.inner.is_initialized();
        let scope = self.inner.begin(state);
        let result = if first {
            self.inner.lifecycle.set(Lifecycle::Initialized);
            self.first_init(state)
        } else {
            self.reinit(state)
        };
        scope.finish(result)?;
        if first {
            self.inner.recompute_center_bounds();
            self.inner.laid_out.set(true);
        }
        state.window().mark_change();
        Ok(())
    }

    fn update(&mut self, state: &ComponentState) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = self.each_active(state, |c, s| c.update(s)).map(|()| {
            if self.config().allow_arrow_moving {
                self.arrow_pan(state);
            }
        });
        scope.finish(result)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = (|| -> GuiResult<()> {
            renderer.clear(self.config().background);
            let c = self.screen_center();
            for slot in self.inner.snapshot() {
                if !slot.is_active() {
                    continue;
                }
                let rect = slot.bounds().translate(-c.x, -c.y);
                if !rect.intersects_unit() {
                    continue;
                }
                let child = state.relative(rect);
                let mut area = renderer.area(rect);
                slot.dispatch(|comp| comp.render(&mut area, &child))?;
            }
            Ok(())
        })();
        scope.finish(result)
    }

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = (|| -> GuiResult<()> {
            let c = self.screen_center();
            let p = Vec2::new(x + c.x, y + c.y);
            for slot in self.inner.snapshot() {
                if !slot.is_active() {
                    continue;
                }
                let bounds = slot.bounds();
                let child = self.inner.child_state(state, &slot);
                if bounds.contains(p) {
                    let local = bounds.to_local(p)?;
                    log::trace!("click {:?} -> child {} at {local:?}", p, slot.id.0);
                    slot.dispatch(|comp| comp.click(local.x, local.y, button, &child))?;
                } else {
                    slot.dispatch(|comp| comp.click_out(button, &child))?;
                }
            }
            Ok(())
        })();
        scope.finish(result)
    }

    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = self.each_active(state, |c, s| c.click_out(button, s));
        scope.finish(result)
    }

    fn scroll(&mut self, amount: f32, state: &ComponentState) -> GuiResult<bool> {
        let scope = self.inner.begin(state);
        let result = (|| -> GuiResult<bool> {
            let c = self.screen_center();
            if let Some(mouse) = state.mouse()
                && let Some(slot) = self.inner.component_at(Vec2::new(mouse.x + c.x, mouse.y + c.y))
            {
                let child = self.inner.child_state(state, &slot);
                if slot.dispatch(|comp| comp.scroll(amount, &child))? {
                    return Ok(true);
                }
            }
            let config = self.config();
            if !config.allow_scrolling {
                return Ok(false);
            }
            Ok(self
                .inner
                .pan_to(c.x, c.y + 2.0 * amount * config.scroll_speed))
        })();
        scope.finish(result)
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = self.each_active(state, |c, s| c.key_pressed(key, s));
        scope.finish(result)
    }

    fn key_released(&mut self, key: KeyCode, state: &ComponentState) -> GuiResult<()> {
        let scope = self.inner.begin(state);
        let result = self.each_active(state, |c, s| c.key_released(key, s));
        scope.finish(result)
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        let c = self.screen_center();
        self.inner.snapshot().into_iter().find_map(|slot| {
            if !slot.is_active() {
                return None;
            }
            let local = slot.component.try_borrow().ok()?.location_for_text(text)?;
            let p = slot.bounds().to_parent(local);
            Some(Vec2::new(p.x - c.x, p.y - c.y))
        })
    }
}

/// Weak reference to a menu, for closures owned by the menu's own children.
#[derive(Clone)]
pub struct MenuHandle(Weak<MenuInner>);

impl MenuHandle {
    pub fn upgrade(&self) -> Option<GuiMenu> {
        self.0.upgrade().map(|inner| GuiMenu { inner })
    }

    pub fn add_component(
        &self,
        component: impl Component + 'static,
        bounds: Rect,
    ) -> GuiResult<Option<SubComponentRef>> {
        self.upgrade()
            .map(|m| m.add_component(component, bounds))
            .transpose()
    }

    pub fn remove_component(&self, id: SubComponentId) -> GuiResult<()> {
        match self.upgrade() {
            Some(m) => m.remove_component(id),
            None => Ok(()),
        }
    }

    pub fn clear_components(&self) {
        if let Some(m) = self.upgrade() {
            m.clear_components();
        }
    }
}

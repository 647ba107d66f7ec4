use std::thread;
use std::time::Duration;

use tessera_core::{
    Component, ComponentState, GuiError, GuiResult, KeyCode, KeyPress, MouseButton, Rect,
    Renderer, Vec2, WindowContext,
};
use web_time::Instant;

use crate::dispatcher::UiDispatcher;
use crate::listener::WindowListener;

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Window decorations.
    pub border: bool,
    pub full_screen: bool,
    pub fps: u32,
    /// Render every frame even when nothing marked a change.
    pub render_continuously: bool,
    /// Scroll amount per wheel line.
    pub scroll_line_factor: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "tessera".into(),
            width: 800,
            height: 600,
            border: true,
            full_screen: false,
            fps: 60,
            render_continuously: false,
            scroll_line_factor: 0.03,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }
    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }
    pub fn full_screen(mut self, full_screen: bool) -> Self {
        self.full_screen = full_screen;
        self
    }
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
    pub fn render_continuously(mut self, on: bool) -> Self {
        self.render_continuously = on;
        self
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Hosts the main component of one window.
///
/// Every event goes through the listeners first, then to the main
/// component. A main component switch requested through
/// [`WindowContext::set_main_component`] is installed once the event that
/// requested it has been fully dispatched.
pub struct GuiWindow {
    config: WindowConfig,
    context: WindowContext,
    main: Box<dyn Component>,
    listeners: Vec<Box<dyn WindowListener>>,
    dispatcher: UiDispatcher,
    open: bool,
}

impl GuiWindow {
    /// A window with a headless context: no system fonts are loaded.
    pub fn new(config: WindowConfig, main: Box<dyn Component>) -> Self {
        Self::with_context(config, WindowContext::headless(), main)
    }

    pub fn with_context(
        config: WindowConfig,
        context: WindowContext,
        main: Box<dyn Component>,
    ) -> Self {
        context.set_size(config.width, config.height);
        Self {
            config,
            context,
            main,
            listeners: Vec::new(),
            dispatcher: UiDispatcher::new(),
            open: false,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
    pub fn context(&self) -> &WindowContext {
        &self.context
    }
    pub fn dispatcher(&self) -> UiDispatcher {
        self.dispatcher.clone()
    }
    pub fn is_open(&self) -> bool {
        self.open
    }
    pub fn main_component(&self) -> &dyn Component {
        self.main.as_ref()
    }

    pub fn add_listener(&mut self, listener: impl WindowListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn state(&self) -> ComponentState {
        ComponentState::root(self.context.clone())
    }

    fn ensure_open(&self) -> GuiResult<()> {
        if self.open { Ok(()) } else { Err(GuiError::NotOpen) }
    }

    /// Initialises the main component. Opening twice is a no-op.
    pub fn open(&mut self) -> GuiResult<()> {
        if self.open {
            return Ok(());
        }
        log::debug!("opening window {:?}", self.config.title);
        self.open = true;
        self.context.reset_stop();
        let state = self.state();
        self.main.init(&state)?;
        self.context.mark_change();
        self.finish_event()
    }

    /// Replaces the main component, initialising it right away if the window
    /// is open.
    pub fn set_main_component(&mut self, mut main: Box<dyn Component>) -> GuiResult<()> {
        if self.open {
            main.init(&self.state())?;
        }
        self.main = main;
        self.context.mark_change();
        Ok(())
    }

    /// Installs main components requested during the last dispatch.
    fn finish_event(&mut self) -> GuiResult<()> {
        while let Some(next) = self.context.take_pending_main() {
            log::debug!("switching main component");
            self.set_main_component(next)?;
        }
        Ok(())
    }

    /// Runs every queued job, even after one fails. The first error is
    /// returned once all of them ran; later ones are logged.
    fn run_jobs(&mut self) -> GuiResult<()> {
        let mut first = None;
        for job in self.dispatcher.drain() {
            if let Err(e) = job(self) {
                if first.is_none() {
                    first = Some(e);
                } else {
                    log::warn!("queued UI job failed: {e}");
                }
            }
        }
        first.map_or(Ok(()), Err)
    }

    pub fn update(&mut self) -> GuiResult<()> {
        self.ensure_open()?;
        self.run_jobs()?;
        if self.listeners.iter_mut().any(|l| l.pre_update(&self.context)) {
            return Ok(());
        }
        let state = self.state();
        let result = self.main.update(&state);
        self.context.end_update();
        result?;
        for l in &mut self.listeners {
            l.post_update(&self.context);
        }
        self.finish_event()
    }

    /// Renders if anything changed since the last render (or always, with
    /// `render_continuously`). Returns whether the renderer was used.
    ///
    /// The change flag is cleared before rendering, so changes marked while
    /// rendering schedule another frame.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> GuiResult<bool> {
        self.ensure_open()?;
        let changed = self.context.take_change();
        if !changed && !self.config.render_continuously {
            return Ok(false);
        }
        if self.listeners.iter_mut().any(|l| l.pre_render(&self.context)) {
            return Ok(false);
        }
        let state = self.state();
        self.main.render(renderer, &state)?;
        for l in &mut self.listeners {
            l.post_render(&self.context);
        }
        self.finish_event()?;
        Ok(true)
    }

    /// Clicks at `(x, y)` in window space. A point outside the window
    /// reaches the main component as `click_out`.
    pub fn click(&mut self, x: f32, y: f32, button: MouseButton) -> GuiResult<()> {
        self.ensure_open()?;
        if self.listeners.iter_mut().any(|l| l.pre_click(x, y, button, &self.context)) {
            return Ok(());
        }
        log::trace!("window click ({x}, {y}) {button:?}");
        let state = self.state();
        if Rect::UNIT.contains(Vec2::new(x, y)) {
            self.main.click(x, y, button, &state)?;
        } else {
            self.main.click_out(button, &state)?;
        }
        for l in &mut self.listeners {
            l.post_click(x, y, button, &self.context);
        }
        self.finish_event()
    }

    /// Returns whether anything consumed the scroll.
    pub fn scroll(&mut self, amount: f32) -> GuiResult<bool> {
        self.ensure_open()?;
        let mut amount = amount;
        for l in &mut self.listeners {
            amount = l.pre_scroll(amount, &self.context);
        }
        if amount == 0.0 {
            return Ok(false);
        }
        let state = self.state();
        let consumed = self.main.scroll(amount, &state)?;
        for l in &mut self.listeners {
            l.post_scroll(amount, consumed, &self.context);
        }
        self.finish_event()?;
        Ok(consumed)
    }

    /// A key went down. Repeats of a key that is already down are ignored,
    /// whatever the backend reports.
    pub fn key_pressed(&mut self, key: KeyCode) -> GuiResult<()> {
        self.ensure_open()?;
        if !self.context.with_input(|i| i.set_key_down(key)) {
            log::trace!("ignoring repeat of {key:?}");
            return Ok(());
        }
        if self.listeners.iter_mut().any(|l| l.pre_key_pressed(key, &self.context)) {
            return Ok(());
        }
        let state = self.state();
        self.main.key_pressed(KeyPress::Code(key), &state)?;
        for l in &mut self.listeners {
            l.post_key_pressed(key, &self.context);
        }
        self.finish_event()
    }

    /// A character was typed. Control characters are dropped here; keys
    /// like Backspace arrive through [`GuiWindow::key_pressed`].
    pub fn key_typed(&mut self, ch: char) -> GuiResult<()> {
        self.ensure_open()?;
        if ch.is_control() {
            return Ok(());
        }
        if self.listeners.iter_mut().any(|l| l.pre_key_typed(ch, &self.context)) {
            return Ok(());
        }
        let state = self.state();
        self.main.key_pressed(KeyPress::Char(ch), &state)?;
        for l in &mut self.listeners {
            l.post_key_typed(ch, &self.context);
        }
        self.finish_event()
    }

    pub fn key_released(&mut self, key: KeyCode) -> GuiResult<()> {
        self.ensure_open()?;
        if !self.context.with_input(|i| i.set_key_up(key)) {
            log::trace!("release of {key:?} without a press");
        }
        if self.listeners.iter_mut().any(|l| l.pre_key_released(key, &self.context)) {
            return Ok(());
        }
        let state = self.state();
        self.main.key_released(key, &state)?;
        for l in &mut self.listeners {
            l.post_key_released(key, &self.context);
        }
        self.finish_event()
    }

    /// New mouse position in window space, `None` once it left the window.
    /// Any movement marks a change so hover visuals follow the mouse.
    pub fn mouse_moved(&mut self, pos: Option<Vec2>) {
        if self.context.mouse() != pos {
            self.context.set_mouse(pos);
            self.context.mark_change();
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, down: bool) {
        self.context.with_input(|i| i.set_button(button, down));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.context.set_size(width, height);
        self.context.mark_change();
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        if self.listeners.iter_mut().any(|l| l.pre_close(&self.context)) {
            return;
        }
        log::debug!("closing window {:?}", self.config.title);
        self.open = false;
        self.context.with_input(|i| i.release_all());
        self.context.set_mouse(None);
        for l in &mut self.listeners {
            l.post_close(&self.context);
        }
    }

    /// Makes [`GuiWindow::run`] return after the current frame.
    pub fn stop_running(&self) {
        self.context.stop_running();
    }

    /// Updates and renders at the configured fps until
    /// [`GuiWindow::stop_running`] is called (also reachable from components
    /// through [`WindowContext::stop_running`]), then closes the window.
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> GuiResult<()> {
        self.open()?;
        for l in &mut self.listeners {
            l.pre_run_loop(&self.context);
        }
        let frame = self.config.frame_time();
        let result = loop {
            if self.context.stop_requested() {
                break Ok(());
            }
            let start = Instant::now();
            let step = self.update().and_then(|()| self.render(renderer));
            if let Err(e) = step {
                break Err(e);
            }
            let spent = start.elapsed();
            if spent < frame {
                thread::sleep(frame - spent);
            }
        };
        for l in &mut self.listeners {
            l.post_run_loop(&self.context);
        }
        self.close();
        result
    }
}

//! Editable text fields.
//!
//! A field gains focus when left-clicked and loses it on a click elsewhere,
//! Enter or Escape. While focused it receives typed characters and
//! Backspace removes the last grapheme cluster.

use std::rc::Rc;

use tessera_core::{
    Component, ComponentState, GuiResult, KeyCode, KeyPress, MouseButton, Rect, Renderer, Signal,
    Vec2, signal,
};
use tessera_text::TextProperties;
use unicode_segmentation::UnicodeSegmentation;

use super::{LabelCache, Repaint};

/// Decides whether `ch` may be appended to `text`.
pub type CharFilter = Rc<dyn Fn(&str, char) -> bool>;

pub struct TextEditField {
    text: Signal<String>,
    passive: TextProperties,
    active: TextProperties,
    focused: bool,
    filter: Option<CharFilter>,
    cache: LabelCache,
    repaint: Repaint,
}

impl TextEditField {
    pub fn new(text: impl Into<String>, passive: TextProperties, active: TextProperties) -> Self {
        Self::with_signal(signal(text.into()), passive, active)
    }

    pub fn with_signal(
        text: Signal<String>,
        passive: TextProperties,
        active: TextProperties,
    ) -> Self {
        Self {
            text,
            passive,
            active,
            focused: false,
            filter: None,
            cache: LabelCache::default(),
            repaint: Repaint::default(),
        }
    }

    pub fn with_filter(mut self, filter: CharFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn text(&self) -> Signal<String> {
        self.text.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool, state: &ComponentState) {
        if self.focused != focused {
            self.focused = focused;
            state.window().mark_change();
        }
    }

    fn accepts(&self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match &self.filter {
            Some(f) => self.text.with(|t| f(t, ch)),
            None => true,
        }
    }
}

impl Component for TextEditField {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.repaint.watch(&self.text, state);
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let props = if self.focused {
            &self.active
        } else {
            &self.passive
        };
        let texture = self.text.with(|t| self.cache.get(t, props, state))?;
        renderer.render_texture(&texture, Rect::UNIT);
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
            self.set_focus(!self.focused, state);
        }
        Ok(())
    }

    fn click_out(&mut self, _button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        self.set_focus(false, state);
        Ok(())
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        if !self.focused {
            return Ok(());
        }
        match key {
            KeyPress::Code(KeyCode::Enter | KeyCode::Escape) => self.set_focus(false, state),
            KeyPress::Code(KeyCode::Backspace) => {
                if !self.text.with(String::is_empty) {
                    self.text.update(|t| {
                        let cut = t.grapheme_indices(true).last().map_or(0, |(i, _)| i);
                        t.truncate(cut);
                    });
                }
            }
            KeyPress::Char(ch) if self.accepts(ch) => self.text.update(|t| t.push(ch)),
            _ => {}
        }
        Ok(())
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.text
            .with(|t| t == text)
            .then_some(Vec2::new(0.5, 0.5))
    }
}

/// Shared view of an [`IntEditField`]'s value.
#[derive(Clone, Debug)]
pub struct IntValue {
    text: Signal<String>,
    min: i64,
    max: i64,
}

impl IntValue {
    /// Parses the current text. An empty text or a lone `-` reads as 0, and
    /// a number too large for `i64` as the bound on its side. The result is
    /// clamped to the field's range.
    pub fn get(&self) -> i64 {
        self.text.with(|t| parse_clamped(t, self.min, self.max))
    }

    pub fn set(&self, value: i64) {
        self.text.set(value.clamp(self.min, self.max).to_string());
    }

    pub fn text(&self) -> Signal<String> {
        self.text.clone()
    }

    pub fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// Rewrites the text as the value it parses to.
    fn normalize(&self) {
        let canonical = self.get().to_string();
        if self.text.with(|t| *t != canonical) {
            self.text.set(canonical);
        }
    }
}

fn parse_clamped(text: &str, min: i64, max: i64) -> i64 {
    let raw = match text {
        "" | "-" => 0,
        t => t.parse::<i64>().unwrap_or(if t.starts_with('-') { i64::MIN } else { i64::MAX }),
    };
    raw.clamp(min, max)
}

/// Text field accepting only an optionally negative integer. The text is
/// normalised to the clamped value whenever the field loses focus.
pub struct IntEditField {
    field: TextEditField,
    value: IntValue,
}

impl IntEditField {
    pub fn new(
        initial: i64,
        min: i64,
        max: i64,
        passive: TextProperties,
        active: TextProperties,
    ) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let text = signal(initial.clamp(min, max).to_string());
        let filter: CharFilter =
            Rc::new(|t: &str, ch: char| ch.is_ascii_digit() || (ch == '-' && t.is_empty()));
        Self {
            field: TextEditField::with_signal(text.clone(), passive, active).with_filter(filter),
            value: IntValue { text, min, max },
        }
    }

    pub fn value(&self) -> IntValue {
        self.value.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.field.is_focused()
    }

    fn after(&self, was_focused: bool) {
        if was_focused && !self.field.is_focused() {
            self.value.normalize();
        }
    }
}

impl Component for IntEditField {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.field.init(state)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        self.field.render(renderer, state)
    }

    fn click(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        let was = self.field.is_focused();
        self.field.click(x, y, button, state)?;
        self.after(was);
        Ok(())
    }

    fn click_out(&mut self, button: MouseButton, state: &ComponentState) -> GuiResult<()> {
        let was = self.field.is_focused();
        self.field.click_out(button, state)?;
        self.after(was);
        Ok(())
    }

    fn key_pressed(&mut self, key: KeyPress, state: &ComponentState) -> GuiResult<()> {
        let was = self.field.is_focused();
        self.field.key_pressed(key, state)?;
        self.after(was);
        Ok(())
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.field.location_for_text(text)
    }
}

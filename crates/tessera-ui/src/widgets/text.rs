use tessera_core::{
    Component, ComponentState, GuiResult, MouseButton, Rect, Renderer, Signal, Vec2, signal,
};
use tessera_text::TextProperties;

use super::{Action, LabelCache, Repaint};

/// Single line of text drawn as one label texture.
pub struct TextComponent {
    text: Signal<String>,
    props: TextProperties,
    cache: LabelCache,
    repaint: Repaint,
}

impl TextComponent {
    pub fn new(text: impl Into<String>, props: TextProperties) -> Self {
        Self::with_signal(signal(text.into()), props)
    }

    pub fn with_signal(text: Signal<String>, props: TextProperties) -> Self {
        Self {
            text,
            props,
            cache: LabelCache::default(),
            repaint: Repaint::default(),
        }
    }

    pub fn text(&self) -> Signal<String> {
        self.text.clone()
    }

    pub fn properties(&self) -> &TextProperties {
        &self.props
    }

    pub fn set_properties(&mut self, props: TextProperties, state: &ComponentState) {
        self.props = props;
        state.window().mark_change();
    }
}

impl Component for TextComponent {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.repaint.watch(&self.text, state);
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let texture = self
            .text
            .with(|text| self.cache.get(text, &self.props, state))?;
        renderer.render_texture(&texture, Rect::UNIT);
        Ok(())
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.text
            .with(|t| t == text)
            .then_some(Vec2::new(0.5, 0.5))
    }
}

/// Text label that switches to `hover` properties under the mouse and runs
/// an action on left click.
pub struct TextButton {
    label: TextComponent,
    hover: TextProperties,
    action: Action,
}

impl TextButton {
    pub fn new(
        text: impl Into<String>,
        props: TextProperties,
        hover: TextProperties,
        action: Action,
    ) -> Self {
        Self {
            label: TextComponent::new(text, props),
            hover,
            action,
        }
    }

    pub fn text(&self) -> Signal<String> {
        self.label.text()
    }
}

impl Component for TextButton {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.label.init(state)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let props = if state.is_mouse_over() {
            &self.hover
        } else {
            &self.label.props
        };
        let texture = self
            .label
            .text
            .with(|text| self.label.cache.get(text, props, state))?;
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
            (self.action)(state)?;
        }
        Ok(())
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.label.location_for_text(text)
    }
}

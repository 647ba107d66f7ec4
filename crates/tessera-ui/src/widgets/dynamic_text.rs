//! Text drawn glyph by glyph.
//!
//! Unlike [`TextComponent`](super::text::TextComponent), which renders one
//! label texture, these widgets draw each character's cached glyph texture
//! directly. Changing the text only costs a re-layout, which suits labels
//! that change every frame.

use tessera_core::{
    CharBuilder, Component, ComponentState, GuiResult, MouseButton, Rect, Renderer, Signal,
    Texture, Vec2, signal,
};
use tessera_text::TextProperties;

use super::{Action, Repaint};

/// Glyph textures of one line and where each one goes, in the unit square.
#[derive(Clone, Debug, Default)]
pub struct GlyphRow {
    pub glyphs: Vec<(Texture, Rect)>,
}

impl GlyphRow {
    /// Each glyph gets a share of the inner width (inside border and margin)
    /// proportional to its pixel width. A line whose glyphs are all zero
    /// wide has no layout.
    pub fn layout(text: &str, props: &TextProperties, chars: &CharBuilder) -> GuiResult<Self> {
        let textures = text
            .chars()
            .map(|c| chars.get_texture(c, props.text_color, &props.font))
            .collect::<GuiResult<Vec<_>>>()?;
        let total: u32 = textures.iter().map(Texture::width).sum();
        if total == 0 {
            return Ok(Self::default());
        }
        let inset_x = props.border_x + props.margin_x;
        let inset_y = props.border_y + props.margin_y;
        let span = 1.0 - 2.0 * inset_x;
        let mut x = inset_x;
        let glyphs = textures
            .into_iter()
            .map(|t| {
                let next = x + t.width() as f32 / total as f32 * span;
                let rect = Rect::new(x, inset_y, next, 1.0 - inset_y);
                x = next;
                (t, rect)
            })
            .collect();
        Ok(Self { glyphs })
    }
}

fn draw(row: &GlyphRow, props: &TextProperties, renderer: &mut dyn Renderer) {
    renderer.clear(props.background_color);
    let (bx, by) = (props.border_x, props.border_y);
    let strips = [
        (by, Rect::new(0.0, 0.0, 1.0, by)),
        (bx, Rect::new(0.0, 0.0, bx, 1.0)),
        (by, Rect::new(0.0, 1.0 - by, 1.0, 1.0)),
        (bx, Rect::new(1.0 - bx, 0.0, 1.0, 1.0)),
    ];
    for (extent, strip) in strips {
        if extent > 0.0 {
            renderer.fill(props.border_color, strip);
        }
    }
    for (texture, rect) in &row.glyphs {
        renderer.render_texture(texture, *rect);
    }
}

/// Caches the row for the text and properties it was laid out with.
#[derive(Default)]
struct RowCache {
    key: Option<(String, TextProperties)>,
    row: GlyphRow,
}

impl RowCache {
    fn get(
        &mut self,
        text: &str,
        props: &TextProperties,
        chars: &CharBuilder,
    ) -> GuiResult<&GlyphRow> {
        let fresh = matches!(&self.key, Some((t, p)) if t == text && p == props);
        if !fresh {
            self.row = GlyphRow::layout(text, props, chars)?;
            self.key = Some((text.to_string(), props.clone()));
        }
        Ok(&self.row)
    }
}

pub struct DynamicTextComponent {
    text: Signal<String>,
    props: TextProperties,
    rows: RowCache,
    repaint: Repaint,
}

impl DynamicTextComponent {
    pub fn new(text: impl Into<String>, props: TextProperties) -> Self {
        Self::with_signal(signal(text.into()), props)
    }

    pub fn with_signal(text: Signal<String>, props: TextProperties) -> Self {
        Self {
            text,
            props,
            rows: RowCache::default(),
            repaint: Repaint::default(),
        }
    }

    pub fn text(&self) -> Signal<String> {
        self.text.clone()
    }

    pub fn set_properties(&mut self, props: TextProperties, state: &ComponentState) {
        self.props = props;
        state.window().mark_change();
    }
}

impl Component for DynamicTextComponent {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.repaint.watch(&self.text, state);
        Ok(())
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let chars = state.window().char_builder();
        let row = self.text.with(|t| self.rows.get(t, &self.props, chars).cloned())?;
        draw(&row, &self.props, renderer);
        Ok(())
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.text
            .with(|t| t == text)
            .then_some(Vec2::new(0.5, 0.5))
    }
}

/// Glyph-drawn button. Unlike [`TextButton`](super::text::TextButton) it
/// fires on any mouse button.
pub struct DynamicTextButton {
    label: DynamicTextComponent,
    hover: TextProperties,
    action: Action,
}

impl DynamicTextButton {
    pub fn new(
        text: impl Into<String>,
        props: TextProperties,
        hover: TextProperties,
        action: Action,
    ) -> Self {
        Self {
            label: DynamicTextComponent::new(text, props),
            hover,
            action,
        }
    }

    pub fn text(&self) -> Signal<String> {
        self.label.text()
    }
}

impl Component for DynamicTextButton {
    fn init(&mut self, state: &ComponentState) -> GuiResult<()> {
        self.label.init(state)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, state: &ComponentState) -> GuiResult<()> {
        let props = if state.is_mouse_over() {
            &self.hover
        } else {
            &self.label.props
        };
        let chars = state.window().char_builder();
        let row = self
            .label
            .text
            .with(|t| self.label.rows.get(t, props, chars).cloned())?;
        draw(&row, props, renderer);
        Ok(())
    }

    fn click(
        &mut self,
        _x: f32,
        _y: f32,
        _button: MouseButton,
        state: &ComponentState,
    ) -> GuiResult<()> {
        (self.action)(state)
    }

    fn location_for_text(&self, text: &str) -> Option<Vec2> {
        self.label.location_for_text(text)
    }
}

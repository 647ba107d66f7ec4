use std::fmt;

use crate::color::Color;
use crate::geometry::Rect;
use crate::texture::Texture;

/// Drawing surface in normalized, y-up coordinates. `[0,1]×[0,1]` is the
/// whole view; anything outside is clipped by the backend.
pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn fill(&mut self, color: Color, rect: Rect);
    fn render_texture(&mut self, texture: &Texture, rect: Rect);
}

impl<'r> dyn Renderer + 'r {
    /// View onto `rect` of this renderer. Nestable.
    pub fn area(&mut self, rect: Rect) -> AreaRenderer<'_> {
        AreaRenderer::new(self, rect)
    }
}

/// Remaps every call into a sub-rectangle of its target. `clear` only
/// covers the sub-rectangle.
pub struct AreaRenderer<'a> {
    target: &'a mut dyn Renderer,
    rect: Rect,
}

impl<'a> AreaRenderer<'a> {
    pub fn new(target: &'a mut dyn Renderer, rect: Rect) -> Self {
        Self { target, rect }
    }
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl Renderer for AreaRenderer<'_> {
    fn clear(&mut self, color: Color) {
        self.target.fill(color, self.rect);
    }
    fn fill(&mut self, color: Color, rect: Rect) {
        self.target.fill(color, self.rect.sub_rect(rect));
    }
    fn render_texture(&mut self, texture: &Texture, rect: Rect) {
        self.target.render_texture(texture, self.rect.sub_rect(rect));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Fill(Color, Rect),
    Texture {
        id: u64,
        width: u32,
        height: u32,
        rect: Rect,
    },
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn rect(f: &mut fmt::Formatter<'_>, r: &Rect) -> fmt::Result {
            write!(
                f,
                "({:.3}, {:.3})-({:.3}, {:.3})",
                r.min_x, r.min_y, r.max_x, r.max_y
            )
        }
        match self {
            DrawCommand::Clear(c) => {
                write!(f, "clear #{:02x}{:02x}{:02x}{:02x}", c.0, c.1, c.2, c.3)
            }
            DrawCommand::Fill(c, r) => {
                write!(f, "fill #{:02x}{:02x}{:02x}{:02x} ", c.0, c.1, c.2, c.3)?;
                rect(f, r)
            }
            DrawCommand::Texture {
                width, height, rect: r, ..
            } => {
                write!(f, "texture {width}x{height} ")?;
                rect(f, r)
            }
        }
    }
}

/// Renderer that only records what it was asked to draw.
#[derive(Default, Debug)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// One command per line, for snapshots.
    pub fn dump(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }
    fn fill(&mut self, color: Color, rect: Rect) {
        self.commands.push(DrawCommand::Fill(color, rect));
    }
    fn render_texture(&mut self, texture: &Texture, rect: Rect) {
        self.commands.push(DrawCommand::Texture {
            id: texture.id(),
            width: texture.width(),
            height: texture.height(),
            rect,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_areas_compose() {
        let mut rec = RecordingRenderer::new();
        {
            let r: &mut dyn Renderer = &mut rec;
            let mut outer = r.area(Rect::new(0.5, 0.0, 1.0, 0.5));
            let outer: &mut dyn Renderer = &mut outer;
            let mut inner = outer.area(Rect::new(0.0, 0.0, 0.5, 1.0));
            inner.clear(Color::RED);
            inner.fill(Color::BLUE, Rect::new(0.0, 0.0, 1.0, 0.5));
        }
        assert_eq!(
            rec.commands,
            vec![
                DrawCommand::Fill(Color::RED, Rect::new(0.5, 0.0, 0.75, 0.5)),
                DrawCommand::Fill(Color::BLUE, Rect::new(0.5, 0.0, 0.75, 0.25)),
            ]
        );
    }

    #[test]
    fn test_dump_format() {
        let mut rec = RecordingRenderer::new();
        rec.clear(Color::BLACK);
        rec.fill(Color::WHITE, Rect::UNIT);
        assert_eq!(
            rec.dump(),
            "clear #000000ff\nfill #ffffffff (0.000, 0.000)-(1.000, 1.000)"
        );
    }
}

use tessera_core::{Color, Font};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorAlignment {
    #[default]
    Left,
    Middle,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerAlignment {
    Up,
    #[default]
    Middle,
    Down,
}

/// How a label is drawn. Border and margin are fractions of the label size,
/// applied on each side.
#[derive(Clone, Debug, PartialEq)]
pub struct TextProperties {
    pub font: Font,
    pub text_color: Color,
    pub background_color: Color,
    pub border_color: Color,
    pub hor_alignment: HorAlignment,
    pub ver_alignment: VerAlignment,
    pub border_x: f32,
    pub border_y: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl TextProperties {
    pub fn default_font() -> Font {
        Font::new("", 30)
    }

    /// Left aligned, vertically centred, no border.
    pub fn text(font: Font, text_color: Color, background_color: Color) -> Self {
        Self {
            font,
            text_color,
            background_color,
            border_color: background_color,
            hor_alignment: HorAlignment::Left,
            ver_alignment: VerAlignment::Middle,
            border_x: 0.0,
            border_y: 0.0,
            margin_x: 0.0,
            margin_y: 0.0,
        }
    }

    /// Plain text on a transparent background.
    pub fn label(text_color: Color) -> Self {
        Self::text(Self::default_font(), text_color, Color::TRANSPARENT)
    }

    /// Centred text with a 10% border and 10% margin.
    pub fn button(
        font: Font,
        background_color: Color,
        border_color: Color,
        text_color: Color,
    ) -> Self {
        Self {
            font,
            text_color,
            background_color,
            border_color,
            hor_alignment: HorAlignment::Middle,
            ver_alignment: VerAlignment::Middle,
            border_x: 0.1,
            border_y: 0.1,
            margin_x: 0.1,
            margin_y: 0.1,
        }
    }

    pub fn simple_button(background_color: Color, border_color: Color) -> Self {
        Self::button(
            Self::default_font(),
            background_color,
            border_color,
            Color::BLACK,
        )
    }

    pub fn with_text_color(mut self, c: Color) -> Self {
        self.text_color = c;
        self
    }
    pub fn with_background(mut self, c: Color) -> Self {
        self.background_color = c;
        self
    }
    pub fn with_border_color(mut self, c: Color) -> Self {
        self.border_color = c;
        self
    }
    pub fn with_alignment(mut self, hor: HorAlignment, ver: VerAlignment) -> Self {
        self.hor_alignment = hor;
        self.ver_alignment = ver;
        self
    }
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }
}

impl Default for TextProperties {
    fn default() -> Self {
        Self::label(Color::BLACK)
    }
}

/// 8-bit RGBA color. Immutable value passed to renderers and text builders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);
    pub const RED: Color = Color(255, 0, 0, 255);
    pub const GREEN: Color = Color(0, 255, 0, 255);
    pub const BLUE: Color = Color(0, 0, 255, 255);
    pub const GRAY: Color = Color(128, 128, 128, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>, default: u8| {
            s.get(range)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(default)
        };
        match s.len() {
            6 => Color(channel(0..2, 0), channel(2..4, 0), channel(4..6, 0), 255),
            8 => Color(
                channel(0..2, 0),
                channel(2..4, 0),
                channel(4..6, 0),
                channel(6..8, 255),
            ),
            _ => Color::BLACK,
        }
    }
    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }
    pub fn is_opaque(self) -> bool {
        self.3 == 255
    }

    pub fn red(self) -> u8 {
        self.0
    }
    pub fn green(self) -> u8 {
        self.1
    }
    pub fn blue(self) -> u8 {
        self.2
    }
    pub fn alpha(self) -> u8 {
        self.3
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, self.3]
    }

    /// Source-over compositing of `self` onto `dst`.
    pub fn over(self, dst: Color) -> Color {
        match self.3 {
            255 => self,
            0 => dst,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
                let out_a = a + (dst.3 as u32 * inv + 127) / 255;
                Color(
                    mix(self.0, dst.0),
                    mix(self.1, dst.1),
                    mix(self.2, dst.2),
                    out_a.min(255) as u8,
                )
            }
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Color(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(c: Color) -> Self {
        image::Rgba(c.to_rgba())
    }
}

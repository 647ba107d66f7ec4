//! Label rendering for tessera widgets.
//!
//! [`TextBuilder::create_image`] draws a single line of text into a bordered
//! box; widgets turn the image into a texture through the window's
//! `TextureLoader`. Glyphs come from the window's `CharBuilder`, so they are
//! rasterised once per character, colour and size.

pub mod builder;
pub mod font;
pub mod properties;

pub use builder::{LabelBoxes, TextBuilder, TextPlacement};
pub use font::FontRasterizer;
pub use properties::{HorAlignment, TextProperties, VerAlignment};

pub use crate::color::Color;
pub use crate::component::{Component, Lifecycle, SubComponentId};
pub use crate::error::{GuiError, GuiResult};
pub use crate::geometry::{Rect, Vec2};
pub use crate::glyph::{BoxGlyphs, CharBuilder, Font, GlyphRasterizer};
pub use crate::input::{KeyCode, KeyPress, MouseButton, MouseButtons, WindowInput};
pub use crate::render_api::{AreaRenderer, DrawCommand, RecordingRenderer, Renderer};
pub use crate::signal::{Condition, Signal, condition, signal};
pub use crate::state::ComponentState;
pub use crate::texture::{AssetCache, ImageTextureLoader, PixelRegion, Texture, TextureLoader};
pub use crate::window::WindowContext;

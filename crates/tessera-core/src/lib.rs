//! # Components, states and renderers
//!
//! Tessera is a retained-mode widget library. A window owns one *main*
//! component; menus own and position further components. Every component
//! lives in its own normalized coordinate space:
//!
//! - `(0, 0)` is the bottom-left corner of its area, `(1, 1)` the top-right.
//! - A container places a child by a [`Rect`] in the container's space.
//!   Rectangles may leave the unit square; containers pan to reveal them.
//!
//! ## The component contract
//!
//! [`Component`] has one required method, `render`. Everything else
//! (`init`, `update`, `click`, `click_out`, `scroll`, `key_pressed`,
//! `key_released`) defaults to doing nothing. Each call carries a
//! [`ComponentState`] derived by the owner for that one dispatch:
//!
//! ```rust
//! use tessera_core::*;
//!
//! struct Swatch(Color);
//!
//! impl Component for Swatch {
//!     fn render(&mut self, r: &mut dyn Renderer, _: &ComponentState) -> GuiResult<()> {
//!         r.clear(self.0);
//!         Ok(())
//!     }
//!     fn click(&mut self, _: f32, _: f32, _: MouseButton, s: &ComponentState) -> GuiResult<()> {
//!         self.0 = Color::RED;
//!         s.window().mark_change();
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Rendering
//!
//! A [`Renderer`] draws in the same normalized space. `area(rect)` returns a
//! view that maps the unit square onto `rect`, which is how containers hand
//! their children a renderer of their own:
//!
//! ```rust
//! use tessera_core::*;
//!
//! let mut rec = RecordingRenderer::new();
//! let r: &mut dyn Renderer = &mut rec;
//! r.area(Rect::new(0.5, 0.5, 1.0, 1.0)).clear(Color::WHITE);
//! assert_eq!(rec.commands, vec![DrawCommand::Fill(Color::WHITE, Rect::new(0.5, 0.5, 1.0, 1.0))]);
//! ```
//!
//! Windows only render after something called
//! [`WindowContext::mark_change`]; widgets call it whenever their pixels
//! would change.

pub mod color;
pub mod component;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod input;
pub mod prelude;
pub mod render_api;
pub mod signal;
pub mod state;
pub mod texture;
pub mod window;

mod tests;

pub use prelude::*;

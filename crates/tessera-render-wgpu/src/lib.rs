//! Turning tessera draw calls into pixels.
//!
//! [`PixelCanvas`] is a [`Renderer`](tessera_core::Renderer) that rasterizes
//! into an RGBA buffer on the CPU. It is what windows render into, and what
//! tests inspect. With the `present` feature, [`WgpuPresenter`] uploads a
//! canvas to a texture and draws it over a window surface.

pub mod canvas;
#[cfg(feature = "present")]
pub mod presenter;

pub use canvas::PixelCanvas;
#[cfg(feature = "present")]
pub use presenter::WgpuPresenter;

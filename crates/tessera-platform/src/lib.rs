//! Window shell and runners.
//!
//! [`GuiWindow`] hosts one main component and turns platform events into
//! component dispatches. It knows nothing about any particular windowing
//! system: the desktop runner (feature `desktop`) feeds it winit events and
//! presents its frames with wgpu, while [`testing::GuiTestHelper`] drives it
//! headlessly.

pub mod dispatcher;
pub mod listener;
pub mod testing;
pub mod window;

#[cfg(feature = "desktop")]
pub mod desktop;

pub use dispatcher::{Dispatch, UiDispatcher, UiJob};
pub use listener::WindowListener;
pub use testing::{GuiTestHelper, TestError};
pub use window::{GuiWindow, WindowConfig};

#[cfg(feature = "desktop")]
pub use desktop::run_desktop_app;

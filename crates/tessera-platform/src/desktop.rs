//! Desktop runner: winit window, wgpu presentation.

use std::rc::Rc;
use std::sync::Arc;

use tessera_core::{
    CharBuilder, Component, ImageTextureLoader, KeyCode, MouseButton, Vec2, WindowContext,
};
use tessera_render_wgpu::{PixelCanvas, WgpuPresenter};
use tessera_text::FontRasterizer;
use web_time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WKey, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::window::{GuiWindow, WindowConfig};

/// Opens a desktop window showing `main` and runs until it is closed or a
/// component calls `stop_running`.
pub fn run_desktop_app(config: WindowConfig, main: Box<dyn Component>) -> anyhow::Result<()> {
    let context = WindowContext::new(
        Rc::new(ImageTextureLoader::new()),
        Rc::new(CharBuilder::new(FontRasterizer::system())),
    );
    let event_loop = EventLoop::new()?;
    let mut app = App {
        gui: GuiWindow::with_context(config, context, main),
        window: None,
        presenter: None,
        canvas: PixelCanvas::new(1, 1),
        failed: None,
    };
    event_loop.run_app(&mut app)?;
    match app.failed {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    gui: GuiWindow,
    window: Option<Arc<Window>>,
    presenter: Option<WgpuPresenter>,
    canvas: PixelCanvas,
    failed: Option<anyhow::Error>,
}

impl App {
    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn fail(&mut self, el: &ActiveEventLoop, e: impl Into<anyhow::Error>) {
        let e = e.into();
        log::error!("{e:#}");
        self.failed = Some(e);
        self.gui.close();
        el.exit();
    }

    /// Window pixels to normalized, y-up coordinates.
    fn normalize(&self, x: f64, y: f64) -> Option<Vec2> {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Vec2::new((x / w) as f32, (1.0 - y / h) as f32))
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        let (w, h) = (size.width.max(1), size.height.max(1));
        if let Some(p) = &mut self.presenter {
            p.configure_surface(w, h);
        }
        self.canvas.resize(w, h);
        self.gui.resize(w, h);
    }
}

impl ApplicationHandler<()> for App {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let config = self.gui.config().clone();
        let mut attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_decorations(config.border);
        if config.full_screen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = match el.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(el, e),
        };
        match WgpuPresenter::new(window.clone()) {
            Ok(p) => self.presenter = Some(p),
            Err(e) => return self.fail(el, e.context("failed to create wgpu presenter")),
        }
        self.resized(window.inner_size());
        self.window = Some(window);
        if let Err(e) = self.gui.open() {
            return self.fail(el, e);
        }
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        el: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested");
                self.gui.close();
                el.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => {
                self.resized(size);
                self.request_redraw();
                Ok(())
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = self.normalize(position.x, position.y);
                self.gui.mouse_moved(pos);
                Ok(())
            }
            WindowEvent::CursorLeft { .. } => {
                self.gui.mouse_moved(None);
                Ok(())
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(button);
                let down = state == ElementState::Pressed;
                self.gui.mouse_button(button, down);
                match self.gui.context().mouse() {
                    Some(p) if down => self.gui.click(p.x, p.y, button),
                    _ => Ok(()),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * self.gui.config().scroll_line_factor,
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.y / self.canvas.height().max(1) as f64) as f32
                    }
                };
                log::trace!("MouseWheel: amount={amount}");
                self.gui.scroll(amount).map(|_| ())
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                match event.state {
                    ElementState::Pressed => {
                        let pressed = match key {
                            Some(k) => self.gui.key_pressed(k),
                            None => Ok(()),
                        };
                        let text = event.text.as_deref().unwrap_or_default().to_string();
                        pressed.and_then(|()| text.chars().try_for_each(|c| self.gui.key_typed(c)))
                    }
                    ElementState::Released => match key {
                        Some(k) => self.gui.key_released(k),
                        None => Ok(()),
                    },
                }
            }
            WindowEvent::Focused(false) => {
                self.gui.context().with_input(|i| i.release_all());
                Ok(())
            }
            WindowEvent::RedrawRequested => match self.gui.render(&mut self.canvas) {
                Ok(true) => {
                    if let Some(p) = &mut self.presenter {
                        p.present(&self.canvas);
                    }
                    Ok(())
                }
                Ok(false) => Ok(()),
                Err(e) => Err(e),
            },
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.fail(el, e);
        }
    }

    fn about_to_wait(&mut self, el: &ActiveEventLoop) {
        if !self.gui.is_open() {
            return;
        }
        if let Err(e) = self.gui.update() {
            return self.fail(el, e);
        }
        if self.gui.context().stop_requested() {
            self.gui.close();
            el.exit();
            return;
        }
        if self.gui.context().has_changed() || self.gui.config().render_continuously {
            self.request_redraw();
        }
        el.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + self.gui.config().frame_time(),
        ));
    }
}

fn map_button(b: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as W;
    match b {
        W::Left => MouseButton::Left,
        W::Right => MouseButton::Right,
        W::Middle => MouseButton::Middle,
        W::Back => MouseButton::Other(3),
        W::Forward => MouseButton::Other(4),
        W::Other(n) => MouseButton::Other(n),
    }
}

fn map_key(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        log::warn!("unidentified key {key:?}");
        return None;
    };
    let letter = |c: u8| Some(KeyCode::Character(c as char));
    Some(match code {
        WKey::Enter | WKey::NumpadEnter => KeyCode::Enter,
        WKey::Tab => KeyCode::Tab,
        WKey::Backspace => KeyCode::Backspace,
        WKey::Delete => KeyCode::Delete,
        WKey::Escape => KeyCode::Escape,
        WKey::ArrowLeft => KeyCode::ArrowLeft,
        WKey::ArrowRight => KeyCode::ArrowRight,
        WKey::ArrowUp => KeyCode::ArrowUp,
        WKey::ArrowDown => KeyCode::ArrowDown,
        WKey::Home => KeyCode::Home,
        WKey::End => KeyCode::End,
        WKey::PageUp => KeyCode::PageUp,
        WKey::PageDown => KeyCode::PageDown,
        WKey::Space => KeyCode::Space,
        WKey::ShiftLeft | WKey::ShiftRight => KeyCode::Shift,
        WKey::ControlLeft | WKey::ControlRight => KeyCode::Control,
        WKey::AltLeft | WKey::AltRight => KeyCode::Alt,
        WKey::KeyA => return letter(b'a'),
        WKey::KeyB => return letter(b'b'),
        WKey::KeyC => return letter(b'c'),
        WKey::KeyD => return letter(b'd'),
        WKey::KeyE => return letter(b'e'),
        WKey::KeyF => return letter(b'f'),
        WKey::KeyG => return letter(b'g'),
        WKey::KeyH => return letter(b'h'),
        WKey::KeyI => return letter(b'i'),
        WKey::KeyJ => return letter(b'j'),
        WKey::KeyK => return letter(b'k'),
        WKey::KeyL => return letter(b'l'),
        WKey::KeyM => return letter(b'm'),
        WKey::KeyN => return letter(b'n'),
        WKey::KeyO => return letter(b'o'),
        WKey::KeyP => return letter(b'p'),
        WKey::KeyQ => return letter(b'q'),
        WKey::KeyR => return letter(b'r'),
        WKey::KeyS => return letter(b's'),
        WKey::KeyT => return letter(b't'),
        WKey::KeyU => return letter(b'u'),
        WKey::KeyV => return letter(b'v'),
        WKey::KeyW => return letter(b'w'),
        WKey::KeyX => return letter(b'x'),
        WKey::KeyY => return letter(b'y'),
        WKey::KeyZ => return letter(b'z'),
        WKey::Digit0 | WKey::Numpad0 => return letter(b'0'),
        WKey::Digit1 | WKey::Numpad1 => return letter(b'1'),
        WKey::Digit2 | WKey::Numpad2 => return letter(b'2'),
        WKey::Digit3 | WKey::Numpad3 => return letter(b'3'),
        WKey::Digit4 | WKey::Numpad4 => return letter(b'4'),
        WKey::Digit5 | WKey::Numpad5 => return letter(b'5'),
        WKey::Digit6 | WKey::Numpad6 => return letter(b'6'),
        WKey::Digit7 | WKey::Numpad7 => return letter(b'7'),
        WKey::Digit8 | WKey::Numpad8 => return letter(b'8'),
        WKey::Digit9 | WKey::Numpad9 => return letter(b'9'),
        WKey::F1 => KeyCode::F(1),
        WKey::F2 => KeyCode::F(2),
        WKey::F3 => KeyCode::F(3),
        WKey::F4 => KeyCode::F(4),
        WKey::F5 => KeyCode::F(5),
        WKey::F6 => KeyCode::F(6),
        WKey::F7 => KeyCode::F(7),
        WKey::F8 => KeyCode::F(8),
        WKey::F9 => KeyCode::F(9),
        WKey::F10 => KeyCode::F(10),
        WKey::F11 => KeyCode::F(11),
        WKey::F12 => KeyCode::F(12),
        other => {
            log::debug!("no mapping for {other:?}");
            return None;
        }
    })
}

use ahash::AHashSet;
use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Shift,
    Control,
    Alt,
    F(u8), // F1-F24
    /// Backend scancode with no named counterpart.
    Other(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Other(_) => MouseButtons::OTHER,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const OTHER = 1 << 3;
    }
}

/// What a component receives from `key_pressed`: either a key code or a
/// typed, printable character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Code(KeyCode),
    Char(char),
}

/// Snapshot of held keys and mouse buttons, owned by the window.
#[derive(Clone, Debug, Default)]
pub struct WindowInput {
    keys: AHashSet<KeyCode>,
    buttons: MouseButtons,
}

impl WindowInput {
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Returns false if the key was already down.
    pub fn set_key_down(&mut self, key: KeyCode) -> bool {
        self.keys.insert(key)
    }

    /// Returns false if the key was not down.
    pub fn set_key_up(&mut self, key: KeyCode) -> bool {
        self.keys.remove(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(button.flag())
    }
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        self.buttons.set(button.flag(), down);
    }

    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons = MouseButtons::empty();
    }
}

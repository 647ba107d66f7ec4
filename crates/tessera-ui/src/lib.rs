//! Menus and widgets for tessera.
//!
//! [`GuiMenu`] is the container everything else is placed in. The widgets
//! cover the usual leaves (text, buttons, edit fields, checkboxes, images)
//! plus two ready-made full-window menus, [`FileChooserMenu`] and
//! [`TextArrayEditMenu`].

pub mod menu;
pub mod widgets;

pub use menu::{GuiMenu, MenuConfig, MenuHandle, SubComponent, SubComponentRef};
pub use widgets::checkbox::Checkbox;
pub use widgets::color::ColorComponent;
pub use widgets::decorators::{Activatable, Conditional};
pub use widgets::dynamic_text::{DynamicTextButton, DynamicTextComponent, GlyphRow};
pub use widgets::edit::{CharFilter, IntEditField, IntValue, TextEditField};
pub use widgets::file_chooser::{FileChooserMenu, FileEntry, FileFilter, FileListener, read_entries};
pub use widgets::icons::{CheckboxIcons, FileIcons, ListIcons};
pub use widgets::image::{ImageButton, ImageComponent};
pub use widgets::text::{TextButton, TextComponent};
pub use widgets::text_array::{ApplyAction, TextArrayEditMenu, TextArrayStyle};
pub use widgets::wrapper::{WrapperComponent, WrapperHandle};
pub use widgets::{Action, ComponentFactory, action, return_to};

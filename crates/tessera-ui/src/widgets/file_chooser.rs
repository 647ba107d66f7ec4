//! # File chooser
//!
//! A full-window menu listing one directory. Folders navigate on click,
//! files become the selection, and "Select" hands the selection to a
//! listener before returning to the previous main component.
//!
//! ```text
//! +---------------------------------------+ 1.0
//! | [Go up]                        (blue) |
//! +---------------------------------------+ 0.86
//! | [icon] name                           |
//! | [icon] name              (scrolling)  |
//! +---------------------------------------+ 0.14
//! |      [Cancel]        [Select]  (blue) |
//! +---------------------------------------+ 0.0
//! ```

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use tessera_core::{Color, GuiResult, Rect, WindowContext, condition};
use tessera_text::TextProperties;

use super::color::ColorComponent;
use super::decorators::Conditional;
use super::dynamic_text::DynamicTextButton;
use super::icons::FileIcons;
use super::image::ImageComponent;
use super::text::TextButton;
use super::{ComponentFactory, action, menu_component};
use crate::menu::{GuiMenu, MenuConfig};

/// Decides which files are listed. Directories are always listed.
pub type FileFilter = Rc<dyn Fn(&Path) -> bool>;

/// Receives the chosen file.
pub type FileListener = Rc<dyn Fn(&Path) -> GuiResult<()>>;

const LIST_BACKGROUND: Color = Color(0, 0, 150, 255);
const ROW_HEIGHT: f32 = 0.1;

pub fn cancel_properties() -> TextProperties {
    TextProperties::simple_button(Color::from_rgb(200, 200, 200), Color::from_rgb(150, 150, 250))
}
pub fn cancel_hover_properties() -> TextProperties {
    TextProperties::simple_button(Color::WHITE, Color::from_rgb(200, 200, 255))
}
pub fn select_properties() -> TextProperties {
    TextProperties::simple_button(Color::from_rgb(150, 150, 200), Color::from_rgb(120, 120, 250))
}
pub fn select_hover_properties() -> TextProperties {
    TextProperties::simple_button(Color::from_rgb(100, 100, 255), Color::BLUE)
}

fn name_properties() -> TextProperties {
    TextProperties::text(TextProperties::default_font(), Color::BLACK, Color::WHITE)
}
fn name_hover_properties() -> TextProperties {
    TextProperties::text(
        TextProperties::default_font(),
        Color::from_rgb(50, 50, 50),
        Color::from_rgb(150, 150, 255),
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Lists `dir`: every subdirectory plus the files `filter` accepts,
/// directories first, each group sorted by name. Entries whose metadata
/// cannot be read are skipped.
pub fn read_entries(dir: &Path, filter: &dyn Fn(&Path) -> bool) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(t) => t.is_dir() || (t.is_symlink() && path.is_dir()),
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
        };
        if is_dir || filter(path.as_path()) {
            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                is_dir,
            });
        }
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

struct Shared {
    directory: RefCell<PathBuf>,
    selected: RefCell<Option<PathBuf>>,
    filter: FileFilter,
    list: GuiMenu,
}

impl Shared {
    /// Rebuilds the list for the current directory. An unreadable directory
    /// leaves the list empty.
    fn show_listing(self: &Rc<Self>, window: &WindowContext) -> GuiResult<()> {
        let dir = self.directory.borrow().clone();
        let entries = read_entries(&dir, &*self.filter).unwrap_or_else(|e| {
            log::warn!("cannot list {}: {e}", dir.display());
            Vec::new()
        });
        self.show(&entries, window)
    }

    fn show(self: &Rc<Self>, entries: &[FileEntry], window: &WindowContext) -> GuiResult<()> {
        let icons = FileIcons::procedural(window)?;
        self.list.clear_components();
        for (i, entry) in entries.iter().enumerate() {
            let top = 1.0 - i as f32 * ROW_HEIGHT;
            let bottom = 0.9 - i as f32 * ROW_HEIGHT;
            let icon = if entry.is_dir { &icons.folder } else { &icons.file };
            self.list.add_component(
                ImageComponent::new(icon.clone()),
                Rect::new(0.0, bottom, 0.1, top),
            )?;

            let weak = Rc::downgrade(self);
            let path = entry.path.clone();
            let on_click = if entry.is_dir {
                action(move |state| match weak.upgrade() {
                    Some(shared) => shared.navigate(&path, state.window()),
                    None => Ok(()),
                })
            } else {
                action(move |state| {
                    if let Some(shared) = weak.upgrade() {
                        *shared.selected.borrow_mut() = Some(path.clone());
                        state.window().mark_change();
                    }
                    Ok(())
                })
            };
            let right = (0.15 + entry.name.chars().count() as f32 * 0.02).min(1.0);
            self.list.add_component(
                DynamicTextButton::new(
                    entry.name.clone(),
                    name_properties(),
                    name_hover_properties(),
                    on_click,
                ),
                Rect::new(0.15, bottom, right, top),
            )?;
        }
        self.list.set_screen_center(0.0, 0.0);
        Ok(())
    }

    /// Moves to `dir` if it can be listed right now.
    fn navigate(self: &Rc<Self>, dir: &Path, window: &WindowContext) -> GuiResult<()> {
        match read_entries(dir, &*self.filter) {
            Ok(entries) => {
                log::debug!("file chooser entering {}", dir.display());
                *self.directory.borrow_mut() = dir.to_path_buf();
                self.show(&entries, window)?;
                window.mark_change();
            }
            Err(e) => log::warn!("cannot open {}: {e}", dir.display()),
        }
        Ok(())
    }

    fn parent(&self) -> Option<PathBuf> {
        self.directory.borrow().parent().map(Path::to_path_buf)
    }
}

#[derive(Clone)]
pub struct FileChooserMenu {
    menu: GuiMenu,
    shared: Rc<Shared>,
}

impl FileChooserMenu {
    /// Chooser starting in the process's working directory.
    pub fn new(
        return_to: ComponentFactory,
        listener: FileListener,
        filter: FileFilter,
    ) -> GuiResult<Self> {
        let dir = std::env::current_dir()?;
        Ok(Self::in_directory(dir, return_to, listener, filter))
    }

    pub fn in_directory(
        directory: impl Into<PathBuf>,
        return_to: ComponentFactory,
        listener: FileListener,
        filter: FileFilter,
    ) -> Self {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            Shared {
                directory: RefCell::new(directory.into()),
                selected: RefCell::new(None),
                filter,
                list: GuiMenu::with_populate(
                    MenuConfig::default().background(LIST_BACKGROUND),
                    move |_, state| match weak.upgrade() {
                        Some(shared) => shared.show_listing(state.window()),
                        None => Ok(()),
                    },
                ),
            }
        });

        let s = shared.clone();
        let menu = GuiMenu::with_populate(MenuConfig::default().fixed(), move |menu, _| {
            menu.add_component(s.list.clone(), Rect::new(0.0, 0.14, 1.0, 0.86))?;
            menu.add_component(ColorComponent::new(Color::BLUE), Rect::new(0.0, 0.0, 1.0, 0.14))?;

            let back = return_to.clone();
            menu.add_component(
                TextButton::new(
                    "Cancel",
                    cancel_properties(),
                    cancel_hover_properties(),
                    action(move |state| {
                        state.window().set_main_component(back());
                        Ok(())
                    }),
                ),
                Rect::new(0.2, 0.02, 0.35, 0.12),
            )?;

            let (chosen, has_selection) = (Rc::downgrade(&s), Rc::downgrade(&s));
            let back = return_to.clone();
            let select = TextButton::new(
                "Select",
                select_properties(),
                select_hover_properties(),
                action(move |state| {
                    let Some(shared) = chosen.upgrade() else {
                        return Ok(());
                    };
                    let selected = shared.selected.borrow().clone();
                    if let Some(path) = selected {
                        listener(path.as_path())?;
                        state.window().set_main_component(back());
                    }
                    Ok(())
                }),
            );
            menu.add_component(
                Conditional::new(
                    select,
                    condition(move || {
                        has_selection
                            .upgrade()
                            .is_some_and(|s| s.selected.borrow().is_some())
                    }),
                ),
                Rect::new(0.6, 0.02, 0.75, 0.12),
            )?;

            menu.add_component(ColorComponent::new(Color::BLUE), Rect::new(0.0, 0.86, 1.0, 1.0))?;

            let (up, has_parent) = (Rc::downgrade(&s), Rc::downgrade(&s));
            let go_up = TextButton::new(
                "Go up",
                cancel_properties(),
                cancel_hover_properties(),
                action(move |state| match up.upgrade() {
                    Some(shared) => match shared.parent() {
                        Some(parent) => shared.navigate(&parent, state.window()),
                        None => Ok(()),
                    },
                    None => Ok(()),
                }),
            );
            menu.add_component(
                Conditional::new(
                    go_up,
                    condition(move || has_parent.upgrade().is_some_and(|s| s.parent().is_some())),
                ),
                Rect::new(0.25, 0.88, 0.35, 0.98),
            )?;
            Ok(())
        });

        Self { menu, shared }
    }

    pub fn directory(&self) -> PathBuf {
        self.shared.directory.borrow().clone()
    }

    pub fn selected(&self) -> Option<PathBuf> {
        self.shared.selected.borrow().clone()
    }

    /// The scrolling list of entries.
    pub fn list(&self) -> &GuiMenu {
        &self.shared.list
    }

    pub fn menu(&self) -> &GuiMenu {
        &self.menu
    }
}

menu_component!(FileChooserMenu);

use std::cell::RefCell;
use std::rc::Rc;

use tessera_core::{Color, ComponentState, GuiResult, Rect, Signal, signal};
use tessera_text::TextProperties;

use super::edit::TextEditField;
use super::icons::ListIcons;
use super::image::ImageButton;
use super::text::TextButton;
use super::{ComponentFactory, action, menu_component};
use crate::menu::{GuiMenu, MenuConfig};

/// Receives the edited lines when "Apply" is clicked.
pub type ApplyAction = Rc<dyn Fn(Vec<String>) -> GuiResult<()>>;

const ROW_STEP: f32 = 0.15;

#[derive(Clone, Debug, PartialEq)]
pub struct TextArrayStyle {
    pub cancel: TextProperties,
    pub cancel_hover: TextProperties,
    pub apply: TextProperties,
    pub apply_hover: TextProperties,
    pub text: TextProperties,
    pub text_active: TextProperties,
}

impl Default for TextArrayStyle {
    fn default() -> Self {
        let font = TextProperties::default_font();
        Self {
            cancel: TextProperties::simple_button(
                Color::from_rgb(200, 150, 0),
                Color::from_rgb(100, 70, 0),
            ),
            cancel_hover: TextProperties::simple_button(
                Color::from_rgb(255, 200, 0),
                Color::from_rgb(130, 90, 0),
            ),
            apply: TextProperties::simple_button(
                Color::from_rgb(0, 200, 0),
                Color::from_rgb(0, 100, 0),
            ),
            apply_hover: TextProperties::simple_button(
                Color::from_rgb(0, 255, 0),
                Color::from_rgb(0, 130, 0),
            ),
            text: TextProperties::text(font.clone(), Color::BLACK, Color::WHITE),
            text_active: TextProperties::text(
                font,
                Color::from_rgb(0, 0, 150),
                Color::from_rgb(200, 200, 255),
            ),
        }
    }
}

/// Editor for a list of strings: one text field per line, each with a
/// button inserting an empty line in its place and a button deleting it.
/// "Cancel" discards the edits, "Apply" passes them on; both then return to
/// the previous main component.
#[derive(Clone)]
pub struct TextArrayEditMenu {
    menu: GuiMenu,
    lines: Rc<RefCell<Vec<Signal<String>>>>,
}

fn row_bounds(i: usize, min_x: f32, max_x: f32) -> Rect {
    let top = 1.0 - i as f32 * ROW_STEP;
    Rect::new(min_x, top - 0.1, max_x, top)
}

/// Lays out the whole menu for the current lines. Inside a dispatch the
/// clear and the additions are queued and applied together afterwards.
fn rebuild(
    menu: &GuiMenu,
    lines: &Rc<RefCell<Vec<Signal<String>>>>,
    style: &TextArrayStyle,
    return_to: &ComponentFactory,
    on_apply: &ApplyAction,
    icons: &ListIcons,
) -> GuiResult<()> {
    menu.clear_components();

    let back = return_to.clone();
    menu.add_component(
        TextButton::new(
            "Cancel",
            style.cancel.clone(),
            style.cancel_hover.clone(),
            action(move |state| {
                state.window().set_main_component(back());
                Ok(())
            }),
        ),
        Rect::new(0.1, 0.7, 0.25, 0.8),
    )?;

    let (back, apply, current) = (return_to.clone(), on_apply.clone(), Rc::downgrade(lines));
    menu.add_component(
        TextButton::new(
            "Apply",
            style.apply.clone(),
            style.apply_hover.clone(),
            action(move |state| {
                let values = current
                    .upgrade()
                    .map(|l| l.borrow().iter().map(Signal::get).collect())
                    .unwrap_or_default();
                apply(values)?;
                state.window().set_main_component(back());
                Ok(())
            }),
        ),
        Rect::new(0.1, 0.3, 0.25, 0.4),
    )?;

    let count = lines.borrow().len();
    for (i, line) in lines.borrow().iter().enumerate() {
        menu.add_component(
            TextEditField::with_signal(line.clone(), style.text.clone(), style.text_active.clone()),
            row_bounds(i, 0.35, 0.75),
        )?;
        menu.add_component(
            ImageButton::new(
                icons.add.clone(),
                icons.add_hover.clone(),
                edit_action(menu, lines, style, return_to, on_apply, icons, move |l| {
                    l.insert(i, signal(String::new()))
                }),
            ),
            row_bounds(i, 0.75, 0.85),
        )?;
        menu.add_component(
            ImageButton::new(
                icons.delete.clone(),
                icons.delete_hover.clone(),
                edit_action(menu, lines, style, return_to, on_apply, icons, move |l| {
                    if i < l.len() {
                        l.remove(i);
                    }
                }),
            ),
            row_bounds(i, 0.875, 0.975),
        )?;
    }
    if count == 0 {
        menu.add_component(
            ImageButton::new(
                icons.add.clone(),
                icons.add_hover.clone(),
                edit_action(menu, lines, style, return_to, on_apply, icons, |l| {
                    l.push(signal(String::new()))
                }),
            ),
            row_bounds(0, 0.75, 0.85),
        )?;
    }
    Ok(())
}

/// Action applying `edit` to the lines and laying the menu out again.
fn edit_action(
    menu: &GuiMenu,
    lines: &Rc<RefCell<Vec<Signal<String>>>>,
    style: &TextArrayStyle,
    return_to: &ComponentFactory,
    on_apply: &ApplyAction,
    icons: &ListIcons,
    edit: impl Fn(&mut Vec<Signal<String>>) + 'static,
) -> super::Action {
    let handle = menu.handle();
    let lines = Rc::downgrade(lines);
    let (style, return_to, on_apply, icons) =
        (style.clone(), return_to.clone(), on_apply.clone(), icons.clone());
    action(move |state: &ComponentState| {
        let (Some(menu), Some(lines)) = (handle.upgrade(), lines.upgrade()) else {
            return Ok(());
        };
        edit(&mut lines.borrow_mut());
        rebuild(&menu, &lines, &style, &return_to, &on_apply, &icons)?;
        state.window().mark_change();
        Ok(())
    })
}

impl TextArrayEditMenu {
    pub fn new(
        initial: impl IntoIterator<Item = impl Into<String>>,
        style: TextArrayStyle,
        return_to: ComponentFactory,
        on_apply: ApplyAction,
    ) -> Self {
        let lines: Rc<RefCell<Vec<Signal<String>>>> = Rc::new(RefCell::new(
            initial.into_iter().map(|s| signal(s.into())).collect(),
        ));
        let shared = lines.clone();
        let config = MenuConfig::default().background(Color::WHITE);
        let menu = GuiMenu::with_populate(config, move |menu, state| {
            let icons = ListIcons::procedural(state.window())?;
            rebuild(menu, &shared, &style, &return_to, &on_apply, &icons)
        });
        Self { menu, lines }
    }

    /// Current text of every line.
    pub fn values(&self) -> Vec<String> {
        self.lines.borrow().iter().map(Signal::get).collect()
    }

    pub fn menu(&self) -> &GuiMenu {
        &self.menu
    }
}

menu_component!(TextArrayEditMenu);

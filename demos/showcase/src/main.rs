use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tessera_core::*;
use tessera_platform::{WindowConfig, run_desktop_app};
use tessera_text::TextProperties;
use tessera_ui::*;

fn button(text: &str, bg: Color, on_click: Action) -> TextButton {
    let border = Color::from_rgb(bg.red() / 2, bg.green() / 2, bg.blue() / 2);
    let hover = Color::from_rgb(
        bg.red().saturating_add(40),
        bg.green().saturating_add(40),
        bg.blue().saturating_add(40),
    );
    TextButton::new(
        text,
        TextProperties::simple_button(bg, border),
        TextProperties::simple_button(hover, border),
        on_click,
    )
}

fn settings(back: ComponentFactory) -> GuiMenu {
    GuiMenu::with_populate(MenuConfig::default().fixed(), move |menu, _| {
        let label = TextProperties::label(Color::WHITE);
        let field = TextProperties::default().with_background(Color::WHITE);
        let field_active = field.clone().with_background(Color::from_rgb(200, 220, 255));

        menu.add_component(
            TextComponent::new("Show grid", label.clone()),
            Rect::new(0.1, 0.75, 0.45, 0.85),
        )?;
        let grid = signal(true);
        menu.add_component(Checkbox::with_signal(grid.clone()), Rect::new(0.5, 0.75, 0.56, 0.85))?;

        menu.add_component(TextComponent::new("Columns", label), Rect::new(0.1, 0.55, 0.45, 0.65))?;
        let columns = IntEditField::new(4, 1, 12, field, field_active);
        let value = columns.value();
        menu.add_component(columns, Rect::new(0.5, 0.55, 0.7, 0.65))?;

        let back = back.clone();
        menu.add_component(
            button(
                "Back",
                Color::from_rgb(200, 150, 0),
                action(move |state| {
                    log::info!("settings: grid={} columns={}", grid.get(), value.get());
                    state.window().set_main_component(back());
                    Ok(())
                }),
            ),
            Rect::new(0.1, 0.1, 0.3, 0.2),
        )?;
        Ok(())
    })
}

fn main_menu() -> GuiMenu {
    let config = MenuConfig::default().background(Color::from_rgb(34, 22, 40));
    GuiMenu::with_populate(config, |menu, _| {
        let home = return_to(menu.clone());
        let lines: Rc<RefCell<Vec<String>>> =
            Rc::new(RefCell::new(vec!["first".into(), "second".into()]));

        menu.add_component(
            TextComponent::new("Tessera showcase", TextProperties::label(Color::WHITE)),
            Rect::new(0.1, 0.85, 0.9, 0.97),
        )?;

        let back = home.clone();
        menu.add_component(
            button(
                "Settings",
                Color::from_rgb(0, 120, 200),
                action(move |state| {
                    state.window().set_main_component(Box::new(settings(back.clone())));
                    Ok(())
                }),
            ),
            Rect::new(0.1, 0.65, 0.45, 0.75),
        )?;

        let (back, shared) = (home.clone(), lines.clone());
        menu.add_component(
            button(
                "Edit lines",
                Color::from_rgb(0, 160, 80),
                action(move |state| {
                    let store = shared.clone();
                    let editor = TextArrayEditMenu::new(
                        shared.borrow().clone(),
                        TextArrayStyle::default(),
                        back.clone(),
                        Rc::new(move |values: Vec<String>| {
                            log::info!("applied {} lines", values.len());
                            *store.borrow_mut() = values;
                            Ok(())
                        }),
                    );
                    state.window().set_main_component(Box::new(editor));
                    Ok(())
                }),
            ),
            Rect::new(0.1, 0.5, 0.45, 0.6),
        )?;

        let back = home.clone();
        menu.add_component(
            button(
                "Open file",
                Color::from_rgb(120, 60, 160),
                action(move |state| {
                    let chooser = FileChooserMenu::new(
                        back.clone(),
                        Rc::new(|path: &Path| {
                            log::info!("selected {}", path.display());
                            Ok(())
                        }),
                        Rc::new(|_: &Path| true),
                    )?;
                    state.window().set_main_component(Box::new(chooser));
                    Ok(())
                }),
            ),
            Rect::new(0.1, 0.35, 0.45, 0.45),
        )?;

        menu.add_component(
            button(
                "Quit",
                Color::from_rgb(180, 30, 30),
                action(|state| {
                    state.window().stop_running();
                    Ok(())
                }),
            ),
            Rect::new(0.1, 0.1, 0.3, 0.2),
        )?;

        // A column taller than the window; scroll or use the arrow keys.
        for i in 0..12 {
            let shade = (i * 20) as u8;
            let y = 1.0 - 0.2 * i as f32;
            menu.add_component(
                ColorComponent::new(Color::from_rgb(shade, 100, 255 - shade)),
                Rect::new(0.6, y - 0.15, 0.9, y),
            )?;
        }
        Ok(())
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run_desktop_app(
        WindowConfig::new("Tessera showcase", 1024, 768),
        Box::new(main_menu()),
    )
}

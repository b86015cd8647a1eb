pub mod layout;
pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Map => screens::map::render_map_screen(app, f),
        AppScreen::Details => screens::details::render_details(app, f),
    }

    if app.show_help {
        screens::help::render_help_popup(f, f.area());
    }
}

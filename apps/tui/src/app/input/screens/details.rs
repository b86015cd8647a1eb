use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.back_to_map(),
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

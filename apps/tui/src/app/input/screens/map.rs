use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, Focus};
use crossterm::event::KeyCode;
use program_map_core::{Popup, PointerTarget};

/// Keyboard pan distance in viewport pixels.
const PAN_STEP_PX: f64 = 96.0;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match app.focus {
        Focus::Map => handle_navigation_input(app, key),
        Focus::Search => handle_search_input(app, key),
        Focus::Filters => handle_filter_input(app, key),
    }
}

fn handle_navigation_input(app: &mut App, key: KeyCode) {
    let list_open = matches!(app.session.popup(), Some(Popup::ClusterList { .. }));

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('/' | 's') => app.focus = Focus::Search,
        KeyCode::Char('f') => app.focus = Focus::Filters,
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Char('+' | '=') => app.zoom_in(),
        KeyCode::Char('-' | '_') => app.zoom_out(),
        KeyCode::Up if list_open => app.session.move_popup_selection(-1),
        KeyCode::Down if list_open => app.session.move_popup_selection(1),
        KeyCode::Up => app.pan_by(0.0, -PAN_STEP_PX),
        KeyCode::Down => app.pan_by(0.0, PAN_STEP_PX),
        KeyCode::Left => app.pan_by(-PAN_STEP_PX, 0.0),
        KeyCode::Right => app.pan_by(PAN_STEP_PX, 0.0),
        KeyCode::Tab => {
            app.select_next_marker();
            preview_selected_marker(app);
        }
        KeyCode::BackTab => {
            app.select_previous_marker();
            preview_selected_marker(app);
        }
        KeyCode::Enter => {
            if app.session.popup().is_some() && app.open_popup_program() {
                return;
            }
            if let Some(index) = app.selected_marker {
                app.activate_marker(index);
            }
        }
        KeyCode::Esc => app.session.close_popup(),
        _ => {}
    }
}

/// Keyboard selection of a pin behaves like hovering it.
fn preview_selected_marker(app: &mut App) {
    let target = app
        .selected_cluster()
        .filter(|cluster| cluster.is_singleton())
        .and_then(|cluster| cluster.members.first().cloned())
        .map_or(PointerTarget::None, PointerTarget::Marker);
    let now = app.now();
    app.session.pointer_moved(target, now);
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Esc => app.focus = Focus::Map,
        KeyCode::Backspace => app.edit_search(|text| {
            text.pop();
        }),
        KeyCode::Char(ch) => app.edit_search(|text| text.push(ch)),
        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyCode) {
    let len = app.chips.len();
    match key {
        KeyCode::Left | KeyCode::Up => app.chip_index = wrap_decrement(app.chip_index, len),
        KeyCode::Right | KeyCode::Down => app.chip_index = wrap_increment(app.chip_index, len),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_chip(),
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Esc | KeyCode::Char('f') => app.focus = Focus::Map,
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

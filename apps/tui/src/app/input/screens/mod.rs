use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod details;
mod help;
mod map;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::Details => details::handle_details_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Focus;
    use program_map_core::{Dataset, DatasetError, MapConfig, Popup};
    use ratatui::layout::Rect;
    use std::sync::Arc;
    use std::time::Duration;

    fn app() -> Result<App, DatasetError> {
        let mut app = App::new(Arc::new(Dataset::bundled()?), MapConfig::default());
        app.resize(Rect {
            x: 0,
            y: 0,
            width: 140,
            height: 45,
        });
        Ok(app)
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            dispatch_input(app, *key);
        }
    }

    #[test]
    fn help_swallows_keys_until_closed() -> Result<(), DatasetError> {
        let mut app = app()?;
        press(&mut app, &[KeyCode::F(1), KeyCode::Char('q')]);
        assert!(app.show_help);
        assert!(app.running);
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(!app.show_help);
        assert!(!app.running);
        Ok(())
    }

    #[test]
    fn typing_in_search_box_does_not_trigger_shortcuts() -> Result<(), DatasetError> {
        let mut app = app()?;
        press(&mut app, &[KeyCode::Char('/')]);
        assert_eq!(app.focus, Focus::Search);

        let keys: Vec<KeyCode> = "baloi q".chars().map(KeyCode::Char).collect();
        press(&mut app, &keys);
        press(&mut app, &[KeyCode::Backspace, KeyCode::Backspace]);
        assert!(app.running);
        assert_eq!(app.session.search_text(), "baloi");

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.focus, Focus::Map);
        app.update_at(app.now() + Duration::from_secs(1));
        assert_eq!(app.session.result_count(), 1);
        Ok(())
    }

    #[test]
    fn filter_focus_moves_and_toggles_chips() -> Result<(), DatasetError> {
        let mut app = app()?;
        press(&mut app, &[KeyCode::Char('f'), KeyCode::Left]);
        assert_eq!(app.focus, Focus::Filters);
        assert_eq!(app.chip_index, app.chips.len() - 1);

        press(&mut app, &[KeyCode::Right, KeyCode::Right, KeyCode::Char(' ')]);
        assert_eq!(app.chip_index, 1);
        assert_eq!(app.session.result_count(), 5);

        press(&mut app, &[KeyCode::Char('c'), KeyCode::Esc]);
        assert_eq!(app.session.result_count(), app.session.dataset().len());
        assert_eq!(app.focus, Focus::Map);
        Ok(())
    }

    #[test]
    fn arrows_walk_an_open_cluster_list() -> Result<(), DatasetError> {
        let mut app = app()?;
        let mut keys = vec![KeyCode::Char('/')];
        keys.extend("mubut".chars().map(KeyCode::Char));
        keys.push(KeyCode::Enter);
        press(&mut app, &keys);

        // Search fires after the debounce, then the fit animation settles.
        let start = app.now();
        app.update_at(start + Duration::from_secs(1));
        app.update_at(start + Duration::from_secs(4));
        assert_eq!(app.session.result_count(), 5);

        let Some(index) = app
            .session
            .clusters()
            .iter()
            .position(|cluster| cluster.len() > 1)
        else {
            panic!("co-located programs stay clustered");
        };
        app.selected_marker = Some(index);
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.session.popup(), Some(Popup::ClusterList { .. })));

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Up]);
        let Some(Popup::ClusterList { selected, .. }) = app.session.popup() else {
            panic!("list stays open while navigating");
        };
        assert_eq!(*selected, 1);

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.screen, AppScreen::Details);
        press(&mut app, &[KeyCode::Char('b')]);
        assert_eq!(app.screen, AppScreen::Map);
        Ok(())
    }
}

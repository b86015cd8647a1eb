use crate::app::state::{App, AppScreen};
use crate::ui::layout::{
    cell_to_point, list_row_at, marker_at, popup_geometry, rect_contains, PopupGeometry,
};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use program_map_core::{Popup, PointerTarget};

pub fn handle_mouse_event(app: &mut App, event: MouseEvent) {
    if app.screen != AppScreen::Map || app.show_help {
        return;
    }

    match event.kind {
        MouseEventKind::Moved => {
            let target = pointer_target(app, event.column, event.row);
            let now = app.now();
            app.session.pointer_moved(target, now);
        }
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, event.column, event.row),
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        _ => {}
    }
}

/// What the pointer rests on, as far as the hover preview cares.
fn pointer_target(app: &App, column: u16, row: u16) -> PointerTarget {
    if let Some(PopupGeometry::Preview { rect, program_id }) =
        popup_geometry(&app.session, app.map_area)
    {
        if rect_contains(rect, column, row) {
            return PointerTarget::Popup(program_id);
        }
    }

    marker_at(&app.session, app.map_area, column, row)
        .and_then(|index| app.session.clusters().get(index))
        .filter(|cluster| cluster.is_singleton())
        .and_then(|cluster| cluster.members.first().cloned())
        .map_or(PointerTarget::None, PointerTarget::Marker)
}

fn handle_click(app: &mut App, column: u16, row: u16) {
    match popup_geometry(&app.session, app.map_area) {
        Some(PopupGeometry::List { rect, offset }) if rect_contains(rect, column, row) => {
            if let Some(index) = list_row_at(rect, column, row, offset) {
                select_list_row(app, index);
                app.open_popup_program();
            }
            return;
        }
        Some(PopupGeometry::Preview { rect, .. }) if rect_contains(rect, column, row) => {
            app.open_popup_program();
            return;
        }
        _ => {}
    }

    if let Some(index) = marker_at(&app.session, app.map_area, column, row) {
        app.selected_marker = Some(index);
        let click = app
            .session
            .viewport()
            .zip(cell_to_point(app.map_area, column, row))
            .map(|(view, point)| view.unproject(point));
        match click {
            Some(click) => app.click_marker(index, click),
            None => app.activate_marker(index),
        }
    } else if rect_contains(app.map_area, column, row) {
        app.session.click_empty_map();
    }
}

fn select_list_row(app: &mut App, index: usize) {
    if let Some(Popup::ClusterList {
        programs, selected, ..
    }) = app.session.popup()
    {
        if index < programs.len() {
            let delta = index as isize - *selected as isize;
            app.session.move_popup_selection(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::{marker_cell, point_to_cell};
    use crossterm::event::KeyModifiers;
    use program_map_core::{Dataset, DatasetError, MapConfig};
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

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn singleton_cell(app: &App) -> Option<(usize, (u16, u16))> {
        let view = app.session.viewport()?;
        app.session
            .clusters()
            .iter()
            .enumerate()
            .filter(|(_, cluster)| cluster.is_singleton())
            .find_map(|(index, cluster)| {
                marker_cell(&view, app.map_area, cluster).map(|cell| (index, cell))
            })
    }

    fn year_2022(app: &mut App) {
        if let Some(chip) = app
            .chips
            .iter()
            .position(|c| *c == crate::app::state::FilterChip::Year(2022))
        {
            app.chip_index = chip;
            app.toggle_selected_chip();
        }
    }

    #[test]
    fn scrolling_zooms_the_map() -> Result<(), DatasetError> {
        let mut app = app()?;
        let before = app.session.viewport().map(|v| v.zoom);
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp, 60, 20));
        let after = app.session.viewport().map(|v| v.zoom);
        assert_eq!(after, before.map(|z| z + 1.0));
        Ok(())
    }

    #[test]
    fn hovering_a_pin_previews_it_and_leaving_closes_after_grace() -> Result<(), DatasetError> {
        let mut app = app()?;
        year_2022(&mut app);
        let Some((index, (column, row))) = singleton_cell(&app) else {
            panic!("2022 has a lone pin on screen");
        };
        let id = app.session.clusters()[index].members[0].clone();

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, column, row));
        assert_eq!(
            app.session.popup(),
            Some(&Popup::Preview {
                program_id: id.clone()
            })
        );

        let Some(popup) = popup_geometry(&app.session, app.map_area) else {
            panic!("preview is on screen");
        };
        let area = app.map_area;
        let Some(empty) = (area.y..area.y + area.height)
            .flat_map(|r| (area.x..area.x + area.width).map(move |c| (c, r)))
            .find(|&(c, r)| {
                marker_at(&app.session, area, c, r).is_none() && !rect_contains(popup.rect(), c, r)
            })
        else {
            panic!("the map has cells without markers");
        };

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, empty.0, empty.1));
        assert!(app.session.popup().is_some());
        app.update_at(app.now() + Duration::from_secs(1));
        assert!(app.session.popup().is_none());
        Ok(())
    }

    #[test]
    fn clicking_a_pin_opens_its_detail() -> Result<(), DatasetError> {
        let mut app = app()?;
        year_2022(&mut app);
        let Some((index, (column, row))) = singleton_cell(&app) else {
            panic!("2022 has a lone pin on screen");
        };
        let id = app.session.clusters()[index].members[0].clone();

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.screen, AppScreen::Details);
        assert_eq!(app.detail_id, Some(id));
        Ok(())
    }

    #[test]
    fn clicking_a_list_row_opens_that_program() -> Result<(), DatasetError> {
        let mut app = app()?;
        app.edit_search(|text| text.push_str("mubut"));
        let start = app.now();
        app.update_at(start + Duration::from_secs(1));
        app.update_at(start + Duration::from_secs(4));

        let Some(index) = app.session.clusters().iter().position(|c| c.len() > 1) else {
            panic!("co-located programs stay clustered");
        };
        app.activate_marker(index);
        let Some(Popup::ClusterList { anchor, programs, .. }) = app.session.popup().cloned() else {
            panic!("zoomed-in cluster opens a list");
        };

        let Some(view) = app.session.viewport() else {
            panic!("map is mounted");
        };
        assert!(point_to_cell(app.map_area, view.project(anchor)).is_some());
        let Some(PopupGeometry::List { rect, offset }) = popup_geometry(&app.session, app.map_area)
        else {
            panic!("list is on screen");
        };

        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), rect.x + 2, rect.y + 3),
        );
        assert_eq!(app.screen, AppScreen::Details);
        assert_eq!(app.detail_id.as_ref(), programs.get(offset + 2));
        Ok(())
    }

    #[test]
    fn cluster_list_is_anchored_at_the_clicked_cell() -> Result<(), DatasetError> {
        let mut app = app()?;
        app.edit_search(|text| text.push_str("mubut"));
        let start = app.now();
        app.update_at(start + Duration::from_secs(1));
        app.update_at(start + Duration::from_secs(4));

        let Some(view) = app.session.viewport() else {
            panic!("map is mounted");
        };
        let Some((cluster_cell, members)) = app
            .session
            .clusters()
            .iter()
            .filter(|c| c.len() > 1)
            .find_map(|c| marker_cell(&view, app.map_area, c).map(|cell| (cell, c.len())))
        else {
            panic!("co-located programs stay clustered");
        };
        // Badges read "(N)", so the cell right of the anchor is still the badge.
        assert!(members > 1);
        let clicked = (cluster_cell.0 + 1, cluster_cell.1);

        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), clicked.0, clicked.1),
        );
        let Some(Popup::ClusterList { anchor, .. }) = app.session.popup().cloned() else {
            panic!("zoomed-in cluster opens a list");
        };
        let Some(view) = app.session.viewport() else {
            panic!("map is mounted");
        };
        assert_eq!(point_to_cell(app.map_area, view.project(anchor)), Some(clicked));
        Ok(())
    }

    #[test]
    fn events_are_ignored_off_the_map_screen() -> Result<(), DatasetError> {
        let mut app = app()?;
        app.screen = AppScreen::Details;
        let before = app.session.viewport();
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp, 60, 20));
        assert_eq!(app.session.viewport(), before);
        Ok(())
    }
}

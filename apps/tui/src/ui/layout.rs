//! Screen geometry shared by rendering and mouse hit testing.

use crate::ui::widgets::tables::scroll_offset;
use program_map_core::{Cluster, LatLng, MapSession, Point, Popup, Viewport};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Nominal pixel size of one terminal cell, used to turn the map area into a
/// viewport the clustering radius makes sense for.
pub const CELL_PX_W: f64 = 8.0;
pub const CELL_PX_H: f64 = 16.0;

const FILTER_PANEL_WIDTH: u16 = 30;
const PREVIEW_WIDTH: u16 = 40;
const PREVIEW_HEIGHT: u16 = 6;
const LIST_WIDTH: u16 = 46;
const LIST_MAX_HEIGHT: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapScreenLayout {
    pub title: Rect,
    pub search: Rect,
    pub filters: Rect,
    pub map: Rect,
    pub shortcuts: Rect,
}

pub fn map_screen_layout(area: Rect) -> MapScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search box
            Constraint::Min(6),    // Filters and map
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTER_PANEL_WIDTH), Constraint::Min(10)])
        .split(rows[2]);

    MapScreenLayout {
        title: rows[0],
        search: rows[1],
        filters: body[0],
        map: body[1],
        shortcuts: rows[3],
    }
}

/// Drawable part of the bordered map block.
pub const fn map_inner(map: Rect) -> Rect {
    Rect {
        x: map.x.saturating_add(1),
        y: map.y.saturating_add(1),
        width: map.width.saturating_sub(2),
        height: map.height.saturating_sub(2),
    }
}

pub fn viewport_size_px(inner: Rect) -> (f64, f64) {
    (
        f64::from(inner.width.max(1)) * CELL_PX_W,
        f64::from(inner.height.max(1)) * CELL_PX_H,
    )
}

pub const fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Terminal cell of a viewport pixel, `None` when it falls outside `inner`.
pub fn point_to_cell(inner: Rect, point: Point) -> Option<(u16, u16)> {
    if point.x < 0.0 || point.y < 0.0 {
        return None;
    }
    let dx = (point.x / CELL_PX_W).floor();
    let dy = (point.y / CELL_PX_H).floor();
    if dx >= f64::from(inner.width) || dy >= f64::from(inner.height) {
        return None;
    }
    Some((inner.x + dx as u16, inner.y + dy as u16))
}

/// Viewport pixel at the centre of a terminal cell.
pub fn cell_to_point(inner: Rect, column: u16, row: u16) -> Option<Point> {
    if !rect_contains(inner, column, row) {
        return None;
    }
    Some(Point::new(
        (f64::from(column - inner.x) + 0.5) * CELL_PX_W,
        (f64::from(row - inner.y) + 0.5) * CELL_PX_H,
    ))
}

/// Text drawn for a marker: the category glyph for a pin, the member count
/// for a cluster.
pub fn marker_label(cluster: &Cluster, glyph: char) -> String {
    if cluster.is_singleton() {
        glyph.to_string()
    } else {
        format!("({})", cluster.len())
    }
}

pub fn marker_cell(view: &Viewport, inner: Rect, cluster: &Cluster) -> Option<(u16, u16)> {
    point_to_cell(inner, view.project(cluster.centroid))
}

/// Cells covered by a marker label centred on its anchor cell.
pub fn label_rect(inner: Rect, cell: (u16, u16), width: u16) -> Rect {
    let width = width.min(inner.width).max(1);
    let max_x = inner.x + inner.width.saturating_sub(width);
    let x = cell.0.saturating_sub(width / 2).clamp(inner.x, max_x.max(inner.x));
    Rect {
        x,
        y: cell.1,
        width,
        height: 1,
    }
}

/// Hover preview box, above the pin when there is room, otherwise below.
pub fn preview_popup_rect(inner: Rect, anchor: (u16, u16)) -> Rect {
    let width = PREVIEW_WIDTH.min(inner.width);
    let height = PREVIEW_HEIGHT.min(inner.height);
    let max_x = inner.x + inner.width - width;
    let x = anchor.0.saturating_sub(width / 2).clamp(inner.x, max_x);

    let y = if anchor.1 >= inner.y + height {
        anchor.1 - height
    } else {
        (anchor.1 + 1).min(inner.y + inner.height - height)
    };

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Cluster list box anchored just below and right of the click.
pub fn cluster_list_rect(inner: Rect, anchor: (u16, u16), rows: usize) -> Rect {
    let width = LIST_WIDTH.min(inner.width);
    let wanted = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2);
    let height = wanted.min(LIST_MAX_HEIGHT).min(inner.height);
    let max_x = inner.x + inner.width - width;
    let max_y = inner.y + inner.height - height;

    Rect {
        x: anchor.0.saturating_add(1).clamp(inner.x, max_x),
        y: anchor.1.saturating_add(1).clamp(inner.y, max_y),
        width,
        height,
    }
}

/// Index of the list row under (`column`, `row`), accounting for scrolling.
pub fn list_row_at(rect: Rect, column: u16, row: u16, offset: usize) -> Option<usize> {
    let body = map_inner(rect);
    if !rect_contains(body, column, row) {
        return None;
    }
    Some(offset + usize::from(row - body.y))
}

fn anchor_cell(view: &Viewport, inner: Rect, position: LatLng) -> Option<(u16, u16)> {
    point_to_cell(inner, view.project(position))
}

/// Screen placement of the open popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupGeometry {
    List { rect: Rect, offset: usize },
    Preview { rect: Rect, program_id: String },
}

impl PopupGeometry {
    pub const fn rect(&self) -> Rect {
        match self {
            Self::List { rect, .. } | Self::Preview { rect, .. } => *rect,
        }
    }
}

/// Where the session's popup is drawn, `None` when closed or anchored off
/// screen.
pub fn popup_geometry(session: &MapSession, inner: Rect) -> Option<PopupGeometry> {
    let view = session.viewport()?;
    match session.popup()? {
        Popup::ClusterList {
            anchor,
            programs,
            selected,
        } => {
            let cell = anchor_cell(&view, inner, *anchor)?;
            let rect = cluster_list_rect(inner, cell, programs.len());
            let visible = usize::from(rect.height.saturating_sub(2));
            Some(PopupGeometry::List {
                rect,
                offset: scroll_offset(programs.len(), visible, *selected),
            })
        }
        Popup::Preview { program_id } => {
            let record = session.dataset().get(program_id)?;
            let cell = anchor_cell(&view, inner, record.position())?;
            Some(PopupGeometry::Preview {
                rect: preview_popup_rect(inner, cell),
                program_id: program_id.clone(),
            })
        }
    }
}

/// Index of the topmost marker whose label covers the cell.
pub fn marker_at(session: &MapSession, inner: Rect, column: u16, row: u16) -> Option<usize> {
    let view = session.viewport()?;
    session
        .clusters()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, cluster)| {
            marker_cell(&view, inner, cluster).is_some_and(|cell| {
                let glyph = cluster_glyph(session, cluster);
                let width = marker_label(cluster, glyph).chars().count() as u16;
                rect_contains(label_rect(inner, cell, width), column, row)
            })
        })
        .map(|(index, _)| index)
}

/// Category glyph of a lone pin; clusters use a neutral dot.
pub fn cluster_glyph(session: &MapSession, cluster: &Cluster) -> char {
    cluster
        .members
        .first()
        .filter(|_| cluster.is_singleton())
        .and_then(|id| session.dataset().get(id))
        .map_or('o', |record| record.category.glyph())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> Rect {
        Rect {
            x: 31,
            y: 7,
            width: 80,
            height: 30,
        }
    }

    #[test]
    fn cell_and_point_round_trip() {
        let Some(point) = cell_to_point(inner(), 40, 10) else {
            panic!("cell is inside the map");
        };
        assert_eq!(point_to_cell(inner(), point), Some((40, 10)));
        assert_eq!(cell_to_point(inner(), 0, 0), None);
        assert_eq!(point_to_cell(inner(), Point::new(-1.0, 5.0)), None);
    }

    #[test]
    fn viewport_size_scales_cells() {
        assert_eq!(viewport_size_px(inner()), (640.0, 480.0));
    }

    #[test]
    fn preview_stays_inside_map() {
        let map = inner();
        for anchor in [(31, 7), (110, 36), (70, 20)] {
            let rect = preview_popup_rect(map, anchor);
            assert!(rect.x >= map.x && rect.x + rect.width <= map.x + map.width);
            assert!(rect.y >= map.y && rect.y + rect.height <= map.y + map.height);
            assert!(!rect_contains(rect, anchor.0, anchor.1));
        }
    }

    #[test]
    fn list_rows_map_to_indices() {
        let rect = cluster_list_rect(inner(), (40, 10), 9);
        assert_eq!(rect.height, 11);
        assert_eq!(list_row_at(rect, rect.x + 2, rect.y + 1, 0), Some(0));
        assert_eq!(list_row_at(rect, rect.x + 2, rect.y + 3, 4), Some(6));
        assert_eq!(list_row_at(rect, rect.x, rect.y, 0), None);
    }

    #[test]
    fn marker_hit_matches_projected_cluster() -> Result<(), program_map_core::DatasetError> {
        use program_map_core::{Dataset, MapConfig};
        use std::sync::Arc;
        use std::time::Duration;

        let map = inner();
        let (width, height) = viewport_size_px(map);
        let mut session = MapSession::new(Arc::new(Dataset::bundled()?), MapConfig::default());
        session.mount(width, height, Duration::ZERO);

        let Some(view) = session.viewport() else {
            panic!("mounted session has a viewport");
        };
        let Some((index, cell)) = session
            .clusters()
            .iter()
            .enumerate()
            .find_map(|(i, c)| marker_cell(&view, map, c).map(|cell| (i, cell)))
        else {
            panic!("at least one marker is on screen");
        };
        let hit = marker_at(&session, map, cell.0, cell.1);
        assert!(hit.is_some());
        let Some(hit) = hit else { return Ok(()) };
        let hit_cell = marker_cell(&view, map, &session.clusters()[hit]);
        assert!(hit == index || hit_cell.is_some_and(|c| c.1 == cell.1));
        Ok(())
    }

    #[test]
    fn map_layout_reserves_filter_panel() {
        let layout = map_screen_layout(Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 40,
        });
        assert_eq!(layout.filters.width, 30);
        assert_eq!(layout.map.x, 30);
        assert_eq!(layout.title.height, 3);
        assert_eq!(layout.shortcuts.y, 39);
    }
}

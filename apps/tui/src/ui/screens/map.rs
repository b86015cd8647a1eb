use crate::app::state::{FilterChip, Focus};
use crate::app::App;
use crate::ui::layout::{map_inner, map_screen_layout, popup_geometry, PopupGeometry};
use crate::ui::widgets::map::{category_color, render_coastlines, MarkerLayer};
use crate::ui::widgets::popup::{render_cluster_list, render_preview, status_color};
use crate::ui::widgets::tables::scroll_offset;
use program_map_core::{Camera, Popup, ProgramRecord};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_map_screen(app: &App, f: &mut Frame<'_>) {
    let layout = map_screen_layout(f.area());

    render_title(app, f, layout.title);
    render_search(app, f, layout.search);
    render_filter_chips(app, f, layout.filters);
    render_map(app, f, layout.map);
    render_shortcuts(app, f, layout.shortcuts);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_title(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = TextLine::from(vec![
        Span::styled(
            "Community Program Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{} of {} programs",
                app.session.result_count(),
                app.session.dataset().len()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            if app.status_message.is_empty() {
                String::new()
            } else {
                format!("  | {}", app.status_message)
            },
            Style::default().fg(Color::Gray),
        ),
    ]);

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_search(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Search;
    let mut title = " Search (/) ".to_string();
    if app.session.search_pending() {
        title = " Search (/) ... ".to_string();
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(focused));

    let text = app.session.search_text();
    let line = if text.is_empty() && !focused {
        TextLine::from(Span::styled(
            "Search program names",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let cursor = if focused { "_" } else { "" };
        TextLine::from(format!("{text}{cursor}"))
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Chip rows grouped under their dimension headers, with the line index of
/// the highlighted chip.
fn chip_lines(app: &App) -> (Vec<TextLine<'static>>, usize) {
    let filters = app.session.filters();
    let focused = app.focus == Focus::Filters;
    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut last_group = "";

    for (index, chip) in app.chips.iter().enumerate() {
        let group = match chip {
            FilterChip::Category(_) => "Category",
            FilterChip::Year(_) => "Year",
            FilterChip::Status(_) => "Status",
        };
        if group != last_group {
            if !last_group.is_empty() {
                lines.push(TextLine::from(""));
            }
            lines.push(TextLine::from(Span::styled(
                group,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            last_group = group;
        }

        let mark = if chip.is_selected(filters) { "[x]" } else { "[ ]" };
        let color = match chip {
            FilterChip::Category(category) => category_color(*category),
            FilterChip::Year(_) => Color::White,
            FilterChip::Status(status) => status_color(*status),
        };
        let mut style = Style::default().fg(color);
        if focused && index == app.chip_index {
            style = style.add_modifier(Modifier::REVERSED);
            selected_line = lines.len();
        }
        lines.push(TextLine::from(Span::styled(
            format!("{mark} {}", chip.label()),
            style,
        )));
    }

    (lines, selected_line)
}

fn render_filter_chips(app: &App, f: &mut Frame<'_>, area: Rect) {
    let active = app.session.filters().active_count();
    let title = if active == 0 {
        " Filters (f) ".to_string()
    } else {
        format!(" Filters (f) {active} active ")
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == Focus::Filters));

    let (lines, selected_line) = chip_lines(app);
    let visible = usize::from(area.height.saturating_sub(2));
    let offset = scroll_offset(lines.len(), visible, selected_line);

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0)),
        area,
    );
}

/// Map block title; shows the target zoom while the camera is moving.
fn map_title(app: &App) -> String {
    let zoom = app.session.viewport().map_or(0.0, |view| view.zoom);
    match app.session.camera().and_then(Camera::destination) {
        Some((_, target)) => format!(" Map  zoom {zoom:.1} -> {target:.0} "),
        None => format!(" Map  zoom {zoom:.1} "),
    }
}

fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(map_title(app))
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == Focus::Map));
    f.render_widget(block, area);

    let inner = map_inner(area);
    render_coastlines(&app.session, f, inner);
    f.render_widget(
        MarkerLayer {
            session: &app.session,
            selected: app.selected_marker,
        },
        inner,
    );

    if app.session.result_count() == 0 {
        let message = Paragraph::new("No programs match the current filters")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        let y = inner.y + inner.height / 2;
        f.render_widget(message, Rect::new(inner.x, y, inner.width, 1));
    }

    render_popup(app, f, inner);
}

fn render_popup(app: &App, f: &mut Frame<'_>, inner: Rect) {
    let dataset = app.session.dataset();
    match (popup_geometry(&app.session, inner), app.session.popup()) {
        (
            Some(PopupGeometry::List { rect, offset }),
            Some(Popup::ClusterList {
                programs, selected, ..
            }),
        ) => {
            let records: Vec<&ProgramRecord> =
                programs.iter().filter_map(|id| dataset.get(id)).collect();
            render_cluster_list(f, rect, &records, *selected, offset);
        }
        (Some(PopupGeometry::Preview { rect, program_id }), _) => {
            if let Some(record) = dataset.get(&program_id) {
                render_preview(f, rect, record);
            }
        }
        _ => {}
    }
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let hint = match app.focus {
        Focus::Search => "type to search | Enter/Esc: done | F1: help",
        Focus::Filters => "arrows: move | space: toggle | c: clear | Esc: back | F1: help",
        Focus::Map => {
            "/: search | f: filters | arrows: pan | +/-: zoom | Tab: marker | Enter: open | F1: help | q: quit"
        }
    };
    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use program_map_core::{Dataset, DatasetError, MapConfig};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn chip_lines_group_dimensions() -> Result<(), DatasetError> {
        let mut app = App::new(Arc::new(Dataset::bundled()?), MapConfig::default());
        app.focus = Focus::Filters;
        app.chip_index = 10;

        let (lines, selected) = chip_lines(&app);
        // Three headers, two blank separators and one line per chip.
        assert_eq!(lines.len(), app.chips.len() + 5);
        assert_eq!(lines[selected].to_string(), "[ ] 2020");
        assert_eq!(lines[0].to_string(), "Category");
        Ok(())
    }

    #[test]
    fn map_title_shows_target_zoom_while_flying() -> Result<(), DatasetError> {
        let mut app = App::new(Arc::new(Dataset::bundled()?), MapConfig::default());
        app.resize(Rect::new(0, 0, 140, 45));
        assert_eq!(map_title(&app), " Map  zoom 11.0 ");

        app.edit_search(|text| text.push_str("karimun"));
        let start = app.now();
        app.update_at(start + Duration::from_millis(400));
        assert!(map_title(&app).ends_with("-> 15 "));

        app.update_at(start + Duration::from_secs(3));
        assert_eq!(map_title(&app), " Map  zoom 15.0 ");
        Ok(())
    }
}

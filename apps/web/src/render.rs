use crate::state::{WebState, CELL_PX_H, CELL_PX_W};
use program_map_core::{resolve_detail, Category, Cluster, DetailView, Point, Popup, Viewport};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

pub struct PageLayout {
    pub header: Rect,
    pub map: Rect,
    pub footer: Rect,
}

pub fn page_layout(area: Rect) -> PageLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);
    PageLayout {
        header: rows[0],
        map: rows[1],
        footer: rows[2],
    }
}

/// Drawable cells inside the bordered map block.
pub fn map_inner(map: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(map)
}

const fn category_color(category: Category) -> Color {
    let (r, g, b) = category.rgb();
    Color::Rgb(r, g, b)
}

fn cell_of(inner: Rect, point: Point) -> Option<(u16, u16)> {
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

pub fn draw(state: &WebState, f: &mut Frame<'_>) {
    let layout = page_layout(f.area());
    render_header(state, f, layout.header);
    render_map(state, f, layout.map);

    let hint = if state.search_focus {
        "type to search | Enter/Esc: done"
    } else {
        "/: search | 1-0: category | y/Y: year | s/S: status | c: clear | arrows | +/- | Tab | Enter | Esc"
    };
    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        layout.footer,
    );

    if let Some(id) = state.detail.as_deref() {
        render_detail(state, id, f, layout.map);
    }
}

fn render_header(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let session = &state.session;
    let search = session.search_text();
    let search = if state.search_focus {
        format!("{search}_")
    } else {
        search.to_string()
    };

    let line = TextLine::from(vec![
        Span::styled(
            format!(
                "{} of {} programs",
                session.result_count(),
                session.dataset().len()
            ),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(search, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(state.message.clone(), Style::default().fg(Color::Gray)),
    ]);

    let block = Block::default()
        .title("Community Program Map")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(Text::from(line)).block(block), area);
}

fn render_map(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(view) = state.session.viewport() else {
        return;
    };
    let block = Block::default()
        .title(format!("Map  zoom {:.1}", view.zoom))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bounds = view.visible_bounds();
    f.render_widget(
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([bounds.south_west.lng, bounds.north_east.lng])
            .y_bounds([bounds.south_west.lat, bounds.north_east.lat])
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: Color::DarkGray,
                });
            }),
        inner,
    );

    for (index, cluster) in state.session.clusters().iter().enumerate() {
        let Some(cell) = cell_of(inner, view.project(cluster.centroid)) else {
            continue;
        };
        let (label, style) = marker(state, cluster);
        let style = if state.selected == Some(index) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        let width = label.chars().count() as u16;
        let max_x = inner.x + inner.width.saturating_sub(width);
        let x = cell.0.saturating_sub(width / 2).clamp(inner.x, max_x.max(inner.x));
        f.buffer_mut().set_stringn(x, cell.1, &label, usize::from(width), style);
    }

    if state.session.result_count() == 0 {
        let y = inner.y + inner.height / 2;
        f.render_widget(
            Paragraph::new("No programs match the current filters")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }

    render_popup(state, &view, f, inner);
}

fn marker(state: &WebState, cluster: &Cluster) -> (String, Style) {
    if cluster.is_singleton() {
        let record = cluster
            .members
            .first()
            .and_then(|id| state.session.dataset().get(id));
        let glyph = record.map_or('o', |r| r.category.glyph());
        let color = record.map_or(Color::White, |r| category_color(r.category));
        (
            glyph.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("({})", cluster.len()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xF0, 0xC2, 0x0C)),
        )
    }
}

fn render_popup(state: &WebState, view: &Viewport, f: &mut Frame<'_>, inner: Rect) {
    let dataset = state.session.dataset();
    let (anchor, lines, title) = match state.session.popup() {
        Some(Popup::ClusterList {
            anchor,
            programs,
            selected,
        }) => {
            let lines: Vec<TextLine<'_>> = programs
                .iter()
                .enumerate()
                .filter_map(|(i, id)| dataset.get(id).map(|record| (i, record)))
                .map(|(i, record)| {
                    let style = if i == *selected {
                        Style::default().fg(Color::Black).bg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    TextLine::from(Span::styled(format!("{} ({})", record.name, record.year), style))
                })
                .collect();
            (*anchor, lines, format!("{} programs here", programs.len()))
        }
        Some(Popup::Preview { program_id }) => {
            let Some(record) = dataset.get(program_id) else {
                return;
            };
            let lines = vec![
                TextLine::from(Span::styled(
                    record.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                TextLine::from(format!(
                    "{} | {} | {}",
                    record.category.as_str(),
                    record.year,
                    record.status.as_str()
                )),
                TextLine::from(record.location.address.clone()),
            ];
            (record.position(), lines, String::new())
        }
        None => return,
    };

    let Some(cell) = cell_of(inner, view.project(anchor)) else {
        return;
    };
    let width = 44.min(inner.width);
    let height = (lines.len() as u16 + 2).min(12).min(inner.height);
    let rect = Rect {
        x: cell.0.saturating_add(1).clamp(inner.x, inner.x + inner.width - width),
        y: cell.1.saturating_add(1).clamp(inner.y, inner.y + inner.height - height),
        width,
        height,
    };

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        rect,
    );
}

fn render_detail(state: &WebState, id: &str, f: &mut Frame<'_>, area: Rect) {
    let DetailView::Found(detail) = resolve_detail(state.session.dataset(), id) else {
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(format!("No program with id \"{id}\". Esc: back to map"))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let record = detail.record;
    let color = category_color(record.category);
    let mut lines = vec![
        TextLine::from(format!(
            "{} | {} | {}",
            record.category.as_str(),
            record.year,
            record.status.as_str()
        )),
        TextLine::from(""),
        TextLine::from(record.description.as_str()),
        TextLine::from(""),
    ];
    if let Some(hero) = detail.hero_image {
        lines.push(TextLine::from(format!("Image: {hero}")));
    }
    lines.extend(
        detail
            .gallery
            .iter()
            .map(|image| TextLine::from(format!("Gallery: {image}"))),
    );
    lines.push(TextLine::from(record.location.address.as_str()));
    lines.push(TextLine::from(detail.maps_url.clone()));
    if let Some(video) = detail.video_url {
        lines.push(TextLine::from(format!("Video: {video}")));
    }
    if let Some(link) = detail.details_url {
        lines.push(TextLine::from(format!("More: {link}")));
    }
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Esc: back to map",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(record.name.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

use crate::ui::widgets::map::category_color;
use program_map_core::{ProgramRecord, Status};
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

pub const fn status_color(status: Status) -> Color {
    let (r, g, b) = status.rgb();
    Color::Rgb(r, g, b)
}

/// Hover card for a single pin.
pub fn render_preview(f: &mut Frame<'_>, area: Rect, record: &ProgramRecord) {
    f.render_widget(ClearWidget, area);

    let color = category_color(record.category);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let lines = vec![
        TextLine::from(Span::styled(
            record.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![
            Span::styled(record.category.as_str(), Style::default().fg(color)),
            Span::raw(format!(" | {} | ", record.year)),
            Span::styled(
                record.status.as_str(),
                Style::default().fg(status_color(record.status)),
            ),
        ]),
        TextLine::from(Span::styled(
            record.location.address.clone(),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(Span::styled(
            "click or Enter for details",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Programs sharing one location, `offset` rows scrolled.
pub fn render_cluster_list(
    f: &mut Frame<'_>,
    area: Rect,
    programs: &[&ProgramRecord],
    selected: usize,
    offset: usize,
) {
    f.render_widget(ClearWidget, area);

    let block = Block::default()
        .title(format!(" {} programs here ", programs.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<TextLine<'_>> = programs
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, record)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            TextLine::from(vec![
                Span::styled(
                    format!("{} ", record.category.glyph()),
                    style.fg(category_color(record.category)),
                ),
                Span::styled(format!("{} ({})", record.name, record.year), style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

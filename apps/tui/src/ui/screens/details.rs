use crate::app::App;
use crate::ui::widgets::map::category_color;
use crate::ui::widgets::popup::status_color;
use program_map_core::{resolve_detail, DetailView, ProgramDetail};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_details(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let Some(id) = app.detail_id.as_deref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    match resolve_detail(app.session.dataset(), id) {
        DetailView::Found(detail) => render_found(f, chunks[0], &detail),
        DetailView::NotFound { requested_id } => render_not_found(f, chunks[0], &requested_id),
    }

    let hint = Paragraph::new("b/Esc: back to map | q: quit | F1: help")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

fn render_found(f: &mut Frame<'_>, area: Rect, detail: &ProgramDetail<'_>) {
    let record = detail.record;
    let color = category_color(record.category);

    let block = Block::default()
        .title(format!(" {} ", record.name))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    f.render_widget(
        Paragraph::new(Text::from(detail_lines(detail)))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

/// Body of the detail page; absent optional sections are skipped.
fn detail_lines<'a>(detail: &ProgramDetail<'a>) -> Vec<TextLine<'a>> {
    let record = detail.record;
    let mut lines = vec![
        TextLine::from(vec![
            label("Category: "),
            Span::styled(
                record.category.as_str(),
                Style::default().fg(category_color(record.category)),
            ),
            Span::raw(format!(" ({})", record.category.label())),
        ]),
        TextLine::from(vec![label("Year: "), Span::raw(record.year.to_string())]),
        TextLine::from(vec![
            label("Status: "),
            Span::styled(
                record.status.as_str(),
                Style::default().fg(status_color(record.status)),
            ),
        ]),
    ];

    if let Some(hero) = detail.hero_image {
        lines.push(TextLine::from(vec![label("Image: "), Span::raw(hero)]));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::raw(record.description.as_str())));
    lines.push(TextLine::from(""));

    if !detail.gallery.is_empty() {
        lines.push(TextLine::from(label("Gallery")));
        lines.extend(
            detail
                .gallery
                .iter()
                .map(|image| TextLine::from(format!("  - {image}"))),
        );
        lines.push(TextLine::from(""));
    }

    lines.push(TextLine::from(vec![
        label("Address: "),
        Span::raw(record.location.address.as_str()),
    ]));
    lines.push(TextLine::from(vec![
        label("Open in maps: "),
        Span::styled(detail.maps_url.clone(), Style::default().fg(Color::Cyan)),
    ]));

    if let Some(video) = detail.video_url {
        lines.push(TextLine::from(vec![
            label("Video: "),
            Span::styled(video, Style::default().fg(Color::Cyan)),
        ]));
    }
    if let Some(link) = detail.details_url {
        lines.push(TextLine::from(vec![
            label("More: "),
            Span::styled(link, Style::default().fg(Color::Cyan)),
        ]));
    }

    lines
}

fn render_not_found(f: &mut Frame<'_>, area: Rect, requested_id: &str) {
    let block = Block::default()
        .title(" Program not found ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        TextLine::from(""),
        TextLine::from(format!("No program with id \"{requested_id}\".")),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press b or Esc to return to the map.",
            Style::default().fg(Color::Yellow),
        )),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use program_map_core::{Dataset, DatasetError};

    #[test]
    fn optional_sections_follow_the_record() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        for record in dataset.records() {
            let DetailView::Found(detail) = resolve_detail(&dataset, &record.id) else {
                panic!("bundled ids resolve");
            };
            let text: Vec<String> = detail_lines(&detail)
                .iter()
                .map(ToString::to_string)
                .collect();
            let has = |prefix: &str| text.iter().any(|line| line.starts_with(prefix));

            assert!(has("Address: "));
            assert_eq!(has("Video: "), detail.video_url.is_some());
            assert_eq!(has("More: "), detail.details_url.is_some());
            assert_eq!(has("Gallery"), record.images.len() > 1);
        }
        Ok(())
    }
}

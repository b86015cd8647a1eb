use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Text::from(TextLine::from(vec![Span::styled(
        "Press F1 or Esc to close",
        Style::default().fg(Color::Gray),
    )])))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn section(title: &'static str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn shortcut(keys: &'static str, action: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(format!("{keys:<14}"), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        section("Community Program Map"),
        TextLine::from(""),
        section("Map"),
        shortcut("Arrows", "Pan the map (move in an open program list)"),
        shortcut("+ / -", "Zoom in / out (mouse wheel too)"),
        shortcut("Tab / S-Tab", "Select next / previous marker"),
        shortcut("Enter", "Open the selected marker or list entry"),
        shortcut("Esc", "Close the popup"),
        shortcut("Mouse", "Hover a pin to preview, click to open"),
        TextLine::from(""),
        section("Search & Filters"),
        shortcut("/", "Search program names"),
        shortcut("f", "Focus filter chips"),
        shortcut("Space", "Toggle the highlighted chip"),
        shortcut("c", "Clear filters and search"),
        TextLine::from(""),
        section("General"),
        shortcut("F1", "Toggle this help"),
        shortcut("b / Esc", "Back from a detail page"),
        shortcut("q", "Quit"),
    ]
}

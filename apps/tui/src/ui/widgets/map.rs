use crate::ui::layout::{cluster_glyph, label_rect, marker_cell, marker_label};
use program_map_core::{Category, Cluster, MapSession};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::Widget;
use ratatui::Frame;

pub const fn category_color(category: Category) -> Color {
    let (r, g, b) = category.rgb();
    Color::Rgb(r, g, b)
}

/// Cluster badge colour by member count, small to large.
pub const fn cluster_color(len: usize) -> Color {
    match len {
        0..=9 => Color::Rgb(0x6E, 0xCC, 0x39),
        10..=99 => Color::Rgb(0xF0, 0xC2, 0x0C),
        _ => Color::Rgb(0xF1, 0x80, 0x17),
    }
}

/// Coastlines for the current viewport, drawn under the markers.
pub fn render_coastlines(session: &MapSession, f: &mut Frame<'_>, inner: Rect) {
    let Some(view) = session.viewport() else {
        return;
    };
    let bounds = view.visible_bounds();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([bounds.south_west.lng, bounds.north_east.lng])
        .y_bounds([bounds.south_west.lat, bounds.north_east.lat])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
        });
    f.render_widget(canvas, inner);
}

/// Pins and cluster badges placed at the same cells mouse hit testing uses.
pub struct MarkerLayer<'a> {
    pub session: &'a MapSession,
    pub selected: Option<usize>,
}

impl MarkerLayer<'_> {
    fn style(&self, index: usize, cluster: &Cluster) -> Style {
        let base = if cluster.is_singleton() {
            let color = cluster
                .members
                .first()
                .and_then(|id| self.session.dataset().get(id))
                .map_or(Color::White, |record| category_color(record.category));
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(cluster_color(cluster.len()))
                .add_modifier(Modifier::BOLD)
        };

        if self.selected == Some(index) {
            base.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED)
        } else {
            base
        }
    }
}

impl Widget for MarkerLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(view) = self.session.viewport() else {
            return;
        };

        for (index, cluster) in self.session.clusters().iter().enumerate() {
            let Some(cell) = marker_cell(&view, area, cluster) else {
                continue;
            };
            let label = marker_label(cluster, cluster_glyph(self.session, cluster));
            let rect = label_rect(area, cell, label.chars().count() as u16);
            buf.set_stringn(
                rect.x,
                rect.y,
                &label,
                usize::from(rect.width),
                self.style(index, cluster),
            );
        }
    }
}

use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::ui::layout::{map_inner, map_screen_layout, viewport_size_px};
use program_map_core::{
    Category, Cluster, ClusterState, Dataset, FilterState, LatLng, MapConfig, MapSession,
    ProgramRecord, Status,
};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    Details,
}

/// Which part of the map screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Search,
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChip {
    Category(Category),
    Year(i32),
    Status(Status),
}

impl FilterChip {
    pub fn label(self) -> String {
        match self {
            Self::Category(category) => category.as_str().to_string(),
            Self::Year(year) => year.to_string(),
            Self::Status(status) => status.as_str().to_string(),
        }
    }

    pub fn is_selected(self, filters: &FilterState) -> bool {
        match self {
            Self::Category(category) => filters.selected_categories.contains(&category),
            Self::Year(year) => filters.selected_years.contains(&year),
            Self::Status(status) => filters.selected_statuses.contains(&status),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub focus: Focus,
    pub show_help: bool,
    pub session: MapSession,
    pub chips: Vec<FilterChip>,
    pub chip_index: usize,
    pub selected_marker: Option<usize>,
    pub detail_id: Option<String>,
    pub status_message: String,
    /// Drawable map cells, kept in sync with the terminal size.
    pub map_area: Rect,
    started: Instant,
}

impl App {
    pub fn new(dataset: Arc<Dataset>, config: MapConfig) -> Self {
        let chips = dataset
            .categories()
            .into_iter()
            .map(FilterChip::Category)
            .chain(dataset.years().into_iter().map(FilterChip::Year))
            .chain(dataset.statuses().into_iter().map(FilterChip::Status))
            .collect();

        Self {
            running: true,
            screen: AppScreen::Map,
            focus: Focus::Map,
            show_help: false,
            session: MapSession::new(dataset, config),
            chips,
            chip_index: 0,
            selected_marker: None,
            detail_id: None,
            status_message: String::new(),
            map_area: Rect::default(),
            started: Instant::now(),
        }
    }

    /// Monotonic time since the app started, the clock every timer runs on.
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Mounts the map on first call, then tracks terminal resizes.
    pub fn resize(&mut self, area: Rect) {
        let inner = map_inner(map_screen_layout(area).map);
        if inner == self.map_area && self.session.is_mounted() {
            return;
        }
        self.map_area = inner;
        let (width_px, height_px) = viewport_size_px(inner);

        if self.session.is_mounted() {
            self.session.resize(width_px, height_px);
        } else {
            let now = self.now();
            self.session.mount(width_px, height_px, now);
        }
        self.clamp_selection();
    }

    pub fn apply_filters(&mut self, filters: &FilterState) {
        let now = self.now();
        for category in &filters.selected_categories {
            self.session.toggle_category(*category, now);
        }
        for year in &filters.selected_years {
            self.session.toggle_year(*year, now);
        }
        for status in &filters.selected_statuses {
            self.session.toggle_status(*status, now);
        }
        if !filters.search_text.is_empty() {
            self.session.set_search_text(filters.search_text.clone(), now);
        }
        self.clamp_selection();
    }

    pub fn update(&mut self) {
        let now = self.now();
        self.update_at(now);
    }

    pub fn update_at(&mut self, now: Duration) {
        if self.session.tick(now) {
            self.clamp_selection();
        }
    }

    pub fn selected_cluster(&self) -> Option<&Cluster> {
        self.selected_marker
            .and_then(|index| self.session.clusters().get(index))
    }

    pub fn select_next_marker(&mut self) {
        let len = self.session.clusters().len();
        self.selected_marker = match self.selected_marker {
            _ if len == 0 => None,
            Some(index) => Some(wrap_increment(index, len)),
            None => Some(0),
        };
    }

    pub fn select_previous_marker(&mut self) {
        let len = self.session.clusters().len();
        self.selected_marker = match self.selected_marker {
            _ if len == 0 => None,
            Some(index) => Some(wrap_decrement(index, len)),
            None => Some(len - 1),
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.session.clusters().len();
        if self.selected_marker.is_some_and(|index| index >= len) {
            self.selected_marker = len.checked_sub(1);
        }
    }

    /// Keyboard activation of the marker at `index`, clicked at its centroid.
    pub fn activate_marker(&mut self, index: usize) {
        let Some(centroid) = self.session.clusters().get(index).map(|c| c.centroid) else {
            return;
        };
        self.click_marker(index, centroid);
    }

    /// Clicks the marker at `index` at `click`: pins open their detail page,
    /// clusters run the cluster interaction.
    pub fn click_marker(&mut self, index: usize, click: LatLng) {
        let Some(cluster) = self.session.clusters().get(index) else {
            return;
        };

        if cluster.is_singleton() {
            let id = cluster.members[0].clone();
            self.open_detail(id);
            return;
        }

        let now = self.now();
        match self.session.click_cluster(index, click, now) {
            ClusterState::ListPopup { programs, .. } => {
                self.status_message = format!("{} programs at this location", programs.len());
            }
            ClusterState::BoundsZoom(_) => {
                self.status_message = "Zooming to cluster".to_string();
            }
            ClusterState::Collapsed => {}
        }
        self.clamp_selection();
    }

    pub fn open_detail(&mut self, id: String) {
        tracing::debug!(id = %id, "opening program detail");
        self.session.close_popup();
        self.detail_id = Some(id);
        self.screen = AppScreen::Details;
    }

    pub fn back_to_map(&mut self) {
        self.detail_id = None;
        self.screen = AppScreen::Map;
    }

    /// Opens the program highlighted in the cluster list or preview.
    pub fn open_popup_program(&mut self) -> bool {
        let Some(id) = self.session.popup_program().map(|record| record.id.clone()) else {
            return false;
        };
        self.open_detail(id);
        true
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
        self.clamp_selection();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
        self.clamp_selection();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.session.pan_by(dx, dy);
        self.clamp_selection();
    }

    pub fn toggle_selected_chip(&mut self) {
        let Some(chip) = self.chips.get(self.chip_index).copied() else {
            return;
        };
        let now = self.now();
        let selected = match chip {
            FilterChip::Category(category) => self.session.toggle_category(category, now),
            FilterChip::Year(year) => self.session.toggle_year(year, now),
            FilterChip::Status(status) => self.session.toggle_status(status, now),
        };
        self.status_message = format!(
            "{} {}: {} programs",
            if selected { "Showing" } else { "Removed" },
            chip.label(),
            self.session.result_count()
        );
        self.clamp_selection();
    }

    pub fn clear_filters(&mut self) {
        let now = self.now();
        self.session.clear_filters(now);
        self.status_message = "Filters cleared".to_string();
        self.clamp_selection();
    }

    pub fn edit_search(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.session.search_text().to_string();
        edit(&mut text);
        let now = self.now();
        self.session.set_search_text(text, now);
    }

    pub fn detail_record(&self) -> Option<&ProgramRecord> {
        self.detail_id
            .as_deref()
            .and_then(|id| self.session.dataset().get(id))
    }
}

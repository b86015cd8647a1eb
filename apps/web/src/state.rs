use crate::clock::FrameClock;
use program_map_core::{
    Category, CameraCommand, ClusterState, Dataset, MapConfig, MapSession, PointerTarget, Popup,
};
use ratzilla::event::KeyCode;
use std::sync::Arc;

/// Nominal pixel size of one DOM grid cell.
pub const CELL_PX_W: f64 = 8.0;
pub const CELL_PX_H: f64 = 16.0;

/// Keyboard pan distance in viewport pixels.
const PAN_STEP_PX: f64 = 96.0;

/// Everything the page keeps between frames.
pub struct WebState {
    pub session: MapSession,
    clock: FrameClock,
    grid: (u16, u16),
    pub search_focus: bool,
    pub selected: Option<usize>,
    year_cursor: Option<usize>,
    status_cursor: Option<usize>,
    pub detail: Option<String>,
    pub message: String,
    logged_command: Option<CameraCommand>,
}

impl WebState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            session: MapSession::new(dataset, MapConfig::default()),
            clock: FrameClock::new(),
            grid: (0, 0),
            search_focus: false,
            selected: None,
            year_cursor: None,
            status_cursor: None,
            detail: None,
            message: String::new(),
            logged_command: None,
        }
    }

    /// Advances timers to `now_ms` and keeps the viewport matched to the
    /// map grid of `width` x `height` cells.
    pub fn frame(&mut self, now_ms: f64, width: u16, height: u16) {
        let now = self.clock.tick(now_ms);
        let size_px = (
            f64::from(width.max(1)) * CELL_PX_W,
            f64::from(height.max(1)) * CELL_PX_H,
        );

        if !self.session.is_mounted() {
            self.session.mount(size_px.0, size_px.1, now);
        } else if self.grid != (width, height) {
            self.session.resize(size_px.0, size_px.1);
        }
        self.grid = (width, height);

        if self.session.tick(now) {
            self.clamp_selection();
        }
        self.log_camera_command();
    }

    pub fn handle_key(&mut self, code: KeyCode, shift: bool) {
        if self.search_focus {
            self.handle_search_key(code);
        } else if self.detail.is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Backspace) {
                self.detail = None;
            }
        } else {
            self.handle_map_key(code, shift);
        }
        self.clamp_selection();
        self.log_camera_command();
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let now = self.clock.now();
        let mut text = self.session.search_text().to_string();
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.search_focus = false;
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(ch) => text.push(ch),
            _ => return,
        }
        self.session.set_search_text(text, now);
    }

    fn handle_map_key(&mut self, code: KeyCode, shift: bool) {
        let now = self.clock.now();
        let list_open = matches!(self.session.popup(), Some(Popup::ClusterList { .. }));

        match code {
            KeyCode::Char('/') => self.search_focus = true,
            KeyCode::Char(digit @ '0'..='9') => self.toggle_category_key(digit),
            KeyCode::Char('Y') => self.toggle_year_at_cursor(),
            KeyCode::Char('y') if shift => self.toggle_year_at_cursor(),
            KeyCode::Char('y') => self.move_year_cursor(),
            KeyCode::Char('S') => self.toggle_status_at_cursor(),
            KeyCode::Char('s') if shift => self.toggle_status_at_cursor(),
            KeyCode::Char('s') => self.move_status_cursor(),
            KeyCode::Char('c') => {
                self.session.clear_filters(now);
                self.year_cursor = None;
                self.status_cursor = None;
                self.message = "Filters cleared".to_string();
            }
            KeyCode::Char('+' | '=') => self.session.zoom_in(),
            KeyCode::Char('-') => self.session.zoom_out(),
            KeyCode::Up if list_open => self.session.move_popup_selection(-1),
            KeyCode::Down if list_open => self.session.move_popup_selection(1),
            KeyCode::Up => self.session.pan_by(0.0, -PAN_STEP_PX),
            KeyCode::Down => self.session.pan_by(0.0, PAN_STEP_PX),
            KeyCode::Left => self.session.pan_by(-PAN_STEP_PX, 0.0),
            KeyCode::Right => self.session.pan_by(PAN_STEP_PX, 0.0),
            KeyCode::Tab => self.step_selection(shift),
            KeyCode::Enter => self.activate(),
            KeyCode::Esc => self.session.close_popup(),
            _ => {}
        }
    }

    fn toggle_category_key(&mut self, digit: char) {
        let Some(index) = digit.to_digit(10) else {
            return;
        };
        // 1-9 map to the first nine categories, 0 to the tenth.
        let index = (index as usize + 9) % 10;
        let Some(category) = Category::from_index(index) else {
            return;
        };
        let now = self.clock.now();
        let on = self.session.toggle_category(category, now);
        self.message = format!(
            "{} {}",
            if on { "+" } else { "-" },
            category.as_str()
        );
    }

    /// Moves the year cursor to the next year in the dataset, wrapping.
    fn move_year_cursor(&mut self) {
        let years = self.session.dataset().years();
        self.year_cursor = next_cursor(self.year_cursor, years.len());
        if let Some(year) = self.year_cursor.and_then(|i| years.get(i)) {
            let on = self.session.filters().selected_years.contains(year);
            self.message = format!("Year {year} {} | Y: toggle", mark(on));
        }
    }

    /// Adds or removes the year under the cursor; several years may be on.
    fn toggle_year_at_cursor(&mut self) {
        let years = self.session.dataset().years();
        let cursor = self.year_cursor.unwrap_or(0);
        let Some(year) = years.get(cursor).copied() else {
            return;
        };
        self.year_cursor = Some(cursor);
        let on = self.session.toggle_year(year, self.clock.now());
        self.message = format!("Year {year} {}", mark(on));
    }

    fn move_status_cursor(&mut self) {
        let statuses = self.session.dataset().statuses();
        self.status_cursor = next_cursor(self.status_cursor, statuses.len());
        if let Some(status) = self.status_cursor.and_then(|i| statuses.get(i)) {
            let on = self.session.filters().selected_statuses.contains(status);
            self.message = format!("Status {} {} | S: toggle", status.as_str(), mark(on));
        }
    }

    fn toggle_status_at_cursor(&mut self) {
        let statuses = self.session.dataset().statuses();
        let cursor = self.status_cursor.unwrap_or(0);
        let Some(status) = statuses.get(cursor).copied() else {
            return;
        };
        self.status_cursor = Some(cursor);
        let on = self.session.toggle_status(status, self.clock.now());
        self.message = format!("Status {} {}", status.as_str(), mark(on));
    }

    fn step_selection(&mut self, backwards: bool) {
        let len = self.session.clusters().len();
        self.selected = match (self.selected, backwards) {
            _ if len == 0 => None,
            (None, false) => Some(0),
            (None, true) => Some(len - 1),
            (Some(i), false) => Some((i + 1) % len),
            (Some(i), true) => Some((i + len - 1) % len),
        };

        let target = self
            .selected
            .and_then(|i| self.session.clusters().get(i))
            .filter(|cluster| cluster.is_singleton())
            .and_then(|cluster| cluster.members.first().cloned())
            .map_or(PointerTarget::None, PointerTarget::Marker);
        let now = self.clock.now();
        self.session.pointer_moved(target, now);
    }

    fn activate(&mut self) {
        if let Some(record) = self.session.popup_program() {
            self.detail = Some(record.id.clone());
            self.session.close_popup();
            return;
        }

        let Some(index) = self.selected else {
            return;
        };
        let Some(cluster) = self.session.clusters().get(index) else {
            return;
        };
        if cluster.is_singleton() {
            self.detail = cluster.members.first().cloned();
            return;
        }

        let click = cluster.centroid;
        let now = self.clock.now();
        self.message = match self.session.click_cluster(index, click, now) {
            ClusterState::ListPopup { programs, .. } => {
                format!("{} programs here", programs.len())
            }
            ClusterState::BoundsZoom(_) => "Zooming to cluster".to_string(),
            ClusterState::Collapsed => String::new(),
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.session.clusters().len();
        if self.selected.is_some_and(|i| i >= len) {
            self.selected = len.checked_sub(1);
        }
    }

    fn log_camera_command(&mut self) {
        let command = self.session.last_camera_command().copied();
        if command == self.logged_command {
            return;
        }
        self.logged_command = command;
        if let Some(command) = command {
            if let Ok(json) = serde_json::to_string(&command) {
                log(&format!("camera: {json}"));
            }
        }
    }
}

const fn next_cursor(cursor: Option<usize>, len: usize) -> Option<usize> {
    match cursor {
        _ if len == 0 => None,
        Some(i) => Some((i + 1) % len),
        None => Some(0),
    }
}

const fn mark(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

#[cfg(target_arch = "wasm32")]
pub fn log(message: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(message: &str) {
    let _ = message;
}

#[cfg(test)]
mod tests {
    use super::*;
    use program_map_core::DatasetError;

    fn state() -> Result<WebState, DatasetError> {
        let mut state = WebState::new(Arc::new(Dataset::bundled()?));
        state.frame(0.0, 100, 36);
        Ok(state)
    }

    fn keys(state: &mut WebState, codes: &[KeyCode]) {
        for code in codes {
            state.handle_key(code.clone(), false);
        }
    }

    #[test]
    fn first_frame_mounts_the_map() -> Result<(), DatasetError> {
        let state = state()?;
        let Some(view) = state.session.viewport() else {
            panic!("first frame mounts");
        };
        assert!((view.width_px - 800.0).abs() < f64::EPSILON);
        assert!((view.height_px - 576.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn digits_toggle_categories() -> Result<(), DatasetError> {
        let mut state = state()?;
        keys(&mut state, &[KeyCode::Char('2')]);
        assert_eq!(state.session.result_count(), 5);
        keys(&mut state, &[KeyCode::Char('2')]);
        assert_eq!(state.session.result_count(), 42);
        Ok(())
    }

    #[test]
    fn year_cursor_toggles_several_years() -> Result<(), DatasetError> {
        let mut state = state()?;
        keys(&mut state, &[KeyCode::Char('y')]);
        assert_eq!(state.session.result_count(), 42);
        assert_eq!(state.message, "Year 2020 [ ] | Y: toggle");

        keys(&mut state, &[KeyCode::Char('Y')]);
        assert_eq!(state.session.result_count(), 10);
        keys(&mut state, &[KeyCode::Char('y')]);
        state.handle_key(KeyCode::Char('y'), true);
        assert_eq!(state.session.result_count(), 10 + 7);
        assert_eq!(state.session.filters().selected_years.len(), 2);

        keys(&mut state, &[KeyCode::Char('Y')]);
        assert_eq!(state.session.result_count(), 10);
        assert_eq!(state.message, "Year 2021 [ ]");
        Ok(())
    }

    #[test]
    fn year_cursor_wraps_around() -> Result<(), DatasetError> {
        let mut state = state()?;
        let years = state.session.dataset().years().len();
        for _ in 0..=years {
            keys(&mut state, &[KeyCode::Char('y')]);
        }
        assert_eq!(state.message, "Year 2020 [ ] | Y: toggle");
        Ok(())
    }

    #[test]
    fn status_cursor_toggles_statuses() -> Result<(), DatasetError> {
        let mut state = state()?;
        let statuses = state.session.dataset().statuses();
        keys(&mut state, &[KeyCode::Char('S'), KeyCode::Char('s'), KeyCode::Char('S')]);
        assert_eq!(state.session.filters().selected_statuses.len(), 2);
        let expected = state
            .session
            .dataset()
            .records()
            .iter()
            .filter(|r| r.status == statuses[0] || r.status == statuses[1])
            .count();
        assert_eq!(state.session.result_count(), expected);

        keys(&mut state, &[KeyCode::Char('c')]);
        assert!(state.session.filters().selected_statuses.is_empty());
        Ok(())
    }

    #[test]
    fn search_focus_captures_typing() -> Result<(), DatasetError> {
        let mut state = state()?;
        let mut codes = vec![KeyCode::Char('/')];
        codes.extend("baloi".chars().map(KeyCode::Char));
        codes.push(KeyCode::Esc);
        keys(&mut state, &codes);

        assert!(!state.search_focus);
        assert_eq!(state.session.search_text(), "baloi");
        state.frame(1_000.0, 100, 36);
        assert_eq!(state.session.result_count(), 1);
        Ok(())
    }

    #[test]
    fn enter_on_a_lone_pin_opens_its_detail() -> Result<(), DatasetError> {
        let mut state = state()?;
        keys(
            &mut state,
            &[
                KeyCode::Char('y'),
                KeyCode::Char('y'),
                KeyCode::Char('y'),
                KeyCode::Char('Y'),
            ],
        );
        assert_eq!(state.session.filters().selected_years.len(), 1);
        let Some(index) = state
            .session
            .clusters()
            .iter()
            .position(|cluster| cluster.is_singleton())
        else {
            panic!("2022 has a lone pin");
        };
        state.selected = Some(index);
        keys(&mut state, &[KeyCode::Enter]);
        assert!(state.detail.is_some());

        keys(&mut state, &[KeyCode::Esc]);
        assert!(state.detail.is_none());
        Ok(())
    }
}

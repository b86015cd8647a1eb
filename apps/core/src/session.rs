//! Map session: owns filter state, timers, camera and popups, and runs the
//! `filter -> cluster -> viewport` pipeline whenever one of them changes.

use crate::cluster::{cluster_records, resolve_cluster_click, Cluster, ClusterState};
use crate::config::MapConfig;
use crate::dataset::{Dataset, ProgramRecord};
use crate::domain::{Category, Status};
use crate::filter::{filter_programs, FilterState};
use crate::geo::LatLng;
use crate::schedule::{Debounce, HoverPopup};
use crate::viewport::{plan_camera_for_results, Camera, CameraCommand, MapSurface, Viewport};
use std::sync::Arc;
use std::time::Duration;

/// The single popup the map may show.
#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    ClusterList {
        anchor: LatLng,
        programs: Vec<String>,
        selected: usize,
    },
    Preview {
        program_id: String,
    },
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PointerTarget {
    #[default]
    None,
    Marker(String),
    /// The hover preview popup of the given program.
    Popup(String),
}

/// Output of one pass of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a> {
    pub results: Vec<&'a ProgramRecord>,
    pub clusters: Vec<Cluster>,
    pub camera: Option<CameraCommand>,
}

/// Filters `records`, clusters the results for `viewport` (when mounted) and
/// plans the camera reaction.
pub fn derive_view<'a>(
    records: &'a [ProgramRecord],
    filters: &FilterState,
    viewport: Option<&Viewport>,
    config: &MapConfig,
) -> DerivedView<'a> {
    let results = filter_programs(records, filters);
    let clusters = viewport
        .map(|view| cluster_records(&results, view, config.cluster_radius_px))
        .unwrap_or_default();
    let camera = plan_camera_for_results(&results, config);
    DerivedView {
        results,
        clusters,
        camera,
    }
}

#[derive(Debug)]
pub struct MapSession {
    dataset: Arc<Dataset>,
    config: MapConfig,
    filters: FilterState,
    search_input: String,
    search: Debounce<String>,
    results: Vec<usize>,
    clusters: Vec<Cluster>,
    camera: Option<Camera>,
    last_command: Option<CameraCommand>,
    popup: Option<Popup>,
    hover: HoverPopup,
    pointer: PointerTarget,
}

impl MapSession {
    pub fn new(dataset: Arc<Dataset>, config: MapConfig) -> Self {
        let results = (0..dataset.len()).collect();
        Self {
            dataset,
            search: Debounce::new(config.search_debounce),
            hover: HoverPopup::new(config.hover_close_grace),
            config,
            filters: FilterState::new(),
            search_input: String::new(),
            results,
            clusters: Vec::new(),
            camera: None,
            last_command: None,
            popup: None,
            pointer: PointerTarget::None,
        }
    }

    pub fn mount(&mut self, width_px: f64, height_px: f64, now: Duration) {
        self.camera = Some(Camera::from_config(&self.config, width_px, height_px));
        self.filters = FilterState::new();
        self.search_input.clear();
        self.search.cancel();
        tracing::info!(width_px, height_px, "map mounted");
        self.recompute(now);
    }

    pub fn unmount(&mut self) {
        self.search.cancel();
        self.camera = None;
        self.filters = FilterState::new();
        self.search_input.clear();
        self.clusters.clear();
        self.close_popup();
        tracing::info!("map unmounted");
    }

    pub const fn is_mounted(&self) -> bool {
        self.camera.is_some()
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        if let Some(camera) = self.camera.as_mut() {
            camera.resize(width_px, height_px);
        }
        self.recluster();
    }

    /// Updates the visible search text now; filtering follows after the
    /// debounce interval.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Duration) {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.search.schedule(text, now);
    }

    pub fn search_text(&self) -> &str {
        &self.search_input
    }

    pub fn applied_search(&self) -> &str {
        &self.filters.search_text
    }

    pub const fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn toggle_category(&mut self, category: Category, now: Duration) -> bool {
        let selected = self.filters.toggle_category(category);
        self.recompute(now);
        selected
    }

    pub fn toggle_year(&mut self, year: i32, now: Duration) -> bool {
        let selected = self.filters.toggle_year(year);
        self.recompute(now);
        selected
    }

    pub fn toggle_status(&mut self, status: Status, now: Duration) -> bool {
        let selected = self.filters.toggle_status(status);
        self.recompute(now);
        selected
    }

    /// Resets chips and search text.
    pub fn clear_filters(&mut self, now: Duration) {
        self.search.cancel();
        self.search_input.clear();
        self.filters = FilterState::new();
        self.recompute(now);
    }

    /// Fires due timers and advances the camera. Returns whether anything
    /// visible changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut changed = false;

        if let Some(text) = self.search.poll(now) {
            self.filters.search_text = text;
            self.recompute(now);
            changed = true;
        }

        if self.camera.as_mut().is_some_and(|camera| camera.step(now)) {
            self.recluster();
            changed = true;
        }

        if self.hover.poll(now) {
            if matches!(self.popup, Some(Popup::Preview { .. })) {
                self.popup = None;
            }
            changed = true;
        }

        changed
    }

    /// Runs the cluster interaction for the aggregate marker at `index`.
    pub fn click_cluster(&mut self, index: usize, click: LatLng, now: Duration) -> ClusterState {
        let (Some(cluster), Some(view)) = (self.clusters.get(index), self.viewport()) else {
            return ClusterState::Collapsed;
        };

        let state = resolve_cluster_click(
            &cluster.marker_refs(),
            click,
            view.zoom,
            &self.dataset,
            &self.config,
        );

        match &state {
            ClusterState::ListPopup { anchor, programs } => {
                self.hover.close();
                self.popup = Some(Popup::ClusterList {
                    anchor: *anchor,
                    programs: programs.clone(),
                    selected: 0,
                });
            }
            ClusterState::BoundsZoom(command) => {
                self.close_popup();
                self.last_command = Some(*command);
                if let Some(camera) = self.camera.as_mut() {
                    camera.execute(command, now);
                }
            }
            ClusterState::Collapsed => {}
        }
        state
    }

    pub fn click_empty_map(&mut self) {
        self.close_popup();
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
        self.hover.close();
    }

    pub fn move_popup_selection(&mut self, delta: isize) {
        if let Some(Popup::ClusterList {
            programs, selected, ..
        }) = self.popup.as_mut()
        {
            let len = programs.len();
            if len > 0 {
                *selected = (*selected as isize + delta).rem_euclid(len as isize) as usize;
            }
        }
    }

    /// Program highlighted in the cluster list, or the previewed program.
    pub fn popup_program(&self) -> Option<&ProgramRecord> {
        let id = match self.popup.as_ref()? {
            Popup::ClusterList {
                programs, selected, ..
            } => programs.get(*selected)?,
            Popup::Preview { program_id } => program_id,
        };
        self.dataset.get(id)
    }

    /// Synthesises enter/leave events for the hover preview.
    pub fn pointer_moved(&mut self, target: PointerTarget, now: Duration) {
        if target == self.pointer {
            return;
        }

        match &target {
            PointerTarget::Marker(id) => {
                let already_previewed = matches!(
                    &self.popup,
                    Some(Popup::Preview { program_id }) if program_id == id
                );
                if !already_previewed {
                    self.popup = Some(Popup::Preview {
                        program_id: id.clone(),
                    });
                }
                self.hover.pointer_enter_marker();
            }
            PointerTarget::Popup(id) => {
                if matches!(&self.popup, Some(Popup::Preview { program_id }) if program_id == id) {
                    self.hover.pointer_enter_popup();
                }
            }
            PointerTarget::None => self.hover.pointer_leave(now),
        }

        self.pointer = target;
    }

    pub fn zoom_in(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            camera.zoom_in();
        }
        self.recluster();
    }

    pub fn zoom_out(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            camera.zoom_out();
        }
        self.recluster();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if let Some(camera) = self.camera.as_mut() {
            camera.pan_by(dx, dy);
        }
        self.recluster();
    }

    pub fn results(&self) -> Vec<&ProgramRecord> {
        let records = self.dataset.records();
        self.results.iter().map(|&index| &records[index]).collect()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.camera.as_ref().map(MapSurface::view)
    }

    pub const fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub const fn last_camera_command(&self) -> Option<&CameraCommand> {
        self.last_command.as_ref()
    }

    pub const fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn recompute(&mut self, now: Duration) {
        let view = self.viewport();
        let derived = derive_view(self.dataset.records(), &self.filters, view.as_ref(), &self.config);

        self.results = derived
            .results
            .iter()
            .filter_map(|record| self.dataset.index_of(&record.id))
            .collect();
        self.clusters = derived.clusters;
        self.last_command = derived.camera;

        tracing::debug!(
            results = self.results.len(),
            clusters = self.clusters.len(),
            command = derived.camera.as_ref().map(CameraCommand::label),
            "view derived"
        );

        if let (Some(command), Some(camera)) = (derived.camera, self.camera.as_mut()) {
            camera.execute(&command, now);
        }

        match &self.popup {
            Some(Popup::ClusterList { .. }) => self.close_popup(),
            Some(Popup::Preview { program_id }) => {
                let visible = self
                    .dataset
                    .index_of(program_id)
                    .is_some_and(|index| self.results.contains(&index));
                if !visible {
                    self.close_popup();
                }
            }
            None => {}
        }
    }

    fn recluster(&mut self) {
        let Some(view) = self.viewport() else {
            self.clusters.clear();
            return;
        };
        let records = self.dataset.records();
        let results: Vec<&ProgramRecord> = self.results.iter().map(|&index| &records[index]).collect();
        self.clusters = cluster_records(&results, &view, self.config.cluster_radius_px);
    }
}

//! Pixel-distance clustering of pins and the cluster click state machine.

use crate::config::MapConfig;
use crate::dataset::{Dataset, ProgramRecord};
use crate::geo::{Bounds, LatLng, Point};
use crate::viewport::{CameraCommand, Viewport};
use std::collections::{HashMap, HashSet};

/// Fraction of the viewport added on each side before clustering, so pins just
/// off screen are already grouped when the map is panned.
const VISIBLE_PADDING: f64 = 0.5;

/// A pin as the map surface knows it. Markers built outside the dataset may
/// carry only a position.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRef {
    pub program_id: Option<String>,
    pub position: LatLng,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Record ids in dataset order.
    pub members: Vec<String>,
    pub positions: Vec<LatLng>,
    pub centroid: LatLng,
    pub bounds: Bounds,
    /// Viewport pixel position of the seed pin.
    pub anchor: Point,
}

impl Cluster {
    fn seed(record: &ProgramRecord, anchor: Point) -> Self {
        let position = record.position();
        Self {
            members: vec![record.id.clone()],
            positions: vec![position],
            centroid: position,
            bounds: Bounds::from_point(position),
            anchor,
        }
    }

    fn push(&mut self, record: &ProgramRecord) {
        let position = record.position();
        let n = self.members.len() as f64;
        self.centroid = LatLng::new(
            self.centroid.lat.mul_add(n, position.lat) / (n + 1.0),
            self.centroid.lng.mul_add(n, position.lng) / (n + 1.0),
        );
        self.bounds.extend(position);
        self.members.push(record.id.clone());
        self.positions.push(position);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn marker_refs(&self) -> Vec<MarkerRef> {
        self.members
            .iter()
            .zip(&self.positions)
            .map(|(id, position)| MarkerRef {
                program_id: Some(id.clone()),
                position: *position,
            })
            .collect()
    }
}

/// Greedy clustering in input order: each record joins the nearest existing
/// cluster whose seed lies within `radius_px`, otherwise it seeds a new one.
pub fn cluster_records(records: &[&ProgramRecord], viewport: &Viewport, radius_px: f64) -> Vec<Cluster> {
    let area = viewport.visible_bounds().pad(VISIBLE_PADDING);
    let cell = radius_px.max(1.0);
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

    for record in records {
        let position = record.position();
        if !area.contains(position) {
            continue;
        }

        let point = viewport.project(position);
        let key = grid_key(point, cell);
        let nearest = neighbours(key)
            .filter_map(|k| grid.get(&k))
            .flatten()
            .map(|&index| (index, clusters[index].anchor.distance_to(point)))
            .filter(|(_, distance)| *distance <= radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        if let Some((index, _)) = nearest {
            clusters[index].push(record);
        } else {
            grid.entry(key).or_default().push(clusters.len());
            clusters.push(Cluster::seed(record, point));
        }
    }

    tracing::trace!(
        clusters = clusters.len(),
        zoom = viewport.zoom,
        "clusters recomputed"
    );
    clusters
}

fn grid_key(point: Point, cell: f64) -> (i64, i64) {
    ((point.x / cell).floor() as i64, (point.y / cell).floor() as i64)
}

fn neighbours((x, y): (i64, i64)) -> impl Iterator<Item = (i64, i64)> {
    (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| (x + dx, y + dy)))
}

/// Interaction state of one aggregate marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClusterState {
    #[default]
    Collapsed,
    ListPopup {
        anchor: LatLng,
        programs: Vec<String>,
    },
    BoundsZoom(CameraCommand),
}

/// Resolves a click on a cluster made of `markers`.
///
/// At or above the list zoom the members are listed, resolved by id and then
/// by coordinate proximity. Below it, or when nothing resolves, the camera fits
/// the cluster bounds.
pub fn resolve_cluster_click(
    markers: &[MarkerRef],
    click: LatLng,
    zoom: f64,
    dataset: &Dataset,
    config: &MapConfig,
) -> ClusterState {
    let Some(bounds) = Bounds::from_points(markers.iter().map(|m| m.position)) else {
        return ClusterState::Collapsed;
    };

    let zoom_to_bounds = ClusterState::BoundsZoom(CameraCommand::FitBounds {
        bounds,
        padding_px: config.fit_padding_px,
        max_zoom: config.cluster_fit_max_zoom,
    });

    if zoom < config.list_popup_min_zoom {
        tracing::debug!(zoom, members = markers.len(), "cluster click zooms to bounds");
        return zoom_to_bounds;
    }

    let mut programs = resolve_by_id(markers, dataset);
    if programs.is_empty() {
        programs = resolve_by_position(markers, dataset, config.coordinate_match_tolerance_m);
        tracing::debug!(matched = programs.len(), "cluster ids unresolved, matched by position");
    }

    if programs.is_empty() {
        return zoom_to_bounds;
    }

    ClusterState::ListPopup {
        anchor: click,
        programs,
    }
}

/// Member ids in dataset order.
fn resolve_by_id(markers: &[MarkerRef], dataset: &Dataset) -> Vec<String> {
    let wanted: HashSet<&str> = markers.iter().filter_map(|m| m.program_id.as_deref()).collect();
    dataset
        .records()
        .iter()
        .filter(|record| wanted.contains(record.id.as_str()))
        .map(|record| record.id.clone())
        .collect()
}

fn resolve_by_position(markers: &[MarkerRef], dataset: &Dataset, tolerance_m: f64) -> Vec<String> {
    dataset
        .records()
        .iter()
        .filter(|record| {
            markers
                .iter()
                .any(|m| m.position.distance_to(record.position()) <= tolerance_m)
        })
        .map(|record| record.id.clone())
        .collect()
}

//! Map browser for community-outreach programs: dataset, filters, clustering
//! and camera control shared by the terminal and browser frontends.

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod detail;
pub mod domain;
pub mod error;
pub mod filter;
pub mod geo;
pub mod schedule;
pub mod session;
pub mod viewport;

pub use cluster::{Cluster, ClusterState, MarkerRef};
pub use config::{AnimationSpec, CameraLimits, MapConfig};
pub use dataset::{Dataset, Location, ProgramRecord};
pub use detail::{resolve_detail, DetailView, ProgramDetail};
pub use domain::{Category, Status};
pub use error::{ConfigError, DatasetError};
pub use filter::{filter_programs, FilterState};
pub use geo::{Bounds, LatLng, Point};
pub use session::{derive_view, MapSession, PointerTarget, Popup};
pub use viewport::{plan_camera_for_results, Camera, CameraCommand, MapSurface, Viewport};

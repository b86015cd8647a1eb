//! Viewport geometry, camera commands and the animated camera.

use crate::config::{AnimationSpec, CameraLimits, MapConfig};
use crate::dataset::ProgramRecord;
use crate::geo::{self, Bounds, LatLng, Point};
use serde::Serialize;
use std::time::Duration;

/// The visible region of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub const fn new(center: LatLng, zoom: f64, width_px: f64, height_px: f64) -> Self {
        Self {
            center,
            zoom,
            width_px,
            height_px,
        }
    }

    pub const fn size(&self) -> (f64, f64) {
        (self.width_px, self.height_px)
    }

    fn top_left(&self) -> Point {
        let center = geo::project(self.center, self.zoom);
        Point::new(center.x - self.width_px / 2.0, center.y - self.height_px / 2.0)
    }

    /// Pixel position relative to the top-left corner of the viewport.
    pub fn project(&self, point: LatLng) -> Point {
        let world = geo::project(point, self.zoom);
        let origin = self.top_left();
        Point::new(world.x - origin.x, world.y - origin.y)
    }

    pub fn unproject(&self, point: Point) -> LatLng {
        let origin = self.top_left();
        geo::unproject(Point::new(point.x + origin.x, point.y + origin.y), self.zoom)
    }

    pub fn visible_bounds(&self) -> Bounds {
        let north_west = self.unproject(Point::new(0.0, 0.0));
        let south_east = self.unproject(Point::new(self.width_px, self.height_px));
        Bounds::new(
            LatLng::new(south_east.lat, north_west.lng),
            LatLng::new(north_west.lat, south_east.lng),
        )
    }
}

/// A camera transition, executed with the shared animation spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraCommand {
    FlyTo {
        center: LatLng,
        zoom: f64,
    },
    FitBounds {
        bounds: Bounds,
        padding_px: f64,
        max_zoom: f64,
    },
}

impl CameraCommand {
    /// Final center and zoom for a drawing area of `size` pixels.
    pub fn target(&self, size: (f64, f64)) -> (LatLng, f64) {
        match self {
            Self::FlyTo { center, zoom } => (*center, *zoom),
            Self::FitBounds {
                bounds,
                padding_px,
                max_zoom,
            } => (
                geo::projected_center(bounds),
                geo::bounds_zoom(bounds, size, *padding_px, *max_zoom),
            ),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::FlyTo { .. } => "fly-to",
            Self::FitBounds { .. } => "fit-bounds",
        }
    }
}

/// Camera reaction to a freshly filtered result set.
pub fn plan_camera_for_results(results: &[&ProgramRecord], config: &MapConfig) -> Option<CameraCommand> {
    match results {
        [] => None,
        [only] => Some(CameraCommand::FlyTo {
            center: only.position(),
            zoom: config.fly_to_zoom,
        }),
        many if many.len() <= config.auto_fit_max_results => {
            Bounds::from_points(many.iter().map(|r| r.position())).map(|bounds| {
                CameraCommand::FitBounds {
                    bounds,
                    padding_px: config.fit_padding_px,
                    max_zoom: config.fit_max_zoom,
                }
            })
        }
        _ => None,
    }
}

/// The map camera as seen by sibling controls.
pub trait MapSurface {
    fn view(&self) -> Viewport;

    fn fly_to(&mut self, center: LatLng, zoom: f64, now: Duration);

    fn fit_bounds(&mut self, bounds: &Bounds, padding_px: f64, max_zoom: f64, now: Duration);

    fn zoom_in(&mut self);

    fn zoom_out(&mut self);

    fn pan_by(&mut self, dx: f64, dy: f64);

    fn execute(&mut self, command: &CameraCommand, now: Duration) {
        tracing::debug!(command = command.label(), "camera command");
        match command {
            CameraCommand::FlyTo { center, zoom } => self.fly_to(*center, *zoom, now),
            CameraCommand::FitBounds {
                bounds,
                padding_px,
                max_zoom,
            } => self.fit_bounds(bounds, *padding_px, *max_zoom, now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from_center: Point,
    from_zoom: f64,
    to_center: Point,
    to_zoom: f64,
    started: Duration,
}

/// In-memory camera with eased transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view: Viewport,
    limits: CameraLimits,
    spec: AnimationSpec,
    animation: Option<Animation>,
}

impl Camera {
    pub fn new(view: Viewport, limits: CameraLimits, spec: AnimationSpec) -> Self {
        let mut camera = Self {
            view,
            limits,
            spec,
            animation: None,
        };
        camera.view = camera.constrain(view.center, view.zoom);
        camera
    }

    pub fn from_config(config: &MapConfig, width_px: f64, height_px: f64) -> Self {
        Self::new(
            Viewport::new(config.initial_center, config.initial_zoom, width_px, height_px),
            config.limits,
            config.animation,
        )
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the running animation, if any.
    pub fn destination(&self) -> Option<(LatLng, f64)> {
        self.animation
            .map(|a| (geo::unproject(a.to_center, 0.0), a.to_zoom))
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.view.width_px = width_px;
        self.view.height_px = height_px;
    }

    /// Advances the running animation. Returns whether the view changed.
    pub fn step(&mut self, now: Duration) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let elapsed = now.saturating_sub(animation.started);
        let total = self.spec.duration.as_secs_f64();
        let t = if total <= 0.0 {
            1.0
        } else {
            (elapsed.as_secs_f64() / total).min(1.0)
        };

        let before = self.view;
        if t >= 1.0 {
            self.view.center = geo::unproject(animation.to_center, 0.0);
            self.view.zoom = animation.to_zoom;
            self.animation = None;
        } else {
            let k = ease_out(t, self.spec.ease_linearity);
            let center = Point::new(
                lerp(animation.from_center.x, animation.to_center.x, k),
                lerp(animation.from_center.y, animation.to_center.y, k),
            );
            self.view.center = geo::unproject(center, 0.0);
            self.view.zoom = lerp(animation.from_zoom, animation.to_zoom, k);
        }
        self.view != before
    }

    fn animate_to(&mut self, center: LatLng, zoom: f64, now: Duration) {
        // Settle on the interpolated position so the new animation starts there.
        self.step(now);
        let target = self.constrain(center, zoom);
        self.animation = Some(Animation {
            from_center: geo::project(self.view.center, 0.0),
            from_zoom: self.view.zoom,
            to_center: geo::project(target.center, 0.0),
            to_zoom: target.zoom,
            started: now,
        });
    }

    fn constrain(&self, center: LatLng, zoom: f64) -> Viewport {
        let zoom = zoom.clamp(self.limits.min_zoom, self.limits.max_zoom);
        let center = self.limits.max_bounds.map_or(center, |bounds| {
            LatLng::new(
                center.lat.clamp(bounds.south_west.lat, bounds.north_east.lat),
                center.lng.clamp(bounds.south_west.lng, bounds.north_east.lng),
            )
        });
        Viewport::new(center, zoom, self.view.width_px, self.view.height_px)
    }

    fn jump(&mut self, center: LatLng, zoom: f64) {
        self.animation = None;
        self.view = self.constrain(center, zoom);
    }
}

impl MapSurface for Camera {
    fn view(&self) -> Viewport {
        self.view
    }

    fn fly_to(&mut self, center: LatLng, zoom: f64, now: Duration) {
        self.animate_to(center, zoom, now);
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding_px: f64, max_zoom: f64, now: Duration) {
        let (center, zoom) = CameraCommand::FitBounds {
            bounds: *bounds,
            padding_px,
            max_zoom,
        }
        .target(self.view.size());
        self.animate_to(center, zoom, now);
    }

    fn zoom_in(&mut self) {
        self.jump(self.view.center, self.view.zoom.round() + 1.0);
    }

    fn zoom_out(&mut self) {
        self.jump(self.view.center, self.view.zoom.round() - 1.0);
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = self
            .view
            .unproject(Point::new(self.view.width_px / 2.0 + dx, self.view.height_px / 2.0 + dy));
        self.jump(center, self.view.zoom);
    }
}

fn lerp(from: f64, to: f64, k: f64) -> f64 {
    (to - from).mul_add(k, from)
}

/// Ease-out curve parameterised by linearity in (0, 1].
pub fn ease_out(t: f64, ease_linearity: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let linearity = ease_linearity.clamp(f64::EPSILON, 1.0);
    1.0 - (1.0 - t).powf(1.0 / linearity)
}

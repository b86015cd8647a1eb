//! Spherical Web Mercator helpers shared by clustering and the camera.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in metres.
    pub fn distance_to(self, other: Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Pixel coordinate in projected space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub const fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest bounds containing every point, `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::from_point(first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub const fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub const fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Grows each side by `ratio` of the current span.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_pad = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_pad = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Self::new(
            LatLng::new(self.south_west.lat - lat_pad, self.south_west.lng - lng_pad),
            LatLng::new(self.north_east.lat + lat_pad, self.north_east.lng + lng_pad),
        )
    }
}

/// World size in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

pub fn project(point: LatLng, zoom: f64) -> Point {
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let scale = world_size(zoom);
    let x = (point.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    Point::new(x, y)
}

pub fn unproject(point: Point, zoom: f64) -> LatLng {
    let scale = world_size(zoom);
    let lng = point.x / scale * 360.0 - 180.0;
    let n = PI - 2.0 * PI * point.y / scale;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Largest integer zoom at which `bounds` fits inside `size` minus `padding` on
/// every side, capped at `max_zoom`. A single point always gets `max_zoom`.
pub fn bounds_zoom(bounds: &Bounds, size: (f64, f64), padding: f64, max_zoom: f64) -> f64 {
    let available_x = (size.0 - 2.0 * padding).max(1.0);
    let available_y = (size.1 - 2.0 * padding).max(1.0);

    let north_west = project(bounds.north_west(), 0.0);
    let south_east = project(bounds.south_east(), 0.0);
    let span_x = (south_east.x - north_west.x).abs();
    let span_y = (south_east.y - north_west.y).abs();

    let scale_x = if span_x > f64::EPSILON {
        available_x / span_x
    } else {
        f64::INFINITY
    };
    let scale_y = if span_y > f64::EPSILON {
        available_y / span_y
    } else {
        f64::INFINITY
    };
    let scale = scale_x.min(scale_y);

    if scale.is_infinite() {
        return max_zoom;
    }

    scale.log2().floor().min(max_zoom)
}

/// Center of `bounds` in projected space, which differs from the arithmetic
/// mean of the latitudes away from the equator.
pub fn projected_center(bounds: &Bounds) -> LatLng {
    let north_west = project(bounds.north_west(), 0.0);
    let south_east = project(bounds.south_east(), 0.0);
    unproject(
        Point::new(
            (north_west.x + south_east.x) / 2.0,
            (north_west.y + south_east.y) / 2.0,
        ),
        0.0,
    )
}

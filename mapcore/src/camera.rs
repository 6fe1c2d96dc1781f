#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::f64::consts::PI;

use crate::consts::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE_PX};
use crate::geometry::{Bounds, LngLat};

/// Latitude limit of the Web Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A point in screen space (CSS pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Camera state for one map view.
///
/// `center` is in lng/lat, `zoom` is a Web Mercator zoom level (tile size
/// 256 px), `width` / `height` are the view size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom: clamp_zoom(zoom), width: 0.0, height: 0.0 }
    }

    /// Update the view size in CSS pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Center on `center` at `zoom` (clamped).
    pub fn set_view(&mut self, center: LngLat, zoom: f64) {
        self.center = center;
        self.zoom = clamp_zoom(zoom);
    }

    /// Center on `bounds` at the largest whole zoom that fits them inside the
    /// view minus `padding_px` on every side.
    ///
    /// Returns `false` and leaves the viewport untouched when the bounds are
    /// invalid or degenerate.
    pub fn fit_bounds(&mut self, bounds: Bounds, padding_px: f64) -> bool {
        if !bounds.is_valid() || bounds.is_degenerate() {
            return false;
        }
        let (x0, y0) = mercator(LngLat::new(bounds.min.lng, bounds.max.lat));
        let (x1, y1) = mercator(LngLat::new(bounds.max.lng, bounds.min.lat));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        let avail_w = (self.width - 2.0 * padding_px).max(1.0);
        let avail_h = (self.height - 2.0 * padding_px).max(1.0);
        let zoom_for = |extent: f64, avail: f64| {
            if extent > 0.0 { (avail / (extent * TILE_SIZE_PX)).log2() } else { f64::INFINITY }
        };
        let zoom = zoom_for(dx, avail_w).min(zoom_for(dy, avail_h)).floor();
        if !zoom.is_finite() {
            return false;
        }

        self.center = unmercator((x0 + x1) * 0.5, (y0 + y1) * 0.5);
        self.zoom = clamp_zoom(zoom);
        true
    }

    /// Convert a geographic position to screen coordinates.
    #[must_use]
    pub fn project(&self, p: LngLat) -> Point {
        let ws = world_size(self.zoom);
        let (mx, my) = mercator(p);
        let (cx, cy) = mercator(self.center);
        Point { x: (mx - cx) * ws + self.width * 0.5, y: (my - cy) * ws + self.height * 0.5 }
    }

    /// Convert a screen point back to a geographic position.
    #[must_use]
    pub fn unproject(&self, pt: Point) -> LngLat {
        let ws = world_size(self.zoom);
        let (cx, cy) = mercator(self.center);
        unmercator(cx + (pt.x - self.width * 0.5) / ws, cy + (pt.y - self.height * 0.5) / ws)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE_PX * zoom.exp2()
}

/// Normalized Web Mercator coordinates in `[0, 1]`, y growing southward.
fn mercator(p: LngLat) -> (f64, f64) {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) * 0.5;
    (x, y)
}

fn unmercator(x: f64, y: f64) -> LngLat {
    let lng = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    LngLat::new(lng, lat)
}

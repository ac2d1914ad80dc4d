use std::f64::consts::PI;

use crate::LonLat;

/// Length of the equator on the WGS84 ellipsoid.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.685_578_49;

const TILE_SIZE_PX: f64 = 256.0;

/// A point in screen space, in pixels at a fixed zoom. y grows downwards,
/// matching drawing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPt {
    pub x: f64,
    pub y: f64,
}

impl ScreenPt {
    pub fn new(x: f64, y: f64) -> ScreenPt {
        ScreenPt { x, y }
    }
}

/// Web Mercator pinned to one zoom level. Rebuilt by the host whenever the
/// zoom changes; everything derived from it (perpendiculars, pixel offsets) is
/// recomputed per update cycle, never cached across zooms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    zoom: f64,
}

impl Projection {
    pub fn new(zoom: f64) -> Projection {
        Projection { zoom }
    }

    /// World size in pixels at this zoom.
    fn world_px(self) -> f64 {
        TILE_SIZE_PX * 2f64.powf(self.zoom)
    }

    pub fn project(self, pt: LonLat) -> ScreenPt {
        let size = self.world_px();
        let lat_rad = pt.latitude.to_radians();
        let x = (pt.longitude + 180.0) / 360.0 * size;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * size;
        ScreenPt::new(x, y)
    }

    pub fn unproject(self, pt: ScreenPt) -> LonLat {
        let size = self.world_px();
        let lon = pt.x / size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pt.y / size);
        LonLat::new(lon, n.sinh().atan().to_degrees())
    }

    /// Ground resolution at a latitude, accounting for Mercator stretch. This
    /// is what keeps meter-sized offsets zoom-invariant on screen.
    pub fn meters_per_pixel(self, latitude_deg: f64) -> f64 {
        latitude_deg.to_radians().cos() * EARTH_CIRCUMFERENCE_M / self.world_px()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let projection = Projection::new(16.0);
        let pt = LonLat::new(8.5622, 50.0379);
        let back = projection.unproject(projection.project(pt));
        assert!((back.longitude - pt.longitude).abs() < 1e-9);
        assert!((back.latitude - pt.latitude).abs() < 1e-9);
    }

    #[test]
    fn meters_per_pixel_shrinks_with_zoom() {
        let coarse = Projection::new(10.0).meters_per_pixel(50.0);
        let fine = Projection::new(16.0).meters_per_pixel(50.0);
        assert!((coarse / fine - 64.0).abs() < 1e-9);
        // Equator resolution at zoom 0 is the circumference over one tile.
        let z0 = Projection::new(0.0).meters_per_pixel(0.0);
        assert!((z0 - EARTH_CIRCUMFERENCE_M / 256.0).abs() < 1e-6);
    }
}

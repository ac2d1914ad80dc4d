use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EARTH_RADIUS_M;

/// A geographic coordinate in degrees. Longitude is x, latitude is y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// Haversine distance in meters. Spherical approximation; taxiway-scale
    /// distances don't need an ellipsoidal model.
    pub fn gps_dist_meters(self, other: LonLat) -> f64 {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// The average of a set of points. Callers use this for icon anchors, so
    /// an empty slice is a caller bug.
    pub fn center(pts: &[LonLat]) -> LonLat {
        assert!(!pts.is_empty());
        let mut lon = 0.0;
        let mut lat = 0.0;
        for pt in pts {
            lon += pt.longitude;
            lat += pt.latitude;
        }
        let len = pts.len() as f64;
        LonLat::new(lon / len, lat / len)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // Two points ~111km apart along a meridian (1 degree of latitude).
        let a = LonLat::new(8.5, 50.0);
        let b = LonLat::new(8.5, 51.0);
        let dist = a.gps_dist_meters(b);
        assert!((dist - 111_000.0).abs() < 1_000.0, "got {}", dist);
        // Symmetric.
        assert_eq!(dist, b.gps_dist_meters(a));
        // Zero for identical points.
        assert_eq!(a.gps_dist_meters(a), 0.0);
    }

    #[test]
    fn center_of_two() {
        let c = LonLat::center(&[LonLat::new(0.0, 0.0), LonLat::new(2.0, 4.0)]);
        assert_eq!(c, LonLat::new(1.0, 2.0));
    }
}

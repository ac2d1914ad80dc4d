use crate::LonLat;

/// Cumulative-distance table over a stitched polyline, with point and tangent
/// queries by distance along it.
///
/// Rebuilt from scratch for every stitched path in every update cycle; the
/// path can change between cycles, so nothing here is cached across them.
/// Queries are pure and never panic for out-of-range distances.
pub struct ArcLengthIndex {
    pts: Vec<LonLat>,
    cumulative: Vec<f64>,
}

impl ArcLengthIndex {
    pub fn new(pts: Vec<LonLat>) -> ArcLengthIndex {
        assert!(!pts.is_empty());
        let mut cumulative = Vec::with_capacity(pts.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for pair in pts.windows(2) {
            total += pair[0].gps_dist_meters(pair[1]);
            cumulative.push(total);
        }
        ArcLengthIndex { pts, cumulative }
    }

    pub fn total_length(&self) -> f64 {
        *self.cumulative.last().unwrap()
    }

    /// Distance from the start to the given point index. Monotonic
    /// non-decreasing; index 0 is 0.
    pub fn cumulative(&self, idx: usize) -> f64 {
        self.cumulative[idx]
    }

    pub fn pts(&self) -> &[LonLat] {
        &self.pts
    }

    /// The point at a distance along the path, linearly interpolated between
    /// the bracketing table entries. Clamps below 0 to the first point and
    /// beyond the total length to the last.
    pub fn pt_at_dist(&self, dist: f64) -> LonLat {
        match self.bracket(dist) {
            Bracket::Before => self.pts[0],
            Bracket::After => *self.pts.last().unwrap(),
            Bracket::Within(lo, hi) => {
                let span = self.cumulative[hi] - self.cumulative[lo];
                if span <= f64::EPSILON {
                    return self.pts[hi];
                }
                let pct = (dist - self.cumulative[lo]) / span;
                let a = self.pts[lo];
                let b = self.pts[hi];
                LonLat::new(
                    a.longitude + pct * (b.longitude - a.longitude),
                    a.latitude + pct * (b.latitude - a.latitude),
                )
            }
        }
    }

    /// Unit direction of the bracketing pair, in (lon, lat) delta space.
    /// Degenerate zero-length brackets yield a zero vector.
    pub fn tangent_at_dist(&self, dist: f64) -> (f64, f64) {
        let (lo, hi) = match self.bracket(dist) {
            Bracket::Before => (0, 1.min(self.pts.len() - 1)),
            Bracket::After => (self.pts.len().saturating_sub(2), self.pts.len() - 1),
            Bracket::Within(lo, hi) => (lo, hi),
        };
        let dx = self.pts[hi].longitude - self.pts[lo].longitude;
        let dy = self.pts[hi].latitude - self.pts[lo].latitude;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f64::EPSILON {
            return (0.0, 0.0);
        }
        (dx / len, dy / len)
    }

    fn bracket(&self, dist: f64) -> Bracket {
        if dist <= 0.0 || self.pts.len() == 1 {
            return Bracket::Before;
        }
        if dist >= self.total_length() {
            return Bracket::After;
        }
        // First entry >= dist; dist is strictly inside (0, total), so idx is
        // a valid upper bracket.
        let idx = self.cumulative.partition_point(|&d| d < dist);
        Bracket::Within(idx - 1, idx)
    }
}

enum Bracket {
    Before,
    After,
    Within(usize, usize),
}

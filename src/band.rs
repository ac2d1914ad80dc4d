use serde::{Deserialize, Serialize};

use crate::{ArcLengthIndex, LonLat, Projection, ScreenPt};

/// Display multiplier applied to the backend's separation magnitude.
pub const WIDTH_SCALE: f64 = 0.5;
/// Arc-length sampling step along a merged function's domain, in meters.
pub const SAMPLE_STEP_M: f64 = 1.0;
/// Lookahead/lookbehind distance for the tangent probe. Sampling the tangent
/// across a short span instead of at the instantaneous point keeps the
/// perpendicular stable at sample boundaries.
const TANGENT_PROBE_M: f64 = 0.5;

/// One piece of a backend-computed separation function: the line
/// `a*x + b*y + c = 0`, valid for arc length `x` in `[x1, x2]` along the
/// stitched path, where `y` is a lateral separation magnitude in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeparationFn {
    pub x1: f64,
    pub x2: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl SeparationFn {
    /// Lateral width at arc length `d`, in meters. `b == 0` means the line
    /// equation has no `y` solution; fall back to the raw residual so the
    /// band stays finite and visually stable.
    fn width_at(&self, d: f64) -> f64 {
        if self.b != 0.0 {
            (-(self.a * d + self.c) / self.b).abs() * WIDTH_SCALE
        } else {
            (self.a * d + self.c).abs()
        }
    }
}

/// Samples the separation functions along the stitched path and builds a
/// closed polygon symmetric around the path's centerline.
///
/// Offsets are applied in screen space so the band stays visually centered on
/// the physical road at any zoom and latitude; the boundary points are then
/// unprojected back to geographic coordinates for the rendering surface.
/// Returns `None` when nothing valid could be sampled, and the caller must
/// then skip layer creation entirely.
pub fn build_band_polygon(
    fns: &[SeparationFn],
    index: &ArcLengthIndex,
    projection: Projection,
) -> Option<Vec<LonLat>> {
    let total = index.total_length();
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut last_perp: Option<(f64, f64)> = None;

    for func in fns {
        let x1 = func.x1.max(0.0);
        let x2 = func.x2.min(total);
        if x2 < x1 {
            // Clamping emptied the domain.
            continue;
        }
        let mut d = x1;
        loop {
            sample(
                func, d, total, index, projection, &mut last_perp, &mut left, &mut right,
            );
            if d >= x2 {
                break;
            }
            d = (d + SAMPLE_STEP_M).min(x2);
        }
    }

    if left.is_empty() {
        return None;
    }
    let mut polygon = left;
    right.reverse();
    polygon.extend(right);
    polygon.push(polygon[0]);
    Some(polygon)
}

#[allow(clippy::too_many_arguments)]
fn sample(
    func: &SeparationFn,
    d: f64,
    total: f64,
    index: &ArcLengthIndex,
    projection: Projection,
    last_perp: &mut Option<(f64, f64)>,
    left: &mut Vec<LonLat>,
    right: &mut Vec<LonLat>,
) {
    let center = index.pt_at_dist(d);
    let ahead = projection.project(index.pt_at_dist((d + TANGENT_PROBE_M).min(total)));
    let behind = projection.project(index.pt_at_dist((d - TANGENT_PROBE_M).max(0.0)));

    let dx = ahead.x - behind.x;
    let dy = ahead.y - behind.y;
    let len = (dx * dx + dy * dy).sqrt();
    let perp = if len > f64::EPSILON {
        // Right-hand perpendicular in screen space (y grows down).
        Some((dy / len, -dx / len))
    } else {
        // Degenerate probe pair: reuse the last valid perpendicular instead
        // of collapsing the band to a point.
        *last_perp
    };
    let Some((px, py)) = perp else {
        // No valid direction seen yet for this path.
        return;
    };
    *last_perp = Some((px, py));

    let half_width_px = (func.width_at(d) / 2.0) / projection.meters_per_pixel(center.latitude);
    let c = projection.project(center);
    left.push(projection.unproject(ScreenPt::new(
        c.x + px * half_width_px,
        c.y + py * half_width_px,
    )));
    right.push(projection.unproject(ScreenPt::new(
        c.x - px * half_width_px,
        c.y - py * half_width_px,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_index() -> ArcLengthIndex {
        // Roughly 71m running east at Frankfurt's latitude.
        ArcLengthIndex::new(vec![LonLat::new(8.550, 50.030), LonLat::new(8.551, 50.030)])
    }

    #[test]
    fn constant_separation_is_symmetric_in_pixel_space() {
        let index = straight_index();
        let projection = Projection::new(16.0);
        // y = 10 across the whole domain.
        let fns = [SeparationFn {
            x1: 0.0,
            x2: index.total_length(),
            a: 0.0,
            b: 1.0,
            c: -10.0,
        }];
        let polygon = build_band_polygon(&fns, &index, projection).unwrap();
        // Closed ring.
        assert_eq!(polygon[0], *polygon.last().unwrap());

        let n = (polygon.len() - 1) / 2;
        for i in 0..n {
            let left = projection.project(polygon[i]);
            // Right boundary is stored reversed.
            let right = projection.project(polygon[2 * n - 1 - i]);
            let d = i as f64 * SAMPLE_STEP_M;
            let center = projection.project(index.pt_at_dist(d.min(index.total_length())));
            let dist_left = ((left.x - center.x).powi(2) + (left.y - center.y).powi(2)).sqrt();
            let dist_right = ((right.x - center.x).powi(2) + (right.y - center.y).powi(2)).sqrt();
            assert!(
                (dist_left - dist_right).abs() < 1e-6,
                "asymmetric at sample {}: {} vs {}",
                i,
                dist_left,
                dist_right
            );
            // Half of 10m, scaled by the display constant.
            let expected_px =
                (10.0 * WIDTH_SCALE / 2.0) / projection.meters_per_pixel(50.030);
            assert!((dist_left - expected_px).abs() < 1e-6);
        }
    }

    #[test]
    fn vertical_line_fallback_stays_finite() {
        let index = straight_index();
        let fns = [SeparationFn {
            x1: 0.0,
            x2: 5.0,
            a: 1.0,
            b: 0.0,
            c: 2.0,
        }];
        let polygon = build_band_polygon(&fns, &index, Projection::new(16.0)).unwrap();
        for pt in &polygon {
            assert!(pt.longitude.is_finite() && pt.latitude.is_finite());
        }
    }

    #[test]
    fn empty_clamped_domain_produces_no_polygon() {
        let index = straight_index();
        let total = index.total_length();
        // Entirely beyond the end of the path.
        let fns = [SeparationFn {
            x1: total + 10.0,
            x2: total + 20.0,
            a: 0.0,
            b: 1.0,
            c: -10.0,
        }];
        assert!(build_band_polygon(&fns, &index, Projection::new(16.0)).is_none());
        assert!(build_band_polygon(&[], &index, Projection::new(16.0)).is_none());
    }

    #[test]
    fn degenerate_path_never_panics() {
        let pt = LonLat::new(8.55, 50.03);
        let index = ArcLengthIndex::new(vec![pt, pt]);
        let fns = [SeparationFn {
            x1: 0.0,
            x2: 0.0,
            a: 0.0,
            b: 1.0,
            c: -10.0,
        }];
        // Zero-length tangent everywhere and no prior perpendicular to fall
        // back on: no samples, no polygon, no crash.
        assert!(build_band_polygon(&fns, &index, Projection::new(16.0)).is_none());
    }
}

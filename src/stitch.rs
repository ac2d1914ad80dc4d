use crate::{LonLat, RoadSegment};

/// Orders and orients a chain of segments into one continuous polyline.
///
/// The network gives no topology guarantees, so orientation is inferred by
/// nearest-endpoint distance: the anchor segment is flipped to flow toward
/// segment 1, and each later segment is flipped to start near the chain's
/// current tail. The first point of every segment after the first is dropped
/// under the shared-endpoint assumption. If two segments don't actually
/// touch, the result contains a silent straight jump; that's an accepted
/// approximation, not an error. Branching topologies make the inference
/// approximate by construction.
pub fn stitch(segments: &[&RoadSegment]) -> Vec<LonLat> {
    if segments.is_empty() {
        return Vec::new();
    }
    if segments.len() == 1 {
        return segments[0].pts.clone();
    }

    let mut result = segments[0].pts.clone();
    // Flip the anchor if its start is the end nearer to the next segment.
    let next = &segments[1].pts;
    let from_start = nearest_endpoint_dist(result[0], next);
    let from_end = nearest_endpoint_dist(*result.last().unwrap(), next);
    if from_start < from_end {
        result.reverse();
    }

    for segment in &segments[1..] {
        let mut pts = segment.pts.clone();
        let tail = *result.last().unwrap();
        if tail.gps_dist_meters(*pts.last().unwrap()) < tail.gps_dist_meters(pts[0]) {
            pts.reverse();
        }
        result.extend(pts.into_iter().skip(1));
    }
    result
}

fn nearest_endpoint_dist(pt: LonLat, pts: &[LonLat]) -> f64 {
    pt.gps_dist_meters(pts[0])
        .min(pt.gps_dist_meters(*pts.last().unwrap()))
}

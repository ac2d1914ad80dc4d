use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::SeparationFn;

/// A window in seconds on the shared simulation timeline. Zero-length windows
/// represent an instant. Well-formed windows have `end >= start`, but the
/// backend encodes traversal direction in the sign of the delta, so raw
/// values are kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> TimeWindow {
        TimeWindow { start, end }
    }

    pub fn delta(self) -> f64 {
        self.end - self.start
    }
}

/// One flight's claimed use of a segment or node during a time window.
/// Ephemeral; replaced wholesale on every update cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightOccupation {
    pub flight_id: String,
    pub resource_id: String,
    pub window: TimeWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Same,
    Opposite,
}

/// A backend-computed cluster of occupations sharing a physical resource,
/// plus the separation geometry along the group's segment chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapGroup {
    #[serde(default)]
    pub conflict_key: Option<String>,
    /// Segment ids in chain order, for segment groups. Node groups leave this
    /// empty.
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Contiguous, non-overlapping in `x` within one group; the domain gets
    /// clamped to the stitched length before use.
    #[serde(default)]
    pub merged_functions: Vec<SeparationFn>,
    #[serde(default)]
    pub occupations: Vec<FlightOccupation>,
    /// Backend promise that nothing about this group changed since the last
    /// snapshot. Absent means recompute.
    #[serde(default)]
    pub is_unchanged: Option<bool>,
}

impl OverlapGroup {
    /// Stable reconciliation key: the backend's id when present, otherwise a
    /// deterministic composite of the flights and path involved.
    pub fn key(&self) -> String {
        if let Some(key) = &self.conflict_key {
            return key.clone();
        }
        let mut flights: Vec<&str> = self
            .occupations
            .iter()
            .map(|occupation| occupation.flight_id.as_str())
            .collect();
        flights.sort_unstable();
        flights.dedup();
        format!("{}@{}", flights.join("+"), self.path.join("-"))
    }

    /// Fingerprint of everything that affects drawn geometry. Bookkeeping
    /// only: redraw decisions trust `is_unchanged`, not this.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.path.hash(&mut hasher);
        self.direction.map(|d| d as u8).hash(&mut hasher);
        for func in &self.merged_functions {
            for v in [func.x1, func.x2, func.a, func.b, func.c] {
                v.to_bits().hash(&mut hasher);
            }
        }
        for occupation in &self.occupations {
            occupation.flight_id.hash(&mut hasher);
            occupation.resource_id.hash(&mut hasher);
            occupation.window.start.to_bits().hash(&mut hasher);
            occupation.window.end.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupation(flight: &str, start: f64, end: f64) -> FlightOccupation {
        FlightOccupation {
            flight_id: flight.to_string(),
            resource_id: "7".to_string(),
            window: TimeWindow::new(start, end),
        }
    }

    #[test]
    fn key_prefers_backend_id() {
        let mut group = OverlapGroup {
            conflict_key: Some("c42".to_string()),
            path: vec!["1".to_string(), "2".to_string()],
            direction: None,
            merged_functions: Vec::new(),
            occupations: vec![occupation("DLH4", 0.0, 10.0), occupation("AFR9", 5.0, 15.0)],
            is_unchanged: None,
        };
        assert_eq!(group.key(), "c42");

        group.conflict_key = None;
        // Composite is deterministic: flight ids sorted, path in order.
        assert_eq!(group.key(), "AFR9+DLH4@1-2");
    }

    #[test]
    fn content_hash_tracks_geometry_inputs() {
        let mut group = OverlapGroup {
            conflict_key: None,
            path: vec!["1".to_string()],
            direction: Some(Direction::Same),
            merged_functions: vec![SeparationFn {
                x1: 0.0,
                x2: 10.0,
                a: 0.0,
                b: 1.0,
                c: -5.0,
            }],
            occupations: vec![occupation("DLH4", 0.0, 10.0)],
            is_unchanged: None,
        };
        let before = group.content_hash();
        assert_eq!(before, group.content_hash());

        group.merged_functions[0].c = -6.0;
        assert_ne!(before, group.content_hash());
    }

    #[test]
    fn deserializes_backend_shape() {
        let raw = r#"{
            "conflict_key": "c1",
            "path": ["1", "2"],
            "direction": "opposite",
            "merged_functions": [{"x1": 0.0, "x2": 40.0, "a": 0.0, "b": 1.0, "c": -8.0}],
            "occupations": [
                {"flight_id": "DLH4", "resource_id": "1", "window": {"start": 10.0, "end": 20.0}}
            ],
            "is_unchanged": false
        }"#;
        let group: OverlapGroup = serde_json::from_str(raw).unwrap();
        assert_eq!(group.direction, Some(Direction::Opposite));
        assert_eq!(group.is_unchanged, Some(false));
        // Missing optional fields default.
        let sparse: OverlapGroup = serde_json::from_str("{}").unwrap();
        assert_eq!(sparse.is_unchanged, None);
        assert!(sparse.path.is_empty());
    }
}

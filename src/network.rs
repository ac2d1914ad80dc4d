use std::collections::BTreeMap;

use anyhow::{bail, Result};
use geojson::{GeoJson, Value};
use log::{info, warn};

use crate::LonLat;

/// One taxiway centerline from the static network file. Loaded once, never
/// mutated at runtime. Identity is the normalized id.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub id: String,
    pub name: Option<String>,
    pub pts: Vec<LonLat>,
}

/// Immutable segment lookup for the whole surface network.
pub struct NetworkGraph {
    segments: BTreeMap<String, RoadSegment>,
}

impl NetworkGraph {
    /// Parses a GeoJSON FeatureCollection of LineStrings. Features without a
    /// usable id or with fewer than 2 coordinates are skipped with a warning;
    /// only a malformed file as a whole is an error.
    pub fn from_geojson(raw: &str) -> Result<NetworkGraph> {
        let collection = match raw.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc,
            _ => bail!("network file isn't a FeatureCollection"),
        };

        let mut segments = BTreeMap::new();
        for feature in collection.features {
            let id = match feature.property("id").and_then(normalize_id_value) {
                Some(id) => id,
                None => {
                    warn!("skipping network feature without a usable id");
                    continue;
                }
            };
            let pts = match &feature.geometry {
                Some(geometry) => match &geometry.value {
                    Value::LineString(line) => line
                        .iter()
                        .map(|coord| LonLat::new(coord[0], coord[1]))
                        .collect::<Vec<_>>(),
                    _ => {
                        warn!("skipping network feature {}: not a LineString", id);
                        continue;
                    }
                },
                None => {
                    warn!("skipping network feature {}: no geometry", id);
                    continue;
                }
            };
            if pts.len() < 2 {
                warn!("skipping network feature {}: fewer than 2 points", id);
                continue;
            }
            let name = feature
                .property("name")
                .and_then(|value| value.as_str())
                .map(|name| name.to_string());
            segments.insert(id.clone(), RoadSegment { id, name, pts });
        }
        info!("loaded {} road segments", segments.len());
        Ok(NetworkGraph { segments })
    }

    /// Builds directly from segments; used by tests and fixed-dataset imports
    /// that already did their own coordinate conversion.
    pub fn from_segments(list: Vec<RoadSegment>) -> NetworkGraph {
        NetworkGraph {
            segments: list
                .into_iter()
                .map(|mut segment| {
                    segment.id = normalize_id(&segment.id);
                    (segment.id.clone(), segment)
                })
                .collect(),
        }
    }

    pub fn segment(&self, id: &str) -> Option<&RoadSegment> {
        self.segments.get(&normalize_id(id))
    }

    /// Resolves a path's ids in order, also reporting the ids that didn't
    /// resolve. Callers skip the group's polygon when anything is unresolved,
    /// but can still highlight the segments that did resolve.
    pub fn resolve(&self, ids: &[String]) -> (Vec<&RoadSegment>, Vec<String>) {
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for id in ids {
            match self.segment(id) {
                Some(segment) => resolved.push(segment),
                None => unresolved.push(id.clone()),
            }
        }
        (resolved, unresolved)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// The source data is inconsistent about ids: the same segment shows up as
/// `7`, `"7"`, or `7.0` depending on the exporter. Everything goes through
/// integer form before use as a key.
fn normalize_id(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => (x.trunc() as i64).to_string(),
        _ => raw.trim().to_string(),
    }
}

fn normalize_id_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|x| (x.trunc() as i64).to_string()),
        serde_json::Value::String(s) => Some(normalize_id(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_normalization() {
        assert_eq!(normalize_id("7"), "7");
        assert_eq!(normalize_id("7.0"), "7");
        assert_eq!(normalize_id(" 7 "), "7");
        assert_eq!(normalize_id("T3-north"), "T3-north");
    }

    #[test]
    fn load_and_lookup() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "id": 7.0, "name": "Taxiway N" },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[8.55, 50.03], [8.56, 50.03]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "id": "8" },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[8.56, 50.03]]
                    }
                }
            ]
        }"#;
        let graph = NetworkGraph::from_geojson(raw).unwrap();
        // Feature 8 only had one point, so just one segment survives.
        assert_eq!(graph.len(), 1);
        let segment = graph.segment("7.0").unwrap();
        assert_eq!(segment.id, "7");
        assert_eq!(segment.name.as_deref(), Some("Taxiway N"));
        assert!(graph.segment("8").is_none());
    }

    #[test]
    fn resolve_reports_missing_ids() {
        let graph = NetworkGraph::from_segments(vec![RoadSegment {
            id: "1".to_string(),
            name: None,
            pts: vec![LonLat::new(0.0, 0.0), LonLat::new(0.001, 0.0)],
        }]);
        let (resolved, unresolved) =
            graph.resolve(&["1".to_string(), "99".to_string(), "1.0".to_string()]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(unresolved, vec!["99".to_string()]);
    }
}

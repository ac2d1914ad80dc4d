use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::{
    build_band_polygon, classify, stitch, ArcLengthIndex, Connector, DrawnLayerRegistry,
    FlightOccupation, Namespace, NetworkGraph, OverlapGroup, Projection, RenderSurface,
    TimelineBar,
};

/// Counts for the host's diagnostics after one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
    /// Surface calls that failed; the registry still matches the screen.
    pub failed: usize,
}

/// The view-lifetime engine: owns the network and one layer registry per
/// namespace, and turns each push-event snapshot into surface mutations.
///
/// Everything runs synchronously inside the host's reaction to an update;
/// per-namespace passes must be applied in arrival order, since each plan is
/// relative to the registry state the previous pass left behind.
pub struct ConflictView {
    network: NetworkGraph,
    current: DrawnLayerRegistry,
    future: DrawnLayerRegistry,
}

enum Drawn {
    /// The band polygon (or fallback highlight) is on screen.
    Committed,
    /// Nothing worth drawing; valid outcome, not an error.
    Nothing,
    /// The surface refused; leave the registry untouched.
    Failed,
}

impl ConflictView {
    pub fn new(network: NetworkGraph) -> ConflictView {
        ConflictView {
            network,
            current: DrawnLayerRegistry::new(Namespace::Current),
            future: DrawnLayerRegistry::new(Namespace::Future),
        }
    }

    pub fn network(&self) -> &NetworkGraph {
        &self.network
    }

    pub fn registry(&self, namespace: Namespace) -> &DrawnLayerRegistry {
        match namespace {
            Namespace::Current => &self.current,
            Namespace::Future => &self.future,
        }
    }

    /// Applies one full-replacement overlap snapshot for a namespace:
    /// plan against the registry, then add/update/remove on the surface,
    /// committing each registry change only after its surface call succeeds.
    pub fn handle_overlap_update(
        &mut self,
        namespace: Namespace,
        groups: &[OverlapGroup],
        projection: Projection,
        surface: &mut dyn RenderSurface,
    ) -> UpdateOutcome {
        let ConflictView {
            network,
            current,
            future,
        } = self;
        let registry = match namespace {
            Namespace::Current => current,
            Namespace::Future => future,
        };

        let plan = registry.plan(groups);
        let mut outcome = UpdateOutcome {
            skipped: plan.skipped.len(),
            ..UpdateOutcome::default()
        };

        // Removals first, so an update's remove-then-add can't leave a stale
        // drawable behind if the add fails.
        for key in &plan.to_remove {
            if remove_drawn(registry, key, surface) {
                outcome.removed += 1;
            } else {
                outcome.failed += 1;
            }
        }

        let by_key: BTreeMap<String, &OverlapGroup> =
            groups.iter().map(|group| (group.key(), group)).collect();

        for key in &plan.to_add {
            match draw_group(network, registry, key, by_key[key], projection, surface) {
                Drawn::Committed => outcome.added += 1,
                Drawn::Nothing => {}
                Drawn::Failed => outcome.failed += 1,
            }
        }
        for key in &plan.to_update {
            // Polygons aren't patched in place; shape can change arbitrarily
            // between snapshots.
            if !remove_drawn(registry, key, surface) {
                outcome.failed += 1;
                continue;
            }
            match draw_group(network, registry, key, by_key[key], projection, surface) {
                Drawn::Committed => outcome.updated += 1,
                Drawn::Nothing => {}
                Drawn::Failed => outcome.failed += 1,
            }
        }

        info!(
            "{} overlaps: +{} ~{} -{} ({} unchanged, {} failed)",
            namespace,
            outcome.added,
            outcome.updated,
            outcome.removed,
            outcome.skipped,
            outcome.failed
        );
        outcome
    }

    /// Builds timeline connectors for occupations sharing a resource. Row
    /// positions follow the order flights arrive in the update; the backend's
    /// direction tag isn't available here, so classification falls back to
    /// inference.
    pub fn handle_occupation_update(
        &self,
        flights: &[FlightOccupation],
        row_height: f64,
    ) -> Vec<Connector> {
        let mut rows_by_resource: BTreeMap<&str, Vec<TimelineBar>> = BTreeMap::new();
        for (row, occupation) in flights.iter().enumerate() {
            rows_by_resource
                .entry(occupation.resource_id.as_str())
                .or_default()
                .push(TimelineBar {
                    window: occupation.window,
                    row_y: row as f64 * row_height,
                });
        }

        let mut connectors = Vec::new();
        for bars in rows_by_resource.values() {
            for pair in bars.windows(2) {
                connectors.push(classify(&pair[0], &pair[1], None));
            }
        }
        connectors
    }

    /// Connectors for one overlap group, trusting its explicit direction tag
    /// when present.
    pub fn connectors_for_group(&self, group: &OverlapGroup, row_height: f64) -> Vec<Connector> {
        let bars: Vec<TimelineBar> = group
            .occupations
            .iter()
            .enumerate()
            .map(|(row, occupation)| TimelineBar {
                window: occupation.window,
                row_y: row as f64 * row_height,
            })
            .collect();
        bars.windows(2)
            .map(|pair| classify(&pair[0], &pair[1], group.direction))
            .collect()
    }
}

/// Removes one drawn region, committing the registry change only on success.
fn remove_drawn(
    registry: &mut DrawnLayerRegistry,
    key: &str,
    surface: &mut dyn RenderSurface,
) -> bool {
    let Some(area_id) = registry.area_id_of(key).map(|id| id.to_string()) else {
        return true;
    };
    if !registry.removal_allowed(&area_id) {
        return false;
    }
    match surface.remove_region(&area_id) {
        Ok(()) => {
            registry.commit_removed(key);
            true
        }
        Err(err) => {
            warn!("surface refused to remove {}: {}", area_id, err);
            false
        }
    }
}

fn draw_group(
    network: &NetworkGraph,
    registry: &mut DrawnLayerRegistry,
    key: &str,
    group: &OverlapGroup,
    projection: Projection,
    surface: &mut dyn RenderSurface,
) -> Drawn {
    let namespace = registry.namespace();
    let area_id = namespace.area_id(key);
    let style = namespace.style();

    let (segments, unresolved) = network.resolve(&group.path);
    if !unresolved.is_empty() {
        // Partial paths aren't useful as polygons, but the segments that did
        // resolve are still worth pointing at.
        warn!(
            "skipping polygon for {}: unresolved segment ids {:?}",
            area_id, unresolved
        );
        if segments.is_empty() {
            return Drawn::Nothing;
        }
        let polylines: Vec<_> = segments.iter().map(|segment| segment.pts.clone()).collect();
        return match surface.highlight_segments(&area_id, &polylines, &style) {
            Ok(()) => {
                registry.commit_drawn(key, group.content_hash());
                Drawn::Committed
            }
            Err(err) => {
                warn!("surface refused highlight {}: {}", area_id, err);
                Drawn::Failed
            }
        };
    }
    if segments.is_empty() {
        // Node-only group; nothing to draw on the map.
        return Drawn::Nothing;
    }

    // Stitched path and index live for exactly this pass; pixel-space
    // derivations go stale as soon as the host pans or zooms.
    let index = ArcLengthIndex::new(stitch(&segments));
    let Some(polygon) = build_band_polygon(&group.merged_functions, &index, projection) else {
        debug!("no valid samples for {}; skipping layer", area_id);
        return Drawn::Nothing;
    };

    match surface.upsert_region(&area_id, &polygon, &style) {
        Ok(()) => {
            registry.commit_drawn(key, group.content_hash());
            Drawn::Committed
        }
        Err(err) => {
            warn!("surface refused {}: {}", area_id, err);
            Drawn::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, LonLat, RoadSegment, TimeWindow};

    #[test]
    fn occupations_pair_per_resource() {
        let network = NetworkGraph::from_segments(Vec::new());
        let view = ConflictView::new(network);
        let occupation = |flight: &str, resource: &str, start: f64, end: f64| FlightOccupation {
            flight_id: flight.to_string(),
            resource_id: resource.to_string(),
            window: TimeWindow::new(start, end),
        };
        let connectors = view.handle_occupation_update(
            &[
                occupation("DLH4", "7", 0.0, 10.0),
                occupation("AFR9", "7", 5.0, 15.0),
                occupation("BAW2", "9", 0.0, 20.0),
            ],
            12.0,
        );
        // Only the two flights on resource 7 pair up.
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].kind, Direction::Same);
    }

    #[test]
    fn group_connectors_trust_the_direction_tag() {
        let view = ConflictView::new(NetworkGraph::from_segments(vec![RoadSegment {
            id: "1".to_string(),
            name: None,
            pts: vec![LonLat::new(8.55, 50.03), LonLat::new(8.551, 50.03)],
        }]));
        let group = OverlapGroup {
            conflict_key: Some("c1".to_string()),
            path: vec!["1".to_string()],
            direction: Some(Direction::Opposite),
            merged_functions: Vec::new(),
            occupations: vec![
                FlightOccupation {
                    flight_id: "DLH4".to_string(),
                    resource_id: "1".to_string(),
                    window: TimeWindow::new(0.0, 10.0),
                },
                FlightOccupation {
                    flight_id: "AFR9".to_string(),
                    resource_id: "1".to_string(),
                    window: TimeWindow::new(5.0, 15.0),
                },
            ],
            is_unchanged: None,
        };
        let connectors = view.connectors_for_group(&group, 12.0);
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].kind, Direction::Opposite);
    }
}

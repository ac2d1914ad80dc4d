//! Conflict-geometry engine for an airport surface-traffic dashboard.
//!
//! The backend streams full-replacement snapshots of overlap groups: clusters
//! of flights claiming the same taxiway segment or node, each with a chain of
//! segment ids and a piecewise-linear separation function along that chain.
//! This crate turns those snapshots into display-ready geometry (offset band
//! polygons on the map, connector shapes on the timeline) and keeps the set of
//! drawn layers in sync across updates without flicker or leaks.
//!
//! Transport framing, basemap tiles, and UI chrome live in the host; the
//! boundary is the [`RenderSurface`] trait and the plain transport-facing
//! structs ([`OverlapGroup`], [`FlightOccupation`]).

mod arclen;
mod band;
mod classify;
mod engine;
mod group;
mod lonlat;
mod mercator;
mod network;
mod reconcile;
mod stitch;
mod surface;
mod utm;

pub use crate::arclen::ArcLengthIndex;
pub use crate::band::{build_band_polygon, SeparationFn, SAMPLE_STEP_M, WIDTH_SCALE};
pub use crate::classify::{classify, Connector, TimelineBar, TimelinePt};
pub use crate::engine::{ConflictView, UpdateOutcome};
pub use crate::group::{Direction, FlightOccupation, OverlapGroup, TimeWindow};
pub use crate::lonlat::LonLat;
pub use crate::mercator::{Projection, ScreenPt, EARTH_CIRCUMFERENCE_M};
pub use crate::network::{NetworkGraph, RoadSegment};
pub use crate::reconcile::{DrawnLayerRegistry, DrawnRegion, Namespace, ReconcilePlan};
pub use crate::stitch::stitch;
pub use crate::surface::{RegionStyle, RenderSurface};
pub use crate::utm::utm_to_wgs84;

/// WGS84 equatorial radius, used as the sphere radius for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

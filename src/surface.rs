use anyhow::Result;

use crate::LonLat;

/// Styling attributes for a drawn overlap region. These are display
/// constants, not configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionStyle {
    pub fill: &'static str,
    pub opacity: f64,
    pub outline: &'static str,
}

/// The boundary to the host's map widget. The engine hands over display-ready
/// geometry; pixel compositing, basemap tiles, and pan/zoom live on the other
/// side. Calls are synchronous and report failure through `Result` so the
/// registry only records what's actually on screen.
pub trait RenderSurface {
    /// Adds or replaces the drawable with this id.
    fn upsert_region(&mut self, area_id: &str, pts: &[LonLat], style: &RegionStyle) -> Result<()>;

    fn remove_region(&mut self, area_id: &str) -> Result<()>;

    /// Fallback when a group's full path couldn't be resolved: highlight the
    /// segments that did resolve, all under one drawable id so removal stays
    /// a single call.
    fn highlight_segments(
        &mut self,
        area_id: &str,
        polylines: &[Vec<LonLat>],
        style: &RegionStyle,
    ) -> Result<()>;
}

use ordered_float::NotNan;

use crate::{Direction, TimeWindow};

/// Clearance kept between connector geometry and the shared conflict glyph,
/// in timeline units.
const GLYPH_GAP: f64 = 4.0;

/// An occupation placed on its timeline row: the time window plus the row's
/// vertical render position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineBar {
    pub window: TimeWindow,
    pub row_y: f64,
}

/// A point in timeline space: `t` in seconds along the horizontal axis, `y`
/// the vertical render position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePt {
    pub t: f64,
    pub y: f64,
}

impl TimelinePt {
    fn new(t: f64, y: f64) -> TimelinePt {
        TimelinePt { t, y }
    }
}

/// Display-ready connector geometry between two occupations on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
    pub kind: Direction,
    pub segments: Vec<(TimelinePt, TimelinePt)>,
    /// Single shared conflict glyph for opposing traffic. One glyph at the
    /// meeting point reads as mutual blocking; two opposing arrowheads don't.
    pub glyph: Option<TimelinePt>,
    /// Arrowhead anchor at the earlier occupation for same-direction gating.
    pub arrow: Option<TimelinePt>,
}

/// Classifies the relationship between two time-windowed occupations and
/// builds the matching connector. An explicit backend direction tag always
/// wins over inference.
pub fn classify(a: &TimelineBar, b: &TimelineBar, explicit: Option<Direction>) -> Connector {
    let kind = explicit.unwrap_or_else(|| infer_direction(a.window, b.window));
    match kind {
        Direction::Opposite => opposing_connector(a, b),
        Direction::Same => gating_connector(a, b),
    }
}

/// Fallback when the backend omits a direction tag: opposing traversal shows
/// up as time deltas of opposite sign. This is a heuristic, not authoritative;
/// near-zero deltas make it ambiguous. A zero delta counts as non-negative.
fn infer_direction(a: TimeWindow, b: TimeWindow) -> Direction {
    if (a.delta() >= 0.0) != (b.delta() >= 0.0) {
        Direction::Opposite
    } else {
        Direction::Same
    }
}

/// Opposing traffic: both flights converge on a meeting point. Pick the
/// endpoint pairing closest in time, drop verticals from each endpoint to the
/// exact row midline, and run the midline toward a single shared glyph with a
/// gap on both sides.
fn opposing_connector(a: &TimelineBar, b: &TimelineBar) -> Connector {
    // Fixed scan order; a linear first-minimum keeps equal ties stable across
    // repeated updates.
    let candidates = [
        (a.window.start, b.window.start),
        (a.window.start, b.window.end),
        (a.window.end, b.window.start),
        (a.window.end, b.window.end),
    ];
    let (ta, tb) = candidates
        .into_iter()
        .min_by_key(|(x, y)| NotNan::new((x - y).abs()).unwrap())
        .unwrap();

    let mid_y = (a.row_y + b.row_y) / 2.0;
    let glyph = TimelinePt::new((ta + tb) / 2.0, mid_y);

    let mut segments = vec![
        (TimelinePt::new(ta, a.row_y), TimelinePt::new(ta, mid_y)),
        (TimelinePt::new(tb, b.row_y), TimelinePt::new(tb, mid_y)),
    ];
    let (left_t, right_t) = (ta.min(tb), ta.max(tb));
    if glyph.t - GLYPH_GAP > left_t {
        segments.push((
            TimelinePt::new(left_t, mid_y),
            TimelinePt::new(glyph.t - GLYPH_GAP, mid_y),
        ));
    }
    if glyph.t + GLYPH_GAP < right_t {
        segments.push((
            TimelinePt::new(glyph.t + GLYPH_GAP, mid_y),
            TimelinePt::new(right_t, mid_y),
        ));
    }

    Connector {
        kind: Direction::Opposite,
        segments,
        glyph: Some(glyph),
        arrow: None,
    }
}

/// Same-direction traffic: the later flight's clearance is gated by when the
/// earlier flight clears. Right-angle connector from the later occupation's
/// end time, across the exact row midline, to an arrow at the earlier
/// occupation's end time.
fn gating_connector(a: &TimelineBar, b: &TimelineBar) -> Connector {
    let a_is_late = a.window.start > b.window.start;
    let (late, early) = if a_is_late { (a, b) } else { (b, a) };

    let mid_y = (a.row_y + b.row_y) / 2.0;
    let from = TimelinePt::new(late.window.end, late.row_y);
    let corner1 = TimelinePt::new(late.window.end, mid_y);
    let corner2 = TimelinePt::new(early.window.end, mid_y);
    let to = TimelinePt::new(early.window.end, early.row_y);

    Connector {
        kind: Direction::Same,
        segments: vec![(from, corner1), (corner1, corner2), (corner2, to)],
        glyph: None,
        arrow: Some(to),
    }
}

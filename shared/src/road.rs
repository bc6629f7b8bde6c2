//! Road segments and the padded corridors players move within.
//!
//! A map lists roads as raw axis-aligned segments. At load time the
//! segments go through [`normalize`], which merges collinear touching
//! pairs, and each result becomes a [`Road`]: the segment's bounding box
//! padded by [`ROAD_HALF_WIDTH`] on every side.

use crate::geometry::Point;

/// Half of a road's width in map units.
pub const ROAD_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Both endpoints share y.
    Horizontal,
    /// Both endpoints share x.
    Vertical,
}

/// A raw road as written in the map file, before padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSegment {
    pub start: Point,
    pub end: Point,
}

impl RoadSegment {
    pub fn horizontal(x0: f64, y: f64, x1: f64) -> Self {
        Self {
            start: Point::new(x0, y),
            end: Point::new(x1, y),
        }
    }

    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self {
            start: Point::new(x, y0),
            end: Point::new(x, y1),
        }
    }

    /// Zero-length segments count as horizontal.
    pub fn orientation(&self) -> Orientation {
        if self.start.y == self.end.y {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// The coordinate shared by both endpoints.
    fn fixed(&self) -> f64 {
        match self.orientation() {
            Orientation::Horizontal => self.start.y,
            Orientation::Vertical => self.start.x,
        }
    }

    /// Low and high bounds along the varying axis.
    fn span(&self) -> (f64, f64) {
        let (a, b) = match self.orientation() {
            Orientation::Horizontal => (self.start.x, self.end.x),
            Orientation::Vertical => (self.start.y, self.end.y),
        };
        (a.min(b), a.max(b))
    }

    /// Merges `self` with `other` if they lie on the same line and one ends
    /// exactly where the other begins.
    pub fn merge(&self, other: &RoadSegment) -> Option<RoadSegment> {
        if self.orientation() != other.orientation() || self.fixed() != other.fixed() {
            return None;
        }

        let (low_a, high_a) = self.span();
        let (low_b, high_b) = other.span();
        if low_a != high_b && low_b != high_a {
            return None;
        }

        let low = low_a.min(low_b);
        let high = high_a.max(high_b);
        let fixed = self.fixed();
        Some(match self.orientation() {
            Orientation::Horizontal => RoadSegment::horizontal(low, fixed, high),
            Orientation::Vertical => RoadSegment::vertical(fixed, low, high),
        })
    }
}

/// Runs one pairwise merge pass over a map's segments.
///
/// Each segment takes part in at most one merge, so a chain of three or
/// more touching segments is only partially coalesced. A merged segment
/// sits where its first member was; everything else keeps its order.
pub fn normalize(segments: &[RoadSegment]) -> Vec<RoadSegment> {
    let mut consumed = vec![false; segments.len()];
    let mut result = Vec::with_capacity(segments.len());

    for i in 0..segments.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let partner = (i + 1..segments.len())
            .filter(|&j| !consumed[j])
            .find_map(|j| segments[i].merge(&segments[j]).map(|merged| (j, merged)));

        match partner {
            Some((j, merged)) => {
                consumed[j] = true;
                result.push(merged);
            }
            None => result.push(segments[i]),
        }
    }

    result
}

///A road corridor: the inclusive padded bounding box of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Road {
    segment: RoadSegment,
    /// Top-left corner of the corridor (smallest x and y).
    min: Point,
    /// Bottom-right corner of the corridor (largest x and y).
    max: Point,
}

impl Road {
    ///Builds a corridor with the standard half-width.
    pub fn new(segment: RoadSegment) -> Self {
        Self::with_half_width(segment, ROAD_HALF_WIDTH)
    }

    ///Builds a corridor padded by `half_width` on every side.
    pub fn with_half_width(segment: RoadSegment, half_width: f64) -> Self {
        let RoadSegment { start, end } = segment;
        Self {
            segment,
            min: Point::new(start.x.min(end.x) - half_width, start.y.min(end.y) - half_width),
            max: Point::new(start.x.max(end.x) + half_width, start.y.max(end.y) + half_width),
        }
    }

    ///Returns the segment the corridor was built from.
    pub fn segment(&self) -> &RoadSegment {
        &self.segment
    }

    ///Returns the smallest x inside the corridor.
    pub fn left(&self) -> f64 {
        self.min.x
    }

    ///Returns the largest x inside the corridor.
    pub fn right(&self) -> f64 {
        self.max.x
    }

    ///Returns the smallest y inside the corridor.
    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    ///Returns the largest y inside the corridor.
    pub fn top(&self) -> f64 {
        self.max.y
    }

    ///Returns true if the point is inside the corridor, borders included.
    pub fn is_on_road(&self, point: Point) -> bool {
        point.all_ge(&self.min) && point.all_le(&self.max)
    }

    ///Clamps each coordinate of the point into the corridor independently.
    pub fn clamp_to_road(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

impl From<RoadSegment> for Road {
    fn from(segment: RoadSegment) -> Self {
        Road::new(segment)
    }
}

//! Path primitives
//!
//! All primitives live in the XY plane of the frame the plan was built in.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Point2, Unit, Vector2};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Anything a distance to a point can be measured from.
pub trait DistanceToPoint {
    /// The squared distance from the closest point of `self` to `point`.
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64;
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An infinite line through two points.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub point_a_m: Point2<f64>,
    pub point_b_m: Point2<f64>,
}

/// A half-infinite line starting at `origin_m`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin_m: Point2<f64>,
    pub direction: Unit<Vector2<f64>>,
}

/// A straight line between two points.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_m: Point2<f64>,
    pub end_m: Point2<f64>,
}

/// A polyline, used to describe curved sections of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub points_m: Vec<Point2<f64>>,
}

/// Any of the primitives a plan can be made of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathPrimitive {
    Line(Line),
    Ray(Ray),
    Segment(Segment),
    Sequence(Sequence),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Line {
    pub fn new(point_a_m: Point2<f64>, point_b_m: Point2<f64>) -> Self {
        Self {
            point_a_m,
            point_b_m,
        }
    }

    /// Get a copy of this line shifted sideways by `distance_m`. Positive distances move to the
    /// left when looking from A towards B.
    ///
    /// A degenerate line (A and B equal) has no sideways direction and is returned unchanged.
    pub fn offset(&self, distance_m: f64) -> Self {
        let ab = self.point_b_m - self.point_a_m;
        let length_m = ab.norm();

        if length_m == 0.0 {
            return *self;
        }

        let shift = Vector2::new(-ab.y, ab.x) * (distance_m / length_m);

        Self {
            point_a_m: self.point_a_m + shift,
            point_b_m: self.point_b_m + shift,
        }
    }
}

impl Segment {
    pub fn new(start_m: Point2<f64>, end_m: Point2<f64>) -> Self {
        Self { start_m, end_m }
    }

    /// Length of the segment in meters
    pub fn length_m(&self) -> f64 {
        (self.end_m - self.start_m).norm()
    }
}

impl DistanceToPoint for Line {
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64 {
        let ab = self.point_b_m - self.point_a_m;
        let ap = *point - self.point_a_m;
        let length_squared = ab.norm_squared();

        if length_squared == 0.0 {
            return ap.norm_squared();
        }

        // Perpendicular distance is |ab x ap| / |ab|
        let cross = ab.perp(&ap);
        cross * cross / length_squared
    }
}

impl DistanceToPoint for Ray {
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64 {
        let direction = self.direction.into_inner();
        let op = *point - self.origin_m;
        let along_m = op.dot(&direction).max(0.0);

        (op - direction * along_m).norm_squared()
    }
}

impl DistanceToPoint for Segment {
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64 {
        distance_to_segment_squared(&self.start_m, &self.end_m, point)
    }
}

impl DistanceToPoint for Sequence {
    /// An empty sequence is infinitely far away, a single point sequence is that point.
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64 {
        match self.points_m.len() {
            0 => f64::INFINITY,
            1 => (*point - self.points_m[0]).norm_squared(),
            _ => self
                .points_m
                .windows(2)
                .map(|w| distance_to_segment_squared(&w[0], &w[1], point))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

impl DistanceToPoint for PathPrimitive {
    fn distance_to_point_squared(&self, point: &Point2<f64>) -> f64 {
        match self {
            PathPrimitive::Line(l) => l.distance_to_point_squared(point),
            PathPrimitive::Ray(r) => r.distance_to_point_squared(point),
            PathPrimitive::Segment(s) => s.distance_to_point_squared(point),
            PathPrimitive::Sequence(s) => s.distance_to_point_squared(point),
        }
    }
}

impl From<Line> for PathPrimitive {
    fn from(line: Line) -> Self {
        PathPrimitive::Line(line)
    }
}

impl From<Ray> for PathPrimitive {
    fn from(ray: Ray) -> Self {
        PathPrimitive::Ray(ray)
    }
}

impl From<Segment> for PathPrimitive {
    fn from(segment: Segment) -> Self {
        PathPrimitive::Segment(segment)
    }
}

impl From<Sequence> for PathPrimitive {
    fn from(sequence: Sequence) -> Self {
        PathPrimitive::Sequence(sequence)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn distance_to_segment_squared(start: &Point2<f64>, end: &Point2<f64>, point: &Point2<f64>) -> f64 {
    let se = *end - *start;
    let sp = *point - *start;
    let length_squared = se.norm_squared();

    if length_squared == 0.0 {
        return sp.norm_squared();
    }

    // Fraction along the segment of the closest point
    let t = (sp.dot(&se) / length_squared).max(0.0).min(1.0);

    (sp - se * t).norm_squared()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

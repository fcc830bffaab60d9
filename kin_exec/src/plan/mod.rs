//! # Plan
//!
//! A plan is the path the assembly should follow, made up of [`PathPrimitive`]s. The only query
//! performed on it here is finding the primitive nearest to a point.
//!
//! Plans are tagged with a [`PlanType`]. An `OnlyLines` plan guarantees its primitives are stored
//! in traversal order such that the squared distance to any query point first decreases then
//! increases along the sequence. The nearest primitive search relies on this to stop at the first
//! primitive which isn't closer than the best so far. `Mixed` plans are always searched
//! exhaustively.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod primitive;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use params::Params;
pub use primitive::*;

use std::ops::RangeInclusive;

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An ordered collection of path primitives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan<P = PathPrimitive> {
    pub plan_type: PlanType,

    primitives: Vec<P>,
}

/// The result of a nearest primitive query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NearestPrimitive {
    /// Index of the nearest primitive in the plan, or `None` if the plan is empty
    pub index: Option<usize>,

    /// Squared distance to the nearest primitive, infinite if the plan is empty
    pub distance_squared_m2: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    /// Any primitives in any order
    Mixed,

    /// Primitives ordered so that distance to a point is unimodal along the plan
    OnlyLines,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<P> Plan<P> {
    /// Create a new empty plan of the given type.
    pub fn new(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            primitives: Vec::new(),
        }
    }

    /// Create a `Mixed` plan from the given primitives.
    pub fn from_primitives(primitives: Vec<P>) -> Self {
        Self {
            plan_type: PlanType::Mixed,
            primitives,
        }
    }

    /// Append a primitive to the end of the plan.
    ///
    /// For `OnlyLines` plans the caller must keep the primitives in traversal order.
    pub fn push(&mut self, primitive: P) {
        self.primitives.push(primitive);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.primitives.get(index)
    }
}

impl<P> Plan<P>
where
    P: DistanceToPoint,
{
    /// Find the primitive nearest to the given point.
    ///
    /// On ties the earliest primitive wins. An empty plan gives `NearestPrimitive::NOT_FOUND`.
    pub fn nearest_primitive(&self, point: &Point2<f64>) -> NearestPrimitive {
        let mut nearest = NearestPrimitive::NOT_FOUND;

        for (i, primitive) in self.primitives.iter().enumerate() {
            let distance_squared_m2 = primitive.distance_to_point_squared(point);

            if distance_squared_m2 < nearest.distance_squared_m2 {
                nearest = NearestPrimitive {
                    index: Some(i),
                    distance_squared_m2,
                };
            } else if self.plan_type == PlanType::OnlyLines {
                // Distances only grow from here on in an ordered plan
                break;
            }
        }

        nearest
    }
}

impl Plan<PathPrimitive> {
    /// Build an `OnlyLines` plan of lines parallel to `reference`, one per pass.
    ///
    /// Pass `n` is offset from the reference by `n * spacing_m` to the left (looking from A to
    /// B), and passes are stored in increasing order, which keeps the plan ordered by distance.
    pub fn parallel_lines(reference: &Line, spacing_m: f64, passes: RangeInclusive<i32>) -> Self {
        let primitives = passes
            .map(|pass| PathPrimitive::Line(reference.offset(pass as f64 * spacing_m)))
            .collect();

        Self {
            plan_type: PlanType::OnlyLines,
            primitives,
        }
    }

    /// Build the plan described by the parameters.
    pub fn from_params(params: &Params) -> Self {
        let reference = Line::new(
            Point2::from(params.point_a_m),
            Point2::from(params.point_b_m),
        );

        let plan = Self::parallel_lines(&reference, params.spacing_m, params.first_pass..=params.last_pass);

        debug!(
            "Built plan of {} parallel lines spaced {} m apart",
            plan.len(),
            params.spacing_m
        );

        plan
    }
}

impl NearestPrimitive {
    pub const NOT_FOUND: NearestPrimitive = NearestPrimitive {
        index: None,
        distance_squared_m2: f64::INFINITY,
    };

    pub fn is_found(&self) -> bool {
        self.index.is_some()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

//! Collision space: the registry of collidable bodies and the queries the
//! stepper runs against it
//!
//! Brute force over every body. Body counts are in the tens, and the body
//! order doubles as the tie-break for equally distant hits.

use serde::{Deserialize, Serialize};

use super::body::{Block, Body, Paddle};
use super::geometry::{Point, Segment};
use crate::consts::PUSH_OUT;

/// Handle of a body registered in a [`CollisionSpace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Where a trajectory first meets a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub point: Point,
    pub body: BodyId,
}

/// Ordered set of bodies
#[derive(Debug, Clone, Default)]
pub struct CollisionSpace {
    bodies: Vec<(BodyId, Body)>,
    next_id: u32,
}

impl CollisionSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body at the end of the order
    pub fn add(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push((id, body));
        id
    }

    /// Unregister a body, keeping the order of the rest
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let pos = self.bodies.iter().position(|(i, _)| *i == id)?;
        Some(self.bodies.remove(pos).1)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|(i, _)| *i == id).map(|(_, b)| b)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn block(&self, id: BodyId) -> Option<&Block> {
        self.get(id).and_then(Body::as_block)
    }

    pub fn block_mut(&mut self, id: BodyId) -> Option<&mut Block> {
        self.bodies.iter_mut().find(|(i, _)| *i == id).and_then(|(_, b)| match b {
            Body::Block(block) => Some(block),
            Body::Paddle(_) => None,
        })
    }

    /// The first registered paddle
    pub fn paddle(&self) -> Option<&Paddle> {
        self.bodies.iter().find_map(|(_, b)| match b {
            Body::Paddle(paddle) => Some(paddle),
            Body::Block(_) => None,
        })
    }

    pub fn paddle_mut(&mut self) -> Option<&mut Paddle> {
        self.bodies.iter_mut().find_map(|(_, b)| match b {
            Body::Paddle(paddle) => Some(paddle),
            Body::Block(_) => None,
        })
    }

    /// Bodies in registration order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|(id, b)| (*id, b))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Nearest point where `trajectory` enters any body
    ///
    /// Ties go to the body registered first.
    pub fn closest_collision(&self, trajectory: &Segment) -> Option<CollisionInfo> {
        let start = trajectory.start();
        self.bodies
            .iter()
            .filter_map(|(id, body)| {
                trajectory
                    .closest_intersect_start_of_line(body.bounds())
                    .map(|point| (start.distance(point), CollisionInfo { point, body: *id }))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, info)| info)
    }

    /// First body (skipping `exclude`) whose borders pass through `point`
    pub fn closest_other_body_at_point(&self, point: Point, exclude: &[BodyId]) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|(id, body)| !exclude.contains(id) && body.bounds().is_point_on_borders(point))
            .map(|(id, _)| *id)
    }

    /// Pull a ball center out of the paddle if the paddle moved onto it
    ///
    /// Only applies once the center is below the paddle's top edge; the
    /// center goes to whichever side of the paddle is nearer.
    pub fn resolve_overlap(&self, center: Point) -> Point {
        let Some(paddle) = self.paddle() else {
            return center;
        };
        let rect = paddle.rect();
        if center.y <= rect.top() {
            return center;
        }

        let mid = rect.left() + rect.width() / 2.0;
        let mut out = center;
        if center.x > rect.left() + PUSH_OUT && center.x < mid {
            out.x = rect.left() - PUSH_OUT;
        } else if center.x > mid && center.x < rect.right() - PUSH_OUT {
            out.x = rect.right() + PUSH_OUT;
        }
        out
    }
}

//! Per-tick ball movement
//!
//! A ball moves along its velocity until it meets a body, bounces, and
//! spends whatever distance is left in the new direction. That repeats
//! until the tick's travel is used up (or the sub-step cap is reached).

use serde::{Deserialize, Serialize};

use super::collision::{BodyId, CollisionSpace};
use super::geometry::{Point, Segment};
use super::velocity::Velocity;
use crate::consts::*;
use crate::levels::Rgb;

/// Handle of a ball within its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// A block was struck by a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    pub block: BodyId,
    pub ball: BallId,
}

/// What happened during one [`advance`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Hits to deliver, in the order they happened
    pub events: Vec<HitEvent>,
    /// Number of collisions resolved
    pub bounces: u32,
}

/// The ball
///
/// Not a body itself: it queries the collision space but nothing collides
/// with it.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: BallId,
    pub center: Point,
    pub velocity: Velocity,
    radius: u32,
    color: Rgb,
}

impl Ball {
    /// New ball at rest; a zero radius becomes 1
    pub fn new(id: BallId, center: Point, radius: u32, color: Rgb) -> Self {
        Self {
            id,
            center,
            velocity: Velocity::ZERO,
            radius: radius.max(1),
            color,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Advance `ball` by one tick through `space`
///
/// The space is only read; hits come back as events so the caller can
/// deliver them once the ball has finished moving.
pub fn advance(ball: &mut Ball, space: &CollisionSpace) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    if ball.velocity.angled_speed() == 0.0 {
        return outcome;
    }

    let mut travel = ball.velocity;
    let mut settled = None;

    loop {
        if outcome.bounces >= MAX_SUBSTEPS {
            log::warn!(
                "ball {:?} hit the sub-step cap ({MAX_SUBSTEPS}) at {:?}",
                ball.id,
                ball.center
            );
            break;
        }
        if travel.angled_speed() == 0.0 {
            break;
        }

        ball.center = space.resolve_overlap(ball.center);
        let trajectory = Segment::new(ball.center, travel.apply_to_point(ball.center));

        let Some(info) = space.closest_collision(&trajectory) else {
            ball.center = trajectory.end();
            break;
        };
        let Some(body) = space.get(info.body) else {
            break;
        };

        let single = body.hit(info.body, info.point, travel);
        let multi = body.resolve_multi_hit(space, &info, travel);

        let resolution = if multi.velocity.approx_eq(single.velocity) {
            ball.center = body.bounds().push_out(info.point);
            single
        } else {
            // Corner: back off a hair along the incoming direction and
            // leave the center short of the collision point
            let back = travel.as_dvec2().normalize_or_zero() * (2.0 * PUSH_OUT);
            ball.center = Point::from(ball.center.as_dvec2() - back);
            multi
        };
        log::debug!(
            "ball {:?} hit {:?} at {:?}: {:?} -> {:?}",
            ball.id,
            info.body,
            info.point,
            travel,
            resolution.velocity
        );

        outcome.bounces += 1;
        outcome.events.extend(resolution.struck.iter().map(|&block| HitEvent {
            block,
            ball: ball.id,
        }));

        // The first bounce decides where the ball heads next tick; later
        // ones only spend the leftover distance
        settled.get_or_insert(resolution.velocity);

        let leftover = info.point.distance(trajectory.end());
        if leftover <= EPSILON {
            break;
        }
        travel = resolution.velocity.with_speed(leftover);
    }

    if let Some(velocity) = settled {
        ball.velocity = velocity;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Block, Body, Paddle};
    use crate::sim::geometry::Rect;

    fn ball_at(x: f64, y: f64, v: Velocity) -> Ball {
        Ball::new(BallId(1), Point::new(x, y), 4, Rgb::WHITE).with_velocity(v)
    }

    fn block(x: f64, y: f64, w: f64, h: f64) -> Body {
        Body::Block(Block::new(Rect::from_coords(x, y, w, h), Rgb::RED))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_radius_coerced() {
        let ball = Ball::new(BallId(0), Point::default(), 0, Rgb::WHITE);
        assert_eq!(ball.radius(), 1);
    }

    #[test]
    fn test_stationary_ball_stays_put() {
        let mut space = CollisionSpace::new();
        space.add(block(0.0, 0.0, 10.0, 10.0));
        let mut ball = ball_at(50.0, 50.0, Velocity::ZERO);
        let outcome = advance(&mut ball, &space);
        assert_eq!(ball.center, Point::new(50.0, 50.0));
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_free_flight() {
        let space = CollisionSpace::new();
        let mut ball = ball_at(10.0, 10.0, Velocity::new(3.0, -2.0));
        advance(&mut ball, &space);
        assert_eq!(ball.center, Point::new(13.0, 8.0));
        assert_eq!(ball.velocity, Velocity::new(3.0, -2.0));
    }

    #[test]
    fn test_straight_down_onto_block_top() {
        let mut space = CollisionSpace::new();
        let id = space.add(block(380.0, 300.0, 40.0, 40.0));
        let mut ball = ball_at(400.0, 296.0, Velocity::new(0.0, 4.0));
        let outcome = advance(&mut ball, &space);

        assert!(ball.center.y < 300.0 && close(ball.center.y, 300.0));
        assert_eq!(ball.center.x, 400.0);
        assert_eq!(ball.velocity, Velocity::new(0.0, -4.0));
        assert_eq!(outcome.events, vec![HitEvent { block: id, ball: BallId(1) }]);
    }

    #[test]
    fn test_falling_from_far_above() {
        let mut space = CollisionSpace::new();
        space.add(block(380.0, 300.0, 40.0, 40.0));
        let mut ball = ball_at(400.0, 100.0, Velocity::new(0.0, 4.0));
        let mut hits = 0;
        for _ in 0..50 {
            hits += advance(&mut ball, &space).events.len();
        }
        assert_eq!(hits, 1);
        assert!(close(ball.center.y, 300.0));
        assert_eq!(ball.velocity, Velocity::new(0.0, -4.0));

        // And it keeps going back up
        advance(&mut ball, &space);
        assert!(close(ball.center.y, 296.0));
    }

    #[test]
    fn test_leftover_distance_is_spent_after_bounce() {
        let mut space = CollisionSpace::new();
        space.add(block(380.0, 300.0, 40.0, 40.0));
        let mut ball = ball_at(400.0, 298.0, Velocity::new(0.0, 4.0));
        advance(&mut ball, &space);
        // 2 down to the border, 2 back up
        assert!(close(ball.center.y, 298.0));
        assert!(close(ball.velocity.dy, -4.0));
    }

    #[test]
    fn test_two_bounces_in_one_tick() {
        let mut space = CollisionSpace::new();
        // Narrow corridor: walls at x=10 and x=14
        space.add(block(0.0, 0.0, 10.0, 100.0));
        space.add(block(14.0, 0.0, 10.0, 100.0));
        let mut ball = ball_at(12.0, 50.0, Velocity::new(8.0, 0.0));
        let outcome = advance(&mut ball, &space);
        // 2 right, 4 left, 2 right
        assert_eq!(outcome.bounces, 2);
        assert_eq!(outcome.events.len(), 2);
        assert!(close(ball.center.x, 12.0));
        assert_eq!(ball.center.y, 50.0);
        // Heading comes from the first bounce, at full speed
        assert_eq!(ball.velocity, Velocity::new(-8.0, 0.0));
    }

    #[test]
    fn test_corner_between_stacked_blocks() {
        let mut space = CollisionSpace::new();
        let a = space.add(block(0.0, 0.0, 40.0, 25.0));
        let b = space.add(block(0.0, 25.0, 40.0, 25.0));
        let mut ball = ball_at(50.0, 15.0, Velocity::new(-20.0, 20.0));
        let outcome = advance(&mut ball, &space);

        assert_eq!(ball.velocity, Velocity::new(20.0, -20.0));
        let struck: Vec<_> = outcome.events.iter().map(|e| e.block).collect();
        assert_eq!(struck, vec![a, b]);
        assert!(close(ball.center.x, 60.0) && close(ball.center.y, 5.0));
    }

    #[test]
    fn test_paddle_midpoint_plain_bounce() {
        let mut space = CollisionSpace::new();
        space.add(Body::Paddle(Paddle::new(
            Rect::from_coords(360.0, 572.5, 80.0, 12.5),
            7.0,
            Rgb::ORANGE,
            25.0,
            775.0,
        )));
        let mut ball = ball_at(398.0, 567.5, Velocity::new(2.0, 5.0));
        let outcome = advance(&mut ball, &space);
        assert_eq!(ball.velocity, Velocity::new(2.0, -5.0));
        // Paddle hits don't produce block events
        assert!(outcome.events.is_empty());
    }
}

//! Collidable bodies and their bounce rules
//!
//! Every rule here is pure: it takes the incoming velocity and returns a
//! [`Resolution`] (new velocity plus the blocks that should hear about the
//! hit). The stepper decides which resolution to apply, so nothing is
//! notified for a rule whose result gets thrown away.

use super::collision::{BodyId, CollisionInfo, CollisionSpace};
use super::geometry::{Point, Rect, Side};
use super::listener::ListenerId;
use super::velocity::{Axis, Velocity};
use crate::approx_eq;
use crate::levels::Rgb;

/// Outcome of a bounce
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub velocity: Velocity,
    /// Blocks to notify, in order
    pub struck: Vec<BodyId>,
}

impl Resolution {
    fn new(velocity: Velocity, struck: Vec<BodyId>) -> Self {
        Self { velocity, struck }
    }
}

/// Heading (degrees) for a hit on the outer fifths of the paddle, left side
pub const PADDLE_EDGE_ANGLE: f64 = 300.0;
/// Heading (degrees) for a hit on the inner-side fifths of the paddle, left side
pub const PADDLE_INNER_ANGLE: f64 = 330.0;

/// A rectangular block
///
/// A block without a color is invisible but still collides (screen borders,
/// the deathzone).
#[derive(Debug, Clone)]
pub struct Block {
    rect: Rect,
    color: Option<Rgb>,
    listeners: Vec<ListenerId>,
}

impl Block {
    pub fn new(rect: Rect, color: Rgb) -> Self {
        Self {
            rect,
            color: Some(color),
            listeners: Vec::new(),
        }
    }

    /// A block with no visual
    pub fn transparent(rect: Rect) -> Self {
        Self {
            rect,
            color: None,
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn add_hit_listener(&mut self, listener: ListenerId) {
        self.listeners.push(listener);
    }

    /// Removes the first registration of `listener`
    pub fn remove_hit_listener(&mut self, listener: ListenerId) {
        if let Some(pos) = self.listeners.iter().position(|&l| l == listener) {
            self.listeners.remove(pos);
        }
    }

    /// Registered listeners, in registration order
    pub fn hit_listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Bounce off this block alone
    ///
    /// Top is checked before bottom, anything else is a side hit. A top or
    /// bottom hit that also sits on a side border while moving back toward
    /// the block (the "bad corner") flips horizontally instead, otherwise
    /// the ball would be sent into the block.
    pub fn hit(&self, point: Point, velocity: Velocity) -> Velocity {
        let on_left = || self.rect.is_point_on_border(Side::Left, point);
        let on_right = || self.rect.is_point_on_border(Side::Right, point);

        let axis = if self.rect.is_point_on_border(Side::Top, point) {
            let bad_corner = (on_left() && velocity.dx > 0.0 && velocity.dy < 0.0)
                || (on_right() && velocity.dx < 0.0 && velocity.dy < 0.0);
            if bad_corner { Axis::Horizontal } else { Axis::Vertical }
        } else if self.rect.is_point_on_border(Side::Bottom, point) {
            let bad_corner = (on_left() && velocity.dx > 0.0 && velocity.dy > 0.0)
                || (on_right() && velocity.dx < 0.0 && velocity.dy > 0.0);
            if bad_corner { Axis::Horizontal } else { Axis::Vertical }
        } else {
            Axis::Horizontal
        };
        velocity.invert(axis)
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    rect: Rect,
    color: Rgb,
    /// Horizontal distance moved per tick
    pub speed: f64,
    /// The paddle can't start a move once its left edge is at or past this
    pub min_x: f64,
    /// The paddle can't start a move once its right edge is at or past this
    pub max_x: f64,
}

impl Paddle {
    pub fn new(rect: Rect, speed: f64, color: Rgb, min_x: f64, max_x: f64) -> Self {
        Self {
            rect,
            color,
            speed,
            min_x,
            max_x,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn center_x(&self) -> f64 {
        self.rect.left() + self.rect.width() / 2.0
    }

    pub fn move_left(&mut self) {
        if self.rect.left() > self.min_x {
            self.rect = self.rect.with_left(self.rect.left() - self.speed);
        }
    }

    pub fn move_right(&mut self) {
        if self.rect.right() < self.max_x {
            self.rect = self.rect.with_left(self.rect.left() + self.speed);
        }
    }

    /// Bounce off the paddle
    ///
    /// The top is split into five equal zones. The outer two send the ball
    /// off at a fixed angle, the next two at a shallower fixed angle (both
    /// mirrored on the right half, both keeping the incoming speed), and
    /// the middle zone is a plain bounce. Side hits flip horizontally.
    pub fn hit(&self, point: Point, velocity: Velocity) -> Velocity {
        if !self.rect.is_point_on_border(Side::Top, point) {
            return velocity.invert(Axis::Horizontal);
        }

        let width = self.rect.width();
        let distance = point.x - self.rect.left();
        let speed = velocity.angled_speed();

        let fixed = |angle: f64, mirrored: bool| {
            let v = Velocity::from_angle_and_speed(angle, speed);
            if mirrored { v.invert(Axis::Horizontal) } else { v }
        };

        if distance < width / 5.0
            || distance > 4.0 * width / 5.0
            || approx_eq(distance, width)
            || approx_eq(distance, 0.0)
        {
            fixed(PADDLE_EDGE_ANGLE, distance > 4.0 * width / 5.0)
        } else if distance < 2.0 * width / 5.0 || distance > 3.0 * width / 5.0 {
            fixed(PADDLE_INNER_ANGLE, distance > 3.0 * width / 5.0)
        } else {
            velocity.invert(Axis::Vertical)
        }
    }
}

/// Anything registered in a [`CollisionSpace`]
#[derive(Debug, Clone)]
pub enum Body {
    Block(Block),
    Paddle(Paddle),
}

impl Body {
    /// Collision rectangle
    pub fn bounds(&self) -> &Rect {
        match self {
            Body::Block(block) => block.rect(),
            Body::Paddle(paddle) => paddle.rect(),
        }
    }

    /// The block behind this body, if it is one (the paddle is not)
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Body::Block(block) => Some(block),
            Body::Paddle(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        self.as_block().is_some()
    }

    /// Single-body bounce; `id` is this body's id in the space
    pub fn hit(&self, id: BodyId, point: Point, velocity: Velocity) -> Resolution {
        match self {
            Body::Block(block) => Resolution::new(block.hit(point, velocity), vec![id]),
            Body::Paddle(paddle) => Resolution::new(paddle.hit(point, velocity), Vec::new()),
        }
    }

    /// Bounce for a collision point that may touch other bodies too
    ///
    /// Falls back to [`Body::hit`] when this body is the only one at the
    /// point.
    pub fn resolve_multi_hit(
        &self,
        space: &CollisionSpace,
        info: &CollisionInfo,
        velocity: Velocity,
    ) -> Resolution {
        let point = info.point;
        let Some(second) = space.closest_other_body_at_point(point, &[info.body]) else {
            return self.hit(info.body, point, velocity);
        };

        match self {
            // Paddle plus anything else means the ball is squeezed against
            // the ground: send it straight back
            Body::Paddle(_) => Resolution::new(velocity.reversed(), Vec::new()),
            Body::Block(block) => {
                let Some(other) = space.get(second) else {
                    return self.hit(info.body, point, velocity);
                };
                let blocks_of = |ids: &[BodyId]| -> Vec<BodyId> {
                    ids.iter()
                        .copied()
                        .filter(|&id| space.get(id).is_some_and(Body::is_block))
                        .collect()
                };

                if let Some(third) = space.closest_other_body_at_point(point, &[info.body, second]) {
                    return Resolution::new(
                        velocity.reversed(),
                        blocks_of(&[info.body, second, third]),
                    );
                }

                let struck = blocks_of(&[info.body, second]);
                let rect1 = block.rect();
                let rect2 = other.bounds();
                let side_by_side = match (rect1.point_corner(point), rect2.point_corner(point)) {
                    (Some(c1), Some(c2)) => (c1.index() + c2.index()) % 2 == 1,
                    _ => false,
                };
                if !side_by_side {
                    return Resolution::new(velocity.reversed(), struck);
                }

                // Two bodies side by side act as one big one
                let shared = |side| {
                    rect1.is_point_on_border(side, point) && rect2.is_point_on_border(side, point)
                };
                let axis = if shared(Side::Top) || shared(Side::Bottom) {
                    Axis::Vertical
                } else {
                    Axis::Horizontal
                };
                Resolution::new(velocity.invert(axis), struck)
            }
        }
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one ball step per tick)
//! - Stable iteration order (registration order for bodies, ball order for balls)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod geometry;
pub mod level;
pub mod listener;
pub mod stepper;
pub mod velocity;

pub use body::{Block, Body, PADDLE_EDGE_ANGLE, PADDLE_INNER_ANGLE, Paddle, Resolution};
pub use collision::{BodyId, CollisionInfo, CollisionSpace};
pub use geometry::{Corner, Point, Rect, Segment, Side};
pub use level::{GameLevel, LevelOutcome, LevelResult, TickInput};
pub use listener::{
    BallRemover, BlockRemover, Counter, HitContext, HitListener, LevelCounters, ListenerId,
    ListenerRegistry, ScoreTracker,
};
pub use stepper::{Ball, BallId, HitEvent, StepOutcome, advance};
pub use velocity::{Axis, Velocity};

//! A playable level: setup from a [`LevelInfo`] and the per-tick driver
//!
//! The level owns the collision space, the balls, the listeners and the
//! counters. Each tick moves the paddle, steps every ball, and delivers the
//! ball's hits before the next ball moves.

use super::body::{Block, Body, Paddle};
use super::collision::{BodyId, CollisionSpace};
use super::geometry::{Point, Rect};
use super::listener::{
    BallRemover, BlockRemover, Counter, HitContext, LevelCounters, ListenerRegistry, ScoreTracker,
};
use super::stepper::{Ball, BallId, advance};
use crate::consts::*;
use crate::levels::{LevelInfo, Rgb};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move the paddle left
    pub left: bool,
    /// Move the paddle right
    pub right: bool,
    /// Ignore left/right and let the paddle follow the balls
    pub autopilot: bool,
}

/// How a level run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Every block is gone
    Cleared,
    /// Every ball fell into the deathzone
    OutOfBalls,
    /// Stopped at the tick cap with blocks and balls left
    TimedOut,
}

/// Summary of a finished [`GameLevel::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    pub outcome: LevelOutcome,
    pub ticks: u64,
    pub score: i64,
}

pub struct GameLevel {
    name: String,
    background: Rgb,
    space: CollisionSpace,
    listeners: ListenerRegistry,
    counters: LevelCounters,
    balls: Vec<Ball>,
    paddle: BodyId,
    deathzone: BodyId,
    ticks: u64,
}

impl GameLevel {
    /// Build the level: paddle, balls, walls and deathzone, then the blocks
    pub fn new(info: &LevelInfo, settings: &Settings) -> Self {
        let width = settings.width;
        let height = settings.height;
        let border = settings.border_size;
        let wall_top = settings.score_bar_height + border;

        let mut space = CollisionSpace::new();
        let mut listeners = ListenerRegistry::new();
        let mut counters = LevelCounters::default();

        let paddle_height = border / 2.0;
        let paddle = space.add(Body::Paddle(Paddle::new(
            Rect::from_coords(
                width / 2.0 - info.paddle_width / 2.0,
                height - paddle_height - PADDLE_BOTTOM_GAP,
                info.paddle_width,
                paddle_height,
            ),
            info.paddle_speed,
            Rgb::ORANGE,
            border,
            width - border,
        )));

        let balls: Vec<Ball> = ball_positions(info.number_of_balls(), settings)
            .into_iter()
            .zip(&info.ball_velocities)
            .zip(0u32..)
            .map(|((center, &velocity), i)| {
                Ball::new(BallId(i), center, settings.ball_radius, Rgb::WHITE).with_velocity(velocity)
            })
            .collect();
        counters.remaining_balls = Counter::new(balls.len() as i64);

        space.add(Body::Block(Block::new(
            Rect::from_coords(-1.0, settings.score_bar_height, width, border),
            Rgb::GRAY,
        )));
        space.add(Body::Block(Block::new(
            Rect::from_coords(width - border, wall_top, border, height),
            Rgb::GRAY,
        )));
        let mut deathzone_block = Block::transparent(Rect::from_coords(
            border,
            height - 0.1,
            width - 2.0 * border,
            border,
        ));
        deathzone_block.add_hit_listener(listeners.register(Box::new(BallRemover)));
        let deathzone = space.add(Body::Block(deathzone_block));
        space.add(Body::Block(Block::new(
            Rect::from_coords(-1.0, wall_top, border, height),
            Rgb::GRAY,
        )));

        let remover = listeners.register(Box::new(BlockRemover));
        let score = listeners.register(Box::new(ScoreTracker::new(settings.hit_score)));
        for entry in &info.blocks {
            let mut block = Block::new(entry.rect, entry.color);
            block.add_hit_listener(remover);
            block.add_hit_listener(score);
            space.add(Body::Block(block));
        }
        counters.remaining_blocks = Counter::new(info.blocks.len() as i64);

        Self {
            name: info.name.clone(),
            background: info.background,
            space,
            listeners,
            counters,
            balls,
            paddle,
            deathzone,
            ticks: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn space(&self) -> &CollisionSpace {
        &self.space
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn counters(&self) -> &LevelCounters {
        &self.counters
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        match self.space.get(self.paddle)? {
            Body::Paddle(paddle) => Some(paddle),
            Body::Block(_) => None,
        }
    }

    pub fn deathzone(&self) -> BodyId {
        self.deathzone
    }

    pub fn score(&self) -> i64 {
        self.counters.score.value()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// No blocks or no balls left
    pub fn should_stop(&self) -> bool {
        self.counters.remaining_blocks.value() <= 0 || self.counters.remaining_balls.value() <= 0
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) {
        self.ticks += 1;

        let (left, right) = if input.autopilot {
            self.autopilot_steer()
        } else {
            (input.left, input.right)
        };
        if let Some(paddle) = self.space.paddle_mut() {
            if left {
                paddle.move_left();
            }
            if right {
                paddle.move_right();
            }
        }

        let mut removed = Vec::new();
        for ball in self.balls.iter_mut() {
            if removed.contains(&ball.id) {
                continue;
            }
            let outcome = advance(ball, &self.space);
            if outcome.events.is_empty() {
                continue;
            }
            let mut ctx = HitContext {
                space: &mut self.space,
                counters: &mut self.counters,
                removed_balls: &mut removed,
            };
            self.listeners.dispatch(&outcome.events, &mut ctx);
        }
        if !removed.is_empty() {
            self.balls.retain(|b| !removed.contains(&b.id));
        }
    }

    /// Run until the level stops or `max_ticks` have passed (counting
    /// ticks already played)
    pub fn run(&mut self, input: &TickInput, max_ticks: u64) -> LevelResult {
        log::info!(
            "Level '{}' started: {} balls, {} blocks",
            self.name,
            self.balls.len(),
            self.counters.remaining_blocks.value()
        );
        while !self.should_stop() && self.ticks < max_ticks {
            self.tick(input);
        }

        let result = LevelResult {
            outcome: self.outcome(),
            ticks: self.ticks,
            score: self.score(),
        };
        log::info!(
            "Level '{}' finished: {:?} after {} ticks, score {}",
            self.name,
            result.outcome,
            result.ticks,
            result.score
        );
        result
    }

    /// Current standing; losing every ball takes precedence
    pub fn outcome(&self) -> LevelOutcome {
        if self.counters.remaining_balls.value() <= 0 {
            LevelOutcome::OutOfBalls
        } else if self.counters.remaining_blocks.value() <= 0 {
            LevelOutcome::Cleared
        } else {
            LevelOutcome::TimedOut
        }
    }

    /// Steer under the lowest falling ball (or just the lowest ball)
    fn autopilot_steer(&self) -> (bool, bool) {
        let Some(paddle) = self.paddle() else {
            return (false, false);
        };
        let lowest = |falling: bool| {
            self.balls
                .iter()
                .filter(|b| !falling || b.velocity.dy > 0.0)
                .max_by(|a, b| a.center.y.total_cmp(&b.center.y))
        };
        let Some(ball) = lowest(true).or_else(|| lowest(false)) else {
            return (false, false);
        };

        let offset = ball.center.x - paddle.center_x();
        let slack = paddle.speed / 2.0;
        (offset < -slack, offset > slack)
    }
}

/// Starting ball centers for a ball count
fn ball_positions(count: usize, settings: &Settings) -> Vec<Point> {
    let center_x = settings.width / 2.0;
    let height = settings.height;
    match count {
        1 => vec![Point::new(center_x, height - 50.0)],
        2 | 3 => [
            Point::new(center_x + 80.0, height * 4.0 / 5.0),
            Point::new(center_x - 80.0, height * 4.0 / 5.0),
            Point::new(center_x, height * 3.0 / 4.0),
        ]
        .into_iter()
        .take(count)
        .collect(),
        10 => (0..10)
            .map(|i| {
                let j = ((i + 2) / 2) as f64;
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                Point::new(center_x + j * sign * 40.0, height / 2.0 + 3.0 * j * j)
            })
            .collect(),
        _ => vec![Point::new(center_x, height - 50.0); count],
    }
}

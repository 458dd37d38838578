//! Block Breaker - An arcade ball-and-paddle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, ball stepping, levels)
//! - `levels`: Built-in level definitions
//! - `flow`: Runs a sequence of levels and keeps the score
//! - `settings`: JSON configuration

pub mod flow;
pub mod levels;
pub mod settings;
pub mod sim;

pub use flow::{FlowOutcome, FlowReport, GameFlow};
pub use levels::{LevelInfo, Rgb};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Tolerance for point/slope equality and segment range checks
    pub const EPSILON: f64 = 1e-10;
    /// Distance a ball is nudged off a border it just struck
    pub const PUSH_OUT: f64 = 2e-10;

    /// Size substituted for a non-positive rectangle dimension
    pub const DEFAULT_RECT_SIZE: f64 = 5.0;

    /// Screen defaults
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;
    pub const BORDER_SIZE: f64 = 25.0;
    pub const SCORE_BAR_HEIGHT: f64 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: u32 = 4;

    /// Gap between the paddle bottom and the screen bottom
    pub const PADDLE_BOTTOM_GAP: f64 = 15.0;

    /// Maximum collision sub-steps a ball may take in one tick
    pub const MAX_SUBSTEPS: u32 = 64;
}

/// Tolerance equality for floats
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    a <= b + consts::EPSILON && a >= b - consts::EPSILON
}

/// Tolerance equality for optional floats (two `None`s are equal)
#[inline]
pub fn approx_eq_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => approx_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

//! Level definitions
//!
//! A [`LevelInfo`] is everything a level needs at setup: ball velocities,
//! paddle size and speed, the blocks and a background color. The four
//! built-in levels scale with the screen size in [`Settings`]; custom
//! levels can be read from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{Rect, Velocity};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const GRAY: Self = Self::new(128, 128, 128);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const ORANGE: Self = Self::new(255, 200, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const PINK: Self = Self::new(255, 175, 175);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A block to place at level start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub rect: Rect,
    pub color: Rgb,
}

impl BlockSpec {
    pub fn new(x: f64, y: f64, width: f64, height: f64, color: Rgb) -> Self {
        Self {
            rect: Rect::from_coords(x, y, width, height),
            color,
        }
    }
}

/// Level content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    /// One entry per ball
    pub ball_velocities: Vec<Velocity>,
    pub paddle_speed: f64,
    pub paddle_width: f64,
    pub blocks: Vec<BlockSpec>,
    pub background: Rgb,
}

/// Number of built-in levels
pub const BUILTIN_COUNT: usize = 4;

const BALL_SPEED: f64 = 4.0;
const BLOCK_HEIGHT: f64 = 25.0;

impl LevelInfo {
    pub fn number_of_balls(&self) -> usize {
        self.ball_velocities.len()
    }

    pub fn number_of_blocks_to_remove(&self) -> usize {
        self.blocks.len()
    }

    /// Built-in level by number (1-based)
    pub fn builtin(number: usize, settings: &Settings) -> Option<Self> {
        match number {
            1 => Some(direct_hit(settings)),
            2 => Some(wide_easy(settings)),
            3 => Some(green_three(settings)),
            4 => Some(final_four(settings)),
            _ => None,
        }
    }

    /// All built-in levels, in order
    pub fn all_builtin(settings: &Settings) -> Vec<Self> {
        (1..=BUILTIN_COUNT)
            .filter_map(|n| Self::builtin(n, settings))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a level file, `None` (with a warning) if it can't be used
    pub fn load(path: &Path) -> Option<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to read level file {}: {e}", path.display());
                return None;
            }
        };
        match Self::from_json(&json) {
            Ok(level) => Some(level),
            Err(e) => {
                log::warn!("Failed to parse level file {}: {e}", path.display());
                None
            }
        }
    }
}

/// A single block straight above the ball
fn direct_hit(settings: &Settings) -> LevelInfo {
    let size = 40.0;
    LevelInfo {
        name: "Direct Hit".into(),
        ball_velocities: vec![Velocity::from_angle_and_speed(0.0, BALL_SPEED)],
        paddle_speed: 7.0,
        paddle_width: 80.0,
        blocks: vec![BlockSpec::new(
            settings.width / 2.0 - size / 2.0,
            130.0,
            size,
            size,
            Rgb::RED,
        )],
        background: Rgb::BLACK,
    }
}

/// One row with a gap in the middle, a very wide paddle and a fan of balls
fn wide_easy(settings: &Settings) -> LevelInfo {
    let border = settings.border_size;
    let block_width = ((settings.width - 2.0 * border) / 15.0).floor();
    let y = 250.0;
    let colors = [
        Rgb::RED,
        Rgb::ORANGE,
        Rgb::YELLOW,
        Rgb::GREEN,
        Rgb::BLUE,
        Rgb::PINK,
        Rgb::CYAN,
    ];

    let ball_velocities = (0..5)
        .flat_map(|i| {
            let angle = f64::from(i) * 9.0;
            [
                Velocity::from_angle_and_speed(angle, BALL_SPEED),
                Velocity::from_angle_and_speed(-angle, BALL_SPEED),
            ]
        })
        .collect();

    let mut blocks: Vec<BlockSpec> = (0..14)
        .map(|i| {
            let gap = if i >= 7 { block_width } else { 0.0 };
            BlockSpec::new(
                border + i as f64 * block_width + gap,
                y,
                block_width,
                BLOCK_HEIGHT,
                colors[i / 2],
            )
        })
        .collect();
    blocks.push(BlockSpec::new(
        settings.width / 2.0 - block_width / 2.0,
        y,
        block_width,
        BLOCK_HEIGHT,
        colors[3],
    ));

    LevelInfo {
        name: "Wide Easy".into(),
        ball_velocities,
        paddle_speed: 4.0,
        paddle_width: 550.0,
        blocks,
        background: Rgb::WHITE,
    }
}

/// Staircase of rows, each one block shorter and shifted right
fn green_three(settings: &Settings) -> LevelInfo {
    let border = settings.border_size;
    let block_width = 50.0;
    let first_row = 10;
    let colors = [Rgb::GRAY, Rgb::RED, Rgb::YELLOW, Rgb::BLUE, Rgb::WHITE];

    let start_x = settings.width - border - first_row as f64 * block_width;
    let start_y = settings.height / 4.0;
    let blocks = colors
        .iter()
        .enumerate()
        .flat_map(|(row, &color)| {
            let row_x = start_x + row as f64 * block_width;
            let row_y = start_y + (row + 1) as f64 * BLOCK_HEIGHT;
            (0..first_row - row).map(move |col| {
                BlockSpec::new(row_x + col as f64 * block_width, row_y, block_width, BLOCK_HEIGHT, color)
            })
        })
        .collect();

    LevelInfo {
        name: "Green 3".into(),
        ball_velocities: vec![
            Velocity::from_angle_and_speed(225.0, BALL_SPEED),
            Velocity::from_angle_and_speed(135.0, BALL_SPEED),
        ],
        paddle_speed: 7.0,
        paddle_width: 80.0,
        blocks,
        background: Rgb::new(0, 128, 0),
    }
}

/// Full-width grid, seven rows deep
fn final_four(settings: &Settings) -> LevelInfo {
    let border = settings.border_size;
    let block_width = 50.0;
    let columns = 15;
    let colors = [
        Rgb::GRAY,
        Rgb::RED,
        Rgb::YELLOW,
        Rgb::GREEN,
        Rgb::WHITE,
        Rgb::PINK,
        Rgb::CYAN,
    ];

    let start_y = settings.height / 8.0;
    let blocks = colors
        .iter()
        .enumerate()
        .flat_map(|(row, &color)| {
            let row_y = start_y + (row + 1) as f64 * BLOCK_HEIGHT;
            (0..columns).map(move |col| {
                BlockSpec::new(border + col as f64 * block_width, row_y, block_width, BLOCK_HEIGHT, color)
            })
        })
        .collect();

    LevelInfo {
        name: "Final Four".into(),
        ball_velocities: vec![
            Velocity::from_angle_and_speed(225.0, 3.0),
            Velocity::from_angle_and_speed(135.0, 3.0),
            Velocity::from_angle_and_speed(180.0, BALL_SPEED),
        ],
        paddle_speed: 7.0,
        paddle_width: 80.0,
        blocks,
        background: Rgb::new(0, 102, 204),
    }
}

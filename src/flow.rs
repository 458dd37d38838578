//! Game flow: plays levels in order and keeps the running score

use crate::levels::LevelInfo;
use crate::settings::Settings;
use crate::sim::{GameLevel, LevelOutcome, LevelResult, TickInput};

/// How a run of levels ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Every level cleared
    Won,
    /// A level ran out of balls
    Lost,
    /// A level hit the tick cap
    TimedOut,
}

/// Final report of [`GameFlow::run_levels`]
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub outcome: FlowOutcome,
    pub score: i64,
    /// Per level, in the order played
    pub levels: Vec<(String, LevelResult)>,
}

impl FlowReport {
    pub fn total_ticks(&self) -> u64 {
        self.levels.iter().map(|(_, r)| r.ticks).sum()
    }
}

pub struct GameFlow {
    settings: Settings,
    score: i64,
}

impl GameFlow {
    pub fn new(settings: Settings) -> Self {
        Self { settings, score: 0 }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Score so far
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Play `levels` in order until one is lost or they are all cleared
    pub fn run_levels(&mut self, levels: &[LevelInfo]) -> FlowReport {
        let input = TickInput {
            autopilot: self.settings.autopilot,
            ..Default::default()
        };
        let mut played = Vec::with_capacity(levels.len());

        for info in levels {
            let mut level = GameLevel::new(info, &self.settings);
            let result = level.run(&input, self.settings.max_ticks_per_level);
            self.score += result.score;
            played.push((info.name.clone(), result));

            let outcome = match result.outcome {
                LevelOutcome::Cleared => {
                    self.score += self.settings.level_clear_bonus;
                    continue;
                }
                LevelOutcome::OutOfBalls => FlowOutcome::Lost,
                LevelOutcome::TimedOut => FlowOutcome::TimedOut,
            };
            log::info!("Game over ({outcome:?}) in '{}', score {}", info.name, self.score);
            return self.report(outcome, played);
        }

        log::info!("All {} levels cleared, score {}", levels.len(), self.score);
        self.report(FlowOutcome::Won, played)
    }

    fn report(&self, outcome: FlowOutcome, levels: Vec<(String, LevelResult)>) -> FlowReport {
        FlowReport {
            outcome,
            score: self.score,
            levels,
        }
    }
}

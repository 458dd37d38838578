//! Block Breaker entry point
//!
//! Headless launcher: picks levels from the command line and plays them
//! with the paddle on autopilot.
//!
//! ```text
//! block-breaker [--config <file>] [--level-file <file>]... [--print-config] [1-4]...
//! ```
//!
//! Numbers select built-in levels in the order given; anything else is
//! ignored. With no usable selection all built-in levels are played.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use block_breaker::{FlowOutcome, GameFlow, LevelInfo, Settings, levels::BUILTIN_COUNT};

/// Parsed command line
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    level_files: Vec<PathBuf>,
    level_numbers: Vec<usize>,
    print_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args(args: impl IntoIterator<Item = String>) -> Options {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => options.config = args.next().map(PathBuf::from),
            "--level-file" => options.level_files.extend(args.next().map(PathBuf::from)),
            "--print-config" => options.print_config = true,
            _ => match arg.parse::<usize>() {
                Ok(n) if (1..=BUILTIN_COUNT).contains(&n) => options.level_numbers.push(n),
                _ => log::debug!("Ignoring argument {arg:?}"),
            },
        }
    }
    options
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Block Breaker (headless) starting...");

    let options = parse_args(std::env::args().skip(1));
    let settings = Settings::load(options.config.as_deref());

    if options.print_config {
        match settings.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
        return;
    }

    let mut levels: Vec<LevelInfo> = options
        .level_numbers
        .iter()
        .filter_map(|&n| LevelInfo::builtin(n, &settings))
        .collect();
    levels.extend(options.level_files.iter().filter_map(|p| LevelInfo::load(p)));
    if levels.is_empty() {
        levels = LevelInfo::all_builtin(&settings);
    }

    let mut flow = GameFlow::new(settings);
    let report = flow.run_levels(&levels);

    for (name, result) in &report.levels {
        println!(
            "{name:<12} {:?} in {} ticks ({:.1}s), {} points",
            result.outcome,
            result.ticks,
            flow.settings().ticks_to_seconds(result.ticks),
            result.score
        );
    }
    let verdict = match report.outcome {
        FlowOutcome::Won => "You Win!",
        FlowOutcome::Lost => "Game Over.",
        FlowOutcome::TimedOut => "Stopped at the tick limit.",
    };
    println!("{verdict} Your score is {}", report.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the only wasm target
}

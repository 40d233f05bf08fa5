//! Seaward headless driver
//!
//! Runs the simulation on a fixed timestep against a level file, with a
//! seeded autopilot standing in for the keyboard. Usage:
//!
//! ```text
//! seaward [level.json] [settings.json] [seed]
//! ```

use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use seaward::consts::*;
use seaward::sim::{Action, GameEvent, InputState, World, tick};
use seaward::{LevelData, LevelError, Settings, SettingsError};

/// Level used when no path is given
const BUNDLED_LEVEL: &str = include_str!("../assets/levels/harbor.json");

/// Display frame time; deliberately off the sim rate so the accumulator works
const FRAME_DT: f32 = 1.0 / 50.0;
/// Hard stop for runaway runs (simulated seconds)
const MAX_RUN_SECS: f32 = 180.0;

/// Random steering with a fixed seed, so runs are reproducible
struct Autopilot {
    rng: Pcg32,
    hold_ticks: u32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            hold_ticks: 0,
        }
    }

    /// Hold the current steering for a while, then pick another
    fn steer(&mut self, input: &mut InputState) {
        if self.hold_ticks > 0 {
            self.hold_ticks -= 1;
            return;
        }
        self.hold_ticks = self.rng.random_range(20..90);

        for action in [Action::Forward, Action::Backward, Action::Left, Action::Right] {
            input.release(action);
        }
        match self.rng.random_range(0..6) {
            0 => input.press(Action::Left),
            1 => input.press(Action::Right),
            2 => input.press(Action::Forward),
            3 => input.press(Action::Backward),
            4 => {
                input.press(Action::Forward);
                input.press(Action::Left);
            }
            _ => {} // Drift
        }
    }
}

/// Run statistics
#[derive(Debug, Default)]
struct Stats {
    collisions: u32,
    impacts: u32,
    spawned: usize,
}

/// Game instance holding all state
struct Game {
    world: World,
    input: InputState,
    autopilot: Autopilot,
    accumulator: f32,
    stats: Stats,
}

impl Game {
    fn new(world: World, seed: u64) -> Self {
        Self {
            world,
            input: InputState::default(),
            autopilot: Autopilot::new(seed),
            accumulator: 0.0,
            stats: Stats::default(),
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.autopilot.steer(&mut self.input);
            tick(&mut self.world, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in self.world.drain_events() {
                match event {
                    GameEvent::Collision { .. } => self.stats.collisions += 1,
                    GameEvent::Impact { .. } => self.stats.impacts += 1,
                    GameEvent::Spawned { entities, .. } => self.stats.spawned += entities.len(),
                }
            }
        }
    }
}

/// Settings from an explicit path must load; without one, use defaults
fn load_settings(path: Option<&str>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

fn run(level_path: Option<&str>, settings: Settings, seed: u64) -> Result<(), LevelError> {
    let level = match level_path {
        Some(path) => LevelData::load(path)?,
        None => {
            log::info!("No level given, using bundled harbor level");
            LevelData::from_json(BUNDLED_LEVEL)?
        }
    };
    let mut game = Game::new(World::from_level(&level, settings)?, seed);
    log::info!("Running with seed {}", seed);

    let mut elapsed = 0.0f32;
    let mut next_report = 1.0f32;
    while !game.world.should_terminate {
        if game.world.viewport.is_finished() || elapsed >= MAX_RUN_SECS {
            game.input.press(Action::Break);
        }

        game.update(FRAME_DT);
        elapsed += FRAME_DT;

        let frame = game.world.snapshot();
        if elapsed >= next_report {
            next_report += 1.0;
            log::info!(
                "t={:>5.1}s scroll={:>6.1} player=({:>6.1}, {:>5.1}) drawn={} hits={} impacts={}",
                elapsed,
                frame.scroll_offset,
                game.world.player.pos.x,
                game.world.player.pos.y,
                frame.items.len(),
                game.stats.collisions,
                game.stats.impacts
            );
        }
    }

    log::info!(
        "Done after {} ticks: {} collisions, {} impacts, {} spawned, {} colliders live",
        game.world.time_ticks,
        game.stats.collisions,
        game.stats.impacts,
        game.stats.spawned,
        game.world.colliders.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = match args.get(2).map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed '{}': {}", args[2], e);
            return ExitCode::FAILURE;
        }
        None => 0x5EA_3A2D,
    };

    let settings = match load_settings(args.get(1).map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args.first().map(String::as_str), settings, seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to load level: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_settings_path_must_load() {
        assert!(load_settings(Some("/nonexistent/seaward-settings.json")).is_err());

        let path = std::env::temp_dir().join("seaward_driver_bad_settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = load_settings(path.to_str());
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_no_settings_path_uses_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.scroll_rate, SCROLL_RATE);
    }
}

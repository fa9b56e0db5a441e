//! Brickfall headless runner
//!
//! Loads levels and tuning, then plays the simulation with a simple
//! autopilot at a fixed frame rate, logging every game event.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use brickfall::levels::LevelSource;
    use brickfall::sim::{GameEvent, GameState, TickInput, tick};
    use brickfall::{LayoutMode, LevelSet, Tuning};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run the brick breaker simulation headless", long_about = None)]
    pub struct Args {
        /// Level JSON file; the built-in level is used if it is missing or invalid
        #[arg(long)]
        levels: Option<PathBuf>,
        /// Tuning JSON file; defaults are used if it is missing or invalid
        #[arg(long)]
        tuning: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u32,
        /// Frame rate the fixed frame delta is derived from
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Global speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Zero-based level to start on (clamped)
        #[arg(long, default_value_t = 0)]
        level: usize,
        /// Layout mode: landscape or portrait
        #[arg(long, default_value = "landscape")]
        layout: String,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    }

    /// Intents for the next frame: chase the lowest falling ball, fire
    /// whenever the laser is armed, relaunch anything stuck.
    fn autopilot(state: &GameState) -> TickInput {
        let target = state
            .balls
            .iter()
            .filter(|b| !b.stuck && b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| state.balls.first());

        TickInput {
            move_to: target.map(|b| b.pos.x),
            launch: state.balls.iter().any(|b| b.stuck),
            fire: state.laser_active(),
            ..Default::default()
        }
    }

    pub fn run(args: Args) -> Result<(), serde_json::Error> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let sources: Vec<LevelSource> = args.levels.iter().cloned().map(LevelSource::File).collect();
        let levels = LevelSet::load_layered(&sources);

        let mut state = GameState::new(tuning, levels, args.seed);
        match LayoutMode::from_str(&args.layout) {
            Some(layout) => state.set_layout_mode(layout),
            None => log::warn!("Unknown layout '{}', staying in landscape", args.layout),
        }
        let setup = TickInput {
            select_level: Some(args.level),
            speed: Some(args.speed),
            ..Default::default()
        };
        tick(&mut state, &setup, 0.0);

        let dt = if args.fps.is_finite() && args.fps > 0.0 {
            1.0 / args.fps
        } else {
            1.0 / 60.0
        };
        log::info!(
            "Running {} frames at {:.1} fps (seed {}, speed x{})",
            args.frames,
            1.0 / dt,
            args.seed,
            state.speed_mul
        );

        let (mut games_over, mut levels_won) = (0u32, 0u32);
        for frame in 0..args.frames {
            let input = autopilot(&state);
            tick(&mut state, &input, dt);
            for event in state.drain_events() {
                match event {
                    GameEvent::GameOver => games_over += 1,
                    GameEvent::LevelWon { .. } => levels_won += 1,
                    _ => {}
                }
                log::debug!("frame {frame}: {event:?}");
                if matches!(
                    event,
                    GameEvent::LifeLost | GameEvent::GameOver | GameEvent::LevelWon { .. }
                ) {
                    log::info!("frame {frame}: {event:?}");
                }
            }
        }

        let alive = state.bricks.iter().filter(|b| b.alive).count();
        println!(
            "level {} '{}': score {}, lives {}, balls {}, bricks left {}/{}, levels won {}, games over {}",
            state.level_index + 1,
            state.level().name,
            state.score,
            state.lives,
            state.balls.len(),
            alive,
            state.bricks.len(),
            levels_won,
            games_over
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brickfall (headless) starting...");

    let args = headless::Args::parse();
    if let Err(e) = headless::run(args) {
        log::error!("Failed to write snapshot: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation library is driven by the host page on the web
}

//! Grid Bomber entry point
//!
//! Headless runner: plays a stage with a random autopilot and prints the
//! final board.
//!
//! Usage: grid-bomber [--stage N] [--ticks N] [--tuning PATH]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand::seq::IndexedRandom;
    use rand_pcg::Pcg32;

    use grid_bomber::audio::LogSoundSink;
    use grid_bomber::consts::{SIM_DT, TICK_RATE};
    use grid_bomber::input::{ActionState, InputAction, InputSource, MergedInput, ScriptedInput};
    use grid_bomber::renderer::AsciiRenderer;
    use grid_bomber::sim::Direction;
    use grid_bomber::{Session, Tuning, stage_seed};

    /// Ticks between autopilot direction changes
    const TURN_EVERY: u64 = 24;
    /// Ticks between autopilot bombs
    const BOMB_EVERY: u64 = 90;

    struct Options {
        stage: u32,
        ticks: u64,
        tuning: Option<PathBuf>,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                stage: 1,
                ticks: TICK_RATE as u64 * 30,
                tuning: None,
            }
        }
    }

    fn parse_args() -> Options {
        let mut options = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stage" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(stage) => options.stage = stage,
                    None => log::warn!("--stage expects a number"),
                },
                "--ticks" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(ticks) => options.ticks = ticks,
                    None => log::warn!("--ticks expects a number"),
                },
                "--tuning" => match args.next() {
                    Some(path) => options.tuning = Some(PathBuf::from(path)),
                    None => log::warn!("--tuning expects a path"),
                },
                other => log::warn!("Ignoring unknown argument {}", other),
            }
        }
        options
    }

    /// Wanders randomly and drops bombs on a timer
    struct Autopilot {
        rng: Pcg32,
        direction: Direction,
    }

    impl Autopilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed),
                direction: Direction::Right,
            }
        }
    }

    impl InputSource for Autopilot {
        fn poll(&mut self, tick: u64) -> ActionState {
            if tick % TURN_EVERY == 0 {
                if let Some(direction) = Direction::ALL.choose(&mut self.rng) {
                    self.direction = *direction;
                }
            }
            let state = ActionState::empty().with_held(InputAction::for_direction(self.direction));
            if tick % BOMB_EVERY == BOMB_EVERY / 2 {
                state.with_pressed(InputAction::PlaceBomb)
            } else {
                state
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let options = parse_args();
        let tuning = options.tuning.map(Tuning::load).unwrap_or_default();
        log::info!(
            "Grid Bomber (headless) starting: stage {}, {} ticks",
            options.stage,
            options.ticks
        );

        let mut session = Session::new(options.stage, tuning);
        // Open by stepping off the spawn tile and bombing the first corridor
        let opening = ScriptedInput::new()
            .hold(0, 8, InputAction::MoveRight)
            .tap(8, InputAction::PlaceBomb)
            .hold(9, 8, InputAction::MoveLeft)
            .hold(17, 16, InputAction::MoveDown);
        let mut input = MergedInput::new()
            .with(opening)
            .with(Autopilot::new(stage_seed(options.stage)));
        let mut sound = LogSoundSink::new();
        let mut renderer = AsciiRenderer::new();

        while session.frame() < options.ticks {
            session.advance(SIM_DT, &mut input, &mut sound, &mut renderer);
        }

        log::info!(
            "Finished at stage {} ({:?}) after {} frames, {} drawn, {} sounds",
            session.stage(),
            session.phase(),
            session.frame(),
            renderer.frames_presented(),
            sound.played()
        );
        print!("{}", renderer.frame());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the wasm surface
}

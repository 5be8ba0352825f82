//! Space Shooter entry point
//!
//! On the web the game runs in the `#canvas` element, driven by `requestAnimationFrame`.
//! Natively it plays on autopilot against a synthetic, jittery display clock and prints
//! the resulting leaderboard.
//!
//! Usage: `space-shooter [--seconds N] [--seed N] [--difficulty easy|normal|hard] [--data-dir PATH]`

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    use space_shooter::audio::AudioManager;
    use space_shooter::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use space_shooter::persistence::{LocalStorageStore, Storage};
    use space_shooter::platform::time;
    use space_shooter::platform::web::{AnimationFrameScheduler, bind_keyboard};
    use space_shooter::renderer::CanvasSurface;
    use space_shooter::sim::Field;
    use space_shooter::{App, Game, GameError, GameLoop, LoopConfig};

    fn unavailable(reason: &str) -> GameError {
        GameError::SurfaceUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn run() -> Result<(), GameError> {
        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let canvas = window
            .document()
            .and_then(|doc| doc.get_element_by_id("canvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| unavailable("no #canvas element"))?;
        let surface = CanvasSurface::new(canvas, FIELD_WIDTH, FIELD_HEIGHT)?;

        let storage = Storage::new(LocalStorageStore::new());
        let game = Game::new(
            Box::new(storage),
            Field::default(),
            time::timestamp_ms() as u64,
        );
        let audio = AudioManager::from_settings(game.settings());
        let app = Rc::new(RefCell::new(App::new(game, surface, audio)));

        {
            let app = app.clone();
            bind_keyboard(&window, move |event| {
                app.borrow_mut().game_mut().input_mut().apply(event);
            });
        }

        let game_loop = Rc::new(RefCell::new(GameLoop::new(
            AnimationFrameScheduler::new(window),
            LoopConfig::default(),
        )));
        {
            let driver = game_loop.clone();
            game_loop.borrow().scheduler().set_callback(move |now_ms| {
                driver.borrow_mut().frame(now_ms, &mut *app.borrow_mut());
            });
        }
        game_loop.borrow_mut().start(time::monotonic_ms());

        log::info!("Space Shooter running in the browser");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    space_shooter::platform::init_logging();
    if let Err(e) = web_app::run() {
        log::error!("{}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use space_shooter::audio::AudioManager;
    use space_shooter::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use space_shooter::game_loop::ManualScheduler;
    use space_shooter::persistence::{FileStore, Persistence, Storage};
    use space_shooter::platform::{self, KeyCode};
    use space_shooter::renderer::{HeadlessSurface, scene};
    use space_shooter::sim::Field;
    use space_shooter::{App, Difficulty, Game, GameError, GameLoop, LoopConfig, Mode};

    struct Options {
        seconds: f64,
        seed: u64,
        /// Stored into the config record before the run starts
        difficulty: Option<Difficulty>,
        data_dir: PathBuf,
    }

    impl Options {
        fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut options = Self {
                seconds: 120.0,
                seed: platform::time::timestamp_ms() as u64,
                difficulty: None,
                data_dir: std::env::temp_dir().join("space-shooter"),
            };
            let mut args = args;
            while let Some(arg) = args.next() {
                let mut value = || args.next().ok_or_else(|| format!("{arg} needs a value"));
                match arg.as_str() {
                    "--seconds" => {
                        options.seconds = value()?
                            .parse()
                            .map_err(|e| format!("bad --seconds: {e}"))?;
                    }
                    "--seed" => {
                        options.seed = value()?
                            .parse()
                            .map_err(|e| format!("bad --seed: {e}"))?;
                    }
                    "--difficulty" => {
                        let name = value()?;
                        let difficulty = Difficulty::parse(&name)
                            .ok_or_else(|| format!("unknown difficulty {name}"))?;
                        options.difficulty = Some(difficulty);
                    }
                    "--data-dir" => options.data_dir = PathBuf::from(value()?),
                    other => return Err(format!("unknown argument {other}")),
                }
            }
            Ok(options)
        }
    }

    fn run(options: &Options) -> Result<(), GameError> {
        let mut storage = Storage::new(FileStore::new(&options.data_dir));
        if let Some(difficulty) = options.difficulty {
            let mut settings = storage.config();
            settings.difficulty = difficulty;
            // Unlike in-game saves, this one must land
            storage.try_save_config(&settings)?;
        }
        let mut game = Game::new(Box::new(storage), Field::default(), options.seed);
        game.set_demo(true);
        let surface = HeadlessSurface::new(FIELD_WIDTH, FIELD_HEIGHT)?;
        let audio = AudioManager::from_settings(game.settings());
        let mut app = App::new(game, surface, audio);

        log::info!(
            "Running {:.0}s demo with seed {} (data in {})",
            options.seconds,
            options.seed,
            options.data_dir.display()
        );

        let mut game_loop = GameLoop::new(ManualScheduler::new(), LoopConfig::default());
        let mut jitter = Pcg32::seed_from_u64(options.seed ^ 0x5eed);
        let mut now: f64 = 0.0;
        let end = options.seconds * 1000.0;
        game_loop.start(now);
        let started = platform::time::monotonic_ms();

        // Confirm on the main menu for the first frame
        app.game_mut().input_mut().key_down(KeyCode::Enter);
        let mut frames = 0u64;
        while now < end {
            // Mostly 60 Hz with the occasional hitch
            now += if jitter.random_bool(0.02) {
                jitter.random_range(50.0f64..250.0)
            } else {
                jitter.random_range(14.0f64..19.0)
            };
            game_loop.frame(now, &mut app);
            frames += 1;
            if frames == 1 {
                app.game_mut().input_mut().key_up(KeyCode::Enter);
            }
            if matches!(app.game().mode(), Mode::GameOver | Mode::Victory) {
                break;
            }
        }
        game_loop.stop();

        let world = app.game().world();
        println!(
            "{:?} after {:.1}s: score {}, level {}, health {}",
            app.game().mode(),
            now / 1000.0,
            world.state.score,
            world.state.level,
            world.player.health
        );
        println!(
            "{} frames, {} steps, {} cues in {:.0}ms of wall time",
            frames,
            game_loop.total_steps(),
            app.audio().played(),
            platform::time::monotonic_ms() - started
        );

        // Read back through a fresh handle to show what actually reached storage
        let scores = Storage::new(FileStore::new(&options.data_dir)).high_scores(10);
        println!("High scores:");
        if scores.is_empty() {
            println!("  (none)");
        }
        for (i, entry) in scores.iter().enumerate() {
            println!("  {}", scene::format_score_line(i + 1, entry));
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        platform::init_logging();

        let options = match Options::parse(std::env::args().skip(1)) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("{e}");
                eprintln!(
                    "usage: space-shooter [--seconds N] [--seed N] [--difficulty easy|normal|hard] [--data-dir PATH]"
                );
                return ExitCode::FAILURE;
            }
        };

        match run(&options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

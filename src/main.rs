//! Lane Runner - headless runner
//!
//! Drives a session with the autopilot at a fixed 60 Hz frame rate, logging
//! what a renderer and sound system would be told, then prints the final
//! snapshot as JSON.
//!
//! Usage: `lane-runner [--seed N] [--seconds N] [TUNING.json]` (see `--help`)
//! Log verbosity follows `RUST_LOG` (default `info`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use lane_runner::audio::{AudioManager, LogBackend};
    use lane_runner::present::{Autopilot, InputSource, LogRenderer, present};
    use lane_runner::sim::{GameSession, SessionConfig};
    use lane_runner::tuning::Tuning;

    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Headless lane runner driven by the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "lane-runner")]
    #[command(about = "Run a lane runner session headless and print the final snapshot")]
    pub(crate) struct Cli {
        /// RNG seed for spawn placement
        #[arg(long, default_value_t = 42)]
        pub seed: u64,

        /// Simulated seconds to run (stops early on game over)
        #[arg(long, default_value_t = 120.0, value_parser = parse_seconds)]
        pub seconds: f32,

        /// Optional JSON tuning file
        pub tuning: Option<PathBuf>,
    }

    fn parse_seconds(value: &str) -> Result<f32, String> {
        match value.parse::<f32>() {
            Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
            _ => Err(format!("'{value}' is not a positive number of seconds")),
        }
    }

    pub fn run() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Failed to load tuning from {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            },
            None => Tuning::default(),
        };

        log::info!("Lane Runner starting (seed {})", cli.seed);
        let mut session = GameSession::new(SessionConfig {
            seed: cli.seed,
            tuning,
        });
        let mut input = Autopilot::new();
        let mut renderer = LogRenderer::default();
        let mut audio = AudioManager::new(LogBackend::default());

        let frames = (cli.seconds / FRAME_DT).ceil() as u64;
        for _ in 0..frames {
            let intent = input.intent(&session.snapshot());
            let report = session.advance(&intent, FRAME_DT);
            present(&session.snapshot(), &report, &mut renderer, &mut audio);
            if session.state().is_game_over {
                break;
            }
        }

        let snapshot = session.snapshot();
        log::info!(
            "Finished after {:.1}s: stage {} score {} hp {:.1} ({} frames, {} effects, {} voices)",
            snapshot.time,
            snapshot.state.stage,
            snapshot.state.score,
            snapshot.state.hp,
            renderer.frames,
            renderer.effects,
            audio.backend().scheduled
        );

        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize snapshot: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts embed the library directly
}

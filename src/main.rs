//! Tilt Maze entry point
//!
//! The playable build runs in the browser (see `platform::web`). Natively this
//! is a headless demo: an autopilot tilts the ball along the solved path for a
//! few levels, racing and saving ghosts in a local directory.
//!
//! Usage: `tilt-maze [seed] [levels] [ghost-dir]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let levels = args.next().and_then(|s| s.parse().ok()).unwrap_or(3u32);
    let ghost_dir = args.next().unwrap_or_else(|| "ghosts".to_string());

    if let Err(e) = demo::run(seed, levels, &ghost_dir) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use tilt_maze::persistence::{FileStore, KeyValueStore};
    use tilt_maze::scoring::format_time;
    use tilt_maze::sim::{TickInput, path_between};
    use tilt_maze::{GameSession, Result, Tuning};

    /// Simulated 60 Hz display
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a level after five simulated minutes
    const MAX_FRAMES: usize = 60 * 60 * 5;
    /// Phone-sized portrait viewport
    const VIEWPORT: Vec2 = Vec2::new(390.0, 844.0);

    pub fn run(seed: u64, levels: u32, ghost_dir: &str) -> Result<()> {
        let store = FileStore::open(ghost_dir)?;
        log::info!("Ghosts stored in {}", store.dir().display());

        let mut session = GameSession::new(seed, VIEWPORT, store, Tuning::default());
        for _ in 0..levels {
            play_level(&mut session);
            session.next_level();
        }
        Ok(())
    }

    fn play_level<S: KeyValueStore>(session: &mut GameSession<S>) {
        let best = session.best_time();
        println!(
            "Level {} [{}] optimal {:.0}px{}",
            session.level(),
            session.fingerprint(),
            session.optimal_distance(),
            best.map(|t| format!(", ghost best {}", format_time(t)))
                .unwrap_or_default()
        );

        let mut ghost_finished_at = None;
        for frame in 0..MAX_FRAMES {
            let gravity = autopilot(session);
            let tick = session.advance(&TickInput { gravity }, FRAME_DT);

            if session.has_ghost() && tick.ghost.is_none() && ghost_finished_at.is_none() {
                ghost_finished_at = Some(frame);
            }

            if let Some(summary) = tick.completed {
                println!(
                    "  finished in {} ({:.2}s), ratio {:.2}, {} {}{}",
                    format_time(summary.time),
                    summary.time,
                    summary.score.ratio,
                    "*".repeat(summary.score.stars as usize),
                    summary.score.label(),
                    if summary.new_best { ", new best ghost" } else { "" }
                );
                if ghost_finished_at.is_some() {
                    println!("  the ghost got there first");
                }
                return;
            }
        }
        println!("  autopilot gave up after {} frames", MAX_FRAMES);
    }

    /// Tilt toward the next cell on the shortest route from wherever the ball is
    fn autopilot<S: KeyValueStore>(session: &GameSession<S>) -> Vec2 {
        let maze = session.maze();
        let layout = session.layout();
        let state = session.simulator().state();

        let here = layout
            .cell_at(state.position(), maze.rows(), maze.cols())
            .unwrap_or(maze.start());
        let path = path_between(maze, here, maze.end());
        let next = path.get(1).copied().unwrap_or(maze.end());
        let target = layout.cell_center(next);

        // Proportional pull toward the target, damped by current velocity
        let steer = (target - state.position()) / layout.cell_size * 4.0 - state.velocity() / 150.0;
        let steer = steer.clamp_length_max(1.0);

        // Device gravity y points up
        Vec2::new(steer.x, -steer.y)
    }
}

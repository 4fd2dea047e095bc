//! A play session: levels, mazes, scoring and ghosts
//!
//! The host calls [`GameSession::advance`] once per frame. Inside a tick the
//! order is fixed: ball physics, then ghost recording, then ghost playback.
//! Maze generation and path solving happen synchronously whenever a maze is
//! (re)built, never during a tick.
//!
//! Ghosts are recorded in grid units (see [`Layout::to_grid_units`]) so a run
//! recorded at one viewport replays on the same cells at any other.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{BASE_COLS, BASE_ROWS, MAX_EXTRA_COLS, MAX_EXTRA_ROWS};
use crate::ghost::{GhostPlayer, GhostRecorder, fingerprint};
use crate::persistence::{GhostStore, KeyValueStore};
use crate::scoring::ScoreResult;
use crate::sim::{BallSimulator, GridPos, Layout, Maze, TickInput, TickSnapshot, optimal_distance};
use crate::tuning::Tuning;

/// Grid size for a level: grows a row every 3 levels and a column every 4
pub fn grid_for_level(level: u32) -> (usize, usize) {
    let level = level as usize;
    (
        BASE_ROWS + (level / 3).min(MAX_EXTRA_ROWS),
        BASE_COLS + (level / 4).min(MAX_EXTRA_COLS),
    )
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub level: u32,
    pub fingerprint: String,
    /// Seconds from first accepted tick to goal
    pub time: f32,
    pub traveled: f32,
    pub optimal: f32,
    pub score: ScoreResult,
    /// This run replaced (or became) the stored ghost
    pub new_best: bool,
}

/// Everything a renderer needs after one tick
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTick {
    pub ball: TickSnapshot,
    /// Ghost position, or `None` if there is no ghost or it has finished
    pub ghost: Option<Vec2>,
    /// Present only on the tick the goal was reached
    pub completed: Option<RunSummary>,
}

pub struct GameSession<S> {
    tuning: Tuning,
    level: u32,
    seeds: Pcg32,
    viewport: Vec2,
    maze: Maze,
    layout: Layout,
    fingerprint: String,
    optimal: f32,
    sim: BallSimulator,
    recorder: GhostRecorder,
    player: GhostPlayer,
    store: GhostStore<S>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Start at level 1. `seed` fixes every maze the session will produce.
    pub fn new(seed: u64, viewport: Vec2, backend: S, tuning: Tuning) -> Self {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let level = 1;
        let (rows, cols) = grid_for_level(level);
        let maze = Maze::generate(rows, cols, GridPos::default(), next_maze_seed(&mut seeds));
        let layout = Layout::fit(viewport, rows, cols);
        let sim = BallSimulator::new(&maze, &layout, tuning.physics);

        let mut session = Self {
            tuning,
            level,
            seeds,
            viewport,
            fingerprint: String::new(),
            optimal: 0.0,
            recorder: GhostRecorder::new(tuning.ghost.sample_interval),
            player: GhostPlayer::new(),
            store: GhostStore::new(backend),
            maze,
            layout,
            sim,
        };
        session.begin_run();
        session
    }

    /// Advance one frame. Invalid `dt` values leave everything untouched.
    pub fn advance(&mut self, input: &TickInput, dt: f32) -> SessionTick {
        let was_won = self.sim.state().has_won();
        let ball = self.sim.update(&self.maze, &self.layout, input, dt);

        if !was_won {
            let units = self.layout.to_grid_units(ball.position);
            self.recorder.sample(units, ball.elapsed);
        }
        let completed = ball.just_won.then(|| self.complete_run(&ball));
        let ghost = self
            .player
            .position_at(ball.elapsed)
            .map(|units| self.layout.from_grid_units(units));

        SessionTick {
            ball,
            ghost,
            completed,
        }
    }

    fn complete_run(&mut self, ball: &TickSnapshot) -> RunSummary {
        let units = self.layout.to_grid_units(ball.position);
        let new_best = match self.recorder.finish(units, ball.elapsed) {
            Some(run) => self.store.offer(&run).unwrap_or_else(|e| {
                log::warn!("Failed to save ghost for {}: {}", self.fingerprint, e);
                false
            }),
            None => false,
        };

        let score = ScoreResult::compute(ball.traveled, self.optimal, &self.tuning.scoring);
        log::info!(
            "Level {} complete: {:.2}s, ratio {:.2}, {} stars{}",
            self.level,
            ball.elapsed,
            score.ratio,
            score.stars,
            if new_best { " (new best)" } else { "" }
        );

        RunSummary {
            level: self.level,
            fingerprint: self.fingerprint.clone(),
            time: ball.elapsed,
            traveled: ball.traveled,
            optimal: self.optimal,
            score,
            new_best,
        }
    }

    /// Move to the next level with a larger, freshly seeded maze
    pub fn next_level(&mut self) {
        self.level += 1;
        let (rows, cols) = grid_for_level(self.level);
        self.rebuild(rows, cols);
    }

    /// New maze at the current size and level
    pub fn reset_maze(&mut self) {
        let (rows, cols) = (self.maze.rows(), self.maze.cols());
        self.rebuild(rows, cols);
    }

    /// Replay the current maze from the start, racing the stored ghost
    pub fn restart(&mut self) {
        self.begin_run();
    }

    /// Viewport changed: refit the grid and restart tracking
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.set_layout(Layout::fit(viewport, self.maze.rows(), self.maze.cols()));
    }

    /// Use a host-computed layout for the current maze
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.begin_run();
    }

    fn rebuild(&mut self, rows: usize, cols: usize) {
        let seed = next_maze_seed(&mut self.seeds);
        self.maze = Maze::generate(rows, cols, GridPos::default(), seed);
        self.layout = Layout::fit(self.viewport, rows, cols);
        log::info!("Level {}: {}x{} maze, seed {}", self.level, rows, cols, seed);
        self.begin_run();
    }

    /// Reset the ball, baseline and ghosts for the current maze and layout
    fn begin_run(&mut self) {
        self.fingerprint = fingerprint(
            self.maze.rows(),
            self.maze.cols(),
            self.level,
            self.maze.seed(),
        );
        self.optimal = optimal_distance(&self.maze, self.layout.cell_size);
        self.sim.reset(&self.maze, &self.layout);

        self.recorder.start(self.fingerprint.clone(), self.level);
        let units = self.layout.to_grid_units(self.sim.state().position());
        self.recorder.sample(units, 0.0);

        let best = self.store.load_best(&self.fingerprint).unwrap_or_else(|e| {
            log::warn!("Failed to load ghost for {}: {}", self.fingerprint, e);
            None
        });
        self.player.load(best);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Shortest start-to-goal distance in pixels
    pub fn optimal_distance(&self) -> f32 {
        self.optimal
    }

    pub fn simulator(&self) -> &BallSimulator {
        &self.sim
    }

    pub fn has_ghost(&self) -> bool {
        self.player.has_ghost()
    }

    /// Stored best time for the current maze
    pub fn best_time(&self) -> Option<f32> {
        self.player.run().map(|run| run.time)
    }

    /// Live score for the run so far
    pub fn score(&self) -> ScoreResult {
        ScoreResult::compute(self.sim.state().traveled(), self.optimal, &self.tuning.scoring)
    }

    pub fn store(&self) -> &GhostStore<S> {
        &self.store
    }
}

/// Maze seeds stay within u32 so JS hosts can hold them exactly
fn next_maze_seed(seeds: &mut Pcg32) -> u64 {
    u64::from(seeds.random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::{GhostRun, Snapshot};
    use crate::persistence::{MemoryStore, storage_key};

    const DT: f32 = 1.0 / 60.0;

    fn session(seed: u64) -> GameSession<MemoryStore> {
        GameSession::new(seed, Vec2::new(390.0, 844.0), MemoryStore::new(), Tuning::default())
    }

    /// Steer along the solved path until the goal is reached
    fn play_to_goal(
        session: &mut GameSession<MemoryStore>,
        max_ticks: usize,
    ) -> Option<RunSummary> {
        for _ in 0..max_ticks {
            let gravity = autopilot(session);
            let tick = session.advance(&TickInput { gravity }, DT);
            if let Some(summary) = tick.completed {
                return Some(summary);
            }
        }
        None
    }

    fn autopilot(session: &GameSession<MemoryStore>) -> Vec2 {
        let maze = session.maze();
        let layout = session.layout();
        let state = session.simulator().state();
        let here = layout
            .cell_at(state.position(), maze.rows(), maze.cols())
            .unwrap_or(maze.start());
        let path = crate::sim::path_between(maze, here, maze.end());
        let target = layout.cell_center(*path.get(1).unwrap_or(&maze.end()));

        // PD steering in screen space, then flip y into device space
        let steer = (target - state.position()) / layout.cell_size * 4.0 - state.velocity() / 150.0;
        let steer = steer.clamp_length_max(1.0);
        Vec2::new(steer.x, -steer.y)
    }

    #[test]
    fn test_grid_growth() {
        assert_eq!(grid_for_level(1), (10, 7));
        assert_eq!(grid_for_level(3), (11, 7));
        assert_eq!(grid_for_level(4), (11, 8));
        assert_eq!(grid_for_level(100), (20, 12));
    }

    #[test]
    fn test_same_seed_same_session() {
        let a = session(2024);
        let b = session(2024);
        assert_eq!(a.maze(), b.maze());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().starts_with("10x7_L1_S"));
    }

    #[test]
    fn test_ball_starts_at_start_cell() {
        let s = session(1);
        let start = s.layout().cell_center(s.maze().start());
        assert_eq!(s.simulator().state().position(), start);
        assert!(s.optimal_distance() >= s.layout().cell_size * 15.0);
        assert!(!s.has_ghost());
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let mut s = session(1);
        let before = s.simulator().state().clone();
        let tick = s.advance(&TickInput::tilt(1.0, 1.0), 0.25);
        assert!(tick.completed.is_none());
        assert_eq!(s.simulator().state(), &before);
    }

    #[test]
    fn test_full_run_records_ghost_and_replays_it() {
        let mut s = session(7);
        let summary = play_to_goal(&mut s, 60 * 300).expect("autopilot failed to finish");

        assert!(summary.new_best);
        assert!(summary.time > 0.0);
        assert!(summary.traveled >= summary.optimal * 0.5);
        assert_eq!(summary.fingerprint, s.fingerprint());
        assert_eq!(s.store().backend().len(), 1);

        // Ticks after the win are frozen and do not complete again
        let tick = s.advance(&TickInput::tilt(-1.0, 0.0), DT);
        assert!(tick.ball.has_won);
        assert!(tick.completed.is_none());

        // Replay the same maze: the ghost starts where the ball starts
        s.restart();
        assert!(s.has_ghost());
        assert_eq!(s.best_time(), Some(summary.time));
        let tick = s.advance(&TickInput::default(), DT);
        let ghost = tick.ghost.expect("ghost should be playing");
        let start = s.layout().cell_center(s.maze().start());
        assert!(ghost.distance(start) < s.layout().cell_size);

        // A different viewport replays the same ghost on the refitted grid
        s.resize(Vec2::new(1024.0, 768.0));
        assert!(s.has_ghost());
        let tick = s.advance(&TickInput::default(), DT);
        let ghost = tick.ghost.expect("ghost should survive a resize");
        let start = s.layout().cell_center(s.maze().start());
        assert!(ghost.distance(start) < s.layout().cell_size);
    }

    #[test]
    fn test_stored_ghost_follows_layout() {
        let fp = session(11).fingerprint().to_string();
        let run = GhostRun {
            maze_fingerprint: fp.clone(),
            level: 1,
            time: 1.0,
            snapshots: vec![
                Snapshot {
                    x: 0.5,
                    y: 0.5,
                    t: 0.0,
                },
                Snapshot {
                    x: 0.5,
                    y: 1.5,
                    t: 1.0,
                },
            ],
        };
        let mut backend = MemoryStore::new();
        backend
            .set(&storage_key(&fp), &serde_json::to_string(&run).unwrap())
            .unwrap();

        let mut s = GameSession::new(11, Vec2::new(390.0, 844.0), backend, Tuning::default());
        for viewport in [Vec2::new(390.0, 844.0), Vec2::new(1024.0, 768.0)] {
            s.resize(viewport);
            assert!(s.has_ghost());
            let ghost = s.advance(&TickInput::default(), DT).ghost.unwrap();
            let start = s.layout().cell_center(s.maze().start());
            assert!((ghost.x - start.x).abs() < 1e-3);
            assert!(ghost.y > start.y);
            assert!(ghost.y - start.y < s.layout().cell_size * 0.1);
        }
    }

    #[test]
    fn test_next_level_changes_maze_and_fingerprint() {
        let mut s = session(3);
        let first = s.fingerprint().to_string();
        s.next_level();
        s.next_level();
        assert_eq!(s.level(), 3);
        assert_eq!((s.maze().rows(), s.maze().cols()), (11, 7));
        assert_ne!(s.fingerprint(), first);
        assert!(s.fingerprint().contains("_L3_"));
    }

    #[test]
    fn test_reset_maze_keeps_level_and_size() {
        let mut s = session(3);
        let before = s.maze().clone();
        s.reset_maze();
        assert_eq!(s.level(), 1);
        assert_eq!((s.maze().rows(), s.maze().cols()), (before.rows(), before.cols()));
        assert_ne!(s.maze().seed(), before.seed());
    }

    #[test]
    fn test_resize_refits_and_resets_tracking() {
        let mut s = session(3);
        for _ in 0..30 {
            s.advance(&TickInput::tilt(0.3, -0.8), DT);
        }
        s.resize(Vec2::new(800.0, 600.0));
        let state = s.simulator().state();
        assert_eq!(state.traveled(), 0.0);
        assert_eq!(state.position(), s.layout().cell_center(s.maze().start()));
        assert_eq!(
            s.optimal_distance(),
            optimal_distance(s.maze(), s.layout().cell_size)
        );
    }

    #[test]
    fn test_live_score_starts_perfect() {
        let s = session(3);
        assert_eq!(s.score().ratio, 0.0);
        assert_eq!(s.score().stars, 3);
    }
}

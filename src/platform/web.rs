//! wasm-bindgen surface for a browser host

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::persistence::{LocalStorageStore, MemoryStore};
use crate::scoring::format_time;
use crate::session::GameSession;
use crate::sim::TickInput;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Tilt Maze core loaded");
}

enum Backend {
    Local(GameSession<LocalStorageStore>),
    Memory(GameSession<MemoryStore>),
}

macro_rules! with_session {
    (mut $self:expr, $s:ident => $body:expr) => {
        match &mut $self.backend {
            Backend::Local($s) => $body,
            Backend::Memory($s) => $body,
        }
    };
    ($self:expr, $s:ident => $body:expr) => {
        match &$self.backend {
            Backend::Local($s) => $body,
            Backend::Memory($s) => $body,
        }
    };
}

/// One game, driven by the page's frame loop
#[wasm_bindgen]
pub struct WebGame {
    backend: Backend,
    ball: Vec2,
    ghost: Option<Vec2>,
    last_stars: u8,
    last_time: f32,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, width: f32, height: f32, tuning_json: &str) -> WebGame {
        let tuning = if tuning_json.is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("Bad tuning override, using defaults: {}", e);
                Tuning::default()
            })
        };
        let viewport = Vec2::new(width, height);

        let backend = match LocalStorageStore::open() {
            Ok(store) => Backend::Local(GameSession::new(seed.into(), viewport, store, tuning)),
            Err(e) => {
                log::warn!("{}; ghosts will not persist", e);
                Backend::Memory(GameSession::new(seed.into(), viewport, MemoryStore::new(), tuning))
            }
        };

        let mut game = WebGame {
            backend,
            ball: Vec2::ZERO,
            ghost: None,
            last_stars: 0,
            last_time: 0.0,
        };
        game.sync_ball();
        game
    }

    /// Feed one frame. Returns true on the frame the goal is reached.
    pub fn advance(&mut self, gravity_x: f32, gravity_y: f32, dt: f32) -> bool {
        let input = TickInput::tilt(gravity_x, gravity_y);
        let tick = with_session!(mut self, s => s.advance(&input, dt));
        self.ball = tick.ball.position;
        self.ghost = tick.ghost;
        match tick.completed {
            Some(summary) => {
                self.last_stars = summary.score.stars;
                self.last_time = summary.time;
                true
            }
            None => false,
        }
    }

    pub fn next_level(&mut self) {
        with_session!(mut self, s => s.next_level());
        self.sync_ball();
    }

    pub fn reset_maze(&mut self) {
        with_session!(mut self, s => s.reset_maze());
        self.sync_ball();
    }

    pub fn restart(&mut self) {
        with_session!(mut self, s => s.restart());
        self.sync_ball();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        with_session!(mut self, s => s.resize(Vec2::new(width, height)));
        self.sync_ball();
    }

    fn sync_ball(&mut self) {
        self.ball = with_session!(self, s => s.simulator().state().position());
        self.ghost = None;
    }

    pub fn ball_x(&self) -> f32 {
        self.ball.x
    }

    pub fn ball_y(&self) -> f32 {
        self.ball.y
    }

    pub fn has_ghost_position(&self) -> bool {
        self.ghost.is_some()
    }

    pub fn ghost_x(&self) -> f32 {
        self.ghost.map_or(0.0, |g| g.x)
    }

    pub fn ghost_y(&self) -> f32 {
        self.ghost.map_or(0.0, |g| g.y)
    }

    pub fn level(&self) -> u32 {
        with_session!(self, s => s.level())
    }

    /// Maze as JSON (`rows`, `cols`, `cells`, `start`, `end`, `seed`) for drawing
    pub fn maze_json(&self) -> String {
        with_session!(self, s => serde_json::to_string(s.maze()).unwrap_or_default())
    }

    /// Layout as JSON (`cell_size`, `origin`)
    pub fn layout_json(&self) -> String {
        with_session!(self, s => serde_json::to_string(s.layout()).unwrap_or_default())
    }

    /// Trail points as a flat `[x0, y0, x1, y1, ...]` array, oldest first
    pub fn trail(&self) -> Vec<f32> {
        with_session!(self, s => s
            .simulator()
            .state()
            .trail()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect())
    }

    pub fn last_stars(&self) -> u8 {
        self.last_stars
    }

    /// Completion time of the last finished run as `m:ss`
    pub fn last_time_label(&self) -> String {
        format_time(self.last_time)
    }

    /// Stored best time for the current maze, or a negative value if none
    pub fn best_time(&self) -> f32 {
        with_session!(self, s => s.best_time().unwrap_or(-1.0))
    }
}

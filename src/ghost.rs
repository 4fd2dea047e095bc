//! Ghost runs: race your best time on any maze
//!
//! The recorder samples the ball at a fixed cadence of run time (not frames),
//! so a 120 Hz device and a 60 Hz device produce the same density. The player
//! replays a stored run as an interpolated position stream driven by the
//! live run's elapsed time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Slack when comparing sample gaps; frame times rarely sum to the interval exactly
const SAMPLE_EPSILON: f32 = 1e-4;

/// Storage key for a maze configuration: `{rows}x{cols}_L{level}_S{seed}`
pub fn fingerprint(rows: usize, cols: usize, level: u32, seed: u64) -> String {
    format!("{rows}x{cols}_L{level}_S{seed}")
}

/// A recorded ball position.
///
/// Units are whatever the caller samples in; a game session records grid
/// units so a stored run is independent of the viewport it was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub x: f32,
    pub y: f32,
    /// Seconds since run start
    pub t: f32,
}

impl Snapshot {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A completed run, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostRun {
    pub maze_fingerprint: String,
    pub level: u32,
    /// Completion time (seconds)
    pub time: f32,
    pub snapshots: Vec<Snapshot>,
}

impl GhostRun {
    /// Whether this run should replace `existing` as the best
    pub fn beats(&self, existing: &GhostRun) -> bool {
        self.time < existing.time
    }
}

/// Samples positions during a live run
#[derive(Debug, Clone)]
pub struct GhostRecorder {
    interval: f32,
    fingerprint: String,
    level: u32,
    snapshots: Vec<Snapshot>,
    last_sample: Option<f32>,
    recording: bool,
}

impl GhostRecorder {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            fingerprint: String::new(),
            level: 0,
            snapshots: Vec::new(),
            last_sample: None,
            recording: false,
        }
    }

    /// Begin a fresh recording, discarding anything in progress
    pub fn start(&mut self, fingerprint: impl Into<String>, level: u32) {
        self.fingerprint = fingerprint.into();
        self.level = level;
        self.snapshots.clear();
        self.last_sample = None;
        self.recording = true;
    }

    /// Offer the current position; kept if a sample interval has passed
    pub fn sample(&mut self, pos: Vec2, elapsed: f32) {
        if !self.recording {
            return;
        }
        if let Some(last) = self.last_sample {
            if elapsed - last < self.interval - SAMPLE_EPSILON {
                return;
            }
        }
        self.last_sample = Some(elapsed);
        self.snapshots.push(Snapshot {
            x: pos.x,
            y: pos.y,
            t: elapsed,
        });
    }

    /// Stop recording and build the run.
    ///
    /// The final position is always captured so the ghost ends on the goal.
    /// Returns `None` if nothing was recorded.
    pub fn finish(&mut self, final_pos: Vec2, time: f32) -> Option<GhostRun> {
        if !self.recording {
            return None;
        }
        self.recording = false;
        if self.snapshots.is_empty() {
            return None;
        }
        if self.last_sample.is_some_and(|last| time > last) {
            self.snapshots.push(Snapshot {
                x: final_pos.x,
                y: final_pos.y,
                t: time,
            });
        }

        Some(GhostRun {
            maze_fingerprint: std::mem::take(&mut self.fingerprint),
            level: self.level,
            time,
            snapshots: std::mem::take(&mut self.snapshots),
        })
    }

    /// Abandon the current recording
    pub fn cancel(&mut self) {
        self.recording = false;
        self.snapshots.clear();
        self.last_sample = None;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

/// Replays a stored run against the live clock
#[derive(Debug, Clone, Default)]
pub struct GhostPlayer {
    run: Option<GhostRun>,
    cursor: usize,
    finished: bool,
}

impl GhostPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a run (or clear the ghost with `None`) and rewind
    pub fn load(&mut self, run: Option<GhostRun>) {
        self.run = run.filter(|r| !r.snapshots.is_empty());
        self.rewind();
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.finished = false;
    }

    pub fn stop(&mut self) {
        self.run = None;
        self.rewind();
    }

    pub fn has_ghost(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&GhostRun> {
        self.run.as_ref()
    }

    /// Ghost has passed its last snapshot
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Interpolated ghost position at `elapsed` seconds into the run.
    ///
    /// The cursor only moves forward. Returns `None` when there is no ghost or
    /// once `elapsed` is past the final snapshot.
    pub fn position_at(&mut self, elapsed: f32) -> Option<Vec2> {
        let run = self.run.as_ref()?;
        if self.finished {
            return None;
        }
        let snaps = &run.snapshots;
        let last = snaps.last()?;
        if elapsed > last.t {
            self.finished = true;
            return None;
        }

        while self.cursor + 1 < snaps.len() && snaps[self.cursor + 1].t <= elapsed {
            self.cursor += 1;
        }

        let curr = snaps[self.cursor];
        let Some(next) = snaps.get(self.cursor + 1) else {
            return Some(curr.pos());
        };

        let span = next.t - curr.t;
        if span <= 0.0 {
            return Some(curr.pos());
        }
        let progress = ((elapsed - curr.t) / span).clamp(0.0, 1.0);
        Some(curr.pos().lerp(next.pos(), progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_of(points: &[(f32, f32, f32)]) -> GhostRun {
        GhostRun {
            maze_fingerprint: fingerprint(10, 7, 1, 42),
            level: 1,
            time: points.last().map(|p| p.0).unwrap_or(0.0),
            snapshots: points.iter().map(|&(t, x, y)| Snapshot { x, y, t }).collect(),
        }
    }

    #[test]
    fn test_fingerprint_format() {
        assert_eq!(fingerprint(10, 7, 3, 12345), "10x7_L3_S12345");
        assert_eq!(fingerprint(10, 7, 3, 12345), fingerprint(10, 7, 3, 12345));
        assert_ne!(fingerprint(10, 7, 3, 12345), fingerprint(7, 10, 3, 12345));
    }

    #[test]
    fn test_playback_midpoint() {
        let mut player = GhostPlayer::new();
        player.load(Some(run_of(&[(0.0, 0.0, 0.0), (1.0, 10.0, 0.0)])));
        assert_eq!(player.position_at(0.5), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_playback_advances_and_finishes() {
        let mut player = GhostPlayer::new();
        player.load(Some(run_of(&[
            (0.0, 0.0, 0.0),
            (1.0, 10.0, 0.0),
            (2.0, 10.0, 20.0),
        ])));

        assert_eq!(player.position_at(0.0), Some(Vec2::ZERO));
        assert_eq!(player.position_at(1.5), Some(Vec2::new(10.0, 10.0)));
        assert_eq!(player.position_at(2.0), Some(Vec2::new(10.0, 20.0)));
        assert!(!player.is_finished());

        assert_eq!(player.position_at(2.01), None);
        assert!(player.is_finished());
        // Stays finished; no looping
        assert_eq!(player.position_at(0.5), None);

        player.rewind();
        assert_eq!(player.position_at(0.5), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_no_ghost() {
        let mut player = GhostPlayer::new();
        assert!(!player.has_ghost());
        assert_eq!(player.position_at(0.0), None);

        player.load(Some(run_of(&[])));
        assert!(!player.has_ghost());
    }

    #[test]
    fn test_duplicate_timestamps() {
        let mut player = GhostPlayer::new();
        player.load(Some(run_of(&[(0.0, 0.0, 0.0), (0.0, 4.0, 4.0), (1.0, 8.0, 8.0)])));
        assert_eq!(player.position_at(0.0), Some(Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_recorder_cadence_is_frame_rate_independent() {
        let count_for = |dt: f32| {
            let mut rec = GhostRecorder::new(1.0 / 30.0);
            rec.start("m", 1);
            let mut t = 0.0;
            while t < 2.0 {
                rec.sample(Vec2::new(t, 0.0), t);
                t += dt;
            }
            rec.snapshot_count()
        };

        let at_60 = count_for(1.0 / 60.0);
        let at_120 = count_for(1.0 / 120.0);
        assert!((55..=62).contains(&at_60), "60 Hz gave {at_60}");
        assert!((55..=62).contains(&at_120), "120 Hz gave {at_120}");
    }

    #[test]
    fn test_recorder_finish_appends_final_point() {
        let mut rec = GhostRecorder::new(1.0 / 30.0);
        rec.start("5x5_L1_S9", 1);
        rec.sample(Vec2::new(20.0, 20.0), 0.0);
        rec.sample(Vec2::new(21.0, 20.0), 0.01);

        let run = rec.finish(Vec2::new(180.0, 180.0), 4.2).unwrap();
        assert_eq!(run.maze_fingerprint, "5x5_L1_S9");
        assert_eq!(run.time, 4.2);
        assert_eq!(run.snapshots.len(), 2);
        assert_eq!(run.snapshots[1].pos(), Vec2::new(180.0, 180.0));
        assert!(!rec.is_recording());
        assert!(rec.finish(Vec2::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_empty_recording_is_discarded() {
        let mut rec = GhostRecorder::new(1.0 / 30.0);
        rec.start("m", 1);
        assert!(rec.finish(Vec2::ZERO, 3.0).is_none());
    }

    #[test]
    fn test_persisted_shape() {
        let run = run_of(&[(0.0, 1.5, 2.0), (0.25, 3.0, 4.0)]);
        assert_eq!(run.time, 0.25);
        let json = serde_json::to_string(&run).unwrap();
        assert!(json.starts_with(r#"{"mazeFingerprint":"10x7_L1_S42","level":1,"time":0.25,"snapshots":[{"x":1.5,"y":2.0,"t":0.0}"#));

        let back: GhostRun = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    proptest! {
        #[test]
        fn prop_playback_stays_on_segment(
            x0 in -500.0f32..500.0, x1 in -500.0f32..500.0,
            t1 in 0.01f32..5.0, frac in 0.0f32..1.0,
        ) {
            let mut player = GhostPlayer::new();
            player.load(Some(run_of(&[(0.0, x0, 0.0), (t1, x1, 0.0)])));
            let pos = player.position_at(t1 * frac).unwrap();
            prop_assert!(pos.x >= x0.min(x1) - 1e-3 && pos.x <= x0.max(x1) + 1e-3);
            prop_assert_eq!(pos.y, 0.0);
        }
    }
}

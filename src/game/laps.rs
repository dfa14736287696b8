//! Lap and checkpoint state machine

use glam::Vec2;
use std::time::{Duration, Instant};

use crate::track::Checkpoint;

/// Lap progress of the current session
#[derive(Debug, Clone, PartialEq)]
pub struct LapState {
    pub current_lap: u32,
    pub next_checkpoint: usize,
    pub lap_started_at: Instant,
    pub best_lap: Option<Duration>,
    pub last_lap: Option<Duration>,
}

impl LapState {
    pub fn new(now: Instant) -> Self {
        Self {
            current_lap: 0,
            next_checkpoint: 0,
            lap_started_at: now,
            best_lap: None,
            last_lap: None,
        }
    }

    /// Time spent on the lap in progress
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.lap_started_at)
    }
}

/// Result of evaluating one tick against the next checkpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LapProgress {
    /// Next gate not crossed yet
    None,
    /// Crossed gate `index`; lap still in progress
    Checkpoint { index: usize },
    /// Crossed the last gate of the cycle
    LapCompleted {
        index: usize,
        lap: u32,
        duration: Duration,
        is_best: bool,
    },
}

/// Advances `LapState` as the vehicle passes checkpoints in order
pub struct LapTracker;

impl LapTracker {
    /// Evaluate the vehicle position against the next checkpoint.
    /// At most one checkpoint is consumed per call.
    pub fn update(
        state: &mut LapState,
        checkpoints: &[Checkpoint],
        position: Vec2,
        now: Instant,
    ) -> LapProgress {
        let Some(checkpoint) = checkpoints.get(state.next_checkpoint) else {
            return LapProgress::None;
        };

        if !checkpoint.is_crossed_by(position) {
            return LapProgress::None;
        }

        let index = state.next_checkpoint;
        state.next_checkpoint = (index + 1) % checkpoints.len();

        if state.next_checkpoint != 0 {
            return LapProgress::Checkpoint { index };
        }

        let duration = now.saturating_duration_since(state.lap_started_at);
        state.current_lap += 1;
        state.lap_started_at = now;
        state.last_lap = Some(duration);

        let is_best = state.best_lap.map_or(true, |best| duration < best);
        if is_best {
            state.best_lap = Some(duration);
        }

        LapProgress::LapCompleted {
            index,
            lap: state.current_lap,
            duration,
            is_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{Track, TrackSpec};

    fn track() -> Track {
        Track::new(
            TrackSpec {
                outer_x: 40.0,
                outer_z: 26.0,
                width: 8.0,
                apron: 2.0,
            },
            0.0,
        )
        .unwrap()
    }

    /// A point just past checkpoint `i`
    fn past(track: &Track, i: usize) -> Vec2 {
        let cp = track.checkpoints()[i];
        cp.point + cp.forward_normal * 0.5
    }

    #[test]
    fn test_four_crossings_complete_one_lap() {
        let track = track();
        let start = Instant::now();
        let mut state = LapState::new(start);

        for i in 0..3 {
            let progress = LapTracker::update(
                &mut state,
                track.checkpoints(),
                past(&track, i),
                start + Duration::from_secs(i as u64 + 1),
            );
            assert_eq!(progress, LapProgress::Checkpoint { index: i });
            assert_eq!(state.current_lap, 0);
        }

        let finish = start + Duration::from_secs(12);
        let progress = LapTracker::update(&mut state, track.checkpoints(), past(&track, 3), finish);
        assert_eq!(
            progress,
            LapProgress::LapCompleted {
                index: 3,
                lap: 1,
                duration: Duration::from_secs(12),
                is_best: true,
            }
        );
        assert_eq!(state.current_lap, 1);
        assert_eq!(state.next_checkpoint, 0);
        assert_eq!(state.lap_started_at, finish);
        assert_eq!(state.best_lap, Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_waits_for_next_checkpoint() {
        let track = track();
        let now = Instant::now();
        let mut state = LapState::new(now);

        // Behind gate 0 (the approach from the last quadrant)
        let behind = Vec2::new(30.0, -10.0);
        assert_eq!(
            LapTracker::update(&mut state, track.checkpoints(), behind, now),
            LapProgress::None
        );

        // Exactly on the gate is not past it
        let on_gate = track.checkpoints()[0].point;
        assert_eq!(
            LapTracker::update(&mut state, track.checkpoints(), on_gate, now),
            LapProgress::None
        );
        assert_eq!(state.next_checkpoint, 0);
    }

    #[test]
    fn test_one_checkpoint_per_update() {
        let track = track();
        let now = Instant::now();
        let mut state = LapState::new(now);

        // Past gate 0 and past gate 1 at once; only gate 0 is consumed
        let pos = Vec2::new(-5.0, 22.0);
        LapTracker::update(&mut state, track.checkpoints(), pos, now);
        assert_eq!(state.next_checkpoint, 1);
        LapTracker::update(&mut state, track.checkpoints(), pos, now);
        assert_eq!(state.next_checkpoint, 2);
    }

    #[test]
    fn test_index_only_advances() {
        let track = track();
        let now = Instant::now();
        let mut state = LapState::new(now);
        let path = [0, 0, 1, 0, 1, 2, 2, 3, 1, 0];

        let mut previous = state.next_checkpoint;
        let mut laps = 0;
        for i in path {
            LapTracker::update(&mut state, track.checkpoints(), past(&track, i), now);
            let next = state.next_checkpoint;
            assert!(next == previous || next == (previous + 1) % 4);
            if next == 0 && previous == 3 {
                laps += 1;
            }
            previous = next;
        }
        assert_eq!(state.current_lap, laps);
    }

    #[test]
    fn test_best_lap_never_increases() {
        let track = track();
        let start = Instant::now();
        let mut state = LapState::new(start);
        let lap_secs = [30, 25, 40, 25, 20, 50];

        let mut clock = start;
        let mut best: Option<Duration> = None;
        for secs in lap_secs {
            clock += Duration::from_secs(secs);
            for i in 0..4 {
                LapTracker::update(&mut state, track.checkpoints(), past(&track, i), clock);
            }
            assert_eq!(state.last_lap, Some(Duration::from_secs(secs)));
            if let (Some(previous), Some(current)) = (best, state.best_lap) {
                assert!(current <= previous);
            }
            best = state.best_lap;
        }

        assert_eq!(state.current_lap, lap_secs.len() as u32);
        assert_eq!(state.best_lap, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_wrong_way_lap_counts() {
        let track = track();
        let now = Instant::now();
        let mut state = LapState::new(now);

        // Two loops clockwise from the spawn point
        let mut laps = 0;
        for k in 0..=200 {
            let p = track.point_on_centerline(0.75 - k as f32 / 100.0);
            let progress = LapTracker::update(&mut state, track.checkpoints(), Vec2::new(p.x, p.z), now);
            if matches!(progress, LapProgress::LapCompleted { .. }) {
                laps += 1;
            }
        }

        assert!(laps >= 1);
        assert_eq!(state.current_lap, laps);
    }
}

use bevy::prelude::*;
use bits_helpers::restart::Restartable;

use crate::error::PuzzleError;
use crate::model::GameState;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum SessionStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Elapsed-time limits for the star rating, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarThresholds {
    pub three_stars: f32,
    pub two_stars: f32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three_stars: 120.0,
            two_stars: 180.0,
        }
    }
}

impl StarThresholds {
    /// Rates a play-through. The first rung that matches wins.
    pub fn rate(&self, placed: usize, total: usize, elapsed: f32) -> u8 {
        let all_placed = placed == total;
        let one_short = placed + 1 == total;

        if all_placed && elapsed < self.three_stars {
            3
        } else if (all_placed || one_short) && elapsed < self.two_stars {
            2
        } else if all_placed || one_short || placed >= 2 {
            1
        } else {
            0
        }
    }
}

/// Read-only view of the session for the HUD and result screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub placed: usize,
    pub destroyed: usize,
    pub total: usize,
    pub elapsed: f32,
    pub score: i32,
    pub stars: u8,
}

/// Win/lose bookkeeping and the session clock.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Session {
    status: SessionStatus,
    placed: usize,
    destroyed: usize,
    elapsed: f32,
    total: usize,
    score: i32,
    points_per_placement: i32,
    thresholds: StarThresholds,
}

impl Session {
    pub fn new(total: usize) -> Result<Self, PuzzleError> {
        if total == 0 {
            return Err(PuzzleError::Configuration(
                "a session needs at least one vehicle".to_owned(),
            ));
        }

        Ok(Self {
            status: SessionStatus::Active,
            placed: 0,
            destroyed: 0,
            elapsed: 0.0,
            total,
            score: 0,
            points_per_placement: 100,
            thresholds: StarThresholds::default(),
        })
    }

    #[must_use]
    pub const fn with_scoring(mut self, points_per_placement: i32, thresholds: StarThresholds) -> Self {
        self.points_per_placement = points_per_placement;
        self.thresholds = thresholds;
        self
    }

    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    pub const fn placed(&self) -> usize {
        self.placed
    }

    pub const fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Records a vehicle locked into its slot.
    pub fn on_placed(&mut self) -> SessionStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.placed += 1;
        self.score += self.points_per_placement;
        if self.placed == self.total {
            self.status = SessionStatus::Won;
        }
        self.status
    }

    /// Records a vehicle lost to an obstacle. A single loss ends the session.
    pub fn on_destroyed(&mut self) -> SessionStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.destroyed += 1;
        self.status = SessionStatus::Lost;
        self.status
    }

    /// Advances the clock while the session is active.
    pub fn tick(&mut self, dt: f32) {
        if !self.status.is_terminal() {
            self.elapsed += dt.max(0.0);
        }
    }

    pub fn compute_stars(&self, placed: usize, elapsed: f32) -> u8 {
        self.thresholds.rate(placed, self.total, elapsed)
    }

    pub fn stars(&self) -> u8 {
        self.compute_stars(self.placed, self.elapsed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            placed: self.placed,
            destroyed: self.destroyed,
            total: self.total,
            elapsed: self.elapsed,
            score: self.score,
            stars: self.stars(),
        }
    }
}

impl Restartable for Session {
    fn reset(&mut self) {
        self.status = SessionStatus::Active;
        self.placed = 0;
        self.destroyed = 0;
        self.elapsed = 0.0;
        self.score = 0;
    }

    fn initial_state() -> Self::State {
        GameState::Welcome
    }

    type State = GameState;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: usize = 12;

    fn session() -> Session {
        Session::new(TOTAL).expect("non-empty session")
    }

    #[test]
    fn empty_session_is_a_configuration_error() {
        assert!(
            matches!(Session::new(0), Err(PuzzleError::Configuration(_))),
            "zero vehicles cannot be played"
        );
    }

    #[test]
    fn wins_on_the_last_placement_and_not_before() {
        let mut session = session();
        for _ in 0..TOTAL - 1 {
            assert_eq!(session.on_placed(), SessionStatus::Active, "still playing");
        }
        assert_eq!(session.on_placed(), SessionStatus::Won, "final placement wins");
        assert_eq!(session.placed(), TOTAL, "all vehicles counted");
        assert_eq!(session.score(), 1200, "100 points per vehicle");
    }

    #[test]
    fn a_single_destruction_loses() {
        let mut session = session();
        assert_eq!(session.on_destroyed(), SessionStatus::Lost, "first loss ends the game");

        let frozen = session.clone();
        session.on_placed();
        session.on_destroyed();
        session.tick(10.0);
        assert_eq!(session, frozen, "terminal sessions ignore further updates");
    }

    #[test]
    fn destroyed_after_three_placements() {
        let mut session = session();
        for _ in 0..3 {
            session.on_placed();
        }
        session.on_destroyed();

        assert_eq!(session.status(), SessionStatus::Lost, "lost after destruction");
        assert_eq!(session.placed(), 3, "placements kept");
        assert_eq!(session.destroyed(), 1, "one destruction");
        assert!(
            session.placed() + session.destroyed() <= session.total(),
            "counts never exceed the vehicle total"
        );
    }

    #[test]
    fn clock_only_runs_while_active() {
        let mut session = session();
        session.tick(1.5);
        session.tick(0.5);
        assert!((session.elapsed() - 2.0).abs() < 1e-6, "clock accumulates");

        session.on_destroyed();
        session.tick(5.0);
        assert!((session.elapsed() - 2.0).abs() < 1e-6, "clock freezes once lost");
    }

    #[test]
    fn clock_ignores_negative_steps() {
        let mut session = session();
        session.tick(-1.0);
        assert!(session.elapsed().abs() < f32::EPSILON, "elapsed is monotonic");
    }

    #[test]
    fn star_ladder() {
        let session = session();
        assert_eq!(session.compute_stars(TOTAL, 100.0), 3, "fast full clear");
        assert_eq!(session.compute_stars(TOTAL, 150.0), 2, "slower full clear");
        assert_eq!(session.compute_stars(TOTAL, 200.0), 1, "slow full clear");
        assert_eq!(session.compute_stars(TOTAL - 1, 150.0), 2, "one short in time");
        assert_eq!(session.compute_stars(TOTAL - 1, 90.0), 2, "one short never earns three");
        assert_eq!(session.compute_stars(TOTAL - 1, 400.0), 1, "one short but slow");
        assert_eq!(session.compute_stars(2, 10.0), 1, "two placements earn a star");
        assert_eq!(session.compute_stars(1, 10.0), 0, "a single placement earns nothing");
        assert_eq!(session.compute_stars(0, 10.0), 0, "nothing placed");
    }

    #[test]
    fn full_clear_under_two_minutes_scores_three_stars() {
        let mut session = session();
        for _ in 0..TOTAL {
            session.tick(5.0);
            session.on_placed();
        }

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Won, "all twelve placed");
        assert_eq!(snapshot.stars, 3, "60 seconds is under the three star limit");
        assert!((snapshot.elapsed - 60.0).abs() < 1e-4, "twelve ticks of five seconds");
    }

    #[test]
    fn restart_clears_progress_but_keeps_the_total() {
        let mut session = session().with_scoring(50, StarThresholds::default());
        session.tick(3.0);
        session.on_placed();
        session.on_destroyed();

        session.reset();
        assert_eq!(session.status(), SessionStatus::Active, "active again");
        assert_eq!(session.placed(), 0, "placements cleared");
        assert_eq!(session.score(), 0, "score cleared");
        assert_eq!(session.total(), TOTAL, "total kept");
        assert_eq!(session.on_placed(), SessionStatus::Active, "playable after reset");
        assert_eq!(session.score(), 50, "custom scoring kept");
    }
}

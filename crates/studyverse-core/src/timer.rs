//! Focus-session countdown.
//!
//! The host drives the timer by calling [`StudyTimer::tick`] with the seconds
//! elapsed since the previous tick. When a running countdown reaches zero the
//! full session length is credited exactly once and the timer stops.

use std::time::Duration;

/// Default focus session length (25 minutes).
pub const DEFAULT_SESSION_SECS: u64 = 25 * 60;

/// A start/pause/reset countdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyTimer {
    session_secs: u64,
    remaining_secs: u64,
    running: bool,
}

impl StudyTimer {
    /// Timer with the default session length.
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(Duration::from_secs(DEFAULT_SESSION_SECS))
    }

    /// Timer with a custom session length (at least one second).
    #[must_use]
    pub fn with_duration(session: Duration) -> Self {
        let session_secs = session.as_secs().max(1);
        Self {
            session_secs,
            remaining_secs: session_secs,
            running: false,
        }
    }

    /// Start or pause. Has no effect once the countdown is at zero.
    pub fn toggle(&mut self) {
        if self.remaining_secs > 0 {
            self.running = !self.running;
        }
    }

    /// Stop and rewind to the full session length.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = self.session_secs;
    }

    /// Advance the countdown.
    ///
    /// Returns the seconds to credit when this tick completes the session.
    pub fn tick(&mut self, elapsed_secs: u64) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(elapsed_secs);
        if self.remaining_secs == 0 {
            self.running = false;
            return Some(self.session_secs);
        }
        None
    }

    /// Seconds left in the session.
    pub fn remaining(&self) -> u64 {
        self.remaining_secs
    }

    /// Full session length in seconds.
    pub fn session_secs(&self) -> u64 {
        self.session_secs
    }

    /// Whether the countdown is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown has reached zero.
    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Remaining time as `mm:ss`.
    pub fn format_mm_ss(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }
}

impl Default for StudyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as zero-padded `mm:ss`.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused_at_full_length() {
        let timer = StudyTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 1500);
        assert_eq!(timer.format_mm_ss(), "25:00");
    }

    #[test]
    fn paused_timer_ignores_ticks() {
        let mut timer = StudyTimer::new();
        assert_eq!(timer.tick(10), None);
        assert_eq!(timer.remaining(), 1500);
    }

    #[test]
    fn completion_credits_once() {
        let mut timer = StudyTimer::with_duration(Duration::from_secs(3));
        timer.toggle();
        assert_eq!(timer.tick(1), None);
        assert_eq!(timer.format_mm_ss(), "00:02");
        assert_eq!(timer.tick(5), Some(3));
        assert!(!timer.is_running());
        assert!(timer.is_finished());
        assert_eq!(timer.tick(1), None);
    }

    #[test]
    fn toggle_is_noop_at_zero() {
        let mut timer = StudyTimer::with_duration(Duration::from_secs(1));
        timer.toggle();
        let _ = timer.tick(1);
        timer.toggle();
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_rewinds_and_stops() {
        let mut timer = StudyTimer::new();
        timer.toggle();
        let _ = timer.tick(61);
        assert_eq!(timer.format_mm_ss(), "23:59");
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), DEFAULT_SESSION_SECS);
    }

    #[test]
    fn pause_resume() {
        let mut timer = StudyTimer::new();
        timer.toggle();
        let _ = timer.tick(30);
        timer.toggle();
        let _ = timer.tick(30);
        assert_eq!(timer.remaining(), 1470);
    }

    #[test]
    fn formats_long_durations() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(6000), "100:00");
    }
}

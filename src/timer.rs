use crate::config::Settings;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short break",
            Phase::LongBreak => "Long break",
        }
    }

    pub fn duration(self, settings: &Settings) -> Duration {
        match self {
            Phase::Focus => settings.focus(),
            Phase::ShortBreak => settings.short_break(),
            Phase::LongBreak => settings.long_break(),
        }
    }
}

/// Focus/break rotation. Every `long_break_every`-th finished focus session
/// is followed by a long break instead of a short one.
#[derive(Debug, Clone)]
pub struct Cycle {
    phase: Phase,
    completed_focus: u32,
    long_break_every: u32,
}

impl Cycle {
    pub fn new(long_break_every: u32) -> Self {
        Cycle {
            phase: Phase::Focus,
            completed_focus: 0,
            long_break_every: long_break_every.max(1),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    /// Finishes the current phase and returns the one that follows.
    pub fn advance(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Focus => {
                self.completed_focus += 1;
                if self.completed_focus % self.long_break_every == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };
        self.phase
    }
}

#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Countdown { remaining: total }
    }

    /// Returns `true` once the countdown has reached zero.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn clock(&self) -> String {
        format_clock(self.remaining)
    }
}

/// `MM:SS`, with minutes allowed to exceed 59.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fourth_focus_earns_a_long_break() {
        let mut cycle = Cycle::new(4);
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(cycle.advance());
        }
        assert_eq!(
            seen,
            vec![
                Phase::ShortBreak,
                Phase::Focus,
                Phase::ShortBreak,
                Phase::Focus,
                Phase::ShortBreak,
                Phase::Focus,
                Phase::LongBreak,
                Phase::Focus,
            ]
        );
        assert_eq!(cycle.completed_focus(), 4);
    }

    #[test]
    fn interval_of_one_always_takes_long_breaks() {
        let mut cycle = Cycle::new(1);
        assert_eq!(cycle.advance(), Phase::LongBreak);
        assert_eq!(cycle.advance(), Phase::Focus);
        assert_eq!(cycle.advance(), Phase::LongBreak);
    }

    #[test]
    fn countdown_saturates_at_zero() {
        let mut countdown = Countdown::new(Duration::from_secs(90));
        assert_eq!(countdown.clock(), "01:30");
        assert!(!countdown.tick(Duration::from_secs(31)));
        assert_eq!(countdown.clock(), "00:59");
        assert!(countdown.tick(Duration::from_secs(120)));
        assert!(countdown.is_finished());
        assert_eq!(countdown.clock(), "00:00");
    }

    #[test]
    fn phase_durations_follow_settings() {
        let settings = Settings {
            long_break_minutes: 20,
            ..Settings::default()
        };
        assert_eq!(Phase::LongBreak.duration(&settings), Duration::from_secs(1200));
        assert_eq!(Phase::Focus.duration(&settings), Duration::from_secs(1500));
        assert_eq!(format_clock(Duration::from_secs(100 * 60)), "100:00");
    }
}

// Countdown timer as an explicit state machine.
//
//   Counting(n) --1s--> Counting(n-1) ... Counting(1) --1s--> Flash --600ms--> Done
//
// Any running state can be cancelled. Done and Cancelled are terminal; a new
// countdown is a new value. Time only moves when the owner calls `advance`,
// so the main loop (or a test) decides how fast the clock runs.

use std::fmt;
use std::time::Duration;

pub const TICK: Duration = Duration::from_secs(1);
pub const FLASH_DWELL: Duration = Duration::from_millis(600);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownState {
    Counting(u32),
    Flash,
    Done,
    Cancelled,
}

/// What the countdown label shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownDisplay {
    Number(u32),
    Flash,
    Blank,
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownDisplay::Number(n) => write!(f, "{n}"),
            CountdownDisplay::Flash => f.write_str("📸"),
            CountdownDisplay::Blank => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Countdown {
    state: CountdownState,
    in_state: Duration, // time spent in the current state
    tick: Duration,
    flash: Duration,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self::with_timing(seconds, TICK, FLASH_DWELL)
    }

    /// Same machine with custom tick / flash lengths. `seconds == 0` starts
    /// straight in `Flash`.
    pub fn with_timing(seconds: u32, tick: Duration, flash: Duration) -> Self {
        let state = if seconds == 0 { CountdownState::Flash } else { CountdownState::Counting(seconds) };
        Self { state, in_state: Duration::ZERO, tick, flash }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn display(&self) -> CountdownDisplay {
        match self.state {
            CountdownState::Counting(n) => CountdownDisplay::Number(n),
            CountdownState::Flash => CountdownDisplay::Flash,
            CountdownState::Done | CountdownState::Cancelled => CountdownDisplay::Blank,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Counting(_) | CountdownState::Flash)
    }

    /// True once the countdown has resolved (not when it was cancelled).
    pub fn is_done(&self) -> bool {
        self.state == CountdownState::Done
    }

    /// Let `dt` pass. Returns every state entered, in order; a long `dt`
    /// can cross several ticks at once. `Done` appears at most once over
    /// the life of the countdown.
    pub fn advance(&mut self, dt: Duration) -> Vec<CountdownState> {
        let mut entered = Vec::new();
        if !self.is_running() {
            return entered;
        }
        self.in_state += dt;

        loop {
            match self.state {
                CountdownState::Counting(n) if self.in_state >= self.tick => {
                    self.in_state -= self.tick;
                    self.state = if n > 1 { CountdownState::Counting(n - 1) } else { CountdownState::Flash };
                }
                CountdownState::Flash if self.in_state >= self.flash => {
                    self.in_state = Duration::ZERO;
                    self.state = CountdownState::Done;
                }
                _ => break,
            }
            entered.push(self.state);
        }
        entered
    }

    /// Stop a running countdown without resolving it. Returns false if it
    /// had already finished.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = CountdownState::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a countdown to the end with a fixed step, collecting every
    /// distinct display in order.
    fn displays(seconds: u32, step: Duration) -> (Vec<CountdownDisplay>, usize) {
        let mut cd = Countdown::new(seconds);
        let mut seen = vec![cd.display()];
        let mut resolutions = 0;
        for _ in 0..10_000 {
            for s in cd.advance(step) {
                if s == CountdownState::Done {
                    resolutions += 1;
                }
                let d = Countdown { state: s, ..cd.clone() }.display();
                seen.push(d);
            }
            if !cd.is_running() {
                break;
            }
        }
        (seen, resolutions)
    }

    #[test]
    fn three_two_one_flash_done() {
        let (seen, resolved) = displays(3, Duration::from_millis(100));
        use CountdownDisplay::*;
        assert_eq!(seen, vec![Number(3), Number(2), Number(1), Flash, Blank]);
        assert_eq!(resolved, 1);
    }

    #[test]
    fn step_size_does_not_change_the_sequence() {
        for ms in [16, 250, 999, 1000, 1600, 5000] {
            let (seen, resolved) = displays(4, Duration::from_millis(ms));
            let numbers: Vec<_> = seen
                .iter()
                .filter_map(|d| match d {
                    CountdownDisplay::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            assert_eq!(numbers, vec![4, 3, 2, 1], "step {ms}ms");
            assert_eq!(seen.iter().filter(|d| **d == CountdownDisplay::Flash).count(), 1);
            assert_eq!(resolved, 1);
        }
    }

    #[test]
    fn flash_lasts_six_hundred_millis() {
        let mut cd = Countdown::new(1);
        assert_eq!(cd.advance(TICK), vec![CountdownState::Flash]);
        assert!(cd.advance(Duration::from_millis(599)).is_empty());
        assert_eq!(cd.advance(Duration::from_millis(1)), vec![CountdownState::Done]);
        assert!(cd.is_done());
        assert!(cd.advance(Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn cancel_is_terminal_and_never_resolves() {
        let mut cd = Countdown::new(3);
        cd.advance(Duration::from_millis(1500));
        assert!(cd.cancel());
        assert_eq!(cd.state(), CountdownState::Cancelled);
        assert!(cd.advance(Duration::from_secs(10)).is_empty());
        assert!(!cd.is_done());
        assert!(!cd.cancel());
    }

    #[test]
    fn zero_seconds_goes_straight_to_flash() {
        let cd = Countdown::new(0);
        assert_eq!(cd.display(), CountdownDisplay::Flash);
    }

    #[test]
    fn display_text() {
        assert_eq!(CountdownDisplay::Number(3).to_string(), "3");
        assert_eq!(CountdownDisplay::Flash.to_string(), "📸");
        assert_eq!(CountdownDisplay::Blank.to_string(), "");
    }
}

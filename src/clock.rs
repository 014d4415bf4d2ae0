use crate::error::Error;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// The single pending continuation requested by the animation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Run again on the next frame
    Frame,
    /// Run again once the delay has passed
    After(Duration),
}

/// Whether the driver should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Paces the animation loop, one wake at a time
pub struct FrameClock {
    interval: Duration,
    last_wake: Option<Instant>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        FrameClock {
            interval,
            last_wake: None,
        }
    }

    /// Time left before `wake` is due
    pub fn timeout(&self, wake: Wake, now: Instant) -> Duration {
        match wake {
            Wake::Frame => match self.last_wake {
                Some(last) => (last + self.interval).saturating_duration_since(now),
                None => Duration::ZERO,
            },
            Wake::After(delay) => delay,
        }
    }

    /// Blocks until `wake` is due, watching the keyboard for a quit request
    pub fn wait(&mut self, wake: Wake) -> Result<Control, Error> {
        let deadline = Instant::now() + self.timeout(wake, Instant::now());
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    return Ok(Control::Quit);
                }
            }
        }
        self.last_wake = Some(Instant::now());
        Ok(Control::Continue)
    }
}

/// Keys that end the session
pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn first_frame_is_due_immediately() {
        let clock = FrameClock::new(Duration::from_millis(16));
        assert_eq!(clock.timeout(Wake::Frame, Instant::now()), Duration::ZERO);
    }

    #[test]
    fn frame_waits_out_the_rest_of_the_interval() {
        let start = Instant::now();
        let clock = FrameClock {
            interval: Duration::from_millis(16),
            last_wake: Some(start),
        };
        let timeout = clock.timeout(Wake::Frame, start + Duration::from_millis(10));
        assert_eq!(timeout, Duration::from_millis(6));
        let late = clock.timeout(Wake::Frame, start + Duration::from_millis(40));
        assert_eq!(late, Duration::ZERO);
    }

    #[test]
    fn delay_is_waited_in_full() {
        let clock = FrameClock {
            interval: Duration::from_millis(16),
            last_wake: Some(Instant::now()),
        };
        let wake = Wake::After(Duration::from_millis(1500));
        assert_eq!(clock.timeout(wake, Instant::now()), Duration::from_millis(1500));
    }

    #[rstest]
    #[case(KeyCode::Char('q'), KeyModifiers::NONE, true)]
    #[case(KeyCode::Char('Q'), KeyModifiers::SHIFT, true)]
    #[case(KeyCode::Esc, KeyModifiers::NONE, true)]
    #[case(KeyCode::Char('c'), KeyModifiers::CONTROL, true)]
    #[case(KeyCode::Char('c'), KeyModifiers::NONE, false)]
    #[case(KeyCode::Char('p'), KeyModifiers::NONE, false)]
    fn recognises_quit_keys(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: bool,
    ) {
        assert_eq!(is_quit(&KeyEvent::new(code, modifiers)), expected);
    }

    #[test]
    fn key_release_does_not_quit() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!is_quit(&key));
    }
}

use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::time::format_micros;

#[cfg(doc)]
use crate::Timer;

/// The click which was attempted on a [`Timer`] that was not running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// [`Timer::measure`] or [`Timer::measure_with`].
    Measure,
    /// [`Timer::stop`], [`Timer::stop_with`] or [`Timer::restart`].
    Stop,
}

impl Display for TimerAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerAction::Measure => write!(f, "measure"),
            TimerAction::Stop => write!(f, "stop"),
        }
    }
}

/// The errors which can be returned by a [`Timer`].
///
/// A failed `start`, `measure` or `stop` leaves the timer exactly as it was before the call.
#[derive(Debug, Error)]
pub enum TimerError {
    /// The timer was started while it was already running.
    #[error(
        "[{}] Tried to start {timer_name} but it was already running.",
        format_micros(.timestamp)
    )]
    AlreadyRunning {
        /// The display name of the timer, see [`Timer`]'s `Display` implementation.
        timer_name: String,
        /// The local time at which the start was attempted.
        timestamp: NaiveDateTime,
    },

    /// The timer was clicked while it was stopped.
    #[error(
        "[{}] Tried to click '{action}' on {timer_name} but it wasn't running.",
        format_micros(.timestamp)
    )]
    NotRunning {
        /// The display name of the timer, see [`Timer`]'s `Display` implementation.
        timer_name: String,
        /// The local time at which the click was attempted.
        timestamp: NaiveDateTime,
        /// Which click was attempted.
        action: TimerAction,
    },

    /// The logging sink failed to write a line.
    #[error("failed to write to the timer log: {0}")]
    Sink(#[from] io::Error),

    /// A sleep was requested for a duration which cannot be slept for.
    #[error("cannot sleep for {seconds} seconds")]
    InvalidSleep {
        /// The rejected number of seconds.
        seconds: f64,
    },
}

impl TimerError {
    /// The action of a [`TimerError::NotRunning`] error, if this is one.
    pub fn action(&self) -> Option<TimerAction> {
        match self {
            TimerError::NotRunning { action, .. } => Some(*action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 2)
            .and_then(|date| date.and_hms_micro_opt(8, 30, 0, 250_000))
            .expect("valid date")
    }

    #[test]
    fn already_running_message() {
        let error = TimerError::AlreadyRunning {
            timer_name: "Timer(name=load)".to_owned(),
            timestamp: timestamp(),
        };

        assert_eq!(
            error.to_string(),
            "[2023-11-02T08:30:00.250000] Tried to start Timer(name=load) but it was already running."
        );
        assert_eq!(error.action(), None);
    }

    #[test]
    fn not_running_message_names_the_action() {
        let error = TimerError::NotRunning {
            timer_name: "Unnamed Timer".to_owned(),
            timestamp: timestamp(),
            action: TimerAction::Measure,
        };

        assert_eq!(
            error.to_string(),
            "[2023-11-02T08:30:00.250000] Tried to click 'measure' on Unnamed Timer but it wasn't running."
        );
        assert_eq!(error.action(), Some(TimerAction::Measure));
    }
}

//! This crate contains a stopwatch for ad-hoc performance logging inside application code.
//!
//! A [`Timer`] is started and stopped any number of times; every [`Timer::measure`] or
//! [`Timer::stop`] records the seconds elapsed since the last start in [`Timer::times`] and logs
//! a formatted message to a [`LogSink`]. By default the lines go to the [`log`] facade at info
//! level, see [`LogCrateSink`]; [`WriterSink`] writes them to any [`std::io::Write`] instead.
//!
//! A timer can also time a scope: [`Timer::scoped`] returns a guard which stops the timer when
//! the scope is left, however that happens.
//!
//! ```
//! use thyming::Timer;
//! use thyming::TimerOptions;
//!
//! let mut timer = Timer::with_options(TimerOptions {
//!     message_template: "took {0}s".parse().expect("valid template"),
//!     logger: None,
//!     ..Default::default()
//! });
//!
//! let _ = timer.start().expect("timer is stopped");
//! timer.sleep(0.001).expect("valid duration");
//! let elapsed = timer.stop().expect("timer is running");
//!
//! assert!(elapsed > 0.0);
//! assert_eq!(timer.times(), &[elapsed]);
//! ```

mod error;
mod message;
mod sink;
mod time;
mod timer;

pub use error::*;
pub use message::*;
pub use sink::*;
pub use time::sleep;
pub use time::Instant;
pub use timer::*;

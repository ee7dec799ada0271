use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Deref;
use std::ops::DerefMut;

use log::debug;
use log::trace;
use log::warn;

use crate::sink::LogCrateSink;
use crate::sink::LogSink;
use crate::time::local_now;
use crate::time::Instant;
use crate::MessageTemplate;
use crate::TimerAction;
use crate::TimerError;
use crate::TimerMessage;

/// The options with which a [`Timer`] is created.
///
/// ```
/// use thyming::Timer;
/// use thyming::TimerOptions;
///
/// let timer = Timer::with_options(TimerOptions {
///     name: Some("parsing".to_owned()),
///     message_template: "took {:.2} seconds".parse().expect("valid template"),
///     logger: None,
///     ..Default::default()
/// });
/// assert_eq!(timer.name(), Some("parsing"));
/// ```
pub struct TimerOptions {
    /// The name of the timer, used in default messages and error text.
    pub name: Option<String>,
    /// The body line logged for every click.
    pub message_template: MessageTemplate,
    /// Where the messages of the timer are written to; `None` disables logging altogether.
    pub logger: Option<Box<dyn LogSink>>,
    /// If set, the timer is created running, counting from this instant.
    pub start_instant: Option<Instant>,
}

impl Default for TimerOptions {
    fn default() -> Self {
        TimerOptions {
            name: None,
            message_template: MessageTemplate::default(),
            logger: Some(Box::new(LogCrateSink::default())),
            start_instant: None,
        }
    }
}

impl Debug for TimerOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerOptions")
            .field("name", &self.name)
            .field("message_template", &self.message_template)
            .field("logger", &self.logger.as_ref().map(|_| "<Sink>"))
            .field("start_instant", &self.start_instant)
            .finish()
    }
}

/// A stopwatch which can be started and stopped any number of times, recording the number of
/// seconds elapsed at every click.
///
/// A timer is either running or stopped, and starts out stopped unless
/// [`TimerOptions::start_instant`] is given. [`Timer::measure`] records the time since the last
/// start without stopping; [`Timer::stop`] records it and stops. Every recorded time is kept, in
/// order, in [`Timer::times`].
///
/// Each click logs an optional leading line, the body line rendered from the
/// [`MessageTemplate`] and an optional trailing line to the configured [`LogSink`].
///
/// ```
/// use thyming::DefaultMessage;
/// use thyming::Timer;
///
/// let mut timer = Timer::named("load");
/// let _ = timer.start().expect("timer is stopped");
/// let first = timer.measure().expect("timer is running");
/// let second = timer
///     .stop_with(DefaultMessage::End, "done")
///     .expect("timer is running");
///
/// assert!(first <= second);
/// assert_eq!(timer.times(), &[first, second]);
/// assert!(!timer.is_running());
/// ```
pub struct Timer {
    name: Option<String>,
    message_template: MessageTemplate,
    logger: Option<Box<dyn LogSink>>,
    /// `None` if and only if the timer is stopped.
    start_instant: Option<Instant>,
    /// Only ever appended to.
    recorded_times: Vec<f64>,
}

impl Default for Timer {
    fn default() -> Self {
        Timer::with_options(TimerOptions::default())
    }
}

impl Timer {
    /// Creates an unnamed, stopped timer which logs through the [`log`] facade at info level.
    pub fn new() -> Timer {
        Timer::default()
    }

    /// Creates a stopped timer with the given name and otherwise default options.
    pub fn named(name: impl Into<String>) -> Timer {
        Timer::with_options(TimerOptions {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    /// Creates a timer from the given options.
    pub fn with_options(options: TimerOptions) -> Timer {
        Timer {
            name: options.name,
            message_template: options.message_template,
            logger: options.logger,
            start_instant: options.start_instant,
            recorded_times: vec![],
        }
    }

    /// The name of the timer, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The template of the body line logged on every click.
    pub fn message_template(&self) -> &MessageTemplate {
        &self.message_template
    }

    /// Whether the timer has a sink to log to.
    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// Whether the timer is currently running.
    pub fn is_running(&self) -> bool {
        self.start_instant.is_some()
    }

    /// All times recorded so far, in seconds, in the order in which they were recorded.
    pub fn times(&self) -> &[f64] {
        &self.recorded_times
    }

    /// The most recently recorded time, in seconds.
    pub fn last_time(&self) -> Option<f64> {
        self.recorded_times.last().copied()
    }

    /// Starts the timer without logging anything.
    pub fn start(&mut self) -> Result<&mut Self, TimerError> {
        self.start_with(TimerMessage::Omitted)
    }

    /// Starts the timer, then logs `message` unless it is omitted or empty.
    ///
    /// Fails with [`TimerError::AlreadyRunning`] if the timer is running, in which case nothing
    /// changes. If the sink fails, the timer has been started nonetheless.
    pub fn start_with(
        &mut self,
        message: impl Into<TimerMessage>,
    ) -> Result<&mut Self, TimerError> {
        if self.start_instant.is_some() {
            return Err(TimerError::AlreadyRunning {
                timer_name: self.to_string(),
                timestamp: local_now(),
            });
        }

        self.start_instant = Some(Instant::now());
        debug!("{} started", self);

        if self.logger.is_some() {
            if let Some(text) = message.into().resolve_non_empty() {
                self.write_lines(&text)?;
            }
        }

        Ok(self)
    }

    /// Records the time since the last start without stopping, logging the default body line.
    pub fn measure(&mut self) -> Result<f64, TimerError> {
        self.measure_with(TimerMessage::Omitted, TimerMessage::Omitted)
    }

    /// Records the time since the last start without stopping, logging `pre` before and `post`
    /// after the body line. Returns the recorded time in seconds.
    ///
    /// Fails with [`TimerError::NotRunning`] if the timer is stopped, in which case nothing
    /// changes.
    pub fn measure_with(
        &mut self,
        pre: impl Into<TimerMessage>,
        post: impl Into<TimerMessage>,
    ) -> Result<f64, TimerError> {
        self.click(TimerAction::Measure, &pre.into(), &post.into())
    }

    /// Stops the timer and records the time since the last start, logging the default body
    /// line.
    pub fn stop(&mut self) -> Result<f64, TimerError> {
        self.stop_with(TimerMessage::Omitted, TimerMessage::Omitted)
    }

    /// Stops the timer and records the time since the last start, logging `pre` before and
    /// `post` after the body line. Returns the recorded time in seconds.
    ///
    /// Fails with [`TimerError::NotRunning`] if the timer is stopped, in which case nothing
    /// changes.
    pub fn stop_with(
        &mut self,
        pre: impl Into<TimerMessage>,
        post: impl Into<TimerMessage>,
    ) -> Result<f64, TimerError> {
        self.click(TimerAction::Stop, &pre.into(), &post.into())
    }

    /// Stops the timer, logging `pre` and `post` as [`Timer::stop_with`] does, and starts it again
    /// without logging.
    pub fn restart(
        &mut self,
        pre: impl Into<TimerMessage>,
        post: impl Into<TimerMessage>,
    ) -> Result<&mut Self, TimerError> {
        let _ = self.stop_with(pre, post)?;
        self.start()
    }

    /// Logs `message` line by line; does nothing if the message is omitted or if the timer has no
    /// sink.
    pub fn log(&mut self, message: impl Into<TimerMessage>) -> Result<&mut Self, TimerError> {
        if self.logger.is_some() {
            if let Some(text) = message.into().resolve() {
                self.write_lines(&text)?;
            }
        }

        Ok(self)
    }

    /// Blocks the calling thread for `seconds` seconds; see [`crate::sleep`].
    pub fn sleep(&self, seconds: f64) -> Result<(), TimerError> {
        crate::time::sleep(seconds)
    }

    /// Starts the timer and returns a guard which stops it when dropped, unless it was stopped
    /// in the meantime.
    ///
    /// The guard also stops the timer when the scope is left through `?` or a panic. Nothing is
    /// logged when the timer is started; the stop logs the default body line.
    ///
    /// ```
    /// use thyming::Timer;
    /// use thyming::TimerError;
    ///
    /// fn work(timer: &mut Timer) -> Result<(), TimerError> {
    ///     let guard = timer.scoped()?;
    ///     guard.sleep(0.001)?;
    ///     Ok(())
    /// }
    ///
    /// let mut timer = Timer::new();
    /// work(&mut timer).expect("work succeeds");
    /// assert!(!timer.is_running());
    /// assert_eq!(timer.times().len(), 1);
    /// ```
    pub fn scoped(&mut self) -> Result<TimerGuard<'_>, TimerError> {
        let _ = self.start()?;
        Ok(TimerGuard { timer: self })
    }

    /// Runs `block` with the timer running, stopping it afterwards if `block` did not.
    ///
    /// Errors from stopping the timer are returned; the value of `block` is lost in that case.
    pub fn time<R>(&mut self, block: impl FnOnce(&mut Timer) -> R) -> Result<R, TimerError> {
        let mut guard = self.scoped()?;
        let result = block(&mut *guard);
        let _ = guard.finish()?;
        Ok(result)
    }

    fn click(
        &mut self,
        action: TimerAction,
        pre: &TimerMessage,
        post: &TimerMessage,
    ) -> Result<f64, TimerError> {
        let Some(start_instant) = self.start_instant else {
            return Err(TimerError::NotRunning {
                timer_name: self.to_string(),
                timestamp: local_now(),
                action,
            });
        };

        let recorded_time = Instant::now()
            .saturating_duration_since(start_instant)
            .as_secs_f64();
        if action == TimerAction::Stop {
            self.start_instant = None;
        }
        self.recorded_times.push(recorded_time);
        match action {
            TimerAction::Measure => trace!("{} measured {recorded_time} seconds", self),
            TimerAction::Stop => debug!("{} stopped after {recorded_time} seconds", self),
        }

        if self.logger.is_some() {
            let message = self.compose_message(recorded_time, pre, post);
            self.write_lines(&message)?;
        }

        Ok(recorded_time)
    }

    /// Composes the leading line, the body line and the trailing line of a click.
    ///
    /// Without a leading message the name of the timer, if any, is used as the leading line.
    fn compose_message(
        &self,
        recorded_time: f64,
        pre: &TimerMessage,
        post: &TimerMessage,
    ) -> String {
        let mut message = match (pre.resolve_non_empty(), self.name()) {
            (Some(pre), _) => format!("{pre}\n"),
            (None, Some(name)) if !name.is_empty() => format!("{name}:\n"),
            (None, _) => String::new(),
        };

        message.push_str(&self.message_template.render(recorded_time));

        if let Some(post) = post.resolve_non_empty() {
            message.push('\n');
            message.push_str(&post);
        }

        message
    }

    fn write_lines(&mut self, text: &str) -> Result<(), TimerError> {
        if let Some(logger) = self.logger.as_mut() {
            for line in text.split('\n') {
                logger.write_line(line)?;
            }
        }

        Ok(())
    }
}

impl Display for Timer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) if !name.is_empty() => write!(f, "Timer(name={name})"),
            _ => write!(f, "Unnamed Timer"),
        }
    }
}

impl Debug for Timer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("message_template", &self.message_template.as_str())
            .field("logger", &self.logger.as_ref().map(|_| "<Sink>"))
            .field("running", &self.is_running())
            .finish()
    }
}

/// Keeps a [`Timer`] running for as long as it lives; see [`Timer::scoped`].
#[derive(Debug)]
pub struct TimerGuard<'timer> {
    timer: &'timer mut Timer,
}

impl TimerGuard<'_> {
    /// Stops the timer if it is still running and returns the recorded time, passing on any
    /// error of the sink.
    pub fn finish(self) -> Result<Option<f64>, TimerError> {
        if self.timer.is_running() {
            self.timer.stop().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Deref for TimerGuard<'_> {
    type Target = Timer;

    fn deref(&self) -> &Self::Target {
        self.timer
    }
}

impl DerefMut for TimerGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.timer
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        if self.timer.is_running() {
            if let Err(error) = self.timer.stop() {
                warn!("Failed to stop {} when leaving its scope: {error}", self.timer);
            }
        }
    }
}

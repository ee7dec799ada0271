#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::sync::Mutex;
use std::sync::OnceLock;
use std::thread::ThreadId;

use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;
use thyming::DefaultMessage;
use thyming::LogCrateSink;
use thyming::Timer;
use thyming::TimerOptions;

#[derive(Clone, Debug)]
struct CapturedRecord {
    thread: ThreadId,
    level: Level,
    target: String,
    message: String,
}

/// Remembers every record, and passes it on to `env_logger` so that `RUST_LOG` still works.
struct CapturingLogger {
    records: Mutex<Vec<CapturedRecord>>,
    inner: env_logger::Logger,
}

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records
            .lock()
            .expect("lock is not poisoned")
            .push(CapturedRecord {
                thread: std::thread::current().id(),
                level: record.level(),
                target: record.target().to_owned(),
                message: record.args().to_string(),
            });
        if self.inner.matches(record) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();

fn logger() -> &'static CapturingLogger {
    let logger = LOGGER.get_or_init(|| CapturingLogger {
        records: Mutex::new(vec![]),
        inner: env_logger::builder().is_test(true).build(),
    });
    // Only the first call installs the logger; later calls fail, which is fine.
    let _ = log::set_logger(logger);
    log::set_max_level(LevelFilter::Trace);
    logger
}

/// The records logged by the current thread, as `(level, message)`, from the given target.
fn records_of_this_thread(target_prefix: &str) -> Vec<(Level, String)> {
    let this_thread = std::thread::current().id();
    logger()
        .records
        .lock()
        .expect("lock is not poisoned")
        .iter()
        .filter(|record| {
            record.thread == this_thread && record.target.starts_with(target_prefix)
        })
        .map(|record| (record.level, record.message.clone()))
        .collect()
}

/// Lines written by a [`LogCrateSink`] carry the target of the sink module.
const SINK_TARGET: &str = "thyming::sink";

#[test]
fn default_timer_logs_every_line_at_info() {
    let _ = logger();

    let mut timer = Timer::named("facade");
    assert!(timer.has_logger());

    let _ = timer
        .start_with(DefaultMessage::Start)
        .expect("timer is stopped");
    let _ = timer
        .stop_with(DefaultMessage::End, "finished")
        .expect("timer is running");

    let records = records_of_this_thread(SINK_TARGET);
    assert_eq!(records.len(), 4, "{records:?}");
    assert!(records.iter().all(|(level, _)| *level == Level::Info));
    assert!(records[0].1.starts_with("START: "));
    assert!(records[1].1.starts_with("END: "));
    assert!(records[2].1.starts_with("Elapsed time: "));
    assert_eq!(records[3].1, "finished");
}

#[test]
fn name_line_precedes_the_body_on_measure() {
    let _ = logger();

    let mut timer = Timer::named("facade");
    let _ = timer.start().expect("timer is stopped");
    let _ = timer.measure().expect("timer is running");

    let records = records_of_this_thread(SINK_TARGET);
    assert_eq!(records.len(), 2, "{records:?}");
    assert_eq!(records[0], (Level::Info, "facade:".to_owned()));
    assert!(records[1].1.starts_with("Elapsed time: "));
}

#[test]
fn sink_level_is_configurable() {
    let _ = logger();

    let mut timer = Timer::with_options(TimerOptions {
        logger: Some(Box::new(LogCrateSink::new(Level::Debug))),
        ..Default::default()
    });
    let _ = timer.log("one\ntwo").expect("logging never fails");

    assert_eq!(
        records_of_this_thread(SINK_TARGET),
        vec![
            (Level::Debug, "one".to_owned()),
            (Level::Debug, "two".to_owned())
        ]
    );
}

#[test]
fn transitions_are_logged_as_diagnostics() {
    let _ = logger();

    let mut timer = Timer::with_options(TimerOptions {
        name: Some("diagnostics".to_owned()),
        logger: None,
        ..Default::default()
    });
    let _ = timer.start().expect("timer is stopped");
    let _ = timer.measure().expect("timer is running");
    let _ = timer.stop().expect("timer is running");

    let records = records_of_this_thread("thyming::timer");
    assert_eq!(records.len(), 3, "{records:?}");
    assert_eq!(
        records[0],
        (Level::Debug, "Timer(name=diagnostics) started".to_owned())
    );
    assert_eq!(records[1].0, Level::Trace);
    assert!(records[1].1.contains("measured"));
    assert_eq!(records[2].0, Level::Debug);
    assert!(records[2]
        .1
        .starts_with("Timer(name=diagnostics) stopped after "));
}

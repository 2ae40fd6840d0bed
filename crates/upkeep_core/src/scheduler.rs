use crate::clock::Clock;
use crate::date::local_offset;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::scanner;
use crate::store::TaskStore;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration as StdDuration;
use time::{Date, OffsetDateTime, Time};

/// Poll interval for the scheduler loop (1 minute).
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Local wall-clock time of the daily scan, parsed from `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTime {
    pub hour: u8,
    pub minute: u8,
}

impl ScanTime {
    /// The original service ran its check daily at 09:00.
    pub const DEFAULT: ScanTime = ScanTime { hour: 9, minute: 0 };

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        let (hour_raw, minute_raw) = trimmed
            .split_once(':')
            .ok_or_else(|| AppError::invalid_input("scan time must be in HH:MM format"))?;

        let hour: u8 = hour_raw
            .parse()
            .map_err(|_| AppError::invalid_input("scan time must be in HH:MM format"))?;
        let minute: u8 = minute_raw
            .parse()
            .map_err(|_| AppError::invalid_input("scan time must be in HH:MM format"))?;

        if hour > 23 || minute > 59 {
            return Err(AppError::invalid_input("scan time out of range"));
        }

        Ok(ScanTime { hour, minute })
    }

    fn as_time(self) -> Time {
        Time::from_hms(self.hour, self.minute, 0).unwrap_or(Time::MIDNIGHT)
    }
}

/// Fires once per calendar day at or after the configured time. A process
/// that was asleep past the scan time catches up on the next poll.
pub fn should_fire(today: Date, now: Time, scan_time: Time, last_run: Option<Date>) -> bool {
    if now < scan_time {
        return false;
    }
    match last_run {
        Some(ran) => ran < today,
        None => true,
    }
}

/// Drives the reminder scanner on a daily cadence. One worker thread runs
/// scans sequentially, so two scans never observe the same task set
/// concurrently.
pub struct Scheduler {
    store: Arc<dyn TaskStore + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
    scan_time: ScanTime,
    started: AtomicBool,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn TaskStore + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        scan_time: ScanTime,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            scan_time,
            started: AtomicBool::new(false),
        }
    }

    /// Starts the timer thread. Idempotent at the process level: a second
    /// call is ignored and returns `false`, so two timers can never race.
    pub fn start(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            log::warn!("scheduler already running, ignoring start");
            return false;
        }

        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let clock = Arc::clone(&self.clock);
        let scan_time = self.scan_time;

        let spawned = thread::Builder::new()
            .name("upkeep-scheduler".to_string())
            .spawn(move || run_loop(store, notifier, clock, scan_time));

        match spawned {
            Ok(_) => {
                log::info!(
                    "scheduler started, daily scan at {:02}:{:02}",
                    self.scan_time.hour,
                    self.scan_time.minute
                );
                true
            }
            Err(err) => {
                self.started.store(false, Ordering::SeqCst);
                log::error!("failed to spawn scheduler thread: {err}");
                false
            }
        }
    }
}

fn run_loop(
    store: Arc<dyn TaskStore + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
    scan_time: ScanTime,
) {
    let mut last_run: Option<Date> = None;

    loop {
        let now = OffsetDateTime::now_utc().to_offset(local_offset());

        if should_fire(now.date(), now.time(), scan_time.as_time(), last_run) {
            run_guarded_scan(store.as_ref(), notifier.as_ref(), clock.as_ref());
            // Recorded even after a failure; the next attempt is
            // tomorrow's tick, when still-due tasks re-qualify anyway.
            last_run = Some(now.date());
        }

        thread::sleep(StdDuration::from_secs(POLL_INTERVAL_SECS));
    }
}

fn run_guarded_scan(store: &dyn TaskStore, notifier: &dyn Notifier, clock: &dyn Clock) {
    let today = clock.today();
    let outcome = catch_unwind(AssertUnwindSafe(|| scanner::scan(store, notifier, today)));

    match outcome {
        Ok(Ok(result)) => {
            log::info!(
                "scheduled scan done: {} considered, {} notified",
                result.considered,
                result.notified
            );
        }
        Ok(Err(err)) => {
            log::error!("scheduled scan failed: {err}");
        }
        Err(_) => {
            log::error!("scheduled scan panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScanTime, Scheduler, should_fire};
    use crate::clock::FixedClock;
    use crate::notify::NoopNotifier;
    use crate::store::JsonTaskStore;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::{Date, Month, Time};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    fn time(hour: u8, minute: u8) -> Time {
        Time::from_hms(hour, minute, 0).unwrap()
    }

    #[test]
    fn scan_time_parses_hh_mm() {
        assert_eq!(ScanTime::parse("09:00").unwrap(), ScanTime { hour: 9, minute: 0 });
        assert_eq!(
            ScanTime::parse(" 23:59 ").unwrap(),
            ScanTime { hour: 23, minute: 59 }
        );
    }

    #[test]
    fn scan_time_rejects_bad_input() {
        assert_eq!(ScanTime::parse("9").unwrap_err().code(), "invalid_input");
        assert_eq!(ScanTime::parse("24:00").unwrap_err().code(), "invalid_input");
        assert_eq!(ScanTime::parse("09:60").unwrap_err().code(), "invalid_input");
        assert_eq!(ScanTime::parse("morning").unwrap_err().code(), "invalid_input");
    }

    #[test]
    fn fires_at_or_after_scan_time_once_per_day() {
        let today = date(2025, Month::June, 1);
        let scan_time = time(9, 0);

        assert!(!should_fire(today, time(8, 59), scan_time, None));
        assert!(should_fire(today, time(9, 0), scan_time, None));
        assert!(should_fire(today, time(14, 30), scan_time, None));
        assert!(!should_fire(today, time(9, 1), scan_time, Some(today)));
    }

    #[test]
    fn catches_up_the_next_day_after_a_missed_tick() {
        let yesterday = date(2025, Month::May, 31);
        let today = date(2025, Month::June, 1);
        let scan_time = time(9, 0);

        assert!(should_fire(today, time(9, 0), scan_time, Some(yesterday)));
        // Woken late in the day: still fires.
        assert!(should_fire(today, time(22, 15), scan_time, Some(yesterday)));
    }

    #[test]
    fn start_is_idempotent() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("upkeep-{nanos}-scheduler.json"));

        let scheduler = Scheduler::new(
            Arc::new(JsonTaskStore::new(path)),
            Arc::new(NoopNotifier),
            Arc::new(FixedClock(date(2025, Month::June, 1))),
            ScanTime::DEFAULT,
        );

        assert!(scheduler.start());
        assert!(!scheduler.start());
    }
}

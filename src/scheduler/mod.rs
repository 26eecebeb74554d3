use crate::daylight::Oracle;
use crate::fetch::Fetch;
use crate::frame::Frame;
use crate::store::Store;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Consecutive skipped captures before the interval starts doubling.
const BACKOFF_STREAK: u32 = 5;
/// Once doubling pushes the interval past this, it resets to base.
const BACKOFF_CEILING: Duration = Duration::from_secs(1500);
/// Short interval used to catch scene changes right after a duplicate.
const PROBE_INTERVAL: Duration = Duration::from_secs(5);
/// Longest the loop will sleep while waiting for dawn.
const NIGHT_WAIT_CEILING: Duration = Duration::from_secs(3600);
const DAYLIGHT_REFRESH_EVERY: Duration = Duration::from_secs(6 * 3600);
/// Granularity at which the stop flag is observed while sleeping.
const STOP_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureResult {
    Saved,
    TooDark,
    Duplicate,
    Night,
}

/// Loop state carried from one iteration to the next.
#[derive(Debug)]
struct ScheduleState {
    last_saved: Option<(PathBuf, Frame)>,
    skipped: u32,
    interval: Duration,
}

/// Drives the capture loop: fetch, evaluate, persist or discard, adapt
/// the next wait interval, repeat until interrupted.
pub struct Scheduler {
    fetcher: Box<dyn Fetch>,
    oracle: Option<Oracle>,
    store: Store,
    base_interval: Duration,
    light_floor: f64,
    state: ScheduleState,
    next_refresh: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(
        fetcher: Box<dyn Fetch>,
        oracle: Option<Oracle>,
        store: Store,
        base_interval_secs: u64,
        light_floor: f64,
    ) -> Self {
        let base_interval = Duration::from_secs(base_interval_secs);

        Self {
            fetcher,
            oracle,
            store,
            base_interval,
            light_floor,
            state: ScheduleState {
                last_saved: None,
                skipped: 0,
                interval: base_interval,
            },
            next_refresh: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raising this flag stops the loop after the current iteration;
    /// in-flight work always runs to completion.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn run(&mut self) {
        while !self.stop.load(Ordering::Relaxed) {
            let started = Instant::now();

            self.refresh_daylight_if_due(started);
            self.step(Utc::now());

            // Discount processing time so the start-to-start period
            // tracks the target interval.
            let wait = self.state.interval.saturating_sub(started.elapsed());
            log::info!("Waiting {} seconds", wait.as_secs());
            self.idle(wait);
        }

        log::info!("Stopping...");
    }

    fn refresh_daylight_if_due(&mut self, now: Instant) {
        let due = match self.next_refresh {
            Some(at) => now >= at,
            None => true,
        };
        if !due {
            return;
        }

        if let Some(oracle) = self.oracle.as_mut() {
            if let Err(err) = oracle.refresh() {
                log::error!("Unable to refresh daylight times: {:?}", err);
            }
            self.next_refresh = Some(now + DAYLIGHT_REFRESH_EVERY);
        }
    }

    /// One iteration. Returns `None` when the capture failed outright
    /// (fetch or decode error), which leaves all state untouched.
    fn step(&mut self, now: DateTime<Utc>) -> Option<CaptureResult> {
        let night = match &self.oracle {
            Some(oracle) => !oracle.is_daylight(now),
            None => false,
        };
        if night {
            log::info!("Waiting for daylight");
            self.state.interval = self.night_wait(now);
            return Some(CaptureResult::Night);
        }

        match self.evaluate(now) {
            Ok(result) => {
                self.adapt(result);
                Some(result)
            }
            Err(err) => {
                log::error!("Capture failed: {:?}", err);
                None
            }
        }
    }

    fn evaluate(&mut self, now: DateTime<Utc>) -> Result<CaptureResult, Box<dyn Error>> {
        let bytes = self.fetcher.fetch()?;
        let frame = Frame::decode(&bytes)?;

        if let Some((_, last)) = &self.state.last_saved {
            if !frame.differs_from(last) {
                log::warn!("Same as last image");
                return Ok(CaptureResult::Duplicate);
            }
        }

        let light = frame.light_percent();
        log::info!("Light level: {:.2}%", light);
        if light < self.light_floor {
            return Ok(CaptureResult::TooDark);
        }

        let path = self.store.save(&frame, now)?;
        log::info!("Saving: {}", path.display());
        self.state.last_saved = Some((path, frame));
        Ok(CaptureResult::Saved)
    }

    fn adapt(&mut self, result: CaptureResult) {
        match result {
            CaptureResult::Saved => {
                self.state.skipped = 0;
                self.state.interval = self.base_interval;
            }
            CaptureResult::TooDark => {
                self.note_skip();
                self.back_off();
            }
            CaptureResult::Duplicate => {
                self.note_skip();
                if self.state.skipped >= BACKOFF_STREAK {
                    self.back_off();
                } else {
                    self.state.interval = PROBE_INTERVAL;
                }
            }
            CaptureResult::Night => {}
        }
    }

    fn note_skip(&mut self) {
        self.state.skipped += 1;
        log::info!("Skipped...{}", self.state.skipped);
    }

    fn back_off(&mut self) {
        if self.state.skipped < BACKOFF_STREAK {
            return;
        }
        if self.state.skipped == BACKOFF_STREAK {
            log::info!("{} captures skipped, increasing interval", BACKOFF_STREAK);
        }

        self.state.interval *= 2;
        if self.state.interval > BACKOFF_CEILING {
            log::info!("Resetting interval");
            self.state.interval = self.base_interval;
        }
    }

    fn night_wait(&self, now: DateTime<Utc>) -> Duration {
        let until_dawn = self
            .oracle
            .as_ref()
            .and_then(|oracle| oracle.window())
            .map(|window| (window.dawn - now).num_seconds())
            .unwrap_or(i64::MAX);

        // Dawn already behind us (or no window at all) means the span is
        // useless; fall back to the ceiling and re-check in an hour.
        if (0..=NIGHT_WAIT_CEILING.as_secs() as i64).contains(&until_dawn) {
            Duration::from_secs(until_dawn as u64)
        } else {
            NIGHT_WAIT_CEILING
        }
    }

    fn idle(&self, wait: Duration) {
        let deadline = Instant::now() + wait;
        while !self.stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(STOP_POLL));
        }
    }
}

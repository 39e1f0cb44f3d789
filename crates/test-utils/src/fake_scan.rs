use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use dagmake::scan::Scan;

/// Seconds since the epoch where fake build times start; later than any
/// fixture timestamp so a freshly built file is always the newest.
const BUILD_CLOCK_START: u64 = 2_000_000_000;

#[derive(Debug, Clone, Default)]
struct FakeFile {
    time: Option<SystemTime>,
    fail: bool,
    build_delay: Option<Duration>,
}

/// A fake scan that:
/// - reports configured modification times (`None` means missing)
/// - records every `status` and `build` call in order
/// - builds by handing out strictly increasing timestamps, or fails for
///   files marked failing
#[derive(Debug, Clone, Default)]
pub struct FakeScan {
    files: Arc<Mutex<HashMap<String, FakeFile>>>,
    attempts: Arc<Mutex<Vec<String>>>,
    builds: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<Vec<String>>>,
    clock: Arc<AtomicU64>,
}

impl FakeScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// An existing file with the given modification time.
    pub fn existing(self, name: &str, time: SystemTime) -> Self {
        self.entry(name, |f| f.time = Some(time));
        self
    }

    /// A file that does not exist yet.
    pub fn missing(self, name: &str) -> Self {
        self.entry(name, |f| f.time = None);
        self
    }

    /// Building this file fails.
    pub fn failing(self, name: &str) -> Self {
        self.entry(name, |f| f.fail = true);
        self
    }

    /// Building this file blocks for `delay` before finishing.
    pub fn slow(self, name: &str, delay: Duration) -> Self {
        self.entry(name, |f| f.build_delay = Some(delay));
        self
    }

    fn entry(&self, name: &str, f: impl FnOnce(&mut FakeFile)) {
        let mut files = self.files.lock().unwrap();
        f(files.entry(name.to_string()).or_default());
    }

    /// Every `build` call, failed ones included, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Files built successfully so far, in completion order.
    pub fn builds(&self) -> Vec<String> {
        self.builds.lock().unwrap().clone()
    }

    pub fn build_count(&self, name: &str) -> usize {
        self.builds().iter().filter(|b| *b == name).count()
    }

    /// Files whose status was queried, in call order.
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    /// Position of `name` in the build order, if it was built.
    pub fn build_position(&self, name: &str) -> Option<usize> {
        self.builds().iter().position(|b| b == name)
    }
}

impl Scan for FakeScan {
    fn status(&self, filename: &str) -> Result<SystemTime> {
        self.statuses.lock().unwrap().push(filename.to_string());
        let files = self.files.lock().unwrap();
        files
            .get(filename)
            .and_then(|f| f.time)
            .ok_or_else(|| anyhow!("missing file {filename:?}"))
    }

    fn build(&self, filename: &str) -> Result<SystemTime> {
        self.attempts.lock().unwrap().push(filename.to_string());
        let file = self
            .files
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .unwrap_or_default();

        if let Some(delay) = file.build_delay {
            std::thread::sleep(delay);
        }
        if file.fail {
            return Err(anyhow!("build error on file {filename:?}"));
        }

        let tick = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        let time = UNIX_EPOCH + Duration::from_secs(BUILD_CLOCK_START + tick);

        self.files
            .lock()
            .unwrap()
            .entry(filename.to_string())
            .or_default()
            .time = Some(time);
        self.builds.lock().unwrap().push(filename.to_string());
        Ok(time)
    }
}

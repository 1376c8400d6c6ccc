use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
struct Stopwatch {
    running_since: Option<f64>,
    accumulated_ms: f64,
}

impl Stopwatch {
    fn elapsed(&self, now_ms: f64) -> f64 {
        self.accumulated_ms + self.running_since.map_or(0.0, |since| now_ms - since)
    }
}

/// Named stopwatches read against the game clock.
///
/// All methods take the current time so timers stay deterministic under a
/// fixed-step frame loop; `Game` passes its frame timestamp.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    entries: HashMap<String, Stopwatch>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or resumes) `name`, creating it when missing.
    pub fn start(&mut self, name: &str, now_ms: f64) {
        let entry = self.entries.entry(name.to_string()).or_default();
        if entry.running_since.is_none() {
            entry.running_since = Some(now_ms);
        }
    }

    pub fn stop(&mut self, name: &str, now_ms: f64) -> Result<()> {
        let entry = self.get_mut(name)?;
        if let Some(since) = entry.running_since.take() {
            entry.accumulated_ms += now_ms - since;
        }
        Ok(())
    }

    /// Zeroes and starts `name`.
    pub fn restart(&mut self, name: &str, now_ms: f64) {
        self.entries.insert(
            name.to_string(),
            Stopwatch {
                running_since: Some(now_ms),
                accumulated_ms: 0.0,
            },
        );
    }

    pub fn elapsed(&self, name: &str, now_ms: f64) -> Result<f64> {
        self.entries
            .get(name)
            .map(|s| s.elapsed(now_ms))
            .ok_or_else(|| Error::UnknownTimer(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownTimer(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Stopwatch> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownTimer(name.to_string()))
    }
}

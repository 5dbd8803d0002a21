// src/utils/time.rs

//! Injected clock and pacing abstractions.
//!
//! The pipeline requests its politeness delay and its timestamps through
//! these seams so tests can assert a delay was requested without waiting
//! and pin the scrape date.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Suspension point between successive fetches.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Pacer backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Pacer that records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().expect("pacer lock").push(duration);
    }
}

impl RecordingPacer {
    /// Pauses requested so far.
    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().expect("pacer lock").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2025, 10, 4, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }

    #[tokio::test]
    async fn test_recording_pacer() {
        let pacer = RecordingPacer::default();
        pacer.pause(Duration::from_millis(500)).await;
        pacer.pause(Duration::from_millis(500)).await;
        assert_eq!(pacer.recorded().len(), 2);
        assert_eq!(pacer.recorded()[0], Duration::from_millis(500));
    }
}

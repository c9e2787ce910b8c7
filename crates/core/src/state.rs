use crate::types::{Threshold, ThresholdSource};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedThreshold {
    pub threshold: Threshold,
    pub source: ThresholdSource,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Unknown,
    Known(CachedThreshold),
    Unavailable {
        reason: String,
        observed_at: DateTime<Utc>,
    },
}

/// Last known threshold, possibly stale.
///
/// A value is only meaningful right after the read that produced it. The
/// cache exists to skip redundant privileged writes, never to answer
/// "what is the threshold now".
#[derive(Debug, Clone)]
pub struct ThresholdState {
    reading: Reading,
    stale: bool,
    pending: Option<CachedThreshold>,
    in_flight: usize,
}

impl ThresholdState {
    pub fn new() -> Self {
        Self {
            reading: Reading::Unknown,
            stale: false,
            pending: None,
            in_flight: 0,
        }
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn cached(&self) -> Option<&Threshold> {
        match &self.reading {
            Reading::Known(cached) => Some(&cached.threshold),
            _ => None,
        }
    }

    /// Cached threshold that may still be used to skip a redundant write.
    ///
    /// `None` once the device has been seen disagreeing with the cache.
    pub fn trusted(&self) -> Option<&Threshold> {
        if self.stale {
            None
        } else {
            self.cached()
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Keeps the cached value for display but stops trusting it.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Most recently requested write that has not completed yet.
    pub fn pending(&self) -> Option<&CachedThreshold> {
        self.pending.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn record_read(&mut self, threshold: Threshold) {
        self.stale = false;
        self.reading = Reading::Known(CachedThreshold {
            threshold,
            source: ThresholdSource::DeviceRead,
            observed_at: Utc::now(),
        });
    }

    pub fn record_unavailable(&mut self, reason: impl Into<String>) {
        self.stale = false;
        self.reading = Reading::Unavailable {
            reason: reason.into(),
            observed_at: Utc::now(),
        };
    }

    pub fn begin_write(&mut self, requested: Threshold) {
        self.in_flight += 1;
        self.pending = Some(CachedThreshold {
            threshold: requested,
            source: ThresholdSource::PendingWrite,
            observed_at: Utc::now(),
        });
    }

    pub fn finish_write(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.pending = None;
        }
    }
}

impl Default for ThresholdState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(raw: &str) -> Threshold {
        Threshold::from_raw(raw).unwrap()
    }

    #[test]
    fn test_new_state_is_unknown() {
        let state = ThresholdState::new();
        assert_eq!(state.reading(), &Reading::Unknown);
        assert!(state.cached().is_none());
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn test_record_read_is_device_sourced() {
        let mut state = ThresholdState::new();
        state.record_read(threshold("60"));
        match state.reading() {
            Reading::Known(cached) => {
                assert_eq!(cached.threshold.as_str(), "60");
                assert_eq!(cached.source, ThresholdSource::DeviceRead);
            }
            other => panic!("Expected known reading, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_clears_cache() {
        let mut state = ThresholdState::new();
        state.record_read(threshold("60"));
        state.record_unavailable("no such file");
        assert!(state.cached().is_none());
        assert!(matches!(state.reading(), Reading::Unavailable { .. }));
    }

    #[test]
    fn test_stale_value_is_kept_but_not_trusted() {
        let mut state = ThresholdState::new();
        state.record_read(threshold("60"));
        state.mark_stale();

        assert!(state.is_stale());
        assert_eq!(state.cached().unwrap().as_str(), "60");
        assert!(state.trusted().is_none());

        state.record_read(threshold("100"));
        assert!(!state.is_stale());
        assert_eq!(state.trusted().unwrap().as_str(), "100");
    }

    #[test]
    fn test_pending_write_does_not_replace_cache() {
        let mut state = ThresholdState::new();
        state.record_read(threshold("60"));
        state.begin_write(threshold("80"));

        assert_eq!(state.cached().unwrap().as_str(), "60");
        let pending = state.pending().unwrap();
        assert_eq!(pending.threshold.as_str(), "80");
        assert_eq!(pending.source, ThresholdSource::PendingWrite);
    }

    #[test]
    fn test_pending_cleared_after_last_write() {
        let mut state = ThresholdState::new();
        state.begin_write(threshold("80"));
        state.begin_write(threshold("100"));
        assert_eq!(state.in_flight(), 2);
        assert_eq!(state.pending().unwrap().threshold.as_str(), "100");

        state.finish_write();
        assert!(state.pending().is_some());
        state.finish_write();
        assert!(state.pending().is_none());
        assert_eq!(state.in_flight(), 0);

        state.finish_write();
        assert_eq!(state.in_flight(), 0);
    }
}

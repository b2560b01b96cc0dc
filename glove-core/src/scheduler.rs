//! Rate limiting for outbound telemetry.

use crate::link::ConnectionState;

/// Enforces a minimum spacing between telemetry notifications.
///
/// Timestamps are milliseconds from a monotonic clock. Missed slots are not
/// made up: a late tick emits once and restarts the interval from that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitScheduler {
    interval_ms: u64,
    last_sent_ms: Option<u64>,
}

impl TransmitScheduler {
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent_ms: None,
        }
    }

    /// Whether a frame may be emitted at `now_ms` in link state `state`.
    #[must_use]
    pub fn due(&self, now_ms: u64, state: ConnectionState) -> bool {
        if state != ConnectionState::Connected {
            return false;
        }
        match self.last_sent_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Record an emission at `now_ms`.
    #[inline]
    pub fn mark_sent(&mut self, now_ms: u64) {
        self.last_sent_ms = Some(now_ms);
    }

    /// Check and claim the current slot in one step.
    ///
    /// Returns `true` when the caller should emit a frame now.
    ///
    /// # Example
    ///
    /// ```
    /// use glove_core::{ConnectionState, TransmitScheduler};
    ///
    /// let mut scheduler = TransmitScheduler::new(100);
    /// assert!(scheduler.tick(0, ConnectionState::Connected));
    /// assert!(!scheduler.tick(60, ConnectionState::Connected));
    /// assert!(scheduler.tick(100, ConnectionState::Connected));
    /// ```
    pub fn tick(&mut self, now_ms: u64, state: ConnectionState) -> bool {
        let due = self.due(now_ms, state);
        if due {
            self.mark_sent(now_ms);
        }
        due
    }

    /// Timestamp of the last emission, if any.
    #[inline]
    #[must_use]
    pub const fn last_sent(&self) -> Option<u64> {
        self.last_sent_ms
    }

    #[inline]
    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_first_tick_fires_immediately() {
        let mut s = TransmitScheduler::new(100);
        assert_eq!(s.last_sent(), None);
        assert!(s.tick(5, ConnectionState::Connected));
        assert_eq!(s.last_sent(), Some(5));
    }

    #[test]
    fn test_only_connected_emits() {
        let mut s = TransmitScheduler::new(100);
        for state in [
            ConnectionState::Idle,
            ConnectionState::Advertising,
            ConnectionState::Disconnected,
        ] {
            assert!(!s.tick(1_000, state));
        }
        assert_eq!(s.last_sent(), None);
    }

    #[test]
    fn test_30ms_ticks_never_fire_early() {
        let mut s = TransmitScheduler::new(100);
        let fired: Vec<u64> = (0..=10)
            .map(|i| i * 30)
            .filter(|&now| s.tick(now, ConnectionState::Connected))
            .collect();
        assert_eq!(fired, [0, 120, 240]);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= 100);
        }
    }

    #[test]
    fn test_no_catch_up_after_gap() {
        let mut s = TransmitScheduler::new(100);
        assert!(s.tick(0, ConnectionState::Connected));
        // Link stalls for a second: only one frame goes out when it returns.
        assert!(s.tick(1_000, ConnectionState::Connected));
        assert!(!s.tick(1_010, ConnectionState::Connected));
        assert!(!s.tick(1_099, ConnectionState::Connected));
        assert!(s.tick(1_100, ConnectionState::Connected));
    }

    #[test]
    fn test_due_does_not_claim_slot() {
        let s = TransmitScheduler::new(100);
        assert!(s.due(0, ConnectionState::Connected));
        assert!(s.due(0, ConnectionState::Connected));
        assert_eq!(s.last_sent(), None);
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let mut s = TransmitScheduler::new(100);
        s.mark_sent(500);
        assert!(!s.due(400, ConnectionState::Connected));
    }
}

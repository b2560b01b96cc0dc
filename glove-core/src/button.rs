//! Push-button debouncing.

/// Emitted once per accepted button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToggleEvent {
    /// Timestamp at which the press was accepted.
    pub at_ms: u64,
}

/// Timestamp-window debouncer for an active-low button.
///
/// A press is accepted on a high-to-low transition of the pin when at least
/// `window_ms` have elapsed since the previously accepted press. Holding the
/// button fires once; contact chatter inside the window is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    window_ms: u64,
    last_accepted: Option<u64>,
    was_low: bool,
}

impl Debouncer {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted: None,
            was_low: false,
        }
    }

    /// Feed the current pin level, sampled once per loop step.
    ///
    /// # Example
    ///
    /// ```
    /// use glove_core::Debouncer;
    ///
    /// let mut button = Debouncer::new(200);
    /// assert!(button.on_edge(true, 1_000).is_some());
    /// // Still held: no new edge.
    /// assert!(button.on_edge(true, 1_300).is_none());
    /// assert!(button.on_edge(false, 1_350).is_none());
    /// assert!(button.on_edge(true, 1_400).is_some());
    /// ```
    pub fn on_edge(&mut self, pin_low: bool, now_ms: u64) -> Option<ToggleEvent> {
        let falling = pin_low && !self.was_low;
        self.was_low = pin_low;
        if !falling {
            return None;
        }
        if let Some(last) = self.last_accepted {
            if now_ms.saturating_sub(last) < self.window_ms {
                return None;
            }
        }
        self.last_accepted = Some(now_ms);
        Some(ToggleEvent { at_ms: now_ms })
    }

    /// Timestamp of the last accepted press.
    #[inline]
    #[must_use]
    pub const fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_high_level_never_fires() {
        let mut d = Debouncer::new(200);
        for t in (0..2_000).step_by(10) {
            assert_eq!(d.on_edge(false, t), None);
        }
        assert_eq!(d.last_accepted(), None);
    }

    #[test]
    fn test_first_press_fires() {
        let mut d = Debouncer::new(200);
        assert_eq!(d.on_edge(true, 0), Some(ToggleEvent { at_ms: 0 }));
    }

    #[test]
    fn test_two_edges_inside_window_fire_once() {
        let mut d = Debouncer::new(200);
        let fired = [(true, 500), (false, 520), (true, 540), (true, 699)]
            .into_iter()
            .filter_map(|(low, t)| d.on_edge(low, t))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_window_boundary_accepts() {
        let mut d = Debouncer::new(200);
        assert!(d.on_edge(true, 100).is_some());
        d.on_edge(false, 150);
        assert!(d.on_edge(true, 299).is_none());
        d.on_edge(false, 299);
        assert!(d.on_edge(true, 300).is_some());
        assert_eq!(d.last_accepted(), Some(300));
    }

    #[test]
    fn test_rejected_press_does_not_extend_window() {
        let mut d = Debouncer::new(200);
        d.on_edge(true, 0);
        d.on_edge(false, 100);
        assert!(d.on_edge(true, 150).is_none());
        d.on_edge(false, 180);
        assert!(d.on_edge(true, 200).is_some());
    }

    #[test]
    fn test_held_low_fires_once() {
        let mut d = Debouncer::new(200);
        let fired: Vec<u64> = (1_000..2_000)
            .step_by(10)
            .filter_map(|t| d.on_edge(true, t))
            .map(|e| e.at_ms)
            .collect();
        assert_eq!(fired, [1_000]);
    }

    #[test]
    fn test_release_and_press_after_window_fires_again() {
        let mut d = Debouncer::new(200);
        assert!(d.on_edge(true, 0).is_some());
        for t in (10..400).step_by(10) {
            assert!(d.on_edge(true, t).is_none());
        }
        assert!(d.on_edge(false, 400).is_none());
        assert_eq!(d.on_edge(true, 410), Some(ToggleEvent { at_ms: 410 }));
    }
}

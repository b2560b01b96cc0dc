//! Wireless link state and the events that drive it.
//!
//! The radio stack runs in its own task and reports what happened as
//! [`LinkEvent`] values. The control loop feeds them to a
//! [`ConnectionMachine`], which returns the transitions taken and the side
//! effects the application has to carry out for each.

use glove_proto::gatt::MAX_WRITE_LEN;
use heapless::Vec;

/// State of the wireless link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Not yet initialised. Never re-entered.
    #[default]
    Idle,
    Advertising,
    Connected,
    /// Transient: always followed by `Advertising` in the same step.
    Disconnected,
}

/// Notification from the radio task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    /// A central wrote these bytes to the characteristic.
    Written(Vec<u8, MAX_WRITE_LEN>),
}

impl LinkEvent {
    /// Build a `Written` event, truncating to the attribute size limit.
    #[must_use]
    pub fn written(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_WRITE_LEN);
        let mut payload = Vec::new();
        // Cannot fail: `len` is bounded by the capacity.
        let _ = payload.extend_from_slice(&bytes[..len]);
        Self::Written(payload)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Connected => defmt::write!(f, "Connected"),
            Self::Disconnected => defmt::write!(f, "Disconnected"),
            Self::Written(bytes) => defmt::write!(f, "Written({=[u8]})", bytes.as_slice()),
        }
    }
}

/// Banner shown in the status strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusIndicator {
    Connected,
    Disconnected,
}

impl StatusIndicator {
    /// Banner text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Clear the whole display.
    ClearScreen,
    ShowStatus(StatusIndicator),
    StartAdvertising,
}

/// One transition and the effects to apply, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub from: ConnectionState,
    pub to: ConnectionState,
    pub effects: &'static [Effect],
}

/// Transitions taken for one event. Empty for a duplicate event.
pub type Steps = Vec<Step, 2>;

/// Error returned for events the machine cannot accept in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionError {
    /// Link event arrived before `start`.
    NotStarted,
    /// `start` called twice.
    AlreadyStarted,
}

impl core::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "link not started"),
            Self::AlreadyStarted => write!(f, "link already started"),
        }
    }
}

const START: &[Effect] = &[Effect::StartAdvertising];
const CONNECT: &[Effect] = &[
    Effect::ClearScreen,
    Effect::ShowStatus(StatusIndicator::Connected),
];
const DISCONNECT: &[Effect] = &[Effect::ShowStatus(StatusIndicator::Disconnected)];
const READVERTISE: &[Effect] = &[Effect::StartAdvertising];

/// Tracks [`ConnectionState`] and maps link events to effects.
///
/// ```text
/// Idle --start--> Advertising --connect--> Connected
///                      ^                       |
///                      +---- Disconnected <----+ disconnect
/// ```
///
/// # Example
///
/// ```
/// use glove_core::{ConnectionMachine, ConnectionState};
///
/// let mut link = ConnectionMachine::new();
/// link.start().unwrap();
/// link.on_connect().unwrap();
/// let steps = link.on_disconnect().unwrap();
/// assert_eq!(steps.len(), 2);
/// assert_eq!(link.state(), ConnectionState::Advertising);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionMachine {
    state: ConnectionState,
}

impl ConnectionMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Leave `Idle` once local initialisation is done.
    ///
    /// # Errors
    ///
    /// [`TransitionError::AlreadyStarted`] if called more than once.
    pub fn start(&mut self) -> Result<Steps, TransitionError> {
        if self.state != ConnectionState::Idle {
            return Err(TransitionError::AlreadyStarted);
        }
        let mut steps = Steps::new();
        self.push(&mut steps, ConnectionState::Advertising, START);
        Ok(steps)
    }

    /// A central connected.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotStarted`] while still `Idle`.
    pub fn on_connect(&mut self) -> Result<Steps, TransitionError> {
        let mut steps = Steps::new();
        match self.state {
            ConnectionState::Idle => return Err(TransitionError::NotStarted),
            ConnectionState::Connected => {}
            ConnectionState::Advertising | ConnectionState::Disconnected => {
                self.push(&mut steps, ConnectionState::Connected, CONNECT);
            }
        }
        Ok(steps)
    }

    /// The central went away. Advertising restarts in the same call.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NotStarted`] while still `Idle`.
    pub fn on_disconnect(&mut self) -> Result<Steps, TransitionError> {
        let mut steps = Steps::new();
        match self.state {
            ConnectionState::Idle => return Err(TransitionError::NotStarted),
            ConnectionState::Advertising => {}
            ConnectionState::Connected | ConnectionState::Disconnected => {
                if self.state == ConnectionState::Connected {
                    self.push(&mut steps, ConnectionState::Disconnected, DISCONNECT);
                }
                self.push(&mut steps, ConnectionState::Advertising, READVERTISE);
            }
        }
        Ok(steps)
    }

    fn push(&mut self, steps: &mut Steps, to: ConnectionState, effects: &'static [Effect]) {
        // Capacity covers the longest chain (Connected -> Disconnected -> Advertising).
        let _ = steps.push(Step {
            from: self.state,
            to,
            effects,
        });
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> ConnectionMachine {
        let mut m = ConnectionMachine::new();
        m.start().unwrap();
        m
    }

    #[test]
    fn test_start_advertises() {
        let mut m = ConnectionMachine::new();
        assert_eq!(m.state(), ConnectionState::Idle);
        let steps = m.start().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].from, ConnectionState::Idle);
        assert_eq!(steps[0].to, ConnectionState::Advertising);
        assert_eq!(steps[0].effects, &[Effect::StartAdvertising]);
        assert_eq!(m.start(), Err(TransitionError::AlreadyStarted));
    }

    #[test]
    fn test_connect_unreachable_from_idle() {
        let mut m = ConnectionMachine::new();
        assert_eq!(m.on_connect(), Err(TransitionError::NotStarted));
        assert_eq!(m.on_disconnect(), Err(TransitionError::NotStarted));
        assert_eq!(m.state(), ConnectionState::Idle);
    }

    #[test]
    fn test_connect_clears_and_shows_banner() {
        let mut m = started();
        let steps = m.on_connect().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].effects,
            &[
                Effect::ClearScreen,
                Effect::ShowStatus(StatusIndicator::Connected)
            ]
        );
        assert!(m.is_connected());
    }

    #[test]
    fn test_disconnect_passes_through_to_advertising() {
        let mut m = started();
        m.on_connect().unwrap();
        let steps = m.on_disconnect().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].to, ConnectionState::Disconnected);
        assert_eq!(
            steps[0].effects,
            &[Effect::ShowStatus(StatusIndicator::Disconnected)]
        );
        assert_eq!(steps[1].from, ConnectionState::Disconnected);
        assert_eq!(steps[1].to, ConnectionState::Advertising);
        assert_eq!(steps[1].effects, &[Effect::StartAdvertising]);
        assert_eq!(m.state(), ConnectionState::Advertising);
    }

    #[test]
    fn test_duplicate_events_are_noops() {
        let mut m = started();
        assert!(m.on_disconnect().unwrap().is_empty());
        assert_eq!(m.state(), ConnectionState::Advertising);

        m.on_connect().unwrap();
        assert!(m.on_connect().unwrap().is_empty());
        assert!(m.is_connected());
    }

    #[test]
    fn test_reconnect_cycle() {
        let mut m = started();
        for _ in 0..3 {
            assert_eq!(m.on_connect().unwrap().len(), 1);
            assert_eq!(m.on_disconnect().unwrap().len(), 2);
        }
        assert_eq!(m.state(), ConnectionState::Advertising);
    }

    #[test]
    fn test_written_event_truncates() {
        let big = [b'x'; MAX_WRITE_LEN + 10];
        match LinkEvent::written(&big) {
            LinkEvent::Written(bytes) => assert_eq!(bytes.len(), MAX_WRITE_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }
}

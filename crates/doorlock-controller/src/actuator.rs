//! Lock actuator control.
//!
//! [`ActuatorController`] owns the logical lock state. It decides which
//! angle to command and when; the control loop forwards the resulting
//! [`ActuatorCommand`]s to the physical actuator.

use std::time::{Duration, Instant};

use tracing::debug;

use doorlock_core::config::ActuatorConfig;

/// Logical state of the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,

    /// Unlocked until the given instant, then relocked.
    Unlocking { until: Instant },
}

/// One instruction for the actuator collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    Unlock { angle: u16 },
    Lock { angle: u16 },
}

impl ActuatorCommand {
    pub fn angle(&self) -> u16 {
        match self {
            ActuatorCommand::Unlock { angle } | ActuatorCommand::Lock { angle } => *angle,
        }
    }
}

/// Drives the lock between its two positions.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use doorlock_controller::actuator::{ActuatorCommand, ActuatorController};
/// use doorlock_core::config::ActuatorConfig;
///
/// let mut actuator = ActuatorController::new(&ActuatorConfig::default(), Duration::from_secs(3));
/// let now = Instant::now();
///
/// assert_eq!(actuator.unlock(now), Some(ActuatorCommand::Unlock { angle: 90 }));
/// assert_eq!(actuator.poll(now + Duration::from_secs(1)), None);
/// assert_eq!(
///     actuator.poll(now + Duration::from_secs(3)),
///     Some(ActuatorCommand::Lock { angle: 0 })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ActuatorController {
    locked_angle: u16,
    unlocked_angle: u16,
    dwell: Duration,
    state: LockState,
}

impl ActuatorController {
    pub fn new(config: &ActuatorConfig, dwell: Duration) -> Self {
        Self {
            locked_angle: config.locked_angle,
            unlocked_angle: config.unlocked_angle,
            dwell,
            state: LockState::Locked,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Drive to the locked position unconditionally.
    ///
    /// Used at power-on, where the physical position is unknown.
    pub fn lock(&mut self) -> ActuatorCommand {
        self.state = LockState::Locked;
        ActuatorCommand::Lock {
            angle: self.locked_angle,
        }
    }

    /// Start an unlock cycle.
    ///
    /// Returns `None` if a cycle is already running; the running cycle is
    /// neither recommanded nor extended.
    pub fn unlock(&mut self, now: Instant) -> Option<ActuatorCommand> {
        if let LockState::Unlocking { until } = self.state {
            debug!(?until, "Unlock requested while already unlocked");
            return None;
        }

        self.state = LockState::Unlocking {
            until: now + self.dwell,
        };
        Some(ActuatorCommand::Unlock {
            angle: self.unlocked_angle,
        })
    }

    /// Relock once the dwell has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<ActuatorCommand> {
        match self.state {
            LockState::Unlocking { until } if now >= until => Some(self.lock()),
            _ => None,
        }
    }
}

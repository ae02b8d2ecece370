//! The entry cycle state machine.
//!
//! [`Authenticator`] is a pure state machine. It never touches a device and
//! never sleeps: keys and clock readings go in, [`Effect`]s come out, and the
//! control loop applies them in order. Every pause is a deadline checked by
//! [`Authenticator::tick`]; keys that arrive while a pause is pending are
//! discarded, the same way a blocking firmware loop would miss them.
//!
//! ```text
//!            key            4th key
//! AwaitingEntry ──> Collecting ──> Evaluating ──┬── user:  unlock, dwell, lock ──┐
//!       ^                                       ├── none:  denied pause ─────────┤
//!       │                                       └── admin: AdminEditing ─────────┤
//!       └─────────────── wipe entry, idle screen ───────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, info, warn};

use doorlock_core::{ControllerConfig, KeySymbol, Result, config::TimingConfig};

use crate::actuator::{ActuatorCommand, ActuatorController, LockState};
use crate::admin::AdminFlow;
use crate::credentials::{CredentialMatch, CredentialStore};
use crate::input::{InputBuffer, InputCollector, KeyCapture};
use crate::screen::{DisplayCommand, Screen};
use crate::state_machine::{SessionMachine, SessionState, StateTransition};

/// Output of the authenticator, applied by the control loop in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Display(DisplayCommand),
    Actuator(ActuatorCommand),
}

/// What the authenticator is waiting for.
#[derive(Debug, Clone)]
enum Phase {
    /// Accepting entry keys.
    Idle,

    /// Denied message shown until the deadline.
    Denied { until: Instant },

    /// Door unlocked, waiting for the actuator dwell to end.
    Granted,

    /// Passcode change running.
    Admin(AdminFlow),
}

/// Keypad authentication state machine.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use doorlock_controller::{Authenticator, Effect, SessionState};
/// use doorlock_controller::actuator::ActuatorCommand;
/// use doorlock_core::{ControllerConfig, KeySymbol};
///
/// let start = Instant::now();
/// let mut auth = Authenticator::new(&ControllerConfig::default(), start).unwrap();
/// auth.power_on();
///
/// let mut effects = Vec::new();
/// for c in "1234".chars() {
///     effects.extend(auth.on_key(KeySymbol::new(c).unwrap(), start));
/// }
/// assert!(effects.contains(&Effect::Actuator(ActuatorCommand::Unlock { angle: 90 })));
/// assert_eq!(auth.session_state(), SessionState::Evaluating);
///
/// let effects = auth.tick(start + Duration::from_secs(3));
/// assert_eq!(effects[0], Effect::Actuator(ActuatorCommand::Lock { angle: 0 }));
/// assert_eq!(auth.session_state(), SessionState::AwaitingEntry);
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator {
    store: CredentialStore,
    collector: InputCollector,
    actuator: ActuatorController,
    machine: SessionMachine,
    screen: Screen,
    timing: TimingConfig,
    phase: Phase,
}

impl Authenticator {
    /// Create an authenticator from the startup configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if a configured passcode is not a valid
    /// credential.
    pub fn new(config: &ControllerConfig, now: Instant) -> Result<Self> {
        let screen = Screen::new(config.display.clone());
        Ok(Self {
            store: CredentialStore::from_config(config)?,
            collector: InputCollector::new(screen.echo_layout()),
            actuator: ActuatorController::new(&config.actuator, config.timing.unlock_dwell()),
            machine: SessionMachine::new(now),
            screen,
            timing: config.timing.clone(),
            phase: Phase::Idle,
        })
    }

    /// Power-on sequence: drive the lock closed and draw the idle screen.
    pub fn power_on(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Actuator(self.actuator.lock())];
        effects.extend(self.screen.idle().into_iter().map(Effect::Display));
        effects
    }

    /// Feed one keypress received at `now`.
    ///
    /// Expired pauses are advanced first, so a key arriving exactly at the end
    /// of a pause is accepted.
    pub fn on_key(&mut self, symbol: KeySymbol, now: Instant) -> Vec<Effect> {
        let mut effects = self.tick(now);

        match &mut self.phase {
            Phase::Admin(flow) => {
                let commands = flow.on_key(symbol, now, &mut self.store, &self.screen);
                effects.extend(commands.into_iter().map(Effect::Display));
                return effects;
            }
            Phase::Idle if self.machine.current_state().accepts_entry() => {}
            _ => {
                debug!(state = %self.machine.current_state(), "Key discarded during pause");
                return effects;
            }
        }

        match self.collector.on_key(symbol) {
            KeyCapture::Discarded => {
                debug!("Key discarded, entry already complete");
            }
            KeyCapture::Accepted(commands) => {
                if self.machine.current_state() == SessionState::AwaitingEntry {
                    self.enter(SessionState::Collecting, now);
                }
                effects.extend(commands.into_iter().map(Effect::Display));
            }
            KeyCapture::Completed { commands, entry } => {
                if self.machine.current_state() == SessionState::AwaitingEntry {
                    self.enter(SessionState::Collecting, now);
                }
                effects.extend(commands.into_iter().map(Effect::Display));

                self.enter(SessionState::Evaluating, now);
                let outcome = self.store.classify(&entry);
                self.collector.reset();
                effects.extend(self.evaluate(outcome, now));
            }
        }

        effects
    }

    /// Advance every phase whose deadline has passed at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        let finished = match &mut self.phase {
            Phase::Idle => false,
            Phase::Denied { until } => now >= *until,
            Phase::Granted => match self.actuator.poll(now) {
                Some(command) => {
                    info!(angle = command.angle(), "Relocking door");
                    effects.push(Effect::Actuator(command));
                    true
                }
                None => false,
            },
            Phase::Admin(flow) => {
                let commands = flow.tick(now, &self.screen);
                effects.extend(commands.into_iter().map(Effect::Display));
                flow.is_finished()
            }
        };

        if finished {
            effects.extend(self.finish_cycle(now));
        }
        effects
    }

    fn evaluate(&mut self, outcome: CredentialMatch, now: Instant) -> Vec<Effect> {
        match outcome {
            CredentialMatch::Admin => {
                info!("Administrator passcode accepted, entering admin mode");
                self.enter(SessionState::AdminEditing, now);
                let (flow, commands) = AdminFlow::begin(now, &self.timing, &self.screen);
                self.phase = Phase::Admin(flow);
                commands.into_iter().map(Effect::Display).collect()
            }
            CredentialMatch::User => {
                info!("Access granted");
                let mut effects: Vec<Effect> = self
                    .screen
                    .granted()
                    .into_iter()
                    .map(Effect::Display)
                    .collect();
                if let Some(command) = self.actuator.unlock(now) {
                    info!(angle = command.angle(), "Unlocking door");
                    effects.push(Effect::Actuator(command));
                }
                self.phase = Phase::Granted;
                effects
            }
            CredentialMatch::None => {
                info!("Access denied");
                self.phase = Phase::Denied {
                    until: now + self.timing.denied(),
                };
                self.screen
                    .denied()
                    .into_iter()
                    .map(Effect::Display)
                    .collect()
            }
        }
    }

    fn finish_cycle(&mut self, now: Instant) -> Vec<Effect> {
        self.collector.reset();
        self.phase = Phase::Idle;
        self.enter(SessionState::AwaitingEntry, now);
        self.screen
            .idle()
            .into_iter()
            .map(Effect::Display)
            .collect()
    }

    fn enter(&mut self, state: SessionState, now: Instant) {
        match self.machine.transition_to(state, now) {
            Ok(transition) => {
                debug!(from = %transition.from, to = %transition.to, "Session state changed");
            }
            Err(error) => {
                warn!(%error, "Session state out of step, resetting");
                self.machine.reset(now);
            }
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.machine.current_state()
    }

    /// The main entry buffer.
    pub fn buffer(&self) -> &InputBuffer {
        self.collector.buffer()
    }

    pub fn lock_state(&self) -> LockState {
        self.actuator.state()
    }

    pub fn history(&self) -> &VecDeque<StateTransition> {
        self.machine.history()
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.store
    }

    /// The running passcode change, if any.
    pub fn admin_flow(&self) -> Option<&AdminFlow> {
        match &self.phase {
            Phase::Admin(flow) => Some(flow),
            _ => None,
        }
    }

    /// Returns `true` when no timed phase is pending and the door is locked.
    pub fn is_quiescent(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.actuator.is_locked()
    }
}

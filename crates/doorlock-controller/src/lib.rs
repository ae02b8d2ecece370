//! Keypad door lock controller.
//!
//! A four symbol passcode typed on the keypad is compared against a user
//! passcode and an administrator passcode. The user passcode unlocks the door
//! for a fixed dwell, the administrator passcode opens a sub-flow that
//! replaces the user passcode, anything else is denied.
//!
//! # Layers
//!
//! - [`Authenticator`]: pure state machine, keys and instants in, [`Effect`]s out
//! - [`Controller`]: owns the devices and a [`Clock`], applies effects
//!
//! Everything below the authenticator (entry capture, credential store,
//! actuator sequencing, passcode change) is exposed for testing and reuse.

pub mod actuator;
pub mod admin;
pub mod authenticator;
pub mod clock;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod input;
pub mod screen;
pub mod state_machine;

pub use actuator::{ActuatorCommand, ActuatorController, LockState};
pub use admin::{AdminFlow, AdminPhase};
pub use authenticator::{Authenticator, Effect};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Controller, StepOutcome};
pub use credentials::{CredentialMatch, CredentialStore};
pub use error::{Error, Result};
pub use input::{InputBuffer, InputCollector, KeyCapture};
pub use screen::{DisplayCommand, EchoLayout, Screen};
pub use state_machine::{SessionMachine, SessionState, StateTransition};

//! Control loop binding the authenticator to its devices.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use doorlock_core::{ControllerConfig, KeySymbol};
use doorlock_hardware::{ActuatorDevice, DisplayDevice, KeypadDevice};

use crate::authenticator::{Authenticator, Effect};
use crate::clock::Clock;
use crate::error::Result;
use crate::screen::DisplayCommand;

/// What a single [`Controller::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The key read from the keypad, if any.
    pub key: Option<KeySymbol>,

    /// Number of effects applied to the devices.
    pub effects: usize,
}

/// Door lock controller.
///
/// Owns the keypad, display and actuator together with the
/// [`Authenticator`] and the clock that drives it.
///
/// # Examples
///
/// ```
/// use doorlock_controller::{Controller, ManualClock};
/// use doorlock_core::ControllerConfig;
/// use doorlock_hardware::mock::{MockKeypad, MockServo, VirtualLcd};
///
/// #[tokio::main]
/// async fn main() -> doorlock_controller::Result<()> {
///     let (keypad, handle) = MockKeypad::new();
///     let mut controller = Controller::new(
///         &ControllerConfig::default(),
///         keypad,
///         VirtualLcd::default(),
///         MockServo::new(),
///         ManualClock::new(),
///     )?;
///     controller.start().await?;
///
///     handle.press_keys("1234").await?;
///     for _ in 0..4 {
///         controller.step().await?;
///     }
///
///     assert_eq!(controller.actuator().current_angle(), Some(90));
///     assert_eq!(controller.display().row_trimmed(1).unwrap(), "Porta Liberada!");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Controller<K, D, A, C> {
    keypad: K,
    display: D,
    actuator: A,
    clock: C,
    authenticator: Authenticator,
    poll_interval: Duration,
}

impl<K, D, A, C> Controller<K, D, A, C>
where
    K: KeypadDevice,
    D: DisplayDevice,
    A: ActuatorDevice,
    C: Clock,
{
    /// Create a controller.
    ///
    /// # Errors
    /// Returns `Error::Core` if the configuration does not validate.
    pub fn new(
        config: &ControllerConfig,
        keypad: K,
        display: D,
        actuator: A,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        let authenticator = Authenticator::new(config, clock.now())?;

        Ok(Self {
            keypad,
            display,
            actuator,
            clock,
            authenticator,
            poll_interval: config.timing.poll_interval(),
        })
    }

    /// Run the power-on sequence.
    ///
    /// # Errors
    /// Returns `Error::Peripheral` if a device fails.
    pub async fn start(&mut self) -> Result<()> {
        let keypad_info = self.keypad.get_info().await?;
        let display_info = self.display.get_info().await?;
        let actuator_info = self.actuator.get_info().await?;
        info!(
            keypad = %keypad_info,
            display = %display_info,
            actuator = %actuator_info,
            "Starting door lock controller"
        );

        let effects = self.authenticator.power_on();
        self.apply(effects).await?;
        Ok(())
    }

    /// Advance expired phases, poll the keypad once and apply the effects.
    ///
    /// # Errors
    /// Returns `Error::Peripheral` if a device fails. Effects produced before
    /// the failing one have already been applied.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let now = self.clock.now();
        let mut effects = self.authenticator.tick(now);

        let key = self.keypad.poll().await?;
        if let Some(symbol) = key {
            effects.extend(self.authenticator.on_key(symbol, now));
        }

        let count = effects.len();
        self.apply(effects).await?;
        Ok(StepOutcome { key, effects: count })
    }

    /// Call [`step`](Self::step) every poll interval until `shutdown` turns
    /// `true` or its sender is dropped.
    ///
    /// # Errors
    /// Returns the first error of [`step`](Self::step).
    pub async fn run_until(&mut self, shutdown: watch::Receiver<bool>) -> Result<()> {
        self.run_with(shutdown, |_, _| ControlFlow::Continue(()))
            .await
    }

    /// Like [`run_until`](Self::run_until), calling `on_step` after every
    /// step. The loop also ends when `on_step` returns `ControlFlow::Break`.
    ///
    /// # Errors
    /// Returns the first error of [`step`](Self::step).
    pub async fn run_with<F>(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        mut on_step: F,
    ) -> Result<()>
    where
        F: FnMut(&Self, StepOutcome) -> ControlFlow<()>,
    {
        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    let outcome = self.step().await?;
                    if on_step(self, outcome).is_break() {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Door lock controller stopped");
        Ok(())
    }

    async fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            let result = match effect {
                Effect::Display(DisplayCommand::Clear) => self.display.clear().await,
                Effect::Display(DisplayCommand::SetCursor { column, row }) => {
                    self.display.set_cursor(column, row).await
                }
                Effect::Display(DisplayCommand::Print(text)) => self.display.print(&text).await,
                Effect::Actuator(command) => self.actuator.set_angle(command.angle()).await,
            };

            if let Err(error) = result {
                warn!(%error, "Peripheral command failed");
                return Err(error.into());
            }
        }
        Ok(())
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Mutable access to the actuator, used to inject faults in tests.
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

//! Common test utilities for controller integration tests.
//!
//! [`Harness`] wires a [`Controller`] to the mock devices and a
//! [`ManualClock`], so scenarios read as the operator would experience them:
//! press keys, let time pass, look at the display and the servo.
//!
//! ```ignore
//! let mut lock = common::Harness::start().await;
//! lock.press("1234").await;
//! assert_eq!(lock.status_line(), "Porta Liberada!");
//! lock.advance(Duration::from_secs(3)).await;
//! assert_eq!(lock.servo_angles(), vec![0, 90, 0]);
//! ```

#![allow(dead_code)]

use std::time::Duration;

use doorlock_controller::{Controller, ManualClock, SessionState};
use doorlock_core::ControllerConfig;
use doorlock_hardware::mock::{MockKeypad, MockKeypadHandle, MockServo, VirtualLcd};

pub type MockController = Controller<MockKeypad, VirtualLcd, MockServo, ManualClock>;

/// Passcodes of the default configuration.
pub const USER_PASSCODE: &str = "1234";
pub const ADMIN_PASSCODE: &str = "0800";

pub const DENIED: Duration = Duration::from_secs(3);
pub const UNLOCK_DWELL: Duration = Duration::from_secs(3);
pub const ADMIN_NOTICE: Duration = Duration::from_secs(2);
pub const ADMIN_PROMPT: Duration = Duration::from_secs(1);
pub const ADMIN_CONFIRM: Duration = Duration::from_secs(2);

/// A controller on mock devices plus the handles tests drive it with.
pub struct Harness {
    pub controller: MockController,
    pub keypad: MockKeypadHandle,
    pub clock: ManualClock,
}

/// Build a controller on mock devices without starting it.
pub fn build(config: &ControllerConfig) -> (MockController, MockKeypadHandle, ManualClock) {
    let (keypad, handle) = MockKeypad::new();
    let clock = ManualClock::new();
    let controller = Controller::new(
        config,
        keypad,
        VirtualLcd::new(config.display.columns, config.display.rows),
        MockServo::new(),
        clock.clone(),
    )
    .expect("Failed to build controller");
    (controller, handle, clock)
}

impl Harness {
    /// Start a controller with the default configuration.
    pub async fn start() -> Self {
        Self::start_with(&ControllerConfig::default()).await
    }

    pub async fn start_with(config: &ControllerConfig) -> Self {
        let (mut controller, keypad, clock) = build(config);
        controller.start().await.expect("Controller start failed");
        Self {
            controller,
            keypad,
            clock,
        }
    }

    /// Press each key and run one step per key.
    pub async fn press(&mut self, keys: &str) {
        for c in keys.chars() {
            self.keypad.press_char(c).await.expect("Key press failed");
            self.step().await;
        }
    }

    /// Move the clock forward and run one step.
    pub async fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.step().await;
    }

    pub async fn step(&mut self) {
        self.controller.step().await.expect("Step failed");
    }

    /// Row 0 without padding.
    pub fn title_line(&self) -> String {
        self.controller.display().row_trimmed(0).unwrap_or_default()
    }

    /// Row 1 without padding.
    pub fn status_line(&self) -> String {
        self.controller.display().row_trimmed(1).unwrap_or_default()
    }

    pub fn servo_angles(&self) -> Vec<u16> {
        self.controller.actuator().angles().to_vec()
    }

    pub fn state(&self) -> SessionState {
        self.controller.authenticator().session_state()
    }

    /// Assert the idle screen is shown and the cycle is over.
    pub fn assert_idle(&self) {
        assert_eq!(self.title_line(), "Sala CPD");
        assert_eq!(self.status_line(), "Senha:");
        assert_eq!(self.state(), SessionState::AwaitingEntry);
        assert!(self.controller.authenticator().buffer().is_wiped());
    }

    /// Run the passcode change flow from the idle screen.
    pub async fn change_user_passcode(&mut self, new_passcode: &str) {
        self.press(ADMIN_PASSCODE).await;
        self.advance(ADMIN_NOTICE).await;
        self.advance(ADMIN_PROMPT).await;
        self.press(new_passcode).await;
        self.advance(ADMIN_CONFIRM).await;
    }
}

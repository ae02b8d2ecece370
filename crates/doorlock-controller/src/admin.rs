//! User passcode change.
//!
//! Entered only after the administrator passcode was recognized. The flow
//! owns the keypad while it runs:
//!
//! 1. `Notice`: admin mode notice on the status line
//! 2. `PromptPause`: new passcode prompt shown, keys still ignored
//! 3. `Collecting`: four symbols captured with the usual masked echo
//! 4. `Confirming`: user passcode replaced, confirmation shown
//!
//! The new passcode is not validated; any four keypad symbols are accepted,
//! including the administrator passcode itself.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use doorlock_core::{KeySymbol, config::TimingConfig};

use crate::credentials::CredentialStore;
use crate::input::{InputCollector, KeyCapture};
use crate::screen::{DisplayCommand, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPhase {
    Notice { until: Instant },
    PromptPause { until: Instant },
    Collecting,
    Confirming { until: Instant },
    Done,
}

/// One run of the passcode change sub-flow.
#[derive(Debug, Clone)]
pub struct AdminFlow {
    phase: AdminPhase,
    collector: InputCollector,
    prompt_pause: Duration,
    confirm: Duration,
}

impl AdminFlow {
    /// Start the flow at `now`.
    ///
    /// Returns the flow together with the admin mode notice to display.
    pub fn begin(
        now: Instant,
        timing: &TimingConfig,
        screen: &Screen,
    ) -> (Self, Vec<DisplayCommand>) {
        let flow = Self {
            phase: AdminPhase::Notice {
                until: now + timing.admin_notice(),
            },
            collector: InputCollector::new(screen.echo_layout()),
            prompt_pause: timing.admin_prompt(),
            confirm: timing.admin_confirm(),
        };
        (flow, screen.admin_mode())
    }

    pub fn phase(&self) -> AdminPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AdminPhase::Done
    }

    /// Returns `true` while keys are being captured.
    pub fn accepts_keys(&self) -> bool {
        self.phase == AdminPhase::Collecting
    }

    /// Advance every phase whose deadline has passed.
    ///
    /// Deadlines chain from the previous deadline, not from `now`, so a late
    /// tick does not stretch the flow.
    pub fn tick(&mut self, now: Instant, screen: &Screen) -> Vec<DisplayCommand> {
        let mut commands = Vec::new();
        loop {
            match self.phase {
                AdminPhase::Notice { until } if now >= until => {
                    commands.extend(screen.admin_prompt());
                    self.phase = AdminPhase::PromptPause {
                        until: until + self.prompt_pause,
                    };
                }
                AdminPhase::PromptPause { until } if now >= until => {
                    self.phase = AdminPhase::Collecting;
                }
                AdminPhase::Confirming { until } if now >= until => {
                    self.phase = AdminPhase::Done;
                }
                _ => return commands,
            }
        }
    }

    /// Offer one keypress.
    ///
    /// Keys outside the `Collecting` phase are dropped. The fourth symbol
    /// replaces the user credential in `store`.
    pub fn on_key(
        &mut self,
        symbol: KeySymbol,
        now: Instant,
        store: &mut CredentialStore,
        screen: &Screen,
    ) -> Vec<DisplayCommand> {
        if !self.accepts_keys() {
            debug!(phase = ?self.phase, "Key discarded during admin pause");
            return Vec::new();
        }

        match self.collector.on_key(symbol) {
            KeyCapture::Discarded => Vec::new(),
            KeyCapture::Accepted(commands) => commands,
            KeyCapture::Completed {
                mut commands,
                entry,
            } => {
                store.replace_user(entry);
                self.collector.reset();
                info!("User passcode changed");

                commands.extend(screen.passcode_changed());
                self.phase = AdminPhase::Confirming {
                    until: now + self.confirm,
                };
                commands
            }
        }
    }
}

//! Property-based tests for the entry cycle.
//!
//! These drive the [`Authenticator`] directly with generated key sequences and
//! check the invariants that must hold for every input.

use std::time::{Duration, Instant};

use doorlock_controller::{ActuatorCommand, Authenticator, DisplayCommand, Effect, SessionState};
use doorlock_core::{ControllerConfig, KeySymbol, constants::KEYPAD_ALPHABET};
use doorlock_hardware::mock::VirtualLcd;
use doorlock_hardware::traits::DisplayDevice;
use proptest::prelude::*;

const USER: &str = "1234";
const ADMIN: &str = "0800";

/// Strategy for a single keypad symbol.
fn key_symbol() -> impl Strategy<Value = char> {
    prop::sample::select(KEYPAD_ALPHABET.to_vec())
}

/// Strategy for a complete four symbol entry.
fn entry() -> impl Strategy<Value = String> {
    prop::collection::vec(key_symbol(), 4)
        .prop_map(|keys| keys.into_iter().collect())
}

/// Strategy for an entry that matches neither passcode.
fn wrong_entry() -> impl Strategy<Value = String> {
    entry().prop_filter("matches a passcode", |keys| keys != USER && keys != ADMIN)
}

fn key(c: char) -> KeySymbol {
    KeySymbol::new(c).expect("Invalid test key")
}

fn authenticator() -> (Authenticator, Instant) {
    let start = Instant::now();
    let mut auth = Authenticator::new(&ControllerConfig::default(), start)
        .expect("Failed to build authenticator");
    auth.power_on();
    (auth, start)
}

fn press(auth: &mut Authenticator, keys: &str, now: Instant) -> Vec<Effect> {
    keys.chars()
        .flat_map(|c| auth.on_key(key(c), now))
        .collect()
}

fn actuator_commands(effects: &[Effect]) -> Vec<ActuatorCommand> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Actuator(command) => Some(*command),
            Effect::Display(_) => None,
        })
        .collect()
}

/// Apply display effects to a fresh virtual LCD.
fn render(effects: &[Effect]) -> VirtualLcd {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");

    runtime.block_on(async {
        let mut lcd = VirtualLcd::default();
        for effect in effects {
            let result = match effect {
                Effect::Display(DisplayCommand::Clear) => lcd.clear().await,
                Effect::Display(DisplayCommand::SetCursor { column, row }) => {
                    lcd.set_cursor(*column, *row).await
                }
                Effect::Display(DisplayCommand::Print(text)) => lcd.print(text).await,
                Effect::Actuator(_) => Ok(()),
            };
            result.expect("Display command failed");
        }
        lcd
    })
}

proptest! {
    /// Property: fewer than four symbols never trigger an evaluation.
    #[test]
    fn prop_incomplete_entry_is_not_evaluated(
        keys in prop::collection::vec(key_symbol(), 1..4),
        wait_ms in 0u64..100_000,
    ) {
        let (mut auth, start) = authenticator();
        let keys: String = keys.into_iter().collect();

        let mut effects = press(&mut auth, &keys, start);
        effects.extend(auth.tick(start + Duration::from_millis(wait_ms)));

        prop_assert!(actuator_commands(&effects).is_empty());
        prop_assert_eq!(auth.session_state(), SessionState::Collecting);
        prop_assert_eq!(auth.buffer().count(), keys.len());
    }

    /// Property: every complete entry is classified by exact match.
    #[test]
    fn prop_exact_match_outcome(keys in entry()) {
        let (mut auth, start) = authenticator();

        let effects = press(&mut auth, &keys, start);
        let commands = actuator_commands(&effects);

        if keys == ADMIN {
            prop_assert_eq!(auth.session_state(), SessionState::AdminEditing);
            prop_assert!(commands.is_empty());
        } else if keys == USER {
            prop_assert_eq!(commands, vec![ActuatorCommand::Unlock { angle: 90 }]);
            let relock = auth.tick(start + Duration::from_secs(3));
            prop_assert_eq!(
                actuator_commands(&relock),
                vec![ActuatorCommand::Lock { angle: 0 }]
            );
        } else {
            prop_assert!(commands.is_empty());
            let denied = Effect::Display(DisplayCommand::print("Senha Incorreta!"));
            prop_assert!(effects.contains(&denied));
        }
    }

    /// Property: after the k-th symbol only position k-1 shows a clear symbol.
    #[test]
    fn prop_echo_masks_previous_symbols(keys in prop::collection::vec(key_symbol(), 1..4)) {
        let (mut auth, start) = authenticator();
        let mut effects = auth.power_on();

        for (k, c) in keys.iter().enumerate() {
            effects.extend(auth.on_key(key(*c), start));

            let lcd = render(&effects);
            for position in 0..k {
                prop_assert_eq!(lcd.char_at(7 + position, 1), Some('*'));
            }
            prop_assert_eq!(lcd.char_at(7 + k, 1), Some(*c));
            prop_assert_eq!(lcd.char_at(8 + k, 1), Some(' '));
        }
    }

    /// Property: every evaluation leaves an empty, wiped buffer.
    #[test]
    fn prop_evaluation_resets_buffer(keys in entry()) {
        let (mut auth, start) = authenticator();

        press(&mut auth, &keys, start);

        prop_assert_eq!(auth.buffer().count(), 0);
        prop_assert!(auth.buffer().is_wiped());
    }

    /// Property: any number of wrong attempts leaves the user passcode working.
    #[test]
    fn prop_no_lockout(attempts in prop::collection::vec(wrong_entry(), 1..20)) {
        let (mut auth, start) = authenticator();
        let mut now = start;

        for attempt in &attempts {
            let effects = press(&mut auth, attempt, now);
            prop_assert!(actuator_commands(&effects).is_empty());
            now += Duration::from_secs(3);
            auth.tick(now);
            prop_assert_eq!(auth.session_state(), SessionState::AwaitingEntry);
        }

        let effects = press(&mut auth, USER, now);
        prop_assert_eq!(
            actuator_commands(&effects),
            vec![ActuatorCommand::Unlock { angle: 90 }]
        );
    }

    /// Property: the passcode set in admin mode replaces the previous one.
    #[test]
    fn prop_admin_edit_commits(new_passcode in entry()) {
        prop_assume!(new_passcode != ADMIN && new_passcode != USER);
        let (mut auth, start) = authenticator();

        press(&mut auth, ADMIN, start);
        let now = start + Duration::from_secs(3);
        auth.tick(now);
        press(&mut auth, &new_passcode, now);
        let now = now + Duration::from_secs(2);
        auth.tick(now);
        prop_assert_eq!(auth.session_state(), SessionState::AwaitingEntry);

        let old = press(&mut auth, USER, now);
        prop_assert!(actuator_commands(&old).is_empty());

        let now = now + Duration::from_secs(3);
        auth.tick(now);
        let new = press(&mut auth, &new_passcode, now);
        prop_assert_eq!(
            actuator_commands(&new),
            vec![ActuatorCommand::Unlock { angle: 90 }]
        );
    }
}

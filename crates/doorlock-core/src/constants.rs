//! Core constants for the door lock controller.
//!
//! This module defines the compiled-in defaults of the controller: the keypad
//! alphabet and layout, the credential length, the factory passcodes, the
//! timing of every pause, the actuator angles, and the display texts. Every
//! value that an installation may want to change is also exposed through
//! [`ControllerConfig`](crate::ControllerConfig), which uses these constants
//! as its defaults.
//!
//! # Display Layout
//!
//! The controller addresses a 2-row, 16-column character display:
//!
//! ```text
//! column  0123456789012345
//! row 0       Sala CPD
//! row 1   Senha: ***4
//!                ^
//!                entry echo starts right after the prompt label
//! ```
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(CREDENTIAL_LENGTH, 4);
//! assert_eq!(KEYPAD_ALPHABET.len(), 16);
//!
//! let dwell = Duration::from_millis(DEFAULT_UNLOCK_DWELL_MS);
//! assert_eq!(dwell.as_secs(), 3);
//! ```

// ============================================================================
// Keypad
// ============================================================================

/// Number of rows in the matrix keypad.
pub const KEYPAD_ROWS: usize = 4;

/// Number of columns in the matrix keypad.
pub const KEYPAD_COLUMNS: usize = 4;

/// Key characters of the 4x4 matrix keypad, indexed by `[row][column]`.
///
/// ```text
/// 1 2 3 A
/// 4 5 6 B
/// 7 8 9 C
/// * 0 # D
/// ```
pub const KEYPAD_LAYOUT: [[char; KEYPAD_COLUMNS]; KEYPAD_ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Every symbol the keypad can produce.
///
/// Credentials are sequences of these symbols. Digits are what operators use
/// in practice, but the controller accepts the full alphabet.
pub const KEYPAD_ALPHABET: [char; KEYPAD_ROWS * KEYPAD_COLUMNS] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '#', 'A', 'B', 'C', 'D',
];

// ============================================================================
// Credentials
// ============================================================================

/// Number of symbols in a credential, and capacity of the entry buffer.
///
/// # Value: 4
pub const CREDENTIAL_LENGTH: usize = 4;

/// Factory user passcode.
///
/// Restored on every power cycle; the administrator can replace it at runtime
/// but the replacement lives only in memory.
pub const DEFAULT_USER_PASSCODE: &str = "1234";

/// Factory administrator passcode.
///
/// Fixed for the lifetime of the process.
pub const DEFAULT_ADMIN_PASSCODE: &str = "0800";

// ============================================================================
// Timing (milliseconds)
// ============================================================================

/// How long the admin mode notice stays up before the passcode prompt.
///
/// # Value: 2000ms
pub const DEFAULT_ADMIN_NOTICE_MS: u64 = 2000;

/// Pause after the new passcode prompt is drawn, before keys are accepted.
///
/// # Value: 1000ms
pub const DEFAULT_ADMIN_PROMPT_MS: u64 = 1000;

/// How long the passcode changed confirmation is shown.
///
/// # Value: 2000ms
pub const DEFAULT_ADMIN_CONFIRM_MS: u64 = 2000;

/// How long the access denied message is shown.
///
/// # Value: 3000ms
pub const DEFAULT_DENIED_MS: u64 = 3000;

/// How long the actuator stays unlocked before the automatic re-lock.
///
/// # Value: 3000ms
pub const DEFAULT_UNLOCK_DWELL_MS: u64 = 3000;

/// Interval between two keypad polls of the control loop.
///
/// # Value: 10ms
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

// ============================================================================
// Actuator
// ============================================================================

/// Angle commanded when the door is locked.
pub const DEFAULT_LOCKED_ANGLE: u16 = 0;

/// Angle commanded when the door is unlocked.
pub const DEFAULT_UNLOCKED_ANGLE: u16 = 90;

/// Largest angle a hobby servo accepts.
pub const MAX_ACTUATOR_ANGLE: u16 = 180;

/// Pulse width (microseconds) that drives the servo to 0 degrees.
pub const DEFAULT_MIN_PULSE_US: u16 = 544;

/// Pulse width (microseconds) that drives the servo to 180 degrees.
pub const DEFAULT_MAX_PULSE_US: u16 = 2400;

// ============================================================================
// Display
// ============================================================================

/// Number of character columns on the display.
pub const DISPLAY_COLUMNS: usize = 16;

/// Number of character rows on the display.
pub const DISPLAY_ROWS: usize = 2;

/// Row holding the static title.
pub const TITLE_ROW: usize = 0;

/// Row holding the prompt, the entry echo and status messages.
pub const ENTRY_ROW: usize = 1;

/// Character that replaces every entered symbol except the most recent one.
pub const MASK_CHAR: char = '*';

/// Default title shown on the idle screen.
pub const DEFAULT_TITLE: &str = "Sala CPD";

/// Column where the default title starts.
pub const DEFAULT_TITLE_COLUMN: usize = 4;

/// Default prompt label on the entry row.
pub const DEFAULT_PROMPT: &str = "Senha: ";

// ============================================================================
// Default Display Messages (Portuguese)
// ============================================================================

/// Shown when the user passcode matches.
///
/// # Value: "Porta Liberada!" (Door released)
pub const MSG_ACCESS_GRANTED: &str = "Porta Liberada!";

/// Shown when neither passcode matches.
///
/// # Value: "Senha Incorreta!" (Wrong passcode)
pub const MSG_ACCESS_DENIED: &str = "Senha Incorreta!";

/// Shown when the administrator passcode matches.
///
/// # Value: "Modo admin"
pub const MSG_ADMIN_MODE: &str = "Modo admin";

/// Prompt of the passcode change flow.
///
/// # Value: "Nova Senha: " (New passcode)
pub const MSG_NEW_PASSCODE: &str = "Nova Senha: ";

/// Confirmation of the passcode change flow.
///
/// # Value: "Senha Alterada!" (Passcode changed)
pub const MSG_PASSCODE_CHANGED: &str = "Senha Alterada!";

// ============================================================================
// Pin Mapping
// ============================================================================

/// Microcontroller lines wired to the keypad rows.
pub const DEFAULT_KEYPAD_ROW_PINS: [u8; KEYPAD_ROWS] = [6, 7, 8, 9];

/// Microcontroller lines wired to the keypad columns.
pub const DEFAULT_KEYPAD_COLUMN_PINS: [u8; KEYPAD_COLUMNS] = [10, 11, 12, 13];

/// I2C address of the display backpack.
pub const DEFAULT_DISPLAY_ADDRESS: u8 = 0x20;

/// Control line of the servo.
pub const DEFAULT_ACTUATOR_PIN: &str = "A0";

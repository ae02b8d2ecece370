//! Startup configuration of the controller.
//!
//! The firmware this controller replaces compiled every setting in. Here the
//! same values are the defaults of [`ControllerConfig`], and an installation
//! can override any subset of them from a JSON file:
//!
//! ```
//! use doorlock_core::ControllerConfig;
//!
//! let config = ControllerConfig::from_json_str(r#"{
//!     "user_passcode": "4321",
//!     "timing": { "unlock_dwell_ms": 5000 }
//! }"#).unwrap();
//!
//! assert_eq!(config.user_passcode, "4321");
//! assert_eq!(config.timing.unlock_dwell_ms, 5000);
//! assert_eq!(config.timing.denied_ms, 3000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    Credential, Result,
    constants::*,
    error::Error,
};

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Initial user passcode, restored on every start.
    pub user_passcode: String,

    /// Administrator passcode, fixed for the process lifetime.
    pub admin_passcode: String,

    /// Durations of the timed phases.
    pub timing: TimingConfig,

    /// Actuator angles and calibration.
    pub actuator: ActuatorConfig,

    /// Display geometry and texts.
    pub display: DisplayConfig,

    /// Hardware line assignment.
    pub pins: PinConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            user_passcode: DEFAULT_USER_PASSCODE.to_string(),
            admin_passcode: DEFAULT_ADMIN_PASSCODE.to_string(),
            timing: TimingConfig::default(),
            actuator: ActuatorConfig::default(),
            display: DisplayConfig::default(),
            pins: PinConfig::default(),
        }
    }
}

/// Durations of the timed phases, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub admin_notice_ms: u64,
    pub admin_prompt_ms: u64,
    pub admin_confirm_ms: u64,
    pub denied_ms: u64,
    pub unlock_dwell_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            admin_notice_ms: DEFAULT_ADMIN_NOTICE_MS,
            admin_prompt_ms: DEFAULT_ADMIN_PROMPT_MS,
            admin_confirm_ms: DEFAULT_ADMIN_CONFIRM_MS,
            denied_ms: DEFAULT_DENIED_MS,
            unlock_dwell_ms: DEFAULT_UNLOCK_DWELL_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn admin_notice(&self) -> Duration {
        Duration::from_millis(self.admin_notice_ms)
    }

    #[must_use]
    pub fn admin_prompt(&self) -> Duration {
        Duration::from_millis(self.admin_prompt_ms)
    }

    #[must_use]
    pub fn admin_confirm(&self) -> Duration {
        Duration::from_millis(self.admin_confirm_ms)
    }

    #[must_use]
    pub fn denied(&self) -> Duration {
        Duration::from_millis(self.denied_ms)
    }

    #[must_use]
    pub fn unlock_dwell(&self) -> Duration {
        Duration::from_millis(self.unlock_dwell_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Actuator angles (degrees) and servo calibration.
///
/// The pulse bounds are only read by actuator drivers; the controller
/// itself speaks in angles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub locked_angle: u16,
    pub unlocked_angle: u16,
    pub min_pulse_us: u16,
    pub max_pulse_us: u16,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            locked_angle: DEFAULT_LOCKED_ANGLE,
            unlocked_angle: DEFAULT_UNLOCKED_ANGLE,
            min_pulse_us: DEFAULT_MIN_PULSE_US,
            max_pulse_us: DEFAULT_MAX_PULSE_US,
        }
    }
}

/// Display geometry and every text the controller prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub columns: usize,
    pub rows: usize,
    pub title: String,
    pub title_column: usize,
    pub prompt: String,
    pub mask: char,
    pub granted: String,
    pub denied: String,
    pub admin_mode: String,
    pub new_passcode: String,
    pub passcode_changed: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: DISPLAY_COLUMNS,
            rows: DISPLAY_ROWS,
            title: DEFAULT_TITLE.to_string(),
            title_column: DEFAULT_TITLE_COLUMN,
            prompt: DEFAULT_PROMPT.to_string(),
            mask: MASK_CHAR,
            granted: MSG_ACCESS_GRANTED.to_string(),
            denied: MSG_ACCESS_DENIED.to_string(),
            admin_mode: MSG_ADMIN_MODE.to_string(),
            new_passcode: MSG_NEW_PASSCODE.to_string(),
            passcode_changed: MSG_PASSCODE_CHANGED.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Column of the first echoed symbol on the entry row.
    #[must_use]
    pub fn echo_column(&self) -> usize {
        self.prompt.len()
    }
}

/// Hardware line assignment, consumed by real drivers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub keypad_rows: [u8; KEYPAD_ROWS],
    pub keypad_columns: [u8; KEYPAD_COLUMNS],
    pub display_address: u8,
    pub actuator: String,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            keypad_rows: DEFAULT_KEYPAD_ROW_PINS,
            keypad_columns: DEFAULT_KEYPAD_COLUMN_PINS,
            display_address: DEFAULT_DISPLAY_ADDRESS,
            actuator: DEFAULT_ACTUATOR_PIN.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a configuration from JSON text.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed JSON and `Error::Config` if the
    /// result does not pass [`validate`](Self::validate).
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise the errors of
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a usable controller.
    ///
    /// # Errors
    /// Returns `Error::Config` if:
    /// - A passcode is not exactly [`CREDENTIAL_LENGTH`] keypad symbols
    /// - An angle exceeds [`MAX_ACTUATOR_ANGLE`]
    /// - The pulse bounds are not ordered
    /// - The display is smaller than 2 rows, a text is not ASCII, or a text
    ///   does not fit on a row
    /// - The entry echo does not fit after the prompt
    /// - The poll interval is zero
    pub fn validate(&self) -> Result<()> {
        Credential::parse(&self.user_passcode)
            .map_err(|e| Error::Config(format!("user_passcode: {e}")))?;
        Credential::parse(&self.admin_passcode)
            .map_err(|e| Error::Config(format!("admin_passcode: {e}")))?;

        if self.timing.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be at least 1".into()));
        }

        let actuator = &self.actuator;
        for (name, angle) in [
            ("locked_angle", actuator.locked_angle),
            ("unlocked_angle", actuator.unlocked_angle),
        ] {
            if angle > MAX_ACTUATOR_ANGLE {
                return Err(Error::Config(format!(
                    "{name} must be 0-{MAX_ACTUATOR_ANGLE}, got {angle}"
                )));
            }
        }
        if actuator.min_pulse_us >= actuator.max_pulse_us {
            return Err(Error::Config(format!(
                "min_pulse_us ({}) must be below max_pulse_us ({})",
                actuator.min_pulse_us, actuator.max_pulse_us
            )));
        }

        let display = &self.display;
        if display.rows <= ENTRY_ROW {
            return Err(Error::Config(format!(
                "display needs at least {} rows, got {}",
                ENTRY_ROW + 1,
                display.rows
            )));
        }
        if !display.mask.is_ascii() || display.mask.is_ascii_control() {
            return Err(Error::Config(
                "mask must be a printable ASCII character".into(),
            ));
        }
        for (name, text) in [
            ("prompt", &display.prompt),
            ("granted", &display.granted),
            ("denied", &display.denied),
            ("admin_mode", &display.admin_mode),
            ("new_passcode", &display.new_passcode),
            ("passcode_changed", &display.passcode_changed),
        ] {
            if !text.is_ascii() {
                return Err(Error::Config(format!("{name} must be ASCII only")));
            }
            if text.len() > display.columns {
                return Err(Error::Config(format!(
                    "{name} is {} characters, display has {} columns",
                    text.len(),
                    display.columns
                )));
            }
        }
        if !display.title.is_ascii() {
            return Err(Error::Config("title must be ASCII only".into()));
        }
        if display.title_column + display.title.len() > display.columns {
            return Err(Error::Config(format!(
                "title does not fit at column {}",
                display.title_column
            )));
        }
        if display.echo_column() + CREDENTIAL_LENGTH > display.columns {
            return Err(Error::Config(format!(
                "entry echo needs {} columns after the prompt",
                CREDENTIAL_LENGTH
            )));
        }

        Ok(())
    }

    /// The initial user credential.
    ///
    /// # Errors
    /// Returns `Error::Config` if `user_passcode` is not a valid credential.
    pub fn user_credential(&self) -> Result<Credential> {
        Credential::parse(&self.user_passcode)
            .map_err(|e| Error::Config(format!("user_passcode: {e}")))
    }

    /// The administrator credential.
    ///
    /// # Errors
    /// Returns `Error::Config` if `admin_passcode` is not a valid credential.
    pub fn admin_credential(&self) -> Result<Credential> {
        Credential::parse(&self.admin_passcode)
            .map_err(|e| Error::Config(format!("admin_passcode: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.user_credential().unwrap().expose(), "1234");
        assert_eq!(config.admin_credential().unwrap().expose(), "0800");
        assert_eq!(config.display.echo_column(), 7);
    }

    #[test]
    fn test_timing_durations() {
        let timing = TimingConfig::default();
        assert_eq!(timing.admin_notice(), Duration::from_secs(2));
        assert_eq!(timing.admin_prompt(), Duration::from_secs(1));
        assert_eq!(timing.admin_confirm(), Duration::from_secs(2));
        assert_eq!(timing.denied(), Duration::from_secs(3));
        assert_eq!(timing.unlock_dwell(), Duration::from_secs(3));
        assert_eq!(timing.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ControllerConfig::from_json_str(r#"{ "actuator": { "unlocked_angle": 120 } }"#)
                .unwrap();
        assert_eq!(config.actuator.unlocked_angle, 120);
        assert_eq!(config.actuator.locked_angle, 0);
        assert_eq!(config.user_passcode, "1234");
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let config = ControllerConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            ControllerConfig::from_json_str("{ not json"),
            Err(Error::Json(_))
        ));
    }

    #[rstest]
    #[case(r#"{ "user_passcode": "123" }"#)]
    #[case(r#"{ "admin_passcode": "08000" }"#)]
    #[case(r#"{ "user_passcode": "12x4" }"#)]
    #[case(r#"{ "actuator": { "unlocked_angle": 181 } }"#)]
    #[case(r#"{ "actuator": { "min_pulse_us": 2400, "max_pulse_us": 544 } }"#)]
    #[case(r#"{ "display": { "rows": 1 } }"#)]
    #[case(r#"{ "display": { "denied": "Senha muito incorreta!" } }"#)]
    #[case(r#"{ "display": { "granted": "Liberação" } }"#)]
    #[case(r#"{ "display": { "prompt": "Digite a senha: " } }"#)]
    #[case(r#"{ "display": { "title_column": 12 } }"#)]
    #[case(r#"{ "timing": { "poll_interval_ms": 0 } }"#)]
    fn test_invalid_config_is_rejected(#[case] json: &str) {
        assert!(matches!(
            ControllerConfig::from_json_str(json),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ControllerConfig::from_json_file("/nonexistent/doorlock.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

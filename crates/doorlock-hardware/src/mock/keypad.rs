//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad device that can be controlled
//! programmatically for testing without requiring physical hardware.

use doorlock_core::KeySymbol;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{HardwareError, Result, traits::KeypadDevice, types::DeviceInfo};

/// Number of keypresses the mock can hold before `press` waits.
const KEY_QUEUE_CAPACITY: usize = 32;

/// Mock keypad device for testing and development.
///
/// Keypresses are delivered through an internal channel. Tests and the CLI
/// press keys through a [`MockKeypadHandle`]; [`poll`](KeypadDevice::poll)
/// returns them one at a time and `None` once the channel is empty.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockKeypad;
/// use doorlock_hardware::traits::KeypadDevice;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press_keys("12").await?;
///
///     assert_eq!(keypad.poll().await?.map(|k| k.as_char()), Some('1'));
///     assert_eq!(keypad.poll().await?.map(|k| k.as_char()), Some('2'));
///     assert_eq!(keypad.poll().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated keypresses
    key_rx: mpsc::Receiver<KeySymbol>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// is used to press keys.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(KEY_QUEUE_CAPACITY);

        let keypad = Self {
            key_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { key_tx, name };

        (keypad, handle)
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll(&mut self) -> Result<Option<KeySymbol>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Keypad channel closed"))
            }
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        let info = DeviceInfo::new(self.name.clone(), "Mock 4x4 Keypad");
        Ok(info.with_firmware_version("1.0.0"))
    }
}

/// Handle for pressing keys on a mock keypad.
///
/// This handle can be cloned and shared across tasks. Dropping every handle
/// disconnects the keypad once the pending keys have been polled.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated keypresses
    key_tx: mpsc::Sender<KeySymbol>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Press a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn press(&self, key: KeySymbol) -> Result<()> {
        self.key_tx
            .send(key)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad channel closed"))
    }

    /// Press the key labelled `c`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `c` is not on the keypad
    /// - The keypad has been dropped and the channel is closed
    pub async fn press_char(&self, c: char) -> Result<()> {
        let key = KeySymbol::new(c).map_err(|e| HardwareError::invalid_data(e.to_string()))?;
        self.press(key).await
    }

    /// Press every key of `keys` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any character is not on the keypad (earlier keys stay pressed)
    /// - The keypad has been dropped and the channel is closed
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::mock::MockKeypad;
    ///
    /// #[tokio::main]
    /// async fn main() -> doorlock_hardware::Result<()> {
    ///     let (_keypad, handle) = MockKeypad::new();
    ///     handle.press_keys("0800").await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn press_keys(&self, keys: &str) -> Result<()> {
        for c in keys.chars() {
            self.press_char(c).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

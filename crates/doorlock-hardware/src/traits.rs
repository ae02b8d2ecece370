//! Hardware device trait definitions.
//!
//! These traits are the contract between the controller core and its three
//! collaborators: the keypad, the character display and the lock actuator.
//! Scanning the key matrix, driving the display controller and generating
//! servo pulses all live behind them.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro. Like every RPITIT trait
//! they are not object-safe; use generic type parameters.

#![allow(async_fn_in_trait)]

use doorlock_core::KeySymbol;

use crate::error::Result;
use crate::types::DeviceInfo;

/// Keypad device abstraction.
///
/// The controller polls the keypad once per loop iteration and never waits
/// on it.
///
/// # Debouncing
///
/// Implementations must debounce internally. Every `Some` returned by
/// [`poll`](KeypadDevice::poll) is treated as exactly one logical keypress.
///
/// # Examples
///
/// ```no_run
/// use doorlock_hardware::traits::KeypadDevice;
/// use doorlock_hardware::error::Result;
///
/// async fn drain<K: KeypadDevice>(keypad: &mut K) -> Result<usize> {
///     let mut count = 0;
///     while keypad.poll().await?.is_some() {
///         count += 1;
///     }
///     Ok(count)
/// }
/// ```
pub trait KeypadDevice: Send + Sync {
    /// Return the next pending keypress, or `None` if no key was pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device is disconnected
    /// - A communication error occurs
    async fn poll(&mut self) -> Result<Option<KeySymbol>>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Character display abstraction.
///
/// A cursor-addressed grid of character cells. `print` writes at the cursor
/// and advances it; text past the last column is dropped.
pub trait DisplayDevice: Send + Sync {
    /// Blank every cell and move the cursor home.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be reached.
    async fn clear(&mut self) -> Result<()>;

    /// Move the cursor to `column` on `row`.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the display or the
    /// display cannot be reached.
    async fn set_cursor(&mut self, column: usize, row: usize) -> Result<()>;

    /// Write `text` at the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be represented on the display or
    /// the display cannot be reached.
    async fn print(&mut self, text: &str) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Lock actuator abstraction.
///
/// The controller only ever commands two angles. Mapping an angle to a pulse
/// width is the driver's business.
pub trait ActuatorDevice: Send + Sync {
    /// Move the actuator to `degrees`.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is outside the actuator's range or the
    /// actuator cannot be reached.
    async fn set_angle(&mut self, degrees: u16) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

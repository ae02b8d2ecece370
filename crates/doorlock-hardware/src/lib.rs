//! Hardware device abstraction layer for the door lock controller.
//!
//! This crate provides trait-based abstractions for the three peripherals of
//! the lock: a 4x4 matrix keypad, a character display and a servo actuator.
//! The traits let the controller run unchanged against mock implementations
//! (for development and testing) and real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Device Traits
//!
//! ## Keypad
//!
//! [`KeypadDevice`] is polled, never awaited for input:
//!
//! ```no_run
//! use doorlock_hardware::traits::KeypadDevice;
//! use doorlock_hardware::error::Result;
//!
//! async fn next_key<K: KeypadDevice>(keypad: &mut K) -> Result<Option<char>> {
//!     Ok(keypad.poll().await?.map(|key| key.as_char()))
//! }
//! ```
//!
//! ## Display
//!
//! [`DisplayDevice`] is a cursor-addressed character grid:
//!
//! ```no_run
//! use doorlock_hardware::traits::DisplayDevice;
//! use doorlock_hardware::error::Result;
//!
//! async fn banner<D: DisplayDevice>(display: &mut D) -> Result<()> {
//!     display.clear().await?;
//!     display.set_cursor(4, 0).await?;
//!     display.print("Sala CPD").await
//! }
//! ```
//!
//! ## Actuator
//!
//! [`ActuatorDevice`] takes angles in degrees; pulse generation is the
//! driver's concern.
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type.
//!
//! [`KeypadDevice`]: traits::KeypadDevice
//! [`DisplayDevice`]: traits::DisplayDevice
//! [`ActuatorDevice`]: traits::ActuatorDevice

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{ActuatorDevice, DisplayDevice, KeypadDevice};
pub use types::DeviceInfo;

//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod display;
pub mod keypad;
pub mod servo;

// Re-export commonly used types
pub use display::{VirtualLcd, VirtualLcdBuilder};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use servo::MockServo;

//! Mock servo actuator for testing and development.

use doorlock_core::constants::{DEFAULT_MAX_PULSE_US, DEFAULT_MIN_PULSE_US, MAX_ACTUATOR_ANGLE};

use crate::{HardwareError, Result, traits::ActuatorDevice, types::DeviceInfo};

/// Mock hobby servo.
///
/// Records every commanded angle together with the pulse width a real
/// driver would generate for it. The servo can be disconnected to exercise
/// peripheral failure paths.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockServo;
/// use doorlock_hardware::traits::ActuatorDevice;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let mut servo = MockServo::new();
///
///     servo.set_angle(90).await?;
///     servo.set_angle(0).await?;
///
///     assert_eq!(servo.angles(), &[90, 0]);
///     assert_eq!(servo.current_angle(), Some(0));
///     assert_eq!(servo.pulse_width_us(), Some(544));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockServo {
    /// Every angle commanded so far, oldest first.
    angles: Vec<u16>,

    /// Pulse width for 0 degrees.
    min_pulse_us: u16,

    /// Pulse width for 180 degrees.
    max_pulse_us: u16,

    /// When false, every command fails with `Disconnected`.
    connected: bool,
}

impl MockServo {
    /// Create a servo with the standard 544-2400us calibration.
    pub fn new() -> Self {
        Self::with_pulse_bounds(DEFAULT_MIN_PULSE_US, DEFAULT_MAX_PULSE_US)
    }

    /// Create a servo with custom calibration.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `min_pulse_us >= max_pulse_us`.
    pub fn with_pulse_bounds(min_pulse_us: u16, max_pulse_us: u16) -> Self {
        debug_assert!(min_pulse_us < max_pulse_us, "Pulse bounds must be ordered");

        Self {
            angles: Vec::new(),
            min_pulse_us,
            max_pulse_us,
            connected: true,
        }
    }

    /// Every angle commanded so far, oldest first.
    pub fn angles(&self) -> &[u16] {
        &self.angles
    }

    /// The most recently commanded angle.
    pub fn current_angle(&self) -> Option<u16> {
        self.angles.last().copied()
    }

    /// Pulse width of the most recently commanded angle.
    pub fn pulse_width_us(&self) -> Option<u16> {
        self.current_angle().map(|angle| self.pulse_for(angle))
    }

    /// Simulate unplugging or replugging the servo.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Linear angle to pulse width mapping used by hobby servo drivers.
    pub fn pulse_for(&self, degrees: u16) -> u16 {
        let span = u32::from(self.max_pulse_us - self.min_pulse_us);
        let offset = span * u32::from(degrees) / u32::from(MAX_ACTUATOR_ANGLE);
        self.min_pulse_us + offset as u16
    }
}

impl Default for MockServo {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorDevice for MockServo {
    async fn set_angle(&mut self, degrees: u16) -> Result<()> {
        if !self.connected {
            return Err(HardwareError::disconnected("Servo"));
        }
        if degrees > MAX_ACTUATOR_ANGLE {
            return Err(HardwareError::out_of_range(
                "angle",
                u64::from(degrees),
                u64::from(MAX_ACTUATOR_ANGLE),
            ));
        }
        self.angles.push(degrees);
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Servo", "Hobby servo 0-180"))
    }
}

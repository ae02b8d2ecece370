use doorlock_hardware::HardwareError;
use thiserror::Error;

/// Errors of the control loop.
///
/// The authentication logic has no failure modes of its own; everything here
/// comes from configuration or from a collaborator.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] doorlock_core::Error),

    #[error("Peripheral failure: {0}")]
    Peripheral(#[from] HardwareError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Active-low digital inputs: home/limit switch and e-stop.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::error::{MotorError, Result};

/// Placeholder input for an axis with no home switch or e-stop wired.
///
/// Uninhabited, so an `Option<NoSensor>` is always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSensor {}

impl ErrorType for NoSensor {
    type Error = Infallible;
}

impl InputPin for NoSensor {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        match *self {}
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        match *self {}
    }
}

/// Read an active-low input. `None` reads as not asserted.
pub(crate) fn asserted<P: InputPin>(pin: Option<&mut P>) -> Result<bool> {
    match pin {
        Some(pin) => Ok(pin.is_low().map_err(|_| MotorError::PinError)?),
        None => Ok(false),
    }
}

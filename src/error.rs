//! Our error types for the SPD3303C driver.

use thiserror::Error;

use crate::types::Channel;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for SPD3303C communications.
///
/// Validation errors (`OutOfRange`, `UnsupportedChannel`) are raised before
/// anything is put on the wire.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Value {value} is outside the programmable range {min}..={max}")]
    OutOfRange { value: f32, min: f32, max: f32 },
    #[error("{0} does not support this operation")]
    UnsupportedChannel(Channel),
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Request or reply did not fit the line buffer")]
    BufferError,
}

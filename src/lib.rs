//! This crate provides an interface for communicating with and controlling the Siglent SPD3303C programmable bench power supply.
//!
//! It supports `no_std` environments by use of the `no_std` feature flag.
//!
//! The SPD3303C has three output channels:
//! * CH1 and CH2 are programmable: 0.0 - 32.0 V, 0.0 - 3.2 A.
//! * CH3 is a fixed rail (2.5/3.3/5 V picked by a slide switch); only its output state can be driven remotely.
//!
//! The instrument speaks a line-oriented ASCII SCPI command set, and the driver is suitable
//! for any transport which implements [embedded_io::Read] & [embedded_io::Write]: USB-CDC
//! serial, a USBTMC bridge or a raw TCP socket.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None

#![cfg_attr(feature = "no_std", no_std)]

pub mod command;
pub mod error;
pub mod psu;
pub mod types;

#[cfg(test)]
mod mock_serial;

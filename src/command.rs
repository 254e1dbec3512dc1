//! This module defines the SCPI requests understood by the SPD3303C.
//!
//! Each request renders as a single ASCII line; the `Display` impls produce
//! the exact bytes placed on the wire, without the line terminator.

use core::fmt;

use crate::types::{Channel, State};

/// A request which changes instrument state and produces no reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// __W__ - `OUTPut CH<n>,ON|OFF` - Switch a channel output on or off.
    ///
    /// The only command CH3 understands.
    Output(Channel, State),
    /// __W__ - `CH<n>:VOLTage <value>` - Program the voltage setpoint, in volts.
    Voltage(Channel, f32),
    /// __W__ - `CH<n>:CURRent <value>` - Program the current limit, in amperes.
    Current(Channel, f32),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Output(channel, state) => write!(f, "OUTPut {channel},{state}"),
            Command::Voltage(channel, volts) => write!(f, "{channel}:VOLTage {volts}"),
            Command::Current(channel, amps) => write!(f, "{channel}:CURRent {amps}"),
        }
    }
}

/// A request which is answered with a single reply line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// __R__ - `*IDN?` - Manufacturer, model, serial number and firmware version.
    Identification,
    /// __R__ - `SYSTem:STATus?` - Packed status word covering both programmable channels.
    SystemStatus,
    /// __R__ - `CH<n>:VOLTage?` - Programmed voltage setpoint, in volts.
    Voltage(Channel),
    /// __R__ - `CH<n>:CURRent?` - Programmed current limit, in amperes.
    Current(Channel),
    /// __R__ - `MEASure:VOLTage? CH<n>` - Instantaneous output voltage, in volts.
    MeasuredVoltage(Channel),
    /// __R__ - `MEASure:CURRent? CH<n>` - Instantaneous output current, in amperes.
    MeasuredCurrent(Channel),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Identification => write!(f, "*IDN?"),
            Query::SystemStatus => write!(f, "SYSTem:STATus?"),
            Query::Voltage(channel) => write!(f, "{channel}:VOLTage?"),
            Query::Current(channel) => write!(f, "{channel}:CURRent?"),
            Query::MeasuredVoltage(channel) => write!(f, "MEASure:VOLTage? {channel}"),
            Query::MeasuredCurrent(channel) => write!(f, "MEASure:CURRent? {channel}"),
        }
    }
}

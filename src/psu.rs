use core::fmt::Write as _;

use embedded_io::Error;
use log::{debug, trace};

use crate::{
    command::{Command, Query},
    error::Result,
    types::{CURRENT_MAX, CURRENT_MIN, Channel, State, SystemStatus, VOLTAGE_MAX, VOLTAGE_MIN},
};

/// Identification string of the supported instrument.
///
/// A compatible unit reports this manufacturer and model in its `*IDN?` reply;
/// see [Spd3303c::identification].
pub const INSTRUMENT_NAME: &str = "Siglent SPD3303C";

/// You can create a Spd3303c using any interface which implements [embedded_io::Read] & [embedded_io::Write].
///
/// For its methods, we generally use the nomenclature that "set" means to write a configuration and "get" means to read
/// back a configuration value. Whereas "read" means to get a measured value.
///
/// Every accessor is one blocking request/response exchange; nothing is cached
/// driver-side, and the instrument services a single request at a time. `L` is
/// the capacity of the line buffer used for requests and replies.
pub struct Spd3303c<S: embedded_io::Read + embedded_io::Write, const L: usize = 64> {
    interface: S,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> Spd3303c<S, L> {
    /// Bind to an instrument and force all three outputs off.
    ///
    /// The interface must already be open and pointed at the power supply;
    /// opening, closing and identifying the session belong to the transport
    /// layer.
    pub fn new(interface: S) -> Result<Self, S::Error> {
        let mut psu = Self { interface };
        debug!("forcing all outputs off");
        psu.set_output(Channel::Ch1, State::Off)?;
        psu.set_output(Channel::Ch2, State::Off)?;
        psu.set_output(Channel::Ch3, State::Off)?;
        Ok(psu)
    }

    /// Return the raw `*IDN?` reply: manufacturer, model, serial number and
    /// firmware version.
    ///
    /// Callers wanting a compatibility check can match this against
    /// [INSTRUMENT_NAME].
    pub fn identification(&mut self) -> Result<heapless::String<L>, S::Error> {
        self.ask(Query::Identification)
    }

    /// Program the voltage setpoint of a channel. Value supplied in volts.
    pub fn set_voltage(&mut self, channel: Channel, volts: f32) -> Result<(), S::Error> {
        Self::check_controllable(channel)?;
        Self::check_range(volts, VOLTAGE_MIN, VOLTAGE_MAX)?;
        self.send(Command::Voltage(channel, volts))
    }

    /// Get the programmed voltage setpoint of a channel. Value returned in volts.
    pub fn get_voltage(&mut self, channel: Channel) -> Result<f32, S::Error> {
        Self::check_controllable(channel)?;
        self.ask_f32(Query::Voltage(channel))
    }

    /// Program the current limit of a channel. Value supplied in amperes.
    pub fn set_current_limit(&mut self, channel: Channel, amps: f32) -> Result<(), S::Error> {
        Self::check_controllable(channel)?;
        Self::check_range(amps, CURRENT_MIN, CURRENT_MAX)?;
        self.send(Command::Current(channel, amps))
    }

    /// Get the programmed current limit of a channel. Value returned in amperes.
    pub fn get_current_limit(&mut self, channel: Channel) -> Result<f32, S::Error> {
        Self::check_controllable(channel)?;
        self.ask_f32(Query::Current(channel))
    }

    /// Return the measured output voltage of a channel, in volts.
    pub fn read_voltage(&mut self, channel: Channel) -> Result<f32, S::Error> {
        Self::check_controllable(channel)?;
        self.ask_f32(Query::MeasuredVoltage(channel))
    }

    /// Return the measured output current of a channel, in amperes.
    pub fn read_current(&mut self, channel: Channel) -> Result<f32, S::Error> {
        Self::check_controllable(channel)?;
        self.ask_f32(Query::MeasuredCurrent(channel))
    }

    /// Switch a channel output on or off.
    pub fn set_output(&mut self, channel: Channel, state: impl Into<State>) -> Result<(), S::Error> {
        self.send(Command::Output(channel, state.into()))
    }

    /// Read whether a channel output is enabled or disabled.
    ///
    /// Only CH1 and CH2 appear in the status word; the fixed rail CH3 is
    /// set-only and cannot be read back.
    pub fn get_output(&mut self, channel: Channel) -> Result<State, S::Error> {
        Self::check_controllable(channel)?;
        let status = self.get_system_status()?;
        status
            .output(channel)
            .ok_or(crate::error::Error::UnsupportedChannel(channel))
    }

    /// Query the packed system status word.
    ///
    /// The instrument wraps the word in descriptive text; only the hex token
    /// after `0x` is machine-readable.
    pub fn get_system_status(&mut self) -> Result<SystemStatus, S::Error> {
        let reply = self.ask(Query::SystemStatus)?;
        let (_, hex) = reply
            .split_once("0x")
            .ok_or(crate::error::Error::InvalidResponse)?;
        let raw = u32::from_str_radix(hex.trim(), 16)
            .map_err(|_| crate::error::Error::InvalidResponse)?;
        Ok(SystemStatus::from_raw(raw))
    }

    /// Turn every output off, CH1 through CH3, and hand the interface back.
    ///
    /// Consuming the driver means no further requests can be issued; closing
    /// the transport is up to the caller once it owns the interface again.
    pub fn shutdown(mut self) -> Result<S, S::Error> {
        debug!("shutting down, forcing all outputs off");
        self.set_output(Channel::Ch1, State::Off)?;
        self.set_output(Channel::Ch2, State::Off)?;
        self.set_output(Channel::Ch3, State::Off)?;
        Ok(self.interface)
    }

    /// Send a command which produces no reply.
    pub fn send(&mut self, command: Command) -> Result<(), S::Error> {
        trace!("-> {command}");
        let line = Self::render(&command)?;
        self.interface
            .write_all(line.as_bytes())
            .map_err(crate::error::Error::SerialError)?;
        self.interface
            .flush()
            .map_err(crate::error::Error::SerialError)?;
        Ok(())
    }

    /// Send a query and return its reply line, terminator stripped.
    pub fn ask(&mut self, query: Query) -> Result<heapless::String<L>, S::Error> {
        trace!("-> {query}");
        let line = Self::render(&query)?;
        self.interface
            .write_all(line.as_bytes())
            .map_err(crate::error::Error::SerialError)?;
        self.interface
            .flush()
            .map_err(crate::error::Error::SerialError)?;
        let reply = self.read_line()?;
        trace!("<- {reply}");
        Ok(reply)
    }

    fn ask_f32(&mut self, query: Query) -> Result<f32, S::Error> {
        let reply = self.ask(query)?;
        reply
            .trim()
            .parse()
            .map_err(|_| crate::error::Error::InvalidResponse)
    }

    fn render(request: &impl core::fmt::Display) -> Result<heapless::String<L>, S::Error> {
        let mut line = heapless::String::new();
        writeln!(line, "{request}").map_err(|_| crate::error::Error::BufferError)?;
        Ok(line)
    }

    /// Read bytes until the reply terminator.
    ///
    /// A timeout after partial data still yields the line; some firmware
    /// revisions drop the terminator on their last reply.
    fn read_line(&mut self) -> Result<heapless::String<L>, S::Error> {
        let mut raw: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.interface.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    if raw.push(byte[0]).is_err() {
                        return Err(crate::error::Error::BufferError);
                    }
                }
                Err(e) => {
                    // A timeout once data has arrived marks the end of an
                    // unterminated reply; anything else is the caller's problem.
                    if matches!(
                        e.kind(),
                        embedded_io::ErrorKind::Other | embedded_io::ErrorKind::TimedOut
                    ) && !raw.is_empty()
                    {
                        break;
                    }
                    return Err(crate::error::Error::SerialError(e));
                }
            }
        }

        let mut reply = heapless::String::from_utf8(raw)
            .map_err(|_| crate::error::Error::InvalidResponse)?;
        while reply.ends_with('\r') {
            reply.pop();
        }
        Ok(reply)
    }

    fn check_controllable(channel: Channel) -> Result<(), S::Error> {
        if channel.is_controllable() {
            Ok(())
        } else {
            Err(crate::error::Error::UnsupportedChannel(channel))
        }
    }

    fn check_range(value: f32, min: f32, max: f32) -> Result<(), S::Error> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(crate::error::Error::OutOfRange { value, min, max })
        }
    }
}

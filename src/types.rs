//! This module contains types describing the instrument's channels and its status word.

use modular_bitfield::prelude::*;
use strum_macros::{Display, EnumIter};

/// Lowest programmable channel voltage, in volts.
pub const VOLTAGE_MIN: f32 = 0.0;
/// Highest programmable channel voltage, in volts.
pub const VOLTAGE_MAX: f32 = 32.0;
/// Lowest programmable current limit, in amperes.
pub const CURRENT_MIN: f32 = 0.0;
/// Highest programmable current limit, in amperes.
pub const CURRENT_MAX: f32 = 3.2;

/// The three output channels of the SPD3303C.
///
/// Renders as the channel name used on the wire, e.g. `CH1`.
#[derive(Debug, Display, EnumIter, PartialEq, Eq, Clone, Copy)]
pub enum Channel {
    /// First programmable channel.
    #[strum(serialize = "CH1")]
    Ch1 = 1,
    /// Second programmable channel.
    #[strum(serialize = "CH2")]
    Ch2 = 2,
    /// Fixed rail. Its output state can be set, but nothing about it can be
    /// programmed or queried.
    #[strum(serialize = "CH3")]
    Ch3 = 3,
}

impl Channel {
    /// Whether this channel accepts voltage/current programming and status read-back.
    pub fn is_controllable(&self) -> bool {
        !matches!(self, Channel::Ch3)
    }
}

/// Used to be less ambiguous about whether an output is on or off.
///
/// Renders as the wire token, `ON` or `OFF`.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "UPPERCASE")]
pub enum State {
    /// Disabled.
    Off,
    /// Enabled.
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// Represents the two possible channel regulation modes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControlMode {
    /// Constant voltage regulation mode.
    Cv,
    /// Constant current regulation mode.
    Cc,
}

/// How the two programmable channels are ganged together.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TrackingMode {
    /// CH1 and CH2 regulate independently.
    Independent,
    /// CH1 and CH2 outputs are paralleled.
    Parallel,
    /// CH1 and CH2 outputs are stacked in series.
    Series,
}

/// Raw layout of the `SYSTem:STATus?` word.
///
/// Regulation bits read `0` for CV and `1` for CC; the tracking field reads
/// `01` independent, `10` parallel, `11` series.
#[bitfield]
struct StatusBits {
    ch1_cc: bool,
    ch2_cc: bool,
    tracking: B2,
    ch1_on: bool,
    ch2_on: bool,
    #[skip]
    __: B26,
}

/// Decoded system status word, as returned by `SYSTem:STATus?`.
///
/// CH3 has no presence in the word, so the per-channel accessors return
/// `None` for it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SystemStatus {
    raw: u32,
}

impl SystemStatus {
    /// Wrap a raw status word.
    pub fn from_raw(raw: u32) -> Self {
        Self { raw }
    }

    /// The raw status word as the instrument reported it.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    fn bits(&self) -> StatusBits {
        StatusBits::from_bytes(self.raw.to_le_bytes())
    }

    /// Output state of `channel`.
    pub fn output(&self, channel: Channel) -> Option<State> {
        let bits = self.bits();
        match channel {
            Channel::Ch1 => Some(State::from(bits.ch1_on())),
            Channel::Ch2 => Some(State::from(bits.ch2_on())),
            Channel::Ch3 => None,
        }
    }

    /// Regulation mode of `channel`.
    pub fn control_mode(&self, channel: Channel) -> Option<ControlMode> {
        let bits = self.bits();
        let cc = match channel {
            Channel::Ch1 => bits.ch1_cc(),
            Channel::Ch2 => bits.ch2_cc(),
            Channel::Ch3 => return None,
        };
        Some(if cc { ControlMode::Cc } else { ControlMode::Cv })
    }

    /// How CH1 and CH2 are ganged. `None` if the field holds a reserved value.
    pub fn tracking(&self) -> Option<TrackingMode> {
        match self.bits().tracking() {
            0b01 => Some(TrackingMode::Independent),
            0b10 => Some(TrackingMode::Parallel),
            0b11 => Some(TrackingMode::Series),
            _ => None,
        }
    }
}

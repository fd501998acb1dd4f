// Copyright (c) 2024 Mike Tsao

//! The boundary between module cores and the synthesis host: voltage-style
//! polyphonic ports and indicator lights.
//!
//! The host snapshots knob and CV values into these structs once per frame,
//! before calling [BusModule::process()](crate::traits::BusModule::process).
//! Cores never re-read a live external value mid-computation.

use derivative::Derivative;

/// The maximum polyphony of a single port.
pub const MAX_CHANNELS: usize = 16;

/// How many stereo buses every module carries.
pub const STEREO_BUS_COUNT: usize = 3;

/// How many channels the shared bus occupies: three stereo pairs, laid out as
/// (0,1) blue, (2,3) orange, (4,5) red/master.
pub const BUS_CHANNELS: usize = 2 * STEREO_BUS_COUNT;

/// An [InputPort] receives voltages from an upstream cable. A port knows
/// whether a cable is plugged in, so cores can substitute a documented
/// "normal" voltage for disconnected CV inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputPort {
    voltages: [f32; MAX_CHANNELS],
    channels: usize,
    connected: bool,
}
impl InputPort {
    /// Whether a cable is plugged into this port.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// How many polyphonic channels the plugged cable carries.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The first channel's voltage.
    pub fn voltage(&self) -> f32 {
        self.voltages[0]
    }

    /// The given channel's voltage, or 0.0 beyond the port's capacity.
    pub fn channel_voltage(&self, channel: usize) -> f32 {
        self.voltages.get(channel).copied().unwrap_or(0.0)
    }

    /// The given channel's voltage, with a monophonic cable broadcast to all
    /// channels. This is how bus inputs are read, so a mono cable patched
    /// into a bus input lands on every bus channel.
    pub fn poly_voltage(&self, channel: usize) -> f32 {
        if self.channels <= 1 {
            self.voltages[0]
        } else {
            self.channel_voltage(channel)
        }
    }

    /// The sum of all channels present on the cable.
    pub fn voltage_sum(&self) -> f32 {
        self.voltages[..self.channels.min(MAX_CHANNELS)].iter().sum()
    }

    /// The first channel's voltage if connected, else the given normal
    /// voltage. Disconnected level CVs normal to 10.0 (full scale);
    /// disconnected pan/fade CVs normal to 0.0.
    pub fn normal_voltage(&self, normal: f32) -> f32 {
        if self.connected {
            self.voltages[0]
        } else {
            normal
        }
    }

    /// Host side: drives the first channel and implies a connected mono
    /// cable.
    pub fn set_voltage(&mut self, voltage: f32) {
        self.set_channel_voltage(0, voltage);
    }

    /// Host side: drives one channel and implies a connected cable at least
    /// that wide. Out-of-range channels are ignored.
    pub fn set_channel_voltage(&mut self, channel: usize, voltage: f32) {
        if channel < MAX_CHANNELS {
            self.voltages[channel] = voltage;
            self.connected = true;
            self.channels = self.channels.max(channel + 1);
        }
    }

    /// Host side: declares the cable's channel count, zeroing any channels no
    /// longer carried.
    pub fn set_channels(&mut self, channels: usize) {
        let channels = channels.min(MAX_CHANNELS);
        for voltage in &mut self.voltages[channels..] {
            *voltage = 0.0;
        }
        self.channels = channels;
    }

    /// Host side: unplugs the cable. Disconnected ports read as silent.
    pub fn disconnect(&mut self) {
        *self = Self::default();
    }

    /// Host side: copies an upstream module's output onto this port, as a
    /// patch cable does.
    pub fn patch_from(&mut self, source: &OutputPort) {
        self.voltages = source.voltages;
        self.channels = source.channels;
        self.connected = true;
    }
}

/// An [OutputPort] carries voltages to downstream cables. Modules must
/// declare their channel count every frame, even when some channels are
/// silent, so the host can inform downstream polyphony.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct OutputPort {
    voltages: [f32; MAX_CHANNELS],
    #[derivative(Default(value = "1"))]
    channels: usize,
}
impl OutputPort {
    /// The first channel's voltage.
    pub fn voltage(&self) -> f32 {
        self.voltages[0]
    }

    /// The given channel's voltage, or 0.0 beyond the port's capacity.
    pub fn channel_voltage(&self, channel: usize) -> f32 {
        self.voltages.get(channel).copied().unwrap_or(0.0)
    }

    /// The declared channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sets the first channel's voltage.
    pub fn set_voltage(&mut self, voltage: f32) {
        self.voltages[0] = voltage;
    }

    /// Sets one channel's voltage. Out-of-range channels are ignored.
    pub fn set_channel_voltage(&mut self, channel: usize, voltage: f32) {
        if channel < MAX_CHANNELS {
            self.voltages[channel] = voltage;
        }
    }

    /// Declares the channel count, zeroing any channels no longer carried.
    pub fn set_channels(&mut self, channels: usize) {
        let channels = channels.min(MAX_CHANNELS);
        for voltage in &mut self.voltages[channels..] {
            *voltage = 0.0;
        }
        self.channels = channels;
    }
}

/// A [Light] is an indicator LED. The core produces a numeric value; the
/// host clamps it to [0, 1] when it reads the brightness for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Light {
    value: f32,
}
impl Light {
    /// Sets the raw brightness value.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.value = brightness;
    }

    /// The display brightness, clamped to [0, 1].
    pub fn brightness(&self) -> f32 {
        self.value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_port_is_silent_and_normals() {
        let port = InputPort::default();
        assert!(!port.is_connected());
        assert_eq!(port.voltage(), 0.0);
        assert_eq!(port.poly_voltage(5), 0.0);
        assert_eq!(port.voltage_sum(), 0.0);
        assert_eq!(port.normal_voltage(10.0), 10.0);
    }

    #[test]
    fn mono_cable_broadcasts_on_poly_read() {
        let mut port = InputPort::default();
        port.set_voltage(3.0);
        assert!(port.is_connected());
        assert_eq!(port.channels(), 1);
        assert_eq!(port.poly_voltage(0), 3.0);
        assert_eq!(port.poly_voltage(5), 3.0);
        assert_eq!(port.normal_voltage(10.0), 3.0);
    }

    #[test]
    fn poly_cable_sums_and_indexes() {
        let mut port = InputPort::default();
        port.set_channel_voltage(0, 1.0);
        port.set_channel_voltage(1, 2.0);
        port.set_channel_voltage(2, 4.0);
        assert_eq!(port.channels(), 3);
        assert_eq!(port.voltage_sum(), 7.0);
        assert_eq!(port.poly_voltage(1), 2.0);
        // beyond the declared channels, a poly cable reads 0
        assert_eq!(port.poly_voltage(9), 0.0);
    }

    #[test]
    fn narrowing_channels_zeroes_stale_voltages() {
        let mut port = InputPort::default();
        port.set_channel_voltage(5, 9.0);
        port.set_channels(2);
        assert_eq!(port.channel_voltage(5), 0.0);
        assert_eq!(port.voltage_sum(), 0.0);
    }

    #[test]
    fn patching_copies_output_to_input() {
        let mut output = OutputPort::default();
        output.set_channels(BUS_CHANNELS);
        for channel in 0..BUS_CHANNELS {
            output.set_channel_voltage(channel, channel as f32);
        }
        let mut input = InputPort::default();
        input.patch_from(&output);
        assert!(input.is_connected());
        assert_eq!(input.channels(), BUS_CHANNELS);
        for channel in 0..BUS_CHANNELS {
            assert_eq!(input.poly_voltage(channel), channel as f32);
        }
    }

    #[test]
    fn light_clamps_on_read_not_write() {
        let mut light = Light::default();
        light.set_brightness(4.0);
        assert_eq!(light.brightness(), 1.0);
        light.set_brightness(-0.5);
        assert_eq!(light.brightness(), 0.0);
        light.set_brightness(0.25);
        assert_eq!(light.brightness(), 0.25);
    }
}

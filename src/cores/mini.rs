// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Knob values for [MiniStripCore], snapshotted by the host once per frame.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct MiniStripParams {
    /// The momentary on/off button, 0 or 1.
    pub on_button: f32,
    /// Levels to the blue, orange, and red buses, each in [0, 1].
    #[derivative(Default(value = "[0.0, 0.0, 1.0]"))]
    pub levels: [f32; STEREO_BUS_COUNT],
}

/// Input ports for [MiniStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MiniStripInputs {
    /// CV equivalent of the on/off button.
    pub on_cv: InputPort,
    /// The mono/polyphonic audio input; all present channels are summed.
    pub mix: InputPort,
    /// The upstream six-channel bus.
    pub bus: InputPort,
}

/// Output ports for [MiniStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MiniStripOutputs {
    /// The six-channel bus to the next module downstream.
    pub bus: OutputPort,
}

/// Indicator lights for [MiniStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MiniStripLights {
    /// Shows the on/off ramp position.
    pub on: Light,
}

/// The smallest strip: a mono/polyphonic input distributed to the three
/// stereo buses with per-bus levels and a click-free on/off ramp. No panning
/// and no auto-fader object; the on/off ramp is an explicit fixed-rate ramp.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct MiniStripCore {
    /// Whether the input is switched on. Audible by default, including for
    /// records that predate the key.
    #[serde(default = "default_input_on")]
    #[derivative(Default(value = "true"))]
    input_on: bool,

    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub params: MiniStripParams,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub inputs: MiniStripInputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub outputs: MiniStripOutputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub lights: MiniStripLights,

    #[serde(skip)]
    #[builder(setter(skip))]
    on_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    on_cv_trigger: SchmittTrigger,
    // Starting at 0 doubles as a pop filter on startup.
    #[serde(skip)]
    #[builder(setter(skip))]
    ramp: f32,
    #[serde(skip)]
    #[builder(setter(skip))]
    c: Configurables,
}
fn default_input_on() -> bool {
    true
}

impl MiniStripCore {
    /// How fast the on/off ramp moves, in full-scale units per second.
    pub const RAMP_PER_SECOND: f32 = 50.0;

    /// Whether the input is switched on.
    pub fn is_on(&self) -> bool {
        self.input_on
    }

    /// The current ramp position, in [0, 1].
    pub fn ramp(&self) -> f32 {
        self.ramp
    }
}
impl Serializable for MiniStripCore {}
impl Configurable for MiniStripCore {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
        }
    }

    fn reset(&mut self) {
        self.input_on = true;
    }
}
#[typetag::serde]
impl BusModule for MiniStripCore {
    fn process(&mut self) {
        // on/off button or CV, with a level ramp that filters pops
        if self.on_trigger.process(self.params.on_button)
            | self.on_cv_trigger.process(self.inputs.on_cv.voltage())
        {
            self.input_on = !self.input_on;
        }

        let step = Self::RAMP_PER_SECOND * self.c.sample_rate().sample_time();
        if self.input_on {
            if self.ramp < 1.0 {
                self.ramp = (self.ramp + step).min(1.0);
            }
        } else if self.ramp > 0.0 {
            self.ramp = (self.ramp - step).max(0.0);
        }
        self.lights.on.set_brightness(self.ramp);

        // three stereo buses out
        self.outputs.bus.set_channels(BUS_CHANNELS);

        let mono_in = self.inputs.mix.voltage_sum() * self.ramp;
        for bus in 0..STEREO_BUS_COUNT {
            let level = self.params.levels[bus];
            for side in 0..2 {
                let channel = 2 * bus + side;
                self.outputs.bus.set_channel_voltage(
                    channel,
                    mono_in * level + self.inputs.bus.poly_voltage(channel),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::{assert_gt, assert_lt};

    const TEST_RATE: SampleRate = SampleRate::new(1000);

    fn settled(mut strip: MiniStripCore) -> MiniStripCore {
        strip.update_sample_rate(TEST_RATE);
        // 50 units/second reaches full scale in 20 ms; leave slack
        for _ in 0..25 {
            strip.process();
        }
        strip
    }

    #[test]
    fn ramp_reaches_full_scale_after_startup() {
        let strip = settled(MiniStripCore::default());
        assert_eq!(strip.ramp(), 1.0);
        assert_eq!(strip.lights.on.brightness(), 1.0);
    }

    #[test]
    fn button_press_toggles_and_ramps_down() {
        let mut strip = settled(MiniStripCore::default());
        strip.process(); // button at 0 arms the trigger
        strip.params.on_button = 1.0;
        strip.process();
        assert!(!strip.is_on());
        assert_lt!(strip.ramp(), 1.0);
        assert_gt!(strip.ramp(), 0.0, "fade out is gradual, not a mute");

        // release and press again: back on, ramping up from where it was
        strip.params.on_button = 0.0;
        strip.process();
        let mid = strip.ramp();
        strip.params.on_button = 1.0;
        strip.process();
        assert!(strip.is_on());
        assert_gt!(strip.ramp(), mid, "resumes upward from where it was");
    }

    #[test]
    fn cv_trigger_matches_button() {
        let mut strip = settled(MiniStripCore::default());
        strip.process(); // arm
        strip.inputs.on_cv.set_voltage(10.0);
        strip.process();
        assert!(!strip.is_on());
    }

    #[test]
    fn polyphonic_input_sums_to_all_buses() {
        let mut strip = settled(MiniStripCore::default());
        strip.params.levels = [0.5, 0.25, 1.0];
        strip.inputs.mix.set_channel_voltage(0, 1.0);
        strip.inputs.mix.set_channel_voltage(1, 2.0);
        strip.process();

        // poly sum is 3.0, scaled by each bus level, both sides of each pair
        for side in 0..2 {
            assert_eq!(strip.outputs.bus.channel_voltage(side), 1.5);
            assert_eq!(strip.outputs.bus.channel_voltage(2 + side), 0.75);
            assert_eq!(strip.outputs.bus.channel_voltage(4 + side), 3.0);
        }
    }

    #[test]
    fn upstream_bus_is_added_not_overwritten() {
        let mut strip = settled(MiniStripCore::default());
        for channel in 0..BUS_CHANNELS {
            strip
                .inputs
                .bus
                .set_channel_voltage(channel, channel as f32);
        }
        strip.inputs.mix.set_voltage(2.0); // red level defaults to 1.0
        strip.process();

        for channel in 0..BUS_CHANNELS {
            let own = if channel >= 4 { 2.0 } else { 0.0 };
            assert_eq!(
                strip.outputs.bus.channel_voltage(channel),
                channel as f32 + own,
                "channel {channel}"
            );
        }
    }

    #[test]
    fn output_always_declares_six_channels() {
        let mut strip = MiniStripCore::default();
        strip.update_sample_rate(TEST_RATE);
        strip.process();
        assert_eq!(strip.outputs.bus.channels(), BUS_CHANNELS);
    }

    #[test]
    fn reset_restores_audible_default() {
        let mut strip = settled(MiniStripCoreBuilder::default().input_on(false).build().unwrap());
        assert!(!strip.is_on());
        strip.reset();
        assert!(strip.is_on());
    }
}

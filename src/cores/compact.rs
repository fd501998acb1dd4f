// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Knob values for [CompactStripCore], snapshotted by the host once per frame.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct CompactStripParams {
    /// The momentary on/off button, 0 or 1.
    pub on_button: f32,
    /// Pan position in [-1, 1], 0 centered.
    pub pan: f32,
    /// Levels to the blue, orange, and red buses, each in [0, 1]. The blue
    /// and orange sends ride the red level, so pulling red down pulls the
    /// whole strip down.
    #[derivative(Default(value = "[0.0, 0.0, 1.0]"))]
    pub levels: [f32; STEREO_BUS_COUNT],
}

/// Input ports for [CompactStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompactStripInputs {
    /// CV equivalent of the on/off button.
    pub on_cv: InputPort,
    /// Left audio input. With the right input unpatched this side acts as a
    /// mono input, its polyphonic channels summed and sent to both sides.
    pub left: InputPort,
    /// Right audio input.
    pub right: InputPort,
    /// The upstream six-channel bus.
    pub bus: InputPort,
}

/// Output ports for [CompactStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompactStripOutputs {
    /// The six-channel bus to the next module downstream.
    pub bus: OutputPort,
}

/// Indicator lights for [CompactStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompactStripLights {
    /// Shows the on/off ramp position.
    pub on: Light,
}

/// A stereo strip with constant-power panning and post-master bus sends,
/// still using the fixed-rate on/off ramp rather than an auto-fader.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct CompactStripCore {
    /// Whether the input is switched on. Audible by default, including for
    /// records that predate the key.
    #[serde(default = "default_input_on")]
    #[derivative(Default(value = "true"))]
    input_on: bool,

    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub params: CompactStripParams,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub inputs: CompactStripInputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub outputs: CompactStripOutputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub lights: CompactStripLights,

    #[serde(skip)]
    #[builder(setter(skip))]
    on_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    on_cv_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "ClockDivider::new_with(CompactStripCore::PAN_DIVISION)"))]
    pan_divider: ClockDivider,
    #[serde(skip)]
    #[builder(setter(skip))]
    pan: ConstantPan,
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

impl CompactStripCore {
    /// How fast the on/off ramp moves, in full-scale units per second.
    pub const RAMP_PER_SECOND: f32 = 50.0;
    /// How many frames between pan recomputations.
    pub const PAN_DIVISION: u32 = 3;

    /// Whether the input is switched on.
    pub fn is_on(&self) -> bool {
        self.input_on
    }

    /// The current ramp position, in [0, 1].
    pub fn ramp(&self) -> f32 {
        self.ramp
    }
}
impl Serializable for CompactStripCore {}
impl Configurable for CompactStripCore {
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
impl BusModule for CompactStripCore {
    fn process(&mut self) {
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

        // blue and orange sends ride the red level
        let mut in_levels = [0.0; STEREO_BUS_COUNT];
        in_levels[2] = self.params.levels[2];
        for send in 0..2 {
            in_levels[send] = self.params.levels[send] * in_levels[2];
        }

        // pan recomputation is throttled, and set_pan skips an idle knob
        if self.pan_divider.process() {
            self.pan.set_pan(self.params.pan);
        }

        // stereo input, or mono spread to both sides
        let mut stereo_in = [0.0f32; 2];
        if self.inputs.right.is_connected() {
            stereo_in[0] = self.inputs.left.voltage() * self.pan.level(0) * self.ramp;
            stereo_in[1] = self.inputs.right.voltage() * self.pan.level(1) * self.ramp;
        } else {
            let mono_in = self.inputs.left.voltage_sum();
            for side in 0..2 {
                stereo_in[side] = mono_in * self.pan.level(side) * self.ramp;
            }
        }

        // three stereo buses out
        self.outputs.bus.set_channels(BUS_CHANNELS);
        for bus in 0..STEREO_BUS_COUNT {
            for side in 0..2 {
                let channel = 2 * bus + side;
                self.outputs.bus.set_channel_voltage(
                    channel,
                    stereo_in[side] * in_levels[bus] + self.inputs.bus.poly_voltage(channel),
                );
            }
        }
    }
}

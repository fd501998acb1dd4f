// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Knob values for [StereoStripCore], snapshotted by the host once per frame.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct StereoStripParams {
    /// The momentary on/off button, 0 or 1.
    pub on_button: f32,
    /// The momentary per-send post-fade buttons (blue, orange), 0 or 1.
    pub post_fade_buttons: [f32; 2],
    /// Pan position in [-1, 1], 0 centered.
    pub pan: f32,
    /// How much of the pan CV to apply, in [0, 1].
    #[derivative(Default(value = "0.5"))]
    pub pan_attenuator: f32,
    /// Levels to the blue, orange, and red buses, each in [0, 1].
    #[derivative(Default(value = "[0.0, 0.0, 1.0]"))]
    pub levels: [f32; STEREO_BUS_COUNT],
}

/// Input ports for [StereoStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoStripInputs {
    /// CV equivalent of the on/off button.
    pub on_cv: InputPort,
    /// Per-bus level CVs, 0–10 V, multiplied into the level knobs.
    pub level_cvs: [InputPort; STEREO_BUS_COUNT],
    /// Pan CV, scaled by the attenuator and added to the pan knob.
    pub pan_cv: InputPort,
    /// Left audio input. With the right input unpatched this side acts as a
    /// mono input, its polyphonic channels summed and sent to both sides.
    pub left: InputPort,
    /// Right audio input.
    pub right: InputPort,
    /// The upstream six-channel bus.
    pub bus: InputPort,
}

/// Output ports for [StereoStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoStripOutputs {
    /// The six-channel bus to the next module downstream.
    pub bus: OutputPort,
}

/// Indicator lights for [StereoStripCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoStripLights {
    /// Shows the fader position.
    pub on: Light,
    /// Lit while the corresponding send (blue, orange) is post-fade.
    pub post_fades: [Light; 2],
}

/// The full-featured strip: stereo input, CV over every level, pan with CV
/// and attenuator, switchable post-fade sends, and an [AutoFader] with a
/// selectable preamp in place of the fixed on/off ramp.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, build_fn(private, name = "build_from_builder"))]
#[serde(rename_all = "kebab-case")]
pub struct StereoStripCore {
    /// Whether the input is switched on. Audible by default, including for
    /// records that predate the key.
    #[serde(default = "default_input_on")]
    #[derivative(Default(value = "true"))]
    input_on: bool,
    /// Whether the blue and orange sends are taken after the fader.
    #[serde(default)]
    post_fades: [bool; 2],
    /// The preamp applied at the top of the fader. The panel offers 1×, 2×,
    /// and 4×, but any non-negative value round-trips.
    #[serde(default = "default_gain")]
    #[derivative(Default(value = "1.0"))]
    gain: f32,

    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub params: StereoStripParams,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub inputs: StereoStripInputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub outputs: StereoStripOutputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub lights: StereoStripLights,

    #[serde(skip)]
    #[builder(setter(skip))]
    on_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    on_cv_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    post_fade_triggers: [SchmittTrigger; 2],
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "ClockDivider::new_with(StereoStripCore::PAN_DIVISION)"))]
    pan_divider: ClockDivider,
    #[serde(skip)]
    #[builder(setter(skip))]
    pan: ConstantPan,
    #[serde(skip)]
    #[builder(setter(skip))]
    fader: AutoFader,
    #[serde(skip)]
    #[builder(setter(skip))]
    c: Configurables,
}
fn default_input_on() -> bool {
    true
}

fn default_gain() -> f32 {
    1.0
}

impl StereoStripCoreBuilder {
    /// Builds the core, pushing the persisted on/off and preamp state into
    /// the fader.
    pub fn build(&self) -> Result<StereoStripCore, StereoStripCoreBuilderError> {
        let mut core = self.build_from_builder()?;
        core.sync_fader();
        Ok(core)
    }
}
impl StereoStripCore {
    /// How many frames between pan recomputations.
    pub const PAN_DIVISION: u32 = 3;

    /// Whether the input is switched on.
    pub fn is_on(&self) -> bool {
        self.fader.is_on()
    }

    /// Whether the given send (0 blue, 1 orange) is post-fade.
    pub fn is_post_fade(&self, send: usize) -> bool {
        self.post_fades[send.min(1)]
    }

    /// The preamp gain.
    pub fn gain(&self) -> f32 {
        self.fader.gain()
    }

    /// Sets the preamp gain.
    pub fn set_gain(&mut self, gain: f32) {
        self.fader.set_gain(gain);
        self.gain = self.fader.gain();
    }

    fn sync_fader(&mut self) {
        self.fader.set_on(self.input_on);
        self.fader.set_gain(self.gain);
    }
}
impl Serializable for StereoStripCore {
    fn before_ser(&mut self) {
        self.input_on = self.fader.is_on();
        self.gain = self.fader.gain();
    }

    fn after_deser(&mut self) {
        self.sync_fader();
    }
}
impl Configurable for StereoStripCore {
    fn sample_rate(&self) -> SampleRate {
        self.c.sample_rate()
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.c.update_sample_rate(sample_rate);
        self.fader.update_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.input_on = true;
        self.post_fades = [false; 2];
        self.gain = 1.0;
        self.sync_fader();
    }
}
#[typetag::serde]
impl BusModule for StereoStripCore {
    fn process(&mut self) {
        if self.on_trigger.process(self.params.on_button)
            | self.on_cv_trigger.process(self.inputs.on_cv.voltage())
        {
            self.fader.toggle();
        }
        self.fader.process();

        for send in 0..2 {
            if self.post_fade_triggers[send].process(self.params.post_fade_buttons[send]) {
                self.post_fades[send] = !self.post_fades[send];
            }
        }

        // level knobs scaled by their (normalled-high) CVs
        let mut in_levels = [0.0; STEREO_BUS_COUNT];
        for bus in 0..STEREO_BUS_COUNT {
            in_levels[bus] = (self.inputs.level_cvs[bus].normal_voltage(10.0) * 0.1)
                .clamp(0.0, 1.0)
                * self.params.levels[bus];
        }
        // post-fade sends ride the red level
        for send in 0..2 {
            if self.post_fades[send] {
                in_levels[send] *= in_levels[2];
            }
        }

        // pan and lights are throttled together
        if self.pan_divider.process() {
            if self.inputs.pan_cv.is_connected() {
                let position = self.params.pan
                    + self.inputs.pan_cv.normal_voltage(0.0)
                        * 2.0
                        * self.params.pan_attenuator
                        * 0.1;
                self.pan.set_pan(position);
            } else {
                self.pan.set_pan(self.params.pan);
            }
            self.lights.on.set_brightness(self.fader.fade());
            for send in 0..2 {
                self.lights.post_fades[send]
                    .set_brightness(if self.post_fades[send] { 1.0 } else { 0.0 });
            }
        }

        // stereo input, or mono spread to both sides
        let fade = self.fader.fade();
        let mut stereo_in = [0.0f32; 2];
        if self.inputs.right.is_connected() {
            stereo_in[0] = self.inputs.left.voltage() * self.pan.level(0) * fade;
            stereo_in[1] = self.inputs.right.voltage() * self.pan.level(1) * fade;
        } else {
            let mono_in = self.inputs.left.voltage_sum();
            for side in 0..2 {
                stereo_in[side] = mono_in * self.pan.level(side) * fade;
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

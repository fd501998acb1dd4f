// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Segments per meter column: one clip indicator on top of eight 6 dB VU
/// segments.
pub const METER_SEGMENTS: usize = 9;

/// Knob values for [MasterCore], snapshotted by the host once per frame.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct MasterParams {
    /// The momentary on/off button, 0 or 1.
    pub on_button: f32,
    /// Level of the auxiliary stereo input, in [0, 1].
    #[derivative(Default(value = "1.0"))]
    pub aux_level: f32,
    /// The master level, in [0, 1].
    #[derivative(Default(value = "1.0"))]
    pub master_level: f32,
    /// Fade-in duration in milliseconds.
    #[derivative(Default(value = "AutoFader::MIN_SPEED_MS"))]
    pub fade_in_ms: f32,
    /// Fade-out duration in milliseconds.
    #[derivative(Default(value = "AutoFader::MIN_SPEED_MS"))]
    pub fade_out_ms: f32,
}

/// Input ports for [MasterCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MasterInputs {
    /// CV equivalent of the on/off button.
    pub on_cv: InputPort,
    /// Master level CV, 0–10 V, multiplied into the level knob.
    pub level_cv: InputPort,
    /// Fade duration CV, 0–10 V, mapped across the whole speed range.
    pub fade_cv: InputPort,
    /// Left side of the auxiliary stereo input, which joins the red bus. With
    /// the right input unpatched this side acts as a mono input, its
    /// polyphonic channels summed and sent to both sides.
    pub left: InputPort,
    /// Right side of the auxiliary stereo input.
    pub right: InputPort,
    /// The upstream six-channel bus.
    pub bus: InputPort,
}

/// Output ports for [MasterCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MasterOutputs {
    /// Left side of the final stereo mix.
    pub left: OutputPort,
    /// Right side of the final stereo mix.
    pub right: OutputPort,
    /// The six-channel bus, after the master level and fade, for chaining
    /// another mixer section.
    pub bus: OutputPort,
}

/// Indicator lights for [MasterCore].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MasterLights {
    /// Shows the fade position, dimmed while a fade is in flight.
    pub on: Light,
    /// Left meter column, element 0 the clip indicator.
    pub left_meter: [Light; METER_SEGMENTS],
    /// Right meter column, element 0 the clip indicator.
    pub right_meter: [Light; METER_SEGMENTS],
}

/// The output module: applies the master level (optionally CV-smoothed) and
/// an exponential auto-fade to all three buses, folds an auxiliary stereo
/// input onto the red bus, sums the buses to a stereo mix, and drives a pair
/// of VU/clip meter columns.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, build_fn(private, name = "build_from_builder"))]
#[serde(rename_all = "kebab-case")]
pub struct MasterCore {
    /// Whether the output is switched on. Audible by default, including for
    /// records that predate the key.
    #[serde(default = "default_input_on")]
    #[derivative(Default(value = "true"))]
    input_on: bool,
    /// Whether the master level CV is slew-limited. `None` only in records
    /// saved before the option existed; those ran unsmoothed, and
    /// [Serializable::after_deser] resolves them that way.
    #[serde(default)]
    #[builder(setter(strip_option))]
    #[derivative(Default(value = "Some(true)"))]
    level_cv_smoothing: Option<bool>,
    /// Which fade directions the fade CV controls. `None` only in records
    /// saved before the fade-in knob existed; [Serializable::after_deser]
    /// resolves those to [FadeCvMode::Both] and copies the fade-out knob over
    /// the fade-in knob, preserving the old single-knob behavior.
    #[serde(default)]
    #[builder(setter(strip_option))]
    #[derivative(Default(value = "Some(FadeCvMode::default())"))]
    fade_cv_mode: Option<FadeCvMode>,
    /// The panel color theme for this instance.
    #[serde(default)]
    color_theme: ColorTheme,

    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub params: MasterParams,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub inputs: MasterInputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub outputs: MasterOutputs,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[allow(missing_docs)]
    pub lights: MasterLights,

    #[serde(skip)]
    #[builder(setter(skip))]
    on_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    on_cv_trigger: SchmittTrigger,
    #[serde(skip)]
    #[builder(setter(skip))]
    fader: AutoFader,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "MasterCore::default_level_smoother()"))]
    level_smoother: Slewer,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "[VuMeter::new_with(MasterCore::VU_LAMBDA); 2]"))]
    vu_meters: [VuMeter; 2],
    #[serde(skip)]
    #[builder(setter(skip))]
    peaks: [PeakHold; 2],
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "ClockDivider::new_with(MasterCore::VU_DIVISION)"))]
    vu_divider: ClockDivider,
    #[serde(skip)]
    #[builder(setter(skip))]
    #[derivative(Default(value = "ClockDivider::new_with(MasterCore::LIGHT_DIVISION)"))]
    light_divider: ClockDivider,
    #[serde(skip)]
    #[builder(setter(skip))]
    c: Configurables,
}
fn default_input_on() -> bool {
    true
}

impl MasterCoreBuilder {
    /// Builds the core, pushing the persisted on/off state into the fader.
    pub fn build(&self) -> Result<MasterCore, MasterCoreBuilderError> {
        let mut core = self.build_from_builder()?;
        core.fader.set_on(core.input_on);
        Ok(core)
    }
}
impl MasterCore {
    /// Voltage above which the clip indicators fire.
    pub const CLIP_VOLTAGE: f32 = 10.0;
    /// How fast a fired clip indicator falls back, per second.
    pub const PEAK_FALL_PER_SECOND: f32 = 15.0;
    /// Slew window for the master level CV, in milliseconds full-scale.
    pub const LEVEL_SMOOTH_MS: f32 = 26.0;
    /// Shape exponent for the auto-fade curve.
    pub const FADE_SHAPE: f32 = 2.5;
    /// The fade CV spans this many milliseconds above the minimum speed.
    pub const FADE_CV_SPAN_MS: f32 = 16974.0;
    /// Decay lambda for the VU followers.
    pub const VU_LAMBDA: f32 = 25.0;
    /// How many frames between VU follower updates.
    pub const VU_DIVISION: u32 = 512;
    /// How many frames between light and fade-speed updates.
    pub const LIGHT_DIVISION: u32 = 64;

    fn default_level_smoother() -> Slewer {
        let mut smoother = Slewer::default();
        smoother.set_slew_speed(1000.0 / Self::LEVEL_SMOOTH_MS);
        smoother
    }

    /// Whether the output is switched on.
    pub fn is_on(&self) -> bool {
        self.fader.is_on()
    }

    /// Whether the master level CV is slew-limited.
    pub fn level_cv_smoothing(&self) -> bool {
        self.level_cv_smoothing.unwrap_or(false)
    }

    #[allow(missing_docs)]
    pub fn set_level_cv_smoothing(&mut self, enabled: bool) {
        self.level_cv_smoothing = Some(enabled);
    }

    /// Which fade directions the fade CV controls.
    pub fn fade_cv_mode(&self) -> FadeCvMode {
        self.fade_cv_mode.unwrap_or_default()
    }

    #[allow(missing_docs)]
    pub fn set_fade_cv_mode(&mut self, mode: FadeCvMode) {
        self.fade_cv_mode = Some(mode);
    }

    /// The panel color theme for this instance.
    pub fn color_theme(&self) -> ColorTheme {
        self.color_theme
    }

    #[allow(missing_docs)]
    pub fn set_color_theme(&mut self, theme: ColorTheme) {
        self.color_theme = theme;
    }

    /// The current fade position including the exponential shaping, in
    /// [0, 1].
    pub fn fade(&self) -> f32 {
        self.fader.exp_fade(Self::FADE_SHAPE)
    }

    fn update_fade_speed(&mut self) {
        let on = self.fader.is_on();
        let cv_controls = self.inputs.fade_cv.is_connected()
            && match self.fade_cv_mode() {
                FadeCvMode::Both => true,
                FadeCvMode::FadeInOnly => on,
                FadeCvMode::FadeOutOnly => !on,
            };
        if cv_controls {
            let cv = (self.inputs.fade_cv.normal_voltage(0.0) * 0.1).clamp(0.0, 1.0);
            self.fader
                .set_speed((cv * Self::FADE_CV_SPAN_MS + AutoFader::MIN_SPEED_MS).round());
        } else if on {
            self.fader.set_speed(self.params.fade_in_ms);
        } else {
            self.fader.set_speed(self.params.fade_out_ms);
        }
    }

    fn update_lights(&mut self) {
        // dimmed while a fade is in flight so the panel shows progress
        let fade = self.fader.fade();
        let gain = self.fader.gain();
        if fade > 0.0 && fade < gain {
            self.lights.on.set_brightness(0.3 * (fade / gain) + 0.25);
        } else {
            self.lights.on.set_brightness(fade);
        }

        // one decay step per light tick, so the hold lingers a few seconds
        let decay = Self::PEAK_FALL_PER_SECOND * self.c.sample_rate().sample_time();
        for side in 0..2 {
            self.peaks[side].decay(decay);
        }
        self.lights.left_meter[0].set_brightness(self.peaks[0].value());
        self.lights.right_meter[0].set_brightness(self.peaks[1].value());

        for segment in 1..METER_SEGMENTS {
            let db_max = -6.0 * (segment as f32 - 1.0);
            let db_min = -6.0 * segment as f32;
            self.lights.left_meter[segment]
                .set_brightness(self.vu_meters[0].brightness(db_min, db_max));
            self.lights.right_meter[segment]
                .set_brightness(self.vu_meters[1].brightness(db_min, db_max));
        }
    }
}
impl Serializable for MasterCore {
    fn before_ser(&mut self) {
        self.input_on = self.fader.is_on();
    }

    fn after_deser(&mut self) {
        self.fader.set_on(self.input_on);
        if self.level_cv_smoothing.is_none() {
            self.level_cv_smoothing = Some(false);
        }
        if self.fade_cv_mode.is_none() {
            self.fade_cv_mode = Some(FadeCvMode::default());
            // the host has already restored the knobs, so the fade-out value
            // is available to carry into the newer fade-in knob
            self.params.fade_in_ms = self.params.fade_out_ms;
        }
    }
}
impl Configurable for MasterCore {
    fn sample_rate(&self) -> SampleRate {
        self.c.sample_rate()
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.c.update_sample_rate(sample_rate);
        self.fader.update_sample_rate(sample_rate);
        self.level_smoother.update_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.input_on = true;
        self.level_cv_smoothing = Some(true);
        self.fade_cv_mode = Some(FadeCvMode::default());
        self.fader.set_on(true);
        self.fader.set_gain(1.0);
    }
}
#[typetag::serde]
impl BusModule for MasterCore {
    fn process(&mut self) {
        if self.on_trigger.process(self.params.on_button)
            | self.on_cv_trigger.process(self.inputs.on_cv.voltage())
        {
            self.fader.toggle();
        }
        self.fader.process();

        // the bus stays six channels wide even while silent so that a
        // chained mixer section sees a stable layout
        self.outputs.bus.set_channels(BUS_CHANNELS);

        let mut summed_out = [0.0f32; 2];
        if self.fader.fade() > 0.0 {
            let mut master_level = (self.inputs.level_cv.normal_voltage(10.0) * 0.1)
                .clamp(0.0, 1.0)
                * self.params.master_level;
            if self.level_cv_smoothing() {
                master_level = self.level_smoother.slew(master_level);
            }
            let fade = self.fader.exp_fade(Self::FADE_SHAPE);

            // auxiliary stereo input, or mono spread to both sides
            let mut stereo_in = [0.0f32; 2];
            if self.inputs.right.is_connected() {
                stereo_in[0] = self.inputs.left.voltage() * self.params.aux_level;
                stereo_in[1] = self.inputs.right.voltage() * self.params.aux_level;
            } else {
                let mono_in = self.inputs.left.voltage_sum() * self.params.aux_level;
                stereo_in = [mono_in, mono_in];
            }

            // blue and orange pass through; the aux joins the red pair
            let mut bus_out = [0.0f32; BUS_CHANNELS];
            for channel in 0..4 {
                bus_out[channel] = self.inputs.bus.poly_voltage(channel) * master_level * fade;
            }
            for channel in 4..BUS_CHANNELS {
                bus_out[channel] = (stereo_in[channel - 4]
                    + self.inputs.bus.poly_voltage(channel))
                    * master_level
                    * fade;
            }

            for (channel, voltage) in bus_out.iter().enumerate() {
                self.outputs.bus.set_channel_voltage(channel, *voltage);
            }
            for side in 0..2 {
                summed_out[side] = bus_out[side] + bus_out[side + 2] + bus_out[side + 4];
            }
            self.outputs.left.set_voltage(summed_out[0]);
            self.outputs.right.set_voltage(summed_out[1]);
        } else {
            for channel in 0..BUS_CHANNELS {
                self.outputs.bus.set_channel_voltage(channel, 0.0);
            }
            self.outputs.left.set_voltage(0.0);
            self.outputs.right.set_voltage(0.0);
        }

        // clip detection runs at audio rate so one-sample hits register
        for side in 0..2 {
            if summed_out[side] > Self::CLIP_VOLTAGE {
                self.peaks[side].set();
            }
        }

        if self.vu_divider.process() {
            let delta_time =
                self.c.sample_rate().sample_time() * Self::VU_DIVISION as f32;
            for side in 0..2 {
                self.vu_meters[side]
                    .process(delta_time, summed_out[side] / Self::CLIP_VOLTAGE);
            }
        }

        if self.light_divider.process() {
            self.update_fade_speed();
            self.update_lights();
        }
    }
}

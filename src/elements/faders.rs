// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use delegate::delegate;
use derivative::Derivative;

/// [AutoFader] turns a binary on/off request into a click-free gain ramp.
///
/// The fade position is kept normalized in [0, 1] and scaled by the "on"
/// target gain (the preamp) on output, so the ramp duration is independent of
/// the preamp setting. Toggling mid-ramp reverses direction from the current
/// position, never from an extreme, so the output is continuous across
/// toggles and never overshoots its target.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct AutoFader {
    #[derivative(Default(value = "true"))]
    on: bool,
    fade: f32,
    #[derivative(Default(value = "1.0"))]
    gain: f32,
    #[derivative(Default(value = "AutoFader::MIN_SPEED_MS"))]
    last_speed: f32,
    #[derivative(
        Default(value = "1.0 / (SampleRate::DEFAULT_SAMPLE_RATE as f32 * (AutoFader::MIN_SPEED_MS / 1000.0))")
    )]
    delta: f32,
    c: Configurables,

    #[cfg(test)]
    recalcs: usize,
}
impl AutoFader {
    /// The shortest allowed ramp duration, in milliseconds.
    pub const MIN_SPEED_MS: f32 = 26.0;
    /// The longest allowed ramp duration, in milliseconds.
    pub const MAX_SPEED_MS: f32 = 17000.0;

    /// Sets the ramp duration in milliseconds, clamped to
    /// [[MIN_SPEED_MS](Self::MIN_SPEED_MS), [MAX_SPEED_MS](Self::MAX_SPEED_MS)].
    /// A repeated value skips the envelope recomputation.
    pub fn set_speed(&mut self, ms: f32) {
        let ms = ms.clamp(Self::MIN_SPEED_MS, Self::MAX_SPEED_MS);
        if ms == self.last_speed {
            return;
        }
        self.last_speed = ms;
        self.recalc();
    }

    /// The last ramp duration requested, after clamping.
    pub fn last_speed(&self) -> f32 {
        self.last_speed
    }

    /// Sets the "on" target gain. Callers use the discrete preamp steps
    /// (1/2/4), but any non-negative value is accepted.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }

    /// The "on" target gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Whether the fader is ramping toward on.
    pub fn is_on(&self) -> bool {
        self.on
    }

    #[allow(missing_docs)]
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// Flips the ramp direction without resetting the ramp position.
    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    /// Advances the ramp one audio frame toward `on ? gain : 0`.
    pub fn process(&mut self) {
        if self.on {
            if self.fade < 1.0 {
                self.fade = (self.fade + self.delta).min(1.0);
            }
        } else if self.fade > 0.0 {
            self.fade = (self.fade - self.delta).max(0.0);
        }
    }

    /// The linear gain, in [0, gain].
    pub fn fade(&self) -> f32 {
        self.fade * self.gain
    }

    /// An exponential remap of the fade for automation curves. A shape
    /// exponent above 1 biases the audible change toward the end of the ramp.
    pub fn exp_fade(&self, shape: f32) -> f32 {
        self.fade.powf(shape) * self.gain
    }

    fn recalc(&mut self) {
        // last_speed is clamped to a 26 ms floor and the sample rate is
        // guarded nonzero, so frames can't reach zero.
        let frames = self.c.sample_rate().0 as f32 * (self.last_speed / 1000.0);
        self.delta = 1.0 / frames.max(1.0);
        #[cfg(test)]
        {
            self.recalcs += 1;
        }
    }

    #[cfg(test)]
    fn recalcs(&self) -> usize {
        self.recalcs
    }
}
impl Configurable for AutoFader {
    fn sample_rate(&self) -> SampleRate {
        self.c.sample_rate()
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.c.update_sample_rate(sample_rate);
        self.recalc();
    }
}

/// [Slewer] is a one-pole-style smoother that limits how fast a control value
/// may move, which keeps stepped parameter changes from clicking.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct Slewer {
    value: f32,
    #[derivative(Default(value = "1.0"))]
    rate: f32,
    c: Configurables,
}
impl Slewer {
    /// Sets the maximum rate of change, in units per second.
    pub fn set_slew_speed(&mut self, units_per_second: f32) {
        self.rate = units_per_second.max(0.0);
    }

    /// Returns the next smoothed value, moving at most `rate × sample_time`
    /// toward the target and snapping exactly onto it when within one step.
    pub fn slew(&mut self, target: f32) -> f32 {
        let step = self.rate * self.c.sample_rate().sample_time();
        if (target - self.value).abs() <= step {
            self.value = target;
        } else if target > self.value {
            self.value += step;
        } else {
            self.value -= step;
        }
        self.value
    }

    /// The current smoothed value.
    pub fn value(&self) -> f32 {
        self.value
    }
}
impl Configurable for Slewer {
    delegate! {
        to self.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
        }
    }
}

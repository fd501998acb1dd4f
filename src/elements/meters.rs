// Copyright (c) 2024 Mike Tsao

use derivative::Derivative;

/// [VuMeter] is a level follower with instant attack and an exponential,
/// lambda-weighted decay. Its brightness output drives multi-segment level
/// displays over a dB window.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct VuMeter {
    value: f32,
    #[derivative(Default(value = "30.0"))]
    lambda: f32,
}
impl VuMeter {
    /// Creates a meter with the given decay lambda, in units of 1/seconds.
    pub fn new_with(lambda: f32) -> Self {
        Self {
            value: 0.0,
            lambda,
        }
    }

    /// Follows one (possibly throttled) chunk of signal. `delta_time` is the
    /// wall time the chunk represents, so a divided caller passes
    /// `sample_time × division`.
    pub fn process(&mut self, delta_time: f32, value: f32) {
        let value = value.abs();
        if value >= self.value {
            self.value = value;
        } else {
            self.value += (value - self.value) * self.lambda * delta_time;
        }
    }

    /// The current follower level.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Maps the current level into [0, 1] across a dB window. Levels at or
    /// above `db_max` read 1.0; at or below `db_min` read 0.0.
    pub fn brightness(&self, db_min: f32, db_max: f32) -> f32 {
        let db = amplitude_to_db(self.value);
        if db >= db_max {
            1.0
        } else if db <= db_min {
            0.0
        } else {
            (db - db_min) / (db_max - db_min)
        }
    }

    /// Clears the follower.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.log10()
}

/// [PeakHold] is a clip indicator: it pins to full brightness the instant an
/// overshoot is reported and then decays linearly back to zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeakHold {
    value: f32,
}
impl PeakHold {
    /// Reports an overshoot, pinning the indicator to 1.0 immediately.
    pub fn set(&mut self) {
        self.value = 1.0;
    }

    /// Decays the indicator linearly by the given amount, stopping at zero.
    pub fn decay(&mut self, amount: f32) {
        self.value = (self.value - amount).max(0.0);
    }

    /// The current indicator value, in [0, 1].
    pub fn value(&self) -> f32 {
        self.value
    }
}

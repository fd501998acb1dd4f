// Copyright (c) 2024 Mike Tsao

use core::f32::consts::{FRAC_PI_2, SQRT_2};
use derivative::Derivative;

/// [ConstantPan] maps a bipolar pan position onto an equal-power pair of
/// left/right gains, so total perceived power stays constant across the
/// stereo field.
///
/// The position is deliberately not clamped: when a pan CV rides on top of an
/// attenuated knob offset, the composite position can exceed ±1, and letting
/// the trig functions extrapolate avoids an abrupt level jump at the rail.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct ConstantPan {
    position: f32,
    #[derivative(Default(value = "[1.0, 1.0]"))]
    levels: [f32; 2],

    #[cfg(test)]
    recomputes: usize,
}
impl ConstantPan {
    /// Sets the pan position, nominally in [-1, 1]. The gain pair is
    /// recomputed only when the position actually changed; the exact float
    /// compare is intentional, so an idle knob/CV costs nothing.
    pub fn set_pan(&mut self, position: f32) {
        if position == self.position {
            return;
        }
        self.position = position;
        let angle = (position + 1.0) * 0.5;
        self.levels[0] = ((1.0 - angle) * FRAC_PI_2).sin() * SQRT_2;
        self.levels[1] = (angle * FRAC_PI_2).sin() * SQRT_2;
        #[cfg(test)]
        {
            self.recomputes += 1;
        }
    }

    /// The precomputed gain for a stereo side: 0 is left, 1 is right.
    pub fn level(&self, channel: usize) -> f32 {
        self.levels[channel.min(1)]
    }

    /// The current pan position.
    pub fn position(&self) -> f32 {
        self.position
    }

    #[cfg(test)]
    fn recomputes(&self) -> usize {
        self.recomputes
    }
}

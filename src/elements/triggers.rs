// Copyright (c) 2024 Mike Tsao

use derivative::Derivative;

/// [SchmittTrigger] converts a continuous control voltage into discrete
/// rising-edge events through a hysteresis band, using the 0.1 V / 1.0 V
/// thresholds of the 0–10 V control convention. It debounces both the manual
/// on/off buttons and their CV equivalents.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct SchmittTrigger {
    // Starts high so a signal that is already high at patch load doesn't
    // count as an edge.
    #[derivative(Default(value = "true"))]
    state: bool,
}
impl SchmittTrigger {
    /// Voltage at or below which the trigger re-arms.
    pub const LOW_THRESHOLD: f32 = 0.1;
    /// Voltage at or above which an armed trigger fires.
    pub const HIGH_THRESHOLD: f32 = 1.0;

    /// Feeds one voltage sample; true exactly on a rising edge.
    pub fn process(&mut self, voltage: f32) -> bool {
        if self.state {
            if voltage <= Self::LOW_THRESHOLD {
                self.state = false;
            }
        } else if voltage >= Self::HIGH_THRESHOLD {
            self.state = true;
            return true;
        }
        false
    }

    /// Whether the input is currently on the high side of the band.
    pub fn is_high(&self) -> bool {
        self.state
    }

    /// Returns to the armed-high startup state.
    pub fn reset(&mut self) {
        self.state = true;
    }
}

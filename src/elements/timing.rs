// Copyright (c) 2024 Mike Tsao

use derivative::Derivative;

/// [ClockDivider] reports "due" every N calls. The cores use it to throttle
/// work that doesn't need to run at audio rate, such as pan recomputation and
/// light updates, without introducing audible stepping.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct ClockDivider {
    clock: u32,
    #[derivative(Default(value = "1"))]
    division: u32,
}
impl ClockDivider {
    /// Creates a divider with the given period, floored at 1.
    pub fn new_with(division: u32) -> Self {
        Self {
            clock: 0,
            division: division.max(1),
        }
    }

    /// Sets the period, floored at 1.
    pub fn set_division(&mut self, division: u32) {
        self.division = division.max(1);
    }

    /// The configured period.
    pub fn division(&self) -> u32 {
        self.division
    }

    /// Counts one call; true every `division` calls.
    pub fn process(&mut self) -> bool {
        self.clock += 1;
        if self.clock >= self.division {
            self.clock = 0;
            true
        } else {
            false
        }
    }

    /// Restarts the count.
    pub fn reset(&mut self) {
        self.clock = 0;
    }
}
